use learning_pal::clients::gemini::GenerateResponse;
use learning_pal::error::{AiError, QuizError};
use learning_pal::quiz::{build_prompt, parse_quiz, QUESTION_COUNT};

const QUIZ_JSON: &str = r#"{"questions":[
    {"question":"What schedules processes?","options":["Scheduler","Linker","Loader","Compiler"],"correctAnswer":0},
    {"question":"q2","options":["a","b","c","d"],"correctAnswer":1},
    {"question":"q3","options":["a","b","c","d"],"correctAnswer":2},
    {"question":"q4","options":["a","b","c","d"],"correctAnswer":3},
    {"question":"q5","options":["a","b","c","d"],"correctAnswer":0}
]}"#;

fn envelope_with_text(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[test]
fn well_formed_envelope_yields_five_by_four_quiz() {
    let envelope: GenerateResponse =
        serde_json::from_str(&envelope_with_text(QUIZ_JSON)).unwrap();
    let text = envelope.into_text().unwrap();
    let quiz = parse_quiz(&text).unwrap();

    assert_eq!(quiz.questions.len(), QUESTION_COUNT);
    for question in &quiz.questions {
        assert_eq!(question.options.len(), 4);
        assert!(question.correct_answer < question.options.len());
    }
}

#[test]
fn envelope_without_candidates_is_invalid_format() {
    let envelope: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
    assert!(matches!(envelope.into_text(), Err(AiError::InvalidFormat)));
}

#[test]
fn envelope_with_empty_parts_is_invalid_format() {
    let envelope: GenerateResponse =
        serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
    assert!(matches!(envelope.into_text(), Err(AiError::InvalidFormat)));
}

#[test]
fn envelope_with_missing_content_is_invalid_format() {
    let envelope: GenerateResponse =
        serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
    assert!(matches!(envelope.into_text(), Err(AiError::InvalidFormat)));
}

#[test]
fn non_json_payload_is_a_parse_error_carrying_the_raw_text() {
    match parse_quiz("I'd be happy to quiz you!") {
        Err(QuizError::QuizParse(_, raw)) => assert!(raw.contains("happy")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn payload_with_wrong_shape_is_a_parse_error() {
    // valid JSON, but not the quiz schema
    assert!(matches!(
        parse_quiz(r#"{"answers":[1,2,3]}"#),
        Err(QuizError::QuizParse(..))
    ));
}

#[test]
fn fenced_quiz_payload_is_recovered() {
    let fenced = format!("Here is your quiz:\n```json\n{}\n```\nGood luck!", QUIZ_JSON);
    let quiz = parse_quiz(&fenced).unwrap();
    assert_eq!(quiz.questions.len(), QUESTION_COUNT);
}

#[test]
fn prompt_embeds_topic_and_structure_sample() {
    let prompt = build_prompt("Computer Networks");
    assert!(prompt.contains("Generate a quiz about Computer Networks"));
    assert!(prompt.contains(r#""correctAnswer": 0"#));
    assert!(prompt.contains("\"questions\""));
}
