//! Quiz domain model: prompt construction, payload validation, and scoring.
//!
//! A [`Quiz`] is created once per successful generation and is immutable
//! thereafter. Answers accumulate in an [`AnswerMap`] owned by the active
//! session; a [`Score`] is a pure function of `(Quiz, AnswerMap)` computed at
//! submission time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::QuizError;
use crate::json_utils::extract_embedded;

/// Number of questions requested per generation.
pub const QUESTION_COUNT: usize = 5;
/// Number of options requested per question.
pub const OPTION_COUNT: usize = 4;

/// Selected option index per question index. Later selections for the same
/// question overwrite earlier ones; no history is kept.
pub type AnswerMap = HashMap<usize, usize>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

/// Result of submitting a completed [`AnswerMap`] against a [`Quiz`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Percentage of correct answers, rounded to one decimal place.
    pub percent: f64,
    pub correct: usize,
    pub total: usize,
}

/// Build the generation prompt for a topic.
///
/// The template pins the response contract: exactly [`QUESTION_COUNT`]
/// multiple-choice questions, [`OPTION_COUNT`] options each, and a zero-based
/// `correctAnswer` index, with a structure sample the model can copy.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Generate a quiz about {} with {} multiple choice questions.
Each question must have exactly {} options and one correct answer.
Format the response as a JSON object with this structure:
{{
  "questions": [
    {{
      "question": "question text",
      "options": ["option1", "option2", "option3", "option4"],
      "correctAnswer": 0
    }}
  ]
}}"#,
        topic.trim(),
        QUESTION_COUNT,
        OPTION_COUNT
    )
}

/// Parse a model text payload into a validated [`Quiz`].
///
/// Tries a strict parse of the whole payload first, then falls back to
/// scanning for an embedded JSON object (models often wrap the quiz in prose
/// or a code fence). A payload with no parseable quiz surfaces the strict
/// parse error together with the raw text.
pub fn parse_quiz(payload: &str) -> Result<Quiz, QuizError> {
    let quiz = match serde_json::from_str::<Quiz>(payload.trim()) {
        Ok(quiz) => quiz,
        Err(primary) => match extract_embedded::<Quiz>(payload) {
            Some(quiz) => {
                debug!(target = "learning_pal::quiz", "quiz recovered from embedded JSON");
                quiz
            }
            None => {
                warn!(target = "learning_pal::quiz", error = %primary, "payload did not contain a quiz");
                return Err(QuizError::QuizParse(primary, payload.to_string()));
            }
        },
    };
    quiz.validate()?;
    Ok(quiz)
}

impl Quiz {
    /// Check the correct-answer invariant for every question: the recorded
    /// index must point at an existing option. A quiz that fails this would
    /// render as an unanswerable question, so it is rejected outright.
    pub fn validate(&self) -> Result<(), QuizError> {
        for (i, q) in self.questions.iter().enumerate() {
            if q.correct_answer >= q.options.len() {
                return Err(QuizError::QuizShape(format!(
                    "question {} has correctAnswer {} but only {} options",
                    i + 1,
                    q.correct_answer,
                    q.options.len()
                )));
            }
        }
        Ok(())
    }

    /// Score an answer map against this quiz.
    ///
    /// Callers gate on a non-empty quiz (submission is disabled at zero
    /// questions); a zero-question quiz scores 0 of 0 rather than dividing
    /// by zero.
    pub fn score(&self, answers: &AnswerMap) -> Score {
        let total = self.questions.len();
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| answers.get(i) == Some(&q.correct_answer))
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            (correct as f64 / total as f64 * 1000.0).round() / 10.0
        };
        Score { percent, correct, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_with_answers(correct: &[usize]) -> Quiz {
        Quiz {
            questions: correct
                .iter()
                .map(|&c| Question {
                    question: "q".to_string(),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: c,
                })
                .collect(),
        }
    }

    #[test]
    fn prompt_mentions_topic_and_counts() {
        let p = build_prompt("  Operating Systems  ");
        assert!(p.contains("Operating Systems"));
        assert!(!p.contains("  Operating Systems"));
        assert!(p.contains("5 multiple choice questions"));
        assert!(p.contains("correctAnswer"));
    }

    #[test]
    fn scoring_three_of_five_is_60() {
        let quiz = quiz_with_answers(&[0, 1, 2, 3, 0]);
        let answers: AnswerMap =
            [(0, 0), (1, 1), (2, 0), (3, 3), (4, 0)].into_iter().collect();
        let score = quiz.score(&answers);
        assert_eq!(score.correct, 3);
        assert_eq!(score.total, 5);
        assert_eq!(score.percent, 60.0);
    }

    #[test]
    fn scoring_rounds_to_one_decimal() {
        let quiz = quiz_with_answers(&[0, 0, 0]);
        let answers: AnswerMap = [(0, 0)].into_iter().collect();
        // 1/3 = 33.333... -> 33.3
        assert_eq!(quiz.score(&answers).percent, 33.3);
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let quiz = quiz_with_answers(&[1, 1]);
        let answers: AnswerMap = [(0, 1)].into_iter().collect();
        assert_eq!(quiz.score(&answers).percent, 50.0);
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected() {
        let payload = r#"{"questions":[{"question":"q","options":["a","b"],"correctAnswer":2}]}"#;
        match parse_quiz(payload) {
            Err(QuizError::QuizShape(msg)) => assert!(msg.contains("question 1")),
            other => panic!("expected shape error, got {:?}", other),
        }
    }

    #[test]
    fn fenced_payload_parses() {
        let payload = "```json\n{\"questions\":[{\"question\":\"q\",\"options\":[\"a\",\"b\",\"c\",\"d\"],\"correctAnswer\":1}]}\n```";
        let quiz = parse_quiz(payload).unwrap();
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_answer, 1);
    }
}
