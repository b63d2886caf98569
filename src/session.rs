//! Quiz session controller: the state machine driving generation, answering,
//! and scoring.
//!
//! ```text
//! Idle --generate(topic valid)--> Loading
//! Loading --response validates--> Loaded
//! Loading --transport/validation error--> Idle (message set, no quiz)
//! Loaded --record answer--> Loaded
//! Loaded --submit (all answered)--> Scored
//! Scored --record answer--> Loaded (score cleared until next submit)
//! Loaded/Scored --generate--> Loading (prior quiz/answers/score discarded)
//! ```
//!
//! The session has no terminal state and is perpetually re-enterable. One
//! session belongs to one logical user; `&mut self` on every mutation is the
//! whole concurrency model.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::error::AiError;
use crate::quiz::{build_prompt, parse_quiz, AnswerMap, Quiz, Score};

/// Low-level generation client abstraction.
///
/// Implementors execute a prompt against a generative backend and return the
/// extracted text payload. Quiz parsing and validation happen in the session,
/// not the client.
#[async_trait]
pub trait GenerativeClient: Send + Sync + Debug {
    /// Execute the prompt and return the model's text payload.
    async fn generate_raw(&self, prompt: String) -> Result<String, AiError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn GenerativeClient>;
}

impl Clone for Box<dyn GenerativeClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl GenerativeClient for Box<dyn GenerativeClient> {
    async fn generate_raw(&self, prompt: String) -> Result<String, AiError> {
        self.as_ref().generate_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn GenerativeClient> {
        self.as_ref().clone_box()
    }
}

/// Observable session phase. `Idle` is both the initial state and the
/// post-failure state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Scored,
}

/// Handle for one generation attempt.
///
/// Attempts are sequence-numbered: only the response matching the session's
/// latest attempt is applied, so an older in-flight call that resolves after
/// a newer one cannot overwrite its result.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    seq: u64,
    pub prompt: String,
}

/// Outcome of applying a generation response to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The response belonged to the latest attempt and was applied.
    Applied,
    /// A newer attempt superseded this one; the response was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct QuizSession {
    state: QuizState,
    topic: String,
    quiz: Option<Quiz>,
    answers: AnswerMap,
    score: Option<Score>,
    error: Option<String>,
    seq: u64,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// Topic of the active (or in-flight) quiz.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    /// Displayable message from the last failed generation, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a new generation attempt for `topic`.
    ///
    /// A blank or whitespace-only topic never fires: returns `None` and
    /// leaves the session untouched, with no error message. Otherwise the
    /// prior quiz, answers, score, and error are discarded, the session
    /// enters `Loading`, and the returned attempt carries the prompt to send.
    pub fn begin_generation(&mut self, topic: &str) -> Option<GenerationAttempt> {
        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.seq += 1;
        self.topic = trimmed.to_string();
        self.quiz = None;
        self.answers.clear();
        self.score = None;
        self.error = None;
        self.state = QuizState::Loading;

        info!(target = "learning_pal::session", topic = %trimmed, seq = self.seq, "generation started");
        Some(GenerationAttempt { seq: self.seq, prompt: build_prompt(trimmed) })
    }

    /// Apply the transport result for `attempt`.
    ///
    /// Returns [`ApplyOutcome::Stale`] without touching any state when a
    /// newer attempt has superseded this one. Otherwise the payload is
    /// validated into a quiz, or the session drops back to `Idle` with a
    /// displayable error message and no quiz.
    pub fn apply_response(
        &mut self,
        attempt: &GenerationAttempt,
        result: Result<String, AiError>,
    ) -> ApplyOutcome {
        if attempt.seq != self.seq {
            warn!(
                target = "learning_pal::session",
                stale_seq = attempt.seq,
                current_seq = self.seq,
                "dropping superseded generation response"
            );
            return ApplyOutcome::Stale;
        }

        match result.map_err(Into::into).and_then(|payload| parse_quiz(&payload)) {
            Ok(quiz) => {
                info!(
                    target = "learning_pal::session",
                    questions = quiz.questions.len(),
                    "quiz loaded"
                );
                self.quiz = Some(quiz);
                self.answers.clear();
                self.score = None;
                self.error = None;
                self.state = QuizState::Loaded;
            }
            Err(e) => {
                warn!(target = "learning_pal::session", error = %e, "generation failed");
                self.error = Some(e.to_string());
                self.quiz = None;
                self.answers.clear();
                self.score = None;
                self.state = QuizState::Idle;
            }
        }
        ApplyOutcome::Applied
    }

    /// Run a full generation round against `client`.
    ///
    /// Returns `false` when the topic is blank and the attempt never fired.
    /// Success or failure of the call itself is reported through
    /// [`QuizSession::quiz`] and [`QuizSession::error`].
    #[instrument(target = "learning_pal::session", skip(self, client), fields(topic = %topic))]
    pub async fn generate(&mut self, client: &dyn GenerativeClient, topic: &str) -> bool {
        let Some(attempt) = self.begin_generation(topic) else {
            return false;
        };
        let result = client.generate_raw(attempt.prompt.clone()).await;
        self.apply_response(&attempt, result);
        true
    }

    /// Record (or overwrite) the selected option for a question.
    ///
    /// Ignored unless a quiz is loaded and `question` is in range. Recording
    /// an answer while scored clears the score until the next submit.
    pub fn record_answer(&mut self, question: usize, option: usize) -> bool {
        let in_range = self
            .quiz
            .as_ref()
            .map_or(false, |quiz| question < quiz.questions.len());
        if !in_range
            || !matches!(self.state, QuizState::Loaded | QuizState::Scored)
        {
            return false;
        }

        self.answers.insert(question, option);
        if self.state == QuizState::Scored {
            self.score = None;
            self.state = QuizState::Loaded;
        }
        true
    }

    /// Submission is enabled exactly when every question has an answer. A
    /// zero-question quiz never becomes submittable.
    pub fn can_submit(&self) -> bool {
        self.quiz.as_ref().map_or(false, |quiz| {
            !quiz.questions.is_empty() && self.answers.len() == quiz.questions.len()
        })
    }

    /// Score the completed answer map.
    ///
    /// Returns `None` when submission is disabled. Re-submitting without
    /// changing answers recomputes the same score.
    pub fn submit(&mut self) -> Option<Score> {
        if !self.can_submit() {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        let score = quiz.score(&self.answers);
        info!(target = "learning_pal::session", percent = score.percent, "quiz submitted");
        self.score = Some(score);
        self.state = QuizState::Scored;
        self.score
    }
}
