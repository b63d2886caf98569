pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod json_utils;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod syllabus;

// Convenient re-exports
pub use quiz::{AnswerMap, Question, Quiz, Score};
pub use session::{ApplyOutcome, GenerativeClient, QuizSession, QuizState};
