#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use error::QuizError;
pub use quiz::{AnswerFeedback, OptionMark, QuizConfig, QuizEngine, QuizSnapshot, SessionPhase};
pub use quiz_core::Clock;
