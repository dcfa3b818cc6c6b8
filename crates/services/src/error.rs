//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizSummaryError;

/// Errors emitted by the quiz engine.
///
/// Question source failures never appear here: the engine logs them and
/// degrades to an exhausted session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no quiz session is running")]
    NotStarted,
    #[error("no question is ready to answer")]
    NoCurrentQuestion,
    #[error("option {index} is out of range for a question with {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("quiz engine has stopped")]
    EngineStopped,
    #[error(transparent)]
    Summary(#[from] QuizSummaryError),
}
