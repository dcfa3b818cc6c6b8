use async_trait::async_trait;
use quiz_core::model::Question;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question source unavailable: {0}")]
    Unavailable(String),

    #[error("question fetch timed out after {0:?}")]
    TimedOut(Duration),

    #[error("failed to read question collection: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed question collection: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Provider of the question collection for a quiz session.
///
/// The returned collection is authoritative: callers do not retry, validate
/// option correctness, or reorder beyond their own shuffle.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every question in the collection.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the collection cannot be read.
    async fn fetch(&self) -> Result<Vec<Question>, SourceError>;
}

/// In-memory question source for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }

    /// Replace the collection returned by later fetches.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the lock is poisoned.
    pub fn replace(&self, questions: Vec<Question>) -> Result<(), SourceError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        *guard = questions;
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn fetch(&self) -> Result<Vec<Question>, SourceError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;

    fn question(id: &str) -> Question {
        Question::new(QuestionId::new(id), "Q", "A", vec!["A".into(), "B".into()], None)
    }

    #[tokio::test]
    async fn fetch_returns_stored_collection_in_order() {
        let source = InMemoryQuestionSource::new(vec![question("a"), question("b")]);
        let fetched = source.fetch().await.unwrap();
        let ids: Vec<_> = fetched.iter().map(|q| q.id().as_str().to_owned()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn replace_is_visible_to_clones() {
        let source = InMemoryQuestionSource::default();
        let shared = source.clone();
        assert!(shared.fetch().await.unwrap().is_empty());

        source.replace(vec![question("c")]).unwrap();
        assert_eq!(shared.fetch().await.unwrap().len(), 1);
    }
}
