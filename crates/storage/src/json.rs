use async_trait::async_trait;
use quiz_core::model::Question;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::record::QuestionRecord;
use crate::source::{QuestionSource, SourceError};

/// Collection name used by the hosted quiz database.
pub const DEFAULT_COLLECTION: &str = "ChessQuestion";

/// A question collection exported to JSON.
///
/// Accepted layouts:
/// - an object mapping document id to document body
/// - an array of document bodies (ids taken from an `id` field, else the position)
///
/// Bodies stay untyped here so one malformed document cannot reject the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Documents {
    Keyed(BTreeMap<String, Value>),
    Listed(Vec<Value>),
}

impl Documents {
    fn into_questions(self) -> Vec<Question> {
        match self {
            Documents::Keyed(docs) => docs
                .into_iter()
                .map(|(id, body)| QuestionRecord::from_value(body).into_question(id))
                .collect(),
            Documents::Listed(docs) => docs
                .into_iter()
                .enumerate()
                .map(|(pos, body)| {
                    let record = QuestionRecord::from_value(body);
                    let id = record.id.clone().unwrap_or_else(|| pos.to_string());
                    record.into_question(id)
                })
                .collect(),
        }
    }
}

/// Question source backed by a JSON export on disk.
///
/// The file is re-read on every fetch so edits show up on the next session.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    collection: Option<String>,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            collection: None,
        }
    }

    /// Read documents from a named collection inside a top-level object.
    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a collection from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Parse` for malformed JSON or an unexpected layout.
    /// Returns `SourceError::Unavailable` if the named collection is absent.
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<Question>, SourceError> {
        let root: Value = serde_json::from_slice(bytes)?;
        let docs = match &self.collection {
            Some(name) => match root {
                Value::Object(mut map) => map.remove(name).ok_or_else(|| {
                    SourceError::Unavailable(format!("collection `{name}` not found"))
                })?,
                _ => {
                    return Err(SourceError::Unavailable(format!(
                        "collection `{name}` not found"
                    )));
                }
            },
            None => root,
        };
        let docs: Documents = serde_json::from_value(docs)?;
        Ok(docs.into_questions())
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Question>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let questions = self.parse(&bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded question collection"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyed_documents() {
        let source = JsonFileSource::new("unused.json");
        let raw = br#"{
            "b": {"question": "Q2", "correctAnswer": "x", "option": ["x"]},
            "a": {"question": "Q1", "correctAnswer": "y", "option": ["y", "z"]}
        }"#;
        let questions = source.parse(raw).unwrap();
        let ids: Vec<_> = questions.iter().map(|q| q.id().to_string()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn parses_listed_documents_with_fallback_ids() {
        let source = JsonFileSource::new("unused.json");
        let raw = br#"[
            {"id": "named", "question": "Q1"},
            {"question": "Q2"}
        ]"#;
        let questions = source.parse(raw).unwrap();
        assert_eq!(questions[0].id().as_str(), "named");
        assert_eq!(questions[1].id().as_str(), "1");
    }

    #[test]
    fn named_collection_is_selected() {
        let source = JsonFileSource::new("unused.json").with_collection(DEFAULT_COLLECTION);
        let raw = br#"{"ChessQuestion": [{"question": "Q"}], "Other": []}"#;
        assert_eq!(source.parse(raw).unwrap().len(), 1);
    }

    #[test]
    fn missing_collection_is_unavailable() {
        let source = JsonFileSource::new("unused.json").with_collection(DEFAULT_COLLECTION);
        let err = source.parse(br#"{"Other": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[test]
    fn malformed_document_keeps_rest_of_collection() {
        let source = JsonFileSource::new("unused.json");
        let raw = br#"{
            "a": {"question": null, "correctAnswer": "x", "option": ["x", 3]},
            "b": {"question": "1.e4 c5?", "correctAnswer": "Sicilian", "option": ["Sicilian"]}
        }"#;
        let questions = source.parse(raw).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "");
        assert!(questions[0].options().is_empty());
        assert_eq!(questions[1].correct_index(), Some(0));
    }

    #[test]
    fn scalar_root_is_a_parse_error() {
        let source = JsonFileSource::new("unused.json");
        let err = source.parse(b"42").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
