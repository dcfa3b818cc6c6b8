use quiz_core::model::{Question, QuestionId};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Persisted shape of a question document.
///
/// Field names follow the hosted collection. Each field is read on its own:
/// a missing, null, or mistyped value falls back to empty text, an empty
/// option list, or no image, so one bad field never drops the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionRecord {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, rename = "correctAnswer", deserialize_with = "lenient_string")]
    pub correct_answer: String,
    #[serde(default, rename = "option", deserialize_with = "lenient_options")]
    pub options: Vec<String>,
    #[serde(default, rename = "imageURL", deserialize_with = "lenient_opt_string")]
    pub image_url: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A list with any non-string entry counts as no options at all.
fn lenient_options<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default())
}

impl QuestionRecord {
    /// Read a document body, treating anything but an object as an empty document.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Convert the record into a domain `Question` under the given document id.
    ///
    /// An `id` embedded in the record body is ignored in favour of `document_id`.
    #[must_use]
    pub fn into_question(self, document_id: impl Into<String>) -> Question {
        Question::new(
            QuestionId::new(document_id),
            self.question,
            self.correct_answer,
            self.options,
            self.image_url,
        )
    }
}
