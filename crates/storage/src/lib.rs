#![forbid(unsafe_code)]

pub mod json;
pub mod record;
pub mod source;

pub use json::JsonFileSource;
pub use record::QuestionRecord;
pub use source::{InMemoryQuestionSource, QuestionSource, SourceError};
