use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a question document, unique within a session.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying document identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generation counter for quiz sessions.
///
/// Every session start mints a strictly larger token. Work scheduled under an
/// older token is stale once a newer session exists.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Token held by an engine that has never started a session.
    pub const INITIAL: Self = Self(0);

    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the token that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({:?})", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_display_is_raw_document_id() {
        let id = QuestionId::new("sicilian-01");
        assert_eq!(id.to_string(), "sicilian-01");
    }

    #[test]
    fn session_token_increments() {
        let first = SessionToken::INITIAL.next();
        assert_eq!(first.value(), 1);
        assert!(first.next() > first);
    }

    #[test]
    fn session_token_displays_with_hash() {
        let token = SessionToken::new(7);
        assert_eq!(token.to_string(), "#7");
        assert_eq!(format!("{token:?}"), "SessionToken(7)");
    }
}
