use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::QuestionId;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Immutable multiple-choice question.
///
/// Records arrive from an external source and are not validated: an empty
/// option list or a correct answer missing from `options` is carried as-is.
/// Grading treats such a question as unanswerable rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    correct_answer: String,
    options: Vec<String>,
    image_url: Option<String>,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            correct_answer: correct_answer.into(),
            options,
            image_url,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Parsed image location, or `None` when absent or not a valid URL.
    #[must_use]
    pub fn image_link(&self) -> Option<Url> {
        self.image_url.as_deref().and_then(|raw| Url::parse(raw).ok())
    }

    /// Index of the first option whose text equals the correct answer.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| *option == self.correct_answer)
    }

    /// Returns whether the option at `index` is the correct answer.
    ///
    /// Compares by text, so a duplicate of the correct answer also counts.
    /// Returns `None` when `index` is outside the option list.
    #[must_use]
    pub fn is_correct_option(&self, index: usize) -> Option<bool> {
        self.option(index)
            .map(|option| option == self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn italian_game() -> Question {
        Question::new(
            QuestionId::new("q1"),
            "1.e4 e5 2.Nf3 Nc6 3.Bc4 is called?",
            "Italian Game",
            vec![
                "Ruy Lopez".into(),
                "Italian Game".into(),
                "Scotch Game".into(),
            ],
            Some("https://example.com/italian.png".into()),
        )
    }

    #[test]
    fn correct_index_finds_answer() {
        assert_eq!(italian_game().correct_index(), Some(1));
    }

    #[test]
    fn correct_index_none_when_answer_missing() {
        let q = Question::new(QuestionId::new("q2"), "?", "Caro-Kann", vec!["French".into()], None);
        assert_eq!(q.correct_index(), None);
        assert_eq!(q.is_correct_option(0), Some(false));
    }

    #[test]
    fn is_correct_option_checks_bounds() {
        let q = italian_game();
        assert_eq!(q.is_correct_option(1), Some(true));
        assert_eq!(q.is_correct_option(0), Some(false));
        assert_eq!(q.is_correct_option(3), None);
    }

    #[test]
    fn image_link_parses_valid_urls_only() {
        assert!(italian_game().image_link().is_some());
        let q = Question::new(QuestionId::new("q3"), "?", "a", vec!["a".into()], Some("not a url".into()));
        assert_eq!(q.image_url(), Some("not a url"));
        assert!(q.image_link().is_none());
    }
}
