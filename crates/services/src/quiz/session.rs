use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use quiz_core::model::{Question, QuizSummary, QuizSummaryError, SessionToken};

use super::view::{AnswerFeedback, SessionPhase};
use crate::error::QuizError;

/// Result of a timed transition out of grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at `index`.
    Next { index: usize },
    /// The last question was graded; the session is over.
    Finished { score: u32 },
    /// Nothing was being graded.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz run, from start through the last graded question.
///
/// Time-free and synchronous: the engine decides when to call `advance`.
pub struct QuizSession {
    token: SessionToken,
    phase: SessionPhase,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    selected: Option<usize>,
    tapped: Option<usize>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Begin a session that is waiting for its questions.
    #[must_use]
    pub fn begin(token: SessionToken, started_at: DateTime<Utc>) -> Self {
        Self {
            token,
            phase: SessionPhase::Loading,
            questions: Vec::new(),
            current: 0,
            score: 0,
            selected: None,
            tapped: None,
            started_at,
        }
    }

    /// Install the fetched questions in a uniformly random order.
    ///
    /// An empty collection leaves the session `Exhausted`.
    pub fn load<R: Rng + ?Sized>(&mut self, mut questions: Vec<Question>, rng: &mut R) {
        questions.shuffle(rng);
        self.questions = questions;
        self.current = 0;
        self.score = 0;
        self.selected = None;
        self.tapped = None;
        self.phase = if self.questions.is_empty() {
            SessionPhase::Exhausted
        } else {
            SessionPhase::AwaitingAnswer
        };
    }

    /// Grade the option at `option_index` for the current question.
    ///
    /// Afterwards `selected_option_index` always points at the correct option
    /// (or is cleared when the question has none), whatever was tapped.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoCurrentQuestion` while loading or when no questions were fetched.
    /// Returns `QuizError::AlreadyAnswered` while the current question is being graded.
    /// Returns `QuizError::OptionOutOfRange` if `option_index` is not a valid option.
    pub fn grade(&mut self, option_index: usize) -> Result<AnswerFeedback, QuizError> {
        match self.phase {
            SessionPhase::AwaitingAnswer => {}
            SessionPhase::Grading => return Err(QuizError::AlreadyAnswered),
            SessionPhase::Idle | SessionPhase::Loading | SessionPhase::Exhausted => {
                return Err(QuizError::NoCurrentQuestion);
            }
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(QuizError::NoCurrentQuestion)?;
        let is_correct =
            question
                .is_correct_option(option_index)
                .ok_or(QuizError::OptionOutOfRange {
                    index: option_index,
                    len: question.options().len(),
                })?;

        if is_correct {
            self.score = self.score.saturating_add(1);
        }
        let correct_index = question.correct_index();
        let question_id = question.id().clone();
        self.tapped = Some(option_index);
        self.selected = correct_index;
        self.phase = SessionPhase::Grading;

        Ok(AnswerFeedback {
            token: self.token,
            question_id,
            tapped_index: option_index,
            correct_index,
            is_correct,
            score: self.score,
            is_last: self.current + 1 >= self.questions.len(),
        })
    }

    /// Leave grading: step to the next question or report the session finished.
    pub fn advance(&mut self) -> Advance {
        if self.phase != SessionPhase::Grading {
            return Advance::Ignored;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            self.tapped = None;
            self.phase = SessionPhase::AwaitingAnswer;
            Advance::Next {
                index: self.current,
            }
        } else {
            Advance::Finished { score: self.score }
        }
    }

    /// Close out the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError` if the timestamps or counts are inconsistent.
    pub fn finish(self, completed_at: DateTime<Utc>) -> Result<QuizSummary, QuizSummaryError> {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        QuizSummary::new(self.token, total, self.score, self.started_at, completed_at)
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn selected_option_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn tapped_index(&self) -> Option<usize> {
        self.tapped
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("token", &self.token)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
