use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::SessionToken;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds question count ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Outcome of one finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    token: SessionToken,
    total_questions: u32,
    score: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizSummary {
    /// Build a summary for a completed session.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `QuizSummaryError::ScoreExceedsTotal` if more answers were scored than asked.
    pub fn new(
        token: SessionToken,
        total_questions: u32,
        score: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizSummaryError> {
        if completed_at < started_at {
            return Err(QuizSummaryError::InvalidTimeRange);
        }
        if score > total_questions {
            return Err(QuizSummaryError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            token,
            total_questions,
            score,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Answers graded incorrectly (or ungradable).
    #[must_use]
    pub fn missed(&self) -> u32 {
        self.total_questions - self.score
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.score == self.total_questions
    }
}
