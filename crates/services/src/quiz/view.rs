use quiz_core::model::{QuestionId, QuizSummary, SessionToken};

use super::session::QuizSession;

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Start screen; no session running.
    #[default]
    Idle,
    /// Session started, questions not yet delivered.
    Loading,
    /// Current question is waiting for a tap.
    AwaitingAnswer,
    /// Answer graded; a timed transition is pending.
    Grading,
    /// Session started but the source yielded no questions.
    Exhausted,
}

/// Highlight for a single option button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    Wrong,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub token: SessionToken,
    pub question_id: QuestionId,
    pub tapped_index: usize,
    pub correct_index: Option<usize>,
    pub is_correct: bool,
    pub score: u32,
    pub is_last: bool,
}

/// Presenter-facing read model, published after every engine mutation.
///
/// Plain data only: no formatting or localization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSnapshot {
    pub token: SessionToken,
    pub phase: SessionPhase,
    pub started: bool,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question_text: Option<String>,
    pub current_options: Vec<String>,
    /// Set only when the question's image link parses as a URL.
    pub current_image_url: Option<String>,
    /// Always the correct option once an answer is graded.
    pub selected_option_index: Option<usize>,
    /// The option the player actually tapped, while grading.
    pub tapped_index: Option<usize>,
    pub score: u32,
    pub high_score: u32,
    pub last_summary: Option<QuizSummary>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn idle(token: SessionToken, high_score: u32, last_summary: Option<QuizSummary>) -> Self {
        Self {
            token,
            high_score,
            last_summary,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_session(
        session: &QuizSession,
        high_score: u32,
        last_summary: Option<QuizSummary>,
    ) -> Self {
        let current = session.current_question();
        Self {
            token: session.token(),
            phase: session.phase(),
            started: true,
            current_index: session.current_index(),
            total_questions: session.questions().len(),
            current_question_text: current.map(|q| q.text().to_owned()),
            current_options: current.map(|q| q.options().to_vec()).unwrap_or_default(),
            current_image_url: current
                .and_then(|q| q.image_link())
                .map(String::from),
            selected_option_index: session.selected_option_index(),
            tapped_index: session.tapped_index(),
            score: session.score(),
            high_score,
            last_summary,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == SessionPhase::Idle
    }

    /// Highlights for each current option.
    ///
    /// The selected option is the correct one; a different tapped option is wrong.
    #[must_use]
    pub fn option_marks(&self) -> Vec<OptionMark> {
        (0..self.current_options.len())
            .map(|index| {
                if self.selected_option_index == Some(index) {
                    OptionMark::Correct
                } else if self.tapped_index == Some(index) {
                    OptionMark::Wrong
                } else {
                    OptionMark::Neutral
                }
            })
            .collect()
    }
}
