mod ids;
mod question;
mod summary;

pub use ids::{QuestionId, SessionToken};
pub use question::Question;
pub use summary::{QuizSummary, QuizSummaryError};
