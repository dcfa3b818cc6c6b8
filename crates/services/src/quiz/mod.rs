mod config;
mod engine;
mod session;
mod view;

pub use config::QuizConfig;
pub use engine::QuizEngine;
pub use session::{Advance, QuizSession};
pub use view::{AnswerFeedback, OptionMark, QuizSnapshot, SessionPhase};
