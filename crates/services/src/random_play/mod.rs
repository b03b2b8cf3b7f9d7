mod service;
mod view;

// Public API of the random-play subsystem.
pub use crate::error::RandomPlayError;
pub use service::RandomPlayService;
pub use view::{NextQuiz, QuizPrompt, RandomResult, RandomTurn, RoundComplete};
