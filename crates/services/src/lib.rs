#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod play_service;
pub mod quiz_service;
pub mod random_play;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, PlayError, QuizServiceError, RandomPlayError};
pub use play_service::{CheckResult, PlayPrompt, PlayService};
pub use quiz_service::QuizService;
pub use random_play::{
    NextQuiz, QuizPrompt, RandomPlayService, RandomResult, RandomTurn, RoundComplete,
};
