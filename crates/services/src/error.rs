//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizId, QuizValidationError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("There is no quiz with id={0}")]
    NotFound(QuizId),
    #[error(transparent)]
    Validation(#[from] QuizValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PlayService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayError {
    #[error("There is no quiz with id={0}")]
    NotFound(QuizId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `RandomPlayService`.
///
/// Every variant aborts the current request without touching the session history.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RandomPlayError {
    #[error("There is no quiz with id={0}")]
    QuizNotFound(QuizId),
    #[error("random source is unavailable")]
    RngPoisoned,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RandomPlayError {
    /// Message shown to the player when a round is aborted.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Error playing the quiz: {self}")
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
