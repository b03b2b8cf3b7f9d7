use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizId, SessionKey, ValidatedQuiz};
use quiz_core::play::RoundHistory;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a quiz that has not been assigned an id yet.
///
/// Only question and answer are written by callers; timestamps come from the
/// service clock.
#[derive(Debug, Clone)]
pub struct NewQuizRecord {
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl NewQuizRecord {
    #[must_use]
    pub fn from_validated(quiz: &ValidatedQuiz) -> Self {
        Self {
            question: quiz.question().to_owned(),
            answer: quiz.answer().to_owned(),
            created_at: quiz.created_at(),
        }
    }
}

/// Repository contract for quizzes.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Insert a new quiz and return the id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError>;

    /// Overwrite question, answer and `updated_at` of an existing quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz has this id.
    async fn update_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by ID. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be queried.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;

    /// List every quiz whose id is not in `exclude`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be queried.
    async fn list_quizzes(&self, exclude: &[QuizId]) -> Result<Vec<Quiz>, StorageError>;

    /// Remove a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz has this id.
    async fn delete_quiz(&self, id: QuizId) -> Result<(), StorageError>;
}

/// Per-session random-play history.
#[async_trait]
pub trait PlaySessionRepository: Send + Sync {
    /// Returns `Ok(None)` if the session has never played a random round.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be queried or the stored
    /// history cannot be decoded.
    async fn load_history(&self, key: &SessionKey) -> Result<Option<RoundHistory>, StorageError>;

    /// Replace the stored history for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be stored.
    async fn save_history(
        &self,
        key: &SessionKey,
        history: &RoundHistory,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<BTreeMap<QuizId, Quiz>>>,
    sessions: Arc<Mutex<HashMap<SessionKey, RoundHistory>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: ToString>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let mut guard = self.quizzes.lock().map_err(poisoned)?;
        let next = guard
            .keys()
            .next_back()
            .map_or(1, |last| last.value().saturating_add(1));
        let id = QuizId::new(next);
        let stored = Quiz::from_persisted(
            id,
            quiz.question,
            quiz.answer,
            quiz.created_at,
            quiz.created_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.insert(id, stored);
        Ok(id)
    }

    async fn update_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(poisoned)?;
        let slot = guard.get_mut(&quiz.id()).ok_or(StorageError::NotFound)?;
        *slot = quiz.clone();
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self.quizzes.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_quizzes(&self, exclude: &[QuizId]) -> Result<Vec<Quiz>, StorageError> {
        let guard = self.quizzes.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|quiz| !exclude.contains(&quiz.id()))
            .cloned()
            .collect())
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(poisoned)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl PlaySessionRepository for InMemoryRepository {
    async fn load_history(&self, key: &SessionKey) -> Result<Option<RoundHistory>, StorageError> {
        let guard = self.sessions.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    async fn save_history(
        &self,
        key: &SessionKey,
        history: &RoundHistory,
    ) -> Result<(), StorageError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        guard.insert(key.clone(), history.clone());
        Ok(())
    }
}

/// Aggregates the quiz and session repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub sessions: Arc<dyn PlaySessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn PlaySessionRepository> = Arc::new(repo);
        Self { quizzes, sessions }
    }
}
