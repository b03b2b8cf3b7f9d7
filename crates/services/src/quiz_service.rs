use std::sync::Arc;

use log::info;
use quiz_core::model::{Quiz, QuizDraft, QuizId};
use storage::repository::{NewQuizRecord, QuizRepository, StorageError};

use crate::Clock;
use crate::error::QuizServiceError;

/// Create, read, update and delete quizzes.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// All quizzes ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        Ok(self.quizzes.list_quizzes(&[]).await?)
    }

    /// Fetch a quiz by ID. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, QuizServiceError> {
        Ok(self.quizzes.get_quiz(id).await?)
    }

    /// Like `get_quiz`, but a missing quiz is an error.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if no quiz has this id.
    pub async fn load_quiz(&self, id: QuizId) -> Result<Quiz, QuizServiceError> {
        self.get_quiz(id)
            .await?
            .ok_or(QuizServiceError::NotFound(id))
    }

    /// Blank form input for a new quiz.
    #[must_use]
    pub fn new_draft(&self) -> QuizDraft {
        QuizDraft::default()
    }

    /// Validate and persist a new quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Validation` with every failed field, or
    /// `QuizServiceError::Storage` if persistence fails.
    pub async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let validated = draft.validate(self.clock.now())?;
        let id = self
            .quizzes
            .insert_new_quiz(NewQuizRecord::from_validated(&validated))
            .await?;
        info!("created quiz {id}");
        Ok(validated.assign_id(id))
    }

    /// Replace the question and answer of an existing quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound`, `QuizServiceError::Validation`, or
    /// `QuizServiceError::Storage`.
    pub async fn update_quiz(&self, id: QuizId, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let mut quiz = self.load_quiz(id).await?;
        quiz.edit(draft, self.clock.now())?;
        self.quizzes
            .update_quiz(&quiz)
            .await
            .map_err(|e| not_found_as(id, e))?;
        info!("updated quiz {id}");
        Ok(quiz)
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` if no quiz has this id.
    pub async fn delete_quiz(&self, id: QuizId) -> Result<(), QuizServiceError> {
        self.quizzes
            .delete_quiz(id)
            .await
            .map_err(|e| not_found_as(id, e))?;
        info!("deleted quiz {id}");
        Ok(())
    }
}

fn not_found_as(id: QuizId, err: StorageError) -> QuizServiceError {
    match err {
        StorageError::NotFound => QuizServiceError::NotFound(id),
        other => QuizServiceError::Storage(other),
    }
}
