use std::sync::Arc;

use quiz_core::model::{Quiz, QuizId};
use quiz_core::play::answers_match;
use storage::repository::QuizRepository;

use crate::error::PlayError;

/// Quiz plus the answer to pre-fill in the play form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPrompt {
    pub quiz: Quiz,
    pub answer: String,
}

/// Outcome of checking an answer outside random play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub quiz: Quiz,
    pub answer: String,
    pub result: bool,
}

/// Play a single, explicitly chosen quiz. Keeps no session state.
#[derive(Clone)]
pub struct PlayService {
    quizzes: Arc<dyn QuizRepository>,
}

impl PlayService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// # Errors
    ///
    /// Returns `PlayError::NotFound` if the quiz does not exist.
    pub async fn play(&self, id: QuizId, answer: Option<&str>) -> Result<PlayPrompt, PlayError> {
        let quiz = self.load(id).await?;
        Ok(PlayPrompt {
            quiz,
            answer: answer.unwrap_or_default().to_owned(),
        })
    }

    /// Compare `answer` with the quiz's answer, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NotFound` if the quiz does not exist.
    pub async fn check(&self, id: QuizId, answer: Option<&str>) -> Result<CheckResult, PlayError> {
        let quiz = self.load(id).await?;
        let answer = answer.unwrap_or_default().to_owned();
        let result = answers_match(&answer, quiz.answer());
        Ok(CheckResult {
            quiz,
            answer,
            result,
        })
    }

    async fn load(&self, id: QuizId) -> Result<Quiz, PlayError> {
        self.quizzes
            .get_quiz(id)
            .await?
            .ok_or(PlayError::NotFound(id))
    }
}
