use std::sync::Arc;

use log::info;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::play_service::PlayService;
use crate::quiz_service::QuizService;
use crate::random_play::RandomPlayService;

/// Assembles the app-facing services over one `Storage`.
#[derive(Clone)]
pub struct AppServices {
    quizzes: Arc<QuizService>,
    play: Arc<PlayService>,
    random_play: Arc<RandomPlayService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// `seed` fixes the random-play generator; `None` seeds it from the OS.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// quiz table cannot be read.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        seed: Option<u64>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let available = storage.quizzes.list_quizzes(&[]).await?.len();
        info!("opened {db_url} with {available} quizzes");
        Ok(Self::from_storage(&storage, clock, seed))
    }

    /// Build services over an existing `Storage`, e.g. `Storage::in_memory()`.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, seed: Option<u64>) -> Self {
        let quizzes = Arc::new(QuizService::new(clock, Arc::clone(&storage.quizzes)));
        let play = Arc::new(PlayService::new(Arc::clone(&storage.quizzes)));
        let random_play = Arc::new(match seed {
            Some(seed) => RandomPlayService::with_seed(
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.sessions),
                seed,
            ),
            None => RandomPlayService::new(
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.sessions),
            ),
        });

        Self {
            quizzes,
            play,
            random_play,
        }
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn play(&self) -> Arc<PlayService> {
        Arc::clone(&self.play)
    }

    #[must_use]
    pub fn random_play(&self) -> Arc<RandomPlayService> {
        Arc::clone(&self.random_play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizDraft, SessionKey};
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn services_share_one_store() {
        let services =
            AppServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()), Some(3));
        let quiz = services
            .quizzes()
            .create_quiz(QuizDraft::new("Capital of Italy", "Rome"))
            .await
            .unwrap();

        let checked = services.play().check(quiz.id(), Some("rome")).await.unwrap();
        assert!(checked.result);

        let key = SessionKey::new("s").unwrap();
        let turn = services.random_play().next_quiz(&key).await.unwrap();
        assert!(matches!(turn, crate::RandomTurn::Next(next) if next.quiz.id == quiz.id()));
    }
}
