use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use quiz_core::model::{QuizId, SessionKey};
use quiz_core::play::{self, Draw, RoundHistory};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::{PlaySessionRepository, QuizRepository};

use super::view::{RandomResult, RandomTurn};
use crate::error::RandomPlayError;

/// Streak-scored random play over every stored quiz.
///
/// History lives in the session repository, keyed by `SessionKey`; this
/// service only loads it, runs one pure transition and stores the result.
/// Concurrent calls for the same key are not serialized: the last write wins.
pub struct RandomPlayService {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn PlaySessionRepository>,
    rng: Mutex<StdRng>,
}

impl RandomPlayService {
    /// Service drawing from an OS-seeded generator.
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>, sessions: Arc<dyn PlaySessionRepository>) -> Self {
        Self::with_rng(quizzes, sessions, StdRng::from_os_rng())
    }

    /// Service with a fixed seed, so draws repeat across runs.
    #[must_use]
    pub fn with_seed(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn PlaySessionRepository>,
        seed: u64,
    ) -> Self {
        Self::with_rng(quizzes, sessions, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn PlaySessionRepository>,
        rng: StdRng,
    ) -> Self {
        Self {
            quizzes,
            sessions,
            rng: Mutex::new(rng),
        }
    }

    /// Draw the next quiz the session has not answered correctly this round.
    ///
    /// Starts an empty history on first use. When every quiz has been answered
    /// the round completes and the history is cleared.
    ///
    /// # Errors
    ///
    /// Returns `RandomPlayError::Storage` if either repository fails; the
    /// stored history is left as it was.
    pub async fn next_quiz(&self, key: &SessionKey) -> Result<RandomTurn, RandomPlayError> {
        let stored = self.load(key).await?;
        let first_visit = stored.is_none();
        let history = stored.unwrap_or_default();

        let pool = self
            .quizzes
            .list_quizzes(history.ids())
            .await
            .inspect_err(|e| warn!("random play for {key}: listing quizzes failed: {e}"))?;

        let (history, draw) = {
            let mut rng = self.rng.lock().map_err(|_| RandomPlayError::RngPoisoned)?;
            play::draw_next(history, pool, &mut *rng)
        };

        match &draw {
            Draw::Next { quiz, score } => {
                debug!("random play for {key}: drew quiz {} at score {score}", quiz.id());
            }
            Draw::RoundComplete { score } => {
                info!("random play for {key}: round complete with score {score}");
            }
        }

        if first_visit || matches!(draw, Draw::RoundComplete { .. }) {
            self.store(key, &history).await?;
        }

        Ok(RandomTurn::from(draw))
    }

    /// Judge `answer` for `quiz_id` and advance the session's round.
    ///
    /// Each call mutates the history; submitting twice for the same draw counts twice.
    ///
    /// # Errors
    ///
    /// Returns `RandomPlayError::QuizNotFound` if the quiz no longer exists, or
    /// `RandomPlayError::Storage` if either repository fails.
    pub async fn check_answer(
        &self,
        key: &SessionKey,
        quiz_id: QuizId,
        answer: Option<&str>,
    ) -> Result<RandomResult, RandomPlayError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await
            .inspect_err(|e| warn!("random play for {key}: loading quiz {quiz_id} failed: {e}"))?
            .ok_or(RandomPlayError::QuizNotFound(quiz_id))?;

        let history = self.load(key).await?.unwrap_or_default();
        let (history, verdict) = play::judge(history, &quiz, answer);
        debug!(
            "random play for {key}: quiz {quiz_id} answered {}, score {}",
            if verdict.result { "correctly" } else { "wrongly" },
            verdict.score
        );

        self.store(key, &history).await?;
        Ok(RandomResult::from(verdict))
    }

    /// Current round history for `key`, empty if the session never played.
    ///
    /// # Errors
    ///
    /// Returns `RandomPlayError::Storage` if the session repository fails.
    pub async fn history(&self, key: &SessionKey) -> Result<RoundHistory, RandomPlayError> {
        Ok(self.load(key).await?.unwrap_or_default())
    }

    async fn load(&self, key: &SessionKey) -> Result<Option<RoundHistory>, RandomPlayError> {
        self.sessions
            .load_history(key)
            .await
            .inspect_err(|e| warn!("random play for {key}: loading history failed: {e}"))
            .map_err(RandomPlayError::from)
    }

    async fn store(&self, key: &SessionKey, history: &RoundHistory) -> Result<(), RandomPlayError> {
        self.sessions
            .save_history(key, history)
            .await
            .inspect_err(|e| warn!("random play for {key}: saving history failed: {e}"))
            .map_err(RandomPlayError::from)
    }
}
