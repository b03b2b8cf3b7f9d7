use chrono::Utc;
use quiz_core::model::SessionKey;
use quiz_core::play::RoundHistory;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{decode_history, encode_history, ser};
use crate::repository::{PlaySessionRepository, StorageError};

#[async_trait::async_trait]
impl PlaySessionRepository for SqliteRepository {
    async fn load_history(&self, key: &SessionKey) -> Result<Option<RoundHistory>, StorageError> {
        let row = sqlx::query("SELECT history FROM play_sessions WHERE session_key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("history").map_err(ser)?;
                decode_history(&raw).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save_history(
        &self,
        key: &SessionKey,
        history: &RoundHistory,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO play_sessions (session_key, history, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_key) DO UPDATE SET
                history = excluded.history,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(encode_history(history)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
