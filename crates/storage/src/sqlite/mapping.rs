use quiz_core::model::{Quiz, QuizId};
use quiz_core::play::RoundHistory;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    u64::try_from(v)
        .map(QuizId::new)
        .map_err(|_| StorageError::Serialization("quiz_id sign overflow".into()))
}

pub(crate) fn quiz_id_to_i64(id: QuizId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("quiz_id overflow".into()))
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<Quiz, StorageError> {
    Quiz::from_persisted(
        quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("question").map_err(ser)?,
        row.try_get::<String, _>("answer").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

/// History is stored as a JSON array of quiz ids, e.g. `[3,1,7]`.
pub(crate) fn encode_history(history: &RoundHistory) -> Result<String, StorageError> {
    serde_json::to_string(history).map_err(ser)
}

pub(crate) fn decode_history(raw: &str) -> Result<RoundHistory, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
