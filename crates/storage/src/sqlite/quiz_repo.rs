use quiz_core::model::{Quiz, QuizId};

use super::SqliteRepository;
use super::mapping::{map_quiz_row, quiz_id_from_i64, quiz_id_to_i64, ser};
use crate::repository::{NewQuizRecord, QuizRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn insert_new_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO quizzes (question, answer, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ",
        )
        .bind(quiz.question)
        .bind(quiz.answer)
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        quiz_id_from_i64(res.last_insert_rowid())
    }

    async fn update_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        // created_at is never rewritten after the insert
        let res = sqlx::query(
            r"
            UPDATE quizzes
            SET question = ?2, answer = ?3, updated_at = ?4
            WHERE id = ?1
            ",
        )
        .bind(quiz_id_to_i64(quiz.id())?)
        .bind(quiz.question().to_owned())
        .bind(quiz.answer().to_owned())
        .bind(quiz.updated_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, question, answer, created_at, updated_at
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(quiz_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_quiz_row).transpose()
    }

    async fn list_quizzes(&self, exclude: &[QuizId]) -> Result<Vec<Quiz>, StorageError> {
        // One JSON parameter regardless of history length; SQLite caps bound variables.
        let excluded = serde_json::to_string(exclude).map_err(ser)?;
        let rows = sqlx::query(
            r"
            SELECT id, question, answer, created_at, updated_at
            FROM quizzes
            WHERE id NOT IN (SELECT value FROM json_each(?1))
            ORDER BY id ASC
            ",
        )
        .bind(excluded)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            quizzes.push(map_quiz_row(&row)?);
        }
        Ok(quizzes)
    }

    async fn delete_quiz(&self, id: QuizId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(quiz_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
