use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::SqliteInitError;

/// Schema steps in apply order. Each runs once, inside its own transaction.
const MIGRATIONS: &[(i64, &[&str])] = &[
    (
        1,
        &[r"
            CREATE TABLE IF NOT EXISTS quizzes (
                id INTEGER PRIMARY KEY,
                question TEXT NOT NULL CHECK (length(trim(question)) > 0),
                answer TEXT NOT NULL CHECK (length(trim(answer)) > 0),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "],
    ),
    (
        2,
        &[r"
            CREATE TABLE IF NOT EXISTS play_sessions (
                session_key TEXT PRIMARY KEY,
                history TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "],
    ),
];

/// Runs every migration not yet recorded in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    for (version, statements) in MIGRATIONS {
        if is_applied(pool, *version).await? {
            continue;
        }

        let mut tx = pool.begin().await?;
        for &statement in *statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        mark_applied(&mut tx, *version).await?;
        tx.commit().await?;
    }

    Ok(())
}

async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
        .bind(version)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

async fn mark_applied(tx: &mut Transaction<'_, Sqlite>, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(version)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
