use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Creates the SQLite pool backing the snapshot store and ensures its schema.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening snapshot database {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    info!("Snapshot database ready");
    Ok(pool)
}

/// One row per store key; every save overwrites the whole blob.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            key TEXT PRIMARY KEY,
            blob TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
