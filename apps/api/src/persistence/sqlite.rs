use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::{PersistError, SnapshotStore};

/// Snapshot store backed by the `snapshots` table (see `db::migrate`).
#[derive(Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        sqlx::query(
            r#"
            INSERT INTO snapshots (key, blob, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                blob = excluded.blob,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(blob)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = blob.len(), "snapshot written");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT blob FROM snapshots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}
