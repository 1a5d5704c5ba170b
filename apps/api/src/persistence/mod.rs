//! Persistence gateway: full-state snapshots of each store under a fixed key.
//!
//! No versioning, no migration, no partial writes: every save overwrites the
//! previous blob. Backends only move opaque strings; JSON encoding lives here.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use memory::MemorySnapshotStore;
pub use sqlite::SqliteSnapshotStore;

/// Snapshot key of the candidate store.
pub const CANDIDATE_SNAPSHOT_KEY: &str = "skill-scout-data";
/// Snapshot key of the job store.
pub const JOB_SNAPSHOT_KEY: &str = "skill-scout-jobs";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot under '{key}' is malformed: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Durable key → blob storage. Implementations must make `save` a full overwrite.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError>;
    async fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
}

/// Typed front of a [`SnapshotStore`], shared by both stores.
#[derive(Clone)]
pub struct PersistenceGateway {
    backend: Arc<dyn SnapshotStore>,
}

impl PersistenceGateway {
    pub fn new(backend: Arc<dyn SnapshotStore>) -> Self {
        Self { backend }
    }

    pub async fn save<T: Serialize + Sync>(&self, key: &str, state: &T) -> Result<(), PersistError> {
        let blob = serde_json::to_string(state).map_err(PersistError::Encode)?;
        self.backend.save(key, &blob).await
    }

    /// `Ok(None)` when nothing was ever saved under `key`.
    /// A blob that does not decode is `Err(PersistError::Decode)`; callers decide
    /// whether that counts as absent.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistError> {
        match self.backend.load(key).await? {
            None => Ok(None),
            Some(blob) => serde_json::from_str(&blob)
                .map(Some)
                .map_err(|source| PersistError::Decode {
                    key: key.to_string(),
                    source,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::sample_candidate;

    fn gateway() -> (Arc<MemorySnapshotStore>, PersistenceGateway) {
        let backend = Arc::new(MemorySnapshotStore::default());
        (backend.clone(), PersistenceGateway::new(backend))
    }

    #[tokio::test]
    async fn test_load_absent_key_is_none() {
        let (_, gateway) = gateway();
        let loaded: Option<Vec<u64>> = gateway.load("missing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_returns_same_value() {
        let (_, gateway) = gateway();
        let records = vec![sample_candidate(1, "Ann Lee"), sample_candidate(2, "Ravi Kumar")];
        gateway.save(CANDIDATE_SNAPSHOT_KEY, &records).await.unwrap();
        let loaded: Option<Vec<_>> = gateway.load(CANDIDATE_SNAPSHOT_KEY).await.unwrap();
        assert_eq!(loaded, Some(records));
    }

    #[tokio::test]
    async fn test_truncated_blob_is_decode_error() {
        let (backend, gateway) = gateway();
        backend
            .save(JOB_SNAPSHOT_KEY, r#"[{"id": 1, "title": "Data"#)
            .await
            .unwrap();
        let result = gateway
            .load::<Vec<crate::models::job::JobPosting>>(JOB_SNAPSHOT_KEY)
            .await;
        assert!(matches!(result, Err(PersistError::Decode { ref key, .. }) if key == JOB_SNAPSHOT_KEY));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_blob() {
        let (_, gateway) = gateway();
        gateway.save("k", &vec![1u64, 2, 3]).await.unwrap();
        gateway.save("k", &vec![9u64]).await.unwrap();
        let loaded: Option<Vec<u64>> = gateway.load("k").await.unwrap();
        assert_eq!(loaded, Some(vec![9]));
    }
}
