use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{PersistError, SnapshotStore};

/// Process-local snapshot store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blobs: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, key: &str, blob: &str) -> Result<(), PersistError> {
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }
}
