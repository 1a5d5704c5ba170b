//! Ephemeral progress tracking for resume uploads.
//!
//! Each upload is driven by its own task: a ticking progress bar that, once it
//! reaches 100, calls the extractor and performs exactly one
//! `AddUploadedCandidate` dispatch on success. Upload records are not part of
//! any durable store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::extractor::{ExtractionError, ResumeExtractor, ResumeFile};
use crate::candidates::{CandidateAction, CandidateStore};

const MIN_STEP: u8 = 5;
const MAX_STEP: u8 = 30;
/// Finished uploads kept for clients to read back; older ones are evicted.
const FINISHED_RETENTION: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Success,
    Duplicate,
    Error,
}

impl UploadStatus {
    pub fn is_finished(self) -> bool {
        self != UploadStatus::Uploading
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub id: Uuid,
    pub file_name: String,
    pub size: usize,
    pub status: UploadStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadProgress {
    fn new(id: Uuid, file: &ResumeFile) -> Self {
        Self {
            id,
            file_name: file.file_name.clone(),
            size: file.size(),
            status: UploadStatus::Uploading,
            progress: 0,
            candidate_name: None,
            job_role: None,
            error: None,
        }
    }
}

type UploadList = Arc<Mutex<Vec<UploadProgress>>>;
/// Never held across an await, so `Drop` can always take it.
type TaskMap = Arc<SyncMutex<HashMap<Uuid, AbortHandle>>>;

fn lock_tasks(
    tasks: &SyncMutex<HashMap<Uuid, AbortHandle>>,
) -> MutexGuard<'_, HashMap<Uuid, AbortHandle>> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drops the oldest finished records beyond `keep`. In-flight uploads stay.
fn evict_finished(uploads: &mut Vec<UploadProgress>, keep: usize) {
    let finished = uploads.iter().filter(|u| u.status.is_finished()).count();
    let mut excess = finished.saturating_sub(keep);
    uploads.retain(|u| {
        if excess > 0 && u.status.is_finished() {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

/// Owns every in-flight upload task. Dropping the tracker aborts them all, so
/// no task can dispatch into a store after its host has gone away.
pub struct UploadTracker {
    uploads: UploadList,
    tasks: TaskMap,
    tick: Duration,
    retention: usize,
}

impl UploadTracker {
    pub fn new(tick: Duration) -> Self {
        Self {
            uploads: Arc::default(),
            tasks: Arc::default(),
            tick,
            retention: FINISHED_RETENTION,
        }
    }

    #[cfg(test)]
    fn with_retention(tick: Duration, retention: usize) -> Self {
        let mut tracker = Self::new(tick);
        tracker.retention = retention;
        tracker
    }

    /// Registers the upload and spawns its processing task.
    pub async fn start(
        &self,
        file: ResumeFile,
        extractor: Arc<dyn ResumeExtractor>,
        store: Arc<CandidateStore>,
    ) -> UploadProgress {
        let id = Uuid::new_v4();
        let progress = UploadProgress::new(id, &file);
        self.uploads.lock().await.push(progress.clone());

        let job = UploadJob {
            id,
            file,
            extractor,
            store,
            uploads: Arc::clone(&self.uploads),
            tasks: Arc::clone(&self.tasks),
            tick: self.tick,
            retention: self.retention,
        };
        // Held across spawn so the task cannot deregister before it is registered.
        {
            let mut tasks = lock_tasks(&self.tasks);
            let handle = tokio::spawn(job.run());
            tasks.insert(id, handle.abort_handle());
        }

        info!(upload_id = %id, file = %progress.file_name, "resume upload started");
        progress
    }

    pub async fn list(&self) -> Vec<UploadProgress> {
        self.uploads.lock().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<UploadProgress> {
        self.uploads.lock().await.iter().find(|u| u.id == id).cloned()
    }

    /// Aborts the upload if it is still running and forgets it.
    /// Returns `false` when no upload has this id.
    pub async fn cancel(&self, id: Uuid) -> bool {
        let handle = lock_tasks(&self.tasks).remove(&id);
        if let Some(handle) = handle {
            handle.abort();
            info!(upload_id = %id, "resume upload cancelled");
        }
        let mut uploads = self.uploads.lock().await;
        let before = uploads.len();
        uploads.retain(|u| u.id != id);
        uploads.len() != before
    }
}

impl Drop for UploadTracker {
    fn drop(&mut self) {
        for (_, handle) in lock_tasks(&self.tasks).drain() {
            handle.abort();
        }
    }
}

struct UploadJob {
    id: Uuid,
    file: ResumeFile,
    extractor: Arc<dyn ResumeExtractor>,
    store: Arc<CandidateStore>,
    uploads: UploadList,
    tasks: TaskMap,
    tick: Duration,
    retention: usize,
}

impl UploadJob {
    async fn run(self) {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.tick().await;

        let mut progress: u8 = 0;
        while progress < 100 {
            ticker.tick().await;
            let step = rand::thread_rng().gen_range(MIN_STEP..=MAX_STEP);
            progress = progress.saturating_add(step).min(100);
            self.update(|u| u.progress = progress).await;
        }

        match self.extractor.extract(&self.file).await {
            Ok(mut record) => {
                let name = record.name.clone();
                let role = record.job_role.clone();
                let mut assigned = 0;
                self.store
                    .dispatch_with(|state| {
                        record.id = state.next_id();
                        assigned = record.id;
                        CandidateAction::AddUploadedCandidate(record)
                    })
                    .await;
                info!(upload_id = %self.id, candidate_id = assigned, candidate = %name, "resume processed");
                self.update(|u| {
                    u.status = UploadStatus::Success;
                    u.candidate_name = Some(name);
                    u.job_role = Some(role);
                })
                .await;
            }
            Err(e) => {
                warn!(upload_id = %self.id, error = %e, "resume processing failed");
                let status = match e {
                    ExtractionError::Duplicate(_) => UploadStatus::Duplicate,
                    ExtractionError::Unreadable { .. } => UploadStatus::Error,
                };
                self.update(|u| {
                    u.status = status;
                    u.error = Some(e.to_string());
                })
                .await;
            }
        }

        evict_finished(&mut *self.uploads.lock().await, self.retention);
        lock_tasks(&self.tasks).remove(&self.id);
    }

    async fn update(&self, apply: impl FnOnce(&mut UploadProgress)) {
        if let Some(upload) = self
            .uploads
            .lock()
            .await
            .iter_mut()
            .find(|u| u.id == self.id)
        {
            apply(upload);
        }
    }
}
