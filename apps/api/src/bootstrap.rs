//! Cold start: hydrate both stores before the service accepts requests.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::candidates::{CandidateAction, CandidateState, CandidateStore};
use crate::ingest::{load_candidates, CsvSource};
use crate::jobs::{JobState, JobStore};
use crate::persistence::{PersistenceGateway, CANDIDATE_SNAPSHOT_KEY, JOB_SNAPSHOT_KEY};
use crate::store::RestoreOutcome;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The backend failed to read. Its contents are unknown, so nothing may be
    /// written over them.
    #[error("snapshot backend could not be read for '{0}'; refusing to start")]
    SnapshotUnavailable(&'static str),
}

pub struct Stores {
    pub candidates: Arc<CandidateStore>,
    pub jobs: Arc<JobStore>,
}

/// Restores each store from its snapshot. Candidates fall back to the CSV
/// source when no usable snapshot exists; jobs fall back to the demo seed.
/// Both stores start snapshotting only once this returns. An unreadable
/// backend aborts hydration before either store has written anything.
pub async fn hydrate(
    gateway: PersistenceGateway,
    csv_source: &CsvSource,
    http: &reqwest::Client,
    resume_base: &str,
) -> Result<Stores, BootstrapError> {
    let candidates = Arc::new(CandidateStore::new(
        CandidateState::default(),
        gateway.clone(),
    ));
    let restored = candidates.restore().await;
    match restored {
        RestoreOutcome::Restored => {}
        RestoreOutcome::Unavailable => {
            return Err(BootstrapError::SnapshotUnavailable(CANDIDATE_SNAPSHOT_KEY))
        }
        RestoreOutcome::Absent | RestoreOutcome::Malformed => {
            let ingested = load_candidates(csv_source, http, resume_base).await;
            if !ingested.is_empty() {
                candidates
                    .dispatch(CandidateAction::ReplaceCandidates(ingested))
                    .await;
            }
        }
    }

    let jobs = Arc::new(JobStore::new(JobState::seeded(), gateway));
    if jobs.restore().await == RestoreOutcome::Unavailable {
        return Err(BootstrapError::SnapshotUnavailable(JOB_SNAPSHOT_KEY));
    }

    candidates.finish_loading().await;
    jobs.finish_loading().await;

    let (candidate_count, job_count) = (
        candidates.read(|s| s.candidates.len() + s.shortlisted.len()).await,
        jobs.read(|s| s.jobs.len()).await,
    );
    info!(
        candidates = candidate_count,
        jobs = job_count,
        snapshot = ?restored,
        "stores hydrated"
    );

    Ok(Stores { candidates, jobs })
}
