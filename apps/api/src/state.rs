use std::sync::Arc;

use crate::bootstrap::Stores;
use crate::candidates::CandidateStore;
use crate::config::Config;
use crate::export::ExportService;
use crate::jobs::JobStore;
use crate::uploads::{ResumeExtractor, UploadTracker};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub candidates: Arc<CandidateStore>,
    pub jobs: Arc<JobStore>,
    /// Ephemeral upload progress; owns the per-upload tasks.
    pub uploads: Arc<UploadTracker>,
    /// Pluggable resume extractor. Default: SimulatedExtractor.
    pub extractor: Arc<dyn ResumeExtractor>,
    pub export: Arc<ExportService>,
}

impl AppState {
    pub fn new(stores: Stores, extractor: Arc<dyn ResumeExtractor>, config: &Config) -> Self {
        Self {
            candidates: stores.candidates,
            jobs: stores.jobs,
            uploads: Arc::new(UploadTracker::new(config.upload_tick)),
            extractor,
            export: Arc::new(ExportService::default()),
        }
    }
}
