pub mod extractor;
pub mod handlers;
pub mod tracker;

pub use extractor::{ResumeExtractor, ResumeFile, SimulatedExtractor};
pub use tracker::{UploadProgress, UploadStatus, UploadTracker};
