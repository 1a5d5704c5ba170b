//! Cold-start ingestion of candidates from an external CSV resource.

pub mod parser;
pub mod source;

pub use source::{load_candidates, CsvSource};
