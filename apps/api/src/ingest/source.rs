use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use super::parser::{parse_candidates_csv, CsvError};
use crate::models::candidate::CandidateRecord;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch CSV: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] CsvError),
}

/// Where the cold-start candidate CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    Url(String),
    File(PathBuf),
}

impl CsvSource {
    /// `http://` and `https://` locations are fetched over the network; anything
    /// else is treated as a filesystem path.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            CsvSource::Url(location.to_string())
        } else {
            CsvSource::File(PathBuf::from(location))
        }
    }

    pub async fn fetch(&self, http: &reqwest::Client) -> Result<String, IngestError> {
        match self {
            CsvSource::Url(url) => Ok(http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?),
            CsvSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| IngestError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

impl fmt::Display for CsvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvSource::Url(url) => f.write_str(url),
            CsvSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub async fn ingest(
    source: &CsvSource,
    http: &reqwest::Client,
    resume_base: &str,
) -> Result<Vec<CandidateRecord>, IngestError> {
    let raw_text = source.fetch(http).await?;
    Ok(parse_candidates_csv(&raw_text, resume_base)?)
}

/// Cold-start ingestion. Never fails: any fetch or decode problem is logged and
/// yields an empty list so the service can start with no candidates.
pub async fn load_candidates(
    source: &CsvSource,
    http: &reqwest::Client,
    resume_base: &str,
) -> Vec<CandidateRecord> {
    match ingest(source, http, resume_base).await {
        Ok(candidates) => {
            info!(source = %source, count = candidates.len(), "ingested candidates from CSV");
            candidates
        }
        Err(e) => {
            warn!(source = %source, error = %e, "candidate CSV ingestion failed; starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_location_classification() {
        assert_eq!(
            CsvSource::from_location("https://cdn.example.com/candidates_data.csv"),
            CsvSource::Url("https://cdn.example.com/candidates_data.csv".to_string())
        );
        assert_eq!(
            CsvSource::from_location(" data/candidates_data.csv "),
            CsvSource::File(PathBuf::from("data/candidates_data.csv"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Job Role,Relevance Score").unwrap();
        writeln!(file, "Sana Khan,Frontend Developer,77").unwrap();

        let source = CsvSource::File(file.path().to_path_buf());
        let records = load_candidates(&source, &reqwest::Client::new(), "/resumes").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_role, "Frontend Developer");
    }

    #[tokio::test]
    async fn test_one_bad_date_keeps_other_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Job Role,Applied Date").unwrap();
        writeln!(file, "Sana Khan,Frontend Developer,2024-01-14").unwrap();
        writeln!(file, "Ravi Nair,Data Analyst,15/01/2024").unwrap();
        writeln!(file, "Ila Das,DevOps Engineer,2024-01-16").unwrap();

        let source = CsvSource::File(file.path().to_path_buf());
        let records = load_candidates(&source, &reqwest::Client::new(), "/resumes").await;
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sana Khan", "Ila Das"]);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvSource::File(dir.path().join("absent.csv"));

        let err = ingest(&source, &reqwest::Client::new(), "/resumes")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert!(load_candidates(&source, &reqwest::Client::new(), "/resumes")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_file_yields_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Email,Phone").unwrap();
        writeln!(file, "a@b.com,123").unwrap();

        let source = CsvSource::File(file.path().to_path_buf());
        assert!(load_candidates(&source, &reqwest::Client::new(), "/resumes")
            .await
            .is_empty());
    }
}
