//! Flattening of candidate records into downloadable files.

pub mod handlers;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::candidate::CandidateRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which collection an export draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Selected ids from the candidate list.
    Candidates,
    /// The whole shortlist.
    Shortlist,
}

impl ExportScope {
    fn file_stem(self) -> &'static str {
        match self {
            ExportScope::Candidates => "candidates_export",
            ExportScope::Shortlist => "shortlisted_candidates",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            ExportScope::Candidates => "Please select candidates to export",
            ExportScope::Shortlist => "No candidates to export",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    NothingSelected(&'static str),

    #[error("export format '{0}' is not available")]
    UnsupportedFormat(ExportFormat),

    #[error("failed to write export: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush export: {0}")]
    Flush(#[from] std::io::Error),
}

/// One flattened candidate. Field order is the column order of every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Job Role")]
    pub job_role: String,
    #[serde(rename = "Relevance Score")]
    pub relevance_score: u8,
    #[serde(rename = "Verdict")]
    pub verdict: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Applied Date")]
    pub applied_date: String,
}

impl From<&CandidateRecord> for ExportRow {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            location: record.location.clone(),
            experience: record.experience.clone(),
            job_role: record.job_role.clone(),
            relevance_score: record.relevance_score,
            verdict: record.verdict.to_string(),
            skills: record.skills.join(", "),
            applied_date: record
                .applied_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// A rendered export ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;
    fn content_type(&self) -> &'static str;
    fn render(&self, rows: &[ExportRow]) -> Result<Vec<u8>, ExportError>;
}

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn render(&self, rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.into_error()))
    }
}

/// Picks an exporter by format tag. Only CSV is built in.
pub struct ExportService {
    exporters: Vec<Box<dyn Exporter>>,
}

impl Default for ExportService {
    fn default() -> Self {
        Self {
            exporters: vec![Box::new(CsvExporter)],
        }
    }
}

impl ExportService {
    pub fn export(
        &self,
        records: &[&CandidateRecord],
        scope: ExportScope,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<ExportFile, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NothingSelected(scope.empty_message()));
        }
        let exporter = self
            .exporters
            .iter()
            .find(|e| e.format() == format)
            .ok_or(ExportError::UnsupportedFormat(format))?;

        let rows: Vec<ExportRow> = records.iter().map(|r| ExportRow::from(*r)).collect();
        Ok(ExportFile {
            file_name: file_name_hint(scope, format, today),
            content_type: exporter.content_type(),
            body: exporter.render(&rows)?,
        })
    }
}

pub fn file_name_hint(scope: ExportScope, format: ExportFormat, today: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        scope.file_stem(),
        today.format("%Y-%m-%d"),
        format.extension()
    )
}
