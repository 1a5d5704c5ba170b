//! Resume extraction: turns an uploaded file into a `CandidateRecord`.
//!
//! The trait is the seam: the upload pipeline only relies on the result
//! contract, never on how a backend arrives at it.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::candidate::{CandidateRecord, Verdict};

const SUPPORTED_EXTENSIONS: [&str; 3] = [".pdf", ".doc", ".docx"];

/// An uploaded resume as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ResumeFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// PDF by content type, or a `.pdf` / `.doc` / `.docx` file name.
    pub fn is_supported(&self) -> bool {
        if self.content_type.as_deref() == Some("application/pdf") {
            return true;
        }
        let name = self.file_name.to_ascii_lowercase();
        SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("'{0}' duplicates a resume that was already processed")]
    Duplicate(String),

    #[error("could not extract candidate details from '{file}': {reason}")]
    Unreadable { file: String, reason: String },
}

/// Extracts a candidate from a resume. The returned record's `id` is a
/// placeholder; the candidate store assigns the real one.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, file: &ResumeFile) -> Result<CandidateRecord, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// SimulatedExtractor: randomized demo backend
// ────────────────────────────────────────────────────────────────────────────

const NAMES: [&str; 8] = [
    "Alex Johnson",
    "Sarah Williams",
    "Michael Chen",
    "Emily Davis",
    "David Rodriguez",
    "Lisa Anderson",
    "James Wilson",
    "Maria Garcia",
];

const ROLES: [&str; 6] = [
    "Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Data Analyst",
    "DevOps Engineer",
];

const LOCATIONS: [&str; 6] = ["Bangalore", "Hyderabad", "Pune", "Delhi NCR", "Mumbai", "Chennai"];

const SKILL_SETS: [[&str; 4]; 6] = [
    ["JavaScript", "React", "Node.js", "MongoDB"],
    ["Python", "Django", "PostgreSQL", "AWS"],
    ["Java", "Spring Boot", "MySQL", "Docker"],
    ["TypeScript", "Angular", "Express", "Redis"],
    ["C#", ".NET", "SQL Server", "Azure"],
    ["Go", "Gin", "PostgreSQL", "Kubernetes"],
];

const MISSING_SKILLS: [&str; 3] = ["AWS", "Docker", "Testing"];

/// Fabricates plausible candidates without reading the file. Each call succeeds,
/// reports a duplicate, or fails with roughly equal probability.
pub struct SimulatedExtractor;

#[async_trait]
impl ResumeExtractor for SimulatedExtractor {
    async fn extract(&self, file: &ResumeFile) -> Result<CandidateRecord, ExtractionError> {
        simulate(file, &mut rand::thread_rng())
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn simulate<R: Rng>(file: &ResumeFile, rng: &mut R) -> Result<CandidateRecord, ExtractionError> {
    match rng.gen_range(0..3) {
        0 => {}
        1 => return Err(ExtractionError::Duplicate(file.file_name.clone())),
        _ => {
            return Err(ExtractionError::Unreadable {
                file: file.file_name.clone(),
                reason: "document text could not be recovered".to_string(),
            })
        }
    }

    let name = pick(rng, &NAMES);
    let score: u8 = rng.gen_range(60..100);
    let skills = SKILL_SETS.choose(rng).copied().unwrap_or_default();

    Ok(CandidateRecord {
        id: 0,
        name: name.to_string(),
        email: format!("{}@email.com", name.to_lowercase().replace(' ', ".")),
        phone: format!("+91 {}", rng.gen_range(1_000_000_000u64..10_000_000_000)),
        location: pick(rng, &LOCATIONS).to_string(),
        experience: format!("{}+ years", rng.gen_range(1..=5)),
        job_role: pick(rng, &ROLES).to_string(),
        relevance_score: score,
        verdict: Verdict::from_score(score),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        missing_skills: MISSING_SKILLS.iter().map(|s| s.to_string()).collect(),
        applied_date: Some(Utc::now().date_naive()),
        resume_url: None,
        is_duplicate: false,
        is_shortlisted: None,
    })
}
