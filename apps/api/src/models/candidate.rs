use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Score at or above which a candidate is rated `High`.
pub const HIGH_VERDICT_THRESHOLD: u8 = 80;
/// Score at or above which a candidate is rated `Medium`.
pub const MEDIUM_VERDICT_THRESHOLD: u8 = 65;

/// Recruiter-facing rating attached to a candidate when the record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Verdict {
    /// Derives a verdict from a 0–100 relevance score.
    /// Only used where no verdict was supplied; stores never recompute it.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= HIGH_VERDICT_THRESHOLD => Verdict::High,
            s if s >= MEDIUM_VERDICT_THRESHOLD => Verdict::Medium,
            _ => Verdict::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::High => "High",
            Verdict::Medium => "Medium",
            Verdict::Low => "Low",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerdict(pub String);

impl fmt::Display for UnknownVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown verdict '{}'", self.0)
    }
}

impl std::error::Error for UnknownVerdict {}

impl FromStr for Verdict {
    type Err = UnknownVerdict;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Verdict::High),
            "medium" => Ok(Verdict::Medium),
            "low" => Ok(Verdict::Low),
            _ => Err(UnknownVerdict(s.to_string())),
        }
    }
}

/// A single applicant as held by the candidate store.
///
/// `is_shortlisted` is only ever `Some(true)`, and only while the record sits in
/// the shortlist collection. Moving a record back clears the field entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience: String,
    pub job_role: String,
    pub relevance_score: u8,
    pub verdict: Verdict,
    pub skills: Vec<String>,
    pub missing_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Set by an external duplicate detector; never computed here.
    pub is_duplicate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_shortlisted: Option<bool>,
}

impl CandidateRecord {
    /// Case-insensitive check against name, email, role and every skill.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.job_role.to_lowercase().contains(&needle)
            || self
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(&needle))
    }
}

/// Builds the resume asset reference for a candidate name:
/// lower-cased, whitespace runs collapsed to `_`, under `base`.
pub fn resume_url_for(base: &str, name: &str) -> Option<String> {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        return None;
    }
    Some(format!("{}/{}.pdf", base.trim_end_matches('/'), slug))
}

#[cfg(test)]
pub(crate) fn sample_candidate(id: u64, name: &str) -> CandidateRecord {
    CandidateRecord {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "+91 9876543210".to_string(),
        location: "Pune".to_string(),
        experience: "3+ years".to_string(),
        job_role: "Backend Developer".to_string(),
        relevance_score: 72,
        verdict: Verdict::Medium,
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        missing_skills: vec!["Kubernetes".to_string()],
        applied_date: NaiveDate::from_ymd_opt(2024, 3, 10),
        resume_url: resume_url_for("/resumes", name),
        is_duplicate: false,
        is_shortlisted: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_score(100), Verdict::High);
        assert_eq!(Verdict::from_score(80), Verdict::High);
        assert_eq!(Verdict::from_score(79), Verdict::Medium);
        assert_eq!(Verdict::from_score(65), Verdict::Medium);
        assert_eq!(Verdict::from_score(64), Verdict::Low);
        assert_eq!(Verdict::from_score(0), Verdict::Low);
    }

    #[test]
    fn test_verdict_parse_is_case_insensitive() {
        assert_eq!("high".parse::<Verdict>().unwrap(), Verdict::High);
        assert_eq!(" MEDIUM ".parse::<Verdict>().unwrap(), Verdict::Medium);
        assert!("excellent".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_resume_url_slug() {
        assert_eq!(
            resume_url_for("/resumes", "Priya  Sharma"),
            Some("/resumes/priya_sharma.pdf".to_string())
        );
        assert_eq!(
            resume_url_for("/assets/cv/", "Ann"),
            Some("/assets/cv/ann.pdf".to_string())
        );
        assert_eq!(resume_url_for("/resumes", "   "), None);
    }

    #[test]
    fn test_shortlist_flag_omitted_when_absent() {
        let record = sample_candidate(1, "Ann Lee");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("isShortlisted").is_none());
        assert_eq!(json["jobRole"], "Backend Developer");
        assert_eq!(json["relevanceScore"], 72);
        assert_eq!(json["appliedDate"], "2024-03-10");
    }

    #[test]
    fn test_matches_text_covers_skills() {
        let record = sample_candidate(1, "Ann Lee");
        assert!(record.matches_text("rust"));
        assert!(record.matches_text("ANN"));
        assert!(record.matches_text("backend"));
        assert!(!record.matches_text("golang"));
    }
}
