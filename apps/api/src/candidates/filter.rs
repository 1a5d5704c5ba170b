use serde::Deserialize;

use crate::models::candidate::{CandidateRecord, Verdict};

/// Listing criteria for the candidate table. Every criterion that is set must match.
/// Duplicates are listed unless `show_duplicates=false` is asked for.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateFilter {
    pub search: Option<String>,
    pub verdict: Option<Verdict>,
    pub role: Option<String>,
    #[serde(default = "shows_duplicates")]
    pub show_duplicates: bool,
}

fn shows_duplicates() -> bool {
    true
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            search: None,
            verdict: None,
            role: None,
            show_duplicates: shows_duplicates(),
        }
    }
}

impl CandidateFilter {
    pub fn matches(&self, candidate: &CandidateRecord) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => candidate.matches_text(term),
            _ => true,
        };
        let verdict_ok = self.verdict.map_or(true, |v| candidate.verdict == v);
        let role_ok = self
            .role
            .as_deref()
            .map_or(true, |role| candidate.job_role == role);
        let duplicate_ok = self.show_duplicates || !candidate.is_duplicate;

        search_ok && verdict_ok && role_ok && duplicate_ok
    }

    pub fn apply<'a>(&self, candidates: &'a [CandidateRecord]) -> Vec<&'a CandidateRecord> {
        candidates.iter().filter(|c| self.matches(c)).collect()
    }
}
