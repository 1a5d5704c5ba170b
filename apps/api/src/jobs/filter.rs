use serde::Deserialize;

use crate::models::job::JobPosting;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub search: Option<String>,
}

impl JobFilter {
    pub fn apply<'a>(&self, jobs: &'a [JobPosting]) -> Vec<&'a JobPosting> {
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => jobs.iter().filter(|j| j.matches_text(term)).collect(),
            _ => jobs.iter().collect(),
        }
    }
}
