use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Completed,
    Draft,
}

/// A job posting. Candidates refer to it only through their free-text role label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub applications: u32,
    pub date_posted: NaiveDate,
    pub status: JobStatus,
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl JobPosting {
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.company.to_lowercase().contains(&needle)
            || self
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(&needle))
    }
}

fn posted_on(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn seed_job(
    id: u64,
    title: &str,
    company: &str,
    location: &str,
    applications: u32,
    date_posted: NaiveDate,
    status: JobStatus,
    skills: &[&str],
) -> JobPosting {
    JobPosting {
        id,
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        applications,
        date_posted,
        status,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        description: None,
        requirements: None,
        file_url: None,
    }
}

/// Demo postings the job store starts from before any snapshot exists.
pub fn seed_jobs() -> Vec<JobPosting> {
    vec![
        seed_job(
            1,
            "Senior Software Engineer",
            "TechCorp Solutions",
            "Bangalore",
            124,
            posted_on(2024, 3, 15),
            JobStatus::Active,
            &["React", "Node.js", "Python", "AWS"],
        ),
        seed_job(
            2,
            "Data Analyst",
            "Analytics Pro",
            "Hyderabad",
            89,
            posted_on(2024, 3, 14),
            JobStatus::Completed,
            &["Python", "SQL", "Tableau", "Statistics"],
        ),
        seed_job(
            3,
            "Frontend Developer",
            "WebDev Inc",
            "Pune",
            156,
            posted_on(2024, 3, 13),
            JobStatus::Active,
            &["JavaScript", "React", "CSS", "TypeScript"],
        ),
        seed_job(
            4,
            "DevOps Engineer",
            "CloudTech",
            "Delhi NCR",
            67,
            posted_on(2024, 3, 12),
            JobStatus::Active,
            &["Docker", "Kubernetes", "AWS", "Jenkins"],
        ),
    ]
}
