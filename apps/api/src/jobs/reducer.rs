use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::job::{seed_jobs, JobPosting, JobStatus};
use crate::persistence::JOB_SNAPSHOT_KEY;
use crate::store::{Reducer, Store};

/// Job postings. Snapshotted as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobState {
    pub jobs: Vec<JobPosting>,
}

impl JobState {
    pub fn seeded() -> Self {
        Self { jobs: seed_jobs() }
    }

    pub fn find(&self, id: u64) -> Option<&JobPosting> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn next_id(&self) -> u64 {
        self.jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1
    }
}

/// Fields a recruiter supplies when posting a new job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub file_url: Option<String>,
}

impl NewJob {
    /// Title, company and location are mandatory.
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.company, &self.location]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn into_posting(self, id: u64, today: NaiveDate) -> JobPosting {
        JobPosting {
            id,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            applications: 0,
            date_posted: today,
            status: JobStatus::Active,
            skills: self.skills,
            description: self.description,
            requirements: self.requirements,
            file_url: self.file_url,
        }
    }
}

#[derive(Debug, Clone)]
pub enum JobAction {
    AddJob(JobPosting),
    /// Full replacement of the job with the same id.
    UpdateJob(JobPosting),
    DeleteJob(u64),
    LoadSnapshot(JobState),
}

pub struct JobReducer;

pub type JobStore = Store<JobReducer>;

impl Reducer for JobReducer {
    type State = JobState;
    type Action = JobAction;
    const SNAPSHOT_KEY: &'static str = JOB_SNAPSHOT_KEY;

    fn reduce(state: &JobState, action: JobAction) -> JobState {
        match action {
            JobAction::AddJob(job) => {
                let mut jobs = state.jobs.clone();
                jobs.push(job);
                JobState { jobs }
            }
            JobAction::UpdateJob(updated) => JobState {
                jobs: state
                    .jobs
                    .iter()
                    .map(|job| {
                        if job.id == updated.id {
                            updated.clone()
                        } else {
                            job.clone()
                        }
                    })
                    .collect(),
            },
            JobAction::DeleteJob(id) => JobState {
                jobs: state.jobs.iter().filter(|j| j.id != id).cloned().collect(),
            },
            JobAction::LoadSnapshot(snapshot) => snapshot,
        }
    }

    fn load_snapshot(snapshot: JobState) -> JobAction {
        JobAction::LoadSnapshot(snapshot)
    }

    fn action_name(action: &JobAction) -> &'static str {
        match action {
            JobAction::AddJob(_) => "add_job",
            JobAction::UpdateJob(_) => "update_job",
            JobAction::DeleteJob(_) => "delete_job",
            JobAction::LoadSnapshot(_) => "load_snapshot",
        }
    }
}
