use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateRecord;
use crate::persistence::CANDIDATE_SNAPSHOT_KEY;
use crate::store::{Reducer, Store};

/// Authoritative candidate collections.
///
/// A candidate id lives in at most one of `candidates` / `shortlisted`.
/// `uploaded` is an append-only audit log outside that partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateState {
    pub candidates: Vec<CandidateRecord>,
    #[serde(rename = "shortlistedCandidates")]
    pub shortlisted: Vec<CandidateRecord>,
    #[serde(rename = "uploadedResumes")]
    pub uploaded: Vec<CandidateRecord>,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Candidates,
    Shortlisted,
}

impl CandidateState {
    #[cfg(test)]
    pub fn locate(&self, id: u64) -> Option<Partition> {
        if self.candidates.iter().any(|c| c.id == id) {
            Some(Partition::Candidates)
        } else if self.shortlisted.iter().any(|c| c.id == id) {
            Some(Partition::Shortlisted)
        } else {
            None
        }
    }

    /// Looks a record up in either partition.
    pub fn find(&self, id: u64) -> Option<&CandidateRecord> {
        self.candidates
            .iter()
            .chain(self.shortlisted.iter())
            .find(|c| c.id == id)
    }

    /// One past the highest id in any collection, the audit log included.
    pub fn next_id(&self) -> u64 {
        self.candidates
            .iter()
            .chain(&self.shortlisted)
            .chain(&self.uploaded)
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone)]
pub enum CandidateAction {
    ShortlistCandidate(u64),
    RemoveFromShortlist(u64),
    AddUploadedCandidate(CandidateRecord),
    LoadSnapshot(CandidateState),
    ReplaceCandidates(Vec<CandidateRecord>),
}

pub struct CandidateReducer;

pub type CandidateStore = Store<CandidateReducer>;

impl Reducer for CandidateReducer {
    type State = CandidateState;
    type Action = CandidateAction;
    const SNAPSHOT_KEY: &'static str = CANDIDATE_SNAPSHOT_KEY;

    fn reduce(state: &CandidateState, action: CandidateAction) -> CandidateState {
        match action {
            CandidateAction::ShortlistCandidate(id) => {
                let Some(pos) = state.candidates.iter().position(|c| c.id == id) else {
                    return state.clone();
                };
                let mut next = state.clone();
                let mut record = next.candidates.remove(pos);
                record.is_shortlisted = Some(true);
                next.shortlisted.push(record);
                next
            }
            CandidateAction::RemoveFromShortlist(id) => {
                let Some(pos) = state.shortlisted.iter().position(|c| c.id == id) else {
                    return state.clone();
                };
                let mut next = state.clone();
                let mut record = next.shortlisted.remove(pos);
                record.is_shortlisted = None;
                next.candidates.push(record);
                next
            }
            CandidateAction::AddUploadedCandidate(record) => {
                let mut next = state.clone();
                next.candidates.push(record.clone());
                next.uploaded.push(record);
                next
            }
            CandidateAction::LoadSnapshot(snapshot) => snapshot,
            CandidateAction::ReplaceCandidates(candidates) => CandidateState {
                candidates,
                ..state.clone()
            },
        }
    }

    fn load_snapshot(snapshot: CandidateState) -> CandidateAction {
        CandidateAction::LoadSnapshot(snapshot)
    }

    fn action_name(action: &CandidateAction) -> &'static str {
        match action {
            CandidateAction::ShortlistCandidate(_) => "shortlist_candidate",
            CandidateAction::RemoveFromShortlist(_) => "remove_from_shortlist",
            CandidateAction::AddUploadedCandidate(_) => "add_uploaded_candidate",
            CandidateAction::LoadSnapshot(_) => "load_snapshot",
            CandidateAction::ReplaceCandidates(_) => "replace_candidates",
        }
    }
}
