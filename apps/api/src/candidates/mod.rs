pub mod filter;
pub mod handlers;
pub mod reducer;

pub use reducer::{CandidateAction, CandidateState, CandidateStore};
