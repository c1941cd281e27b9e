use serde::{Deserialize, Serialize};
use crate::types::VoteValue;

/// The result of applying one vote transition in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    pub previous: Option<VoteValue>,
    pub next: Option<VoteValue>,
    pub delta: i64,
    /// Counter value after the delta was applied.
    pub upvotes: i64,
}

/// What a caller sees after a vote was cast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastOutcome {
    pub vote: Option<VoteValue>,
    pub upvotes: i64,
}

impl From<VoteChange> for CastOutcome {
    fn from(change: VoteChange) -> Self {
        Self {
            vote: change.next,
            upvotes: change.upvotes,
        }
    }
}

/// The caller's current vote on a target, as returned by `getVoteState`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteState {
    pub vote: Option<VoteValue>,
}

/// Request body of `castVote`.
///
/// The action stays a string on the wire so unknown values reach the
/// service and are rejected as an invalid action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastVoteRequest {
    pub action: String,
}
