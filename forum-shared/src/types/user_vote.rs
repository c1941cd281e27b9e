use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{UserId, VoteTarget, VoteValue};

/// Represents a user's current vote on a question or answer.
///
/// At most one record exists per (user, target) pair. The record is created
/// on the first vote, its `vote_type` flips when the user switches direction,
/// and it is deleted when the user toggles the vote off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserVote {
    pub user_id: UserId,
    pub target: VoteTarget,
    pub vote_type: VoteValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
