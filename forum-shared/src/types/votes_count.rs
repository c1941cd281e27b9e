use serde::{Deserialize, Serialize};
use crate::types::VoteTarget;

/// The cached net vote counter of a question or answer.
///
/// `upvotes` equals the sum of the weights of all vote records on the target
/// (+1 per upvote, -1 per downvote).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesCount {
    pub target: VoteTarget,
    pub upvotes: i64,
}
