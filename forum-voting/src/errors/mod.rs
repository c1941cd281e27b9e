//! Error types for the voting service.
//! Defines the error taxonomy surfaced to callers of `getVoteState` and `castVote`.
use forum_repository::RepositoryError;
use forum_shared::types::VoteTarget;
use thiserror::Error;

/// Represents errors that can occur while reading or casting a vote.
#[derive(Debug, Error)]
pub enum VoteError {
    /// No authenticated user identity was supplied.
    #[error("Please log in to vote")]
    Unauthenticated,

    /// The action is outside `{up, down}`.
    #[error("Invalid vote action: {0}")]
    InvalidAction(String),

    /// The vote was modified concurrently and the retry conflicted as well.
    #[error("Your vote could not be saved, please try again")]
    Conflict,

    #[error("Target not found: {0}")]
    TargetNotFound(VoteTarget),

    /// Storage or network unavailability.
    #[error("Vote storage unavailable: {0}")]
    TransientStorage(String),
}

impl From<RepositoryError> for VoteError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => VoteError::Conflict,
            RepositoryError::TargetNotFound(target) => VoteError::TargetNotFound(target),
            other => VoteError::TransientStorage(other.to_string()),
        }
    }
}
