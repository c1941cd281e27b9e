use thiserror::Error;

/// Errors returned by a [`crate::VoteGateway`] or raised while settling a vote.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please log in to vote")]
    Unauthenticated,

    #[error("Invalid vote action: {0}")]
    InvalidAction(String),

    /// The server could not apply the vote after retrying a concurrent modification.
    #[error("Vote conflicted, please try again")]
    Conflict,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage or network unavailability reported by the server, or a failed background task.
    #[error("Vote service unavailable: {0}")]
    Transient(String),

    #[error("Vote request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
