//! Remote vote operations used by the controller.
mod http;

pub use http::HttpVoteGateway;

use async_trait::async_trait;
use forum_shared::types::{CastOutcome, UserId, VoteAction, VoteTarget, VoteValue};

use crate::errors::ClientError;

/// Trait for the remote `getVoteState` / `castVote` operations.
///
/// Abstracts the transport so the controller can be driven by a mock in
/// tests and by [`HttpVoteGateway`] in production.
#[async_trait]
pub trait VoteGateway: Send + Sync {
    /// Fetch the stored vote of `user_id` on `target`.
    async fn fetch_vote(
        &self,
        user_id: &UserId,
        target: VoteTarget,
    ) -> Result<Option<VoteValue>, ClientError>;

    /// Ask the server to apply `action` to the vote of `user_id` on `target`.
    async fn cast_vote(
        &self,
        user_id: &UserId,
        target: VoteTarget,
        action: VoteAction,
    ) -> Result<CastOutcome, ClientError>;
}
