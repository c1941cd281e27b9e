//! This module defines the `VoteRepository` trait, which provides an interface
//! for the durable vote records and the counters they maintain.
use forum_shared::types::{UserId, VoteAction, VoteChange, VoteTarget, VoteValue, VotesCount};
use crate::errors::RepositoryError;

/// A trait that defines the interface for the vote store.
///
/// Implementors guarantee that a vote record and the counter of its target are
/// only ever changed together, inside one atomic unit.
#[async_trait::async_trait]
pub trait VoteRepository: Send + Sync {
    /// Looks up the current vote of a user on a target.
    ///
    /// A missing record is not an error.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The voting user.
    /// * `target` - The question or answer.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(VoteValue))` - The stored direction.
    /// * `Ok(None)` - The user has no vote on the target.
    /// * `Err(RepositoryError)` - Storage failure.
    async fn get_vote(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
    ) -> Result<Option<VoteValue>, RepositoryError>;

    /// Applies one vote transition and the matching counter delta atomically.
    ///
    /// The stored vote is compared with `prior` before anything is written.
    /// Both the vote record and the target counter commit together or not at all.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The voting user.
    /// * `target` - The question or answer.
    /// * `prior` - The vote state the caller observed.
    /// * `action` - The requested action.
    ///
    /// # Returns
    ///
    /// * `Ok(VoteChange)` - The applied transition and the new counter value.
    /// * `Err(RepositoryError::Conflict)` - The stored state no longer matches `prior`.
    /// * `Err(RepositoryError::TargetNotFound)` - The target does not exist.
    /// * `Err(RepositoryError)` - Storage failure, nothing was written.
    async fn apply_vote_change(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
        prior: Option<VoteValue>,
        action: VoteAction,
    ) -> Result<VoteChange, RepositoryError>;

    /// Reads the cached counter of a target.
    async fn get_votes_count(&self, target: &VoteTarget) -> Result<VotesCount, RepositoryError>;
}
