//! Server-side vote operations.
//!
//! `VoteService` sits between the HTTP surface and the vote store. It
//! enforces authentication, reads the current vote, and applies the
//! transition through `VoteRepository::apply_vote_change`, which writes the
//! vote record and the counter in one atomic unit.
use std::sync::Arc;

use forum_repository::{RepositoryError, VoteRepository};
use forum_shared::transition;
use forum_shared::types::{CastOutcome, UserId, VoteAction, VoteTarget, VoteValue};
use tracing::{debug, info, warn};

use crate::engine::parse_action;
use crate::errors::VoteError;

/// Casts and reads votes on questions and answers.
#[derive(Clone)]
pub struct VoteService {
    repository: Arc<dyn VoteRepository>,
}

impl VoteService {
    pub fn new(repository: Arc<dyn VoteRepository>) -> Self {
        Self { repository }
    }

    /// Returns the caller's current vote on `target`.
    ///
    /// Anonymous callers always see no vote.
    pub async fn get_vote_state(
        &self,
        user_id: Option<&UserId>,
        target: VoteTarget,
    ) -> Result<Option<VoteValue>, VoteError> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        Ok(self.repository.get_vote(user_id, &target).await?)
    }

    /// Reads the caller's vote together with the target's current counter.
    pub async fn get_vote_summary(
        &self,
        user_id: Option<&UserId>,
        target: VoteTarget,
    ) -> Result<CastOutcome, VoteError> {
        let vote = self.get_vote_state(user_id, target).await?;
        let count = self.repository.get_votes_count(&target).await?;
        Ok(CastOutcome {
            vote,
            upvotes: count.upvotes,
        })
    }

    /// Parses a wire action and casts it.
    pub async fn cast_vote_str(
        &self,
        user_id: Option<&UserId>,
        target: VoteTarget,
        action: &str,
    ) -> Result<CastOutcome, VoteError> {
        let Some(user_id) = user_id else {
            return Err(VoteError::Unauthenticated);
        };
        let action = parse_action(action)?;
        self.cast_vote(Some(user_id), target, action).await
    }

    /// Applies `action` to the caller's vote on `target`.
    ///
    /// On a concurrent modification the current state is re-read. If it
    /// already equals the state this request would produce, the duplicate is
    /// answered with the stored state instead of toggling it back. Otherwise
    /// the transition is retried once from the fresh state; a second conflict
    /// is returned as `VoteError::Conflict`.
    ///
    /// # Errors
    ///
    /// * `VoteError::Unauthenticated` - no user identity. Nothing is read or written.
    /// * `VoteError::Conflict` - the retry conflicted as well.
    /// * `VoteError::TargetNotFound` - the question or answer does not exist.
    /// * `VoteError::TransientStorage` - the store failed, nothing was written.
    pub async fn cast_vote(
        &self,
        user_id: Option<&UserId>,
        target: VoteTarget,
        action: VoteAction,
    ) -> Result<CastOutcome, VoteError> {
        let Some(user_id) = user_id else {
            debug!(target_kind = %target.kind, target_id = %target.id, "Rejected anonymous vote");
            return Err(VoteError::Unauthenticated);
        };

        let observed = self.repository.get_vote(user_id, &target).await?;
        match self
            .repository
            .apply_vote_change(user_id, &target, observed, action)
            .await
        {
            Ok(change) => {
                info!(
                    user_id = %user_id,
                    target_kind = %target.kind,
                    target_id = %target.id,
                    action = %action,
                    delta = change.delta,
                    upvotes = change.upvotes,
                    "Vote applied"
                );
                Ok(change.into())
            }
            Err(RepositoryError::Conflict(_)) => {
                self.resolve_conflict(user_id, target, observed, action).await
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    target_kind = %target.kind,
                    target_id = %target.id,
                    error = %e,
                    "Vote failed"
                );
                Err(e.into())
            }
        }
    }

    async fn resolve_conflict(
        &self,
        user_id: &UserId,
        target: VoteTarget,
        observed: Option<VoteValue>,
        action: VoteAction,
    ) -> Result<CastOutcome, VoteError> {
        let intended = transition(observed, action).next;
        let current = self.repository.get_vote(user_id, &target).await?;

        if current == intended {
            let count = self.repository.get_votes_count(&target).await?;
            info!(
                user_id = %user_id,
                target_kind = %target.kind,
                target_id = %target.id,
                action = %action,
                "Concurrent duplicate vote already applied"
            );
            return Ok(CastOutcome {
                vote: current,
                upvotes: count.upvotes,
            });
        }

        warn!(
            user_id = %user_id,
            target_kind = %target.kind,
            target_id = %target.id,
            action = %action,
            "Vote conflicted, retrying from fresh state"
        );
        match self
            .repository
            .apply_vote_change(user_id, &target, current, action)
            .await
        {
            Ok(change) => Ok(change.into()),
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    target_kind = %target.kind,
                    target_id = %target.id,
                    error = %e,
                    "Vote retry failed"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forum_repository::{InMemoryForumRepository, QuestionRepository};
    use forum_shared::types::{Author, NewQuestion, VoteChange, VotesCount};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    fn user(raw: &str) -> UserId {
        UserId::new(raw).unwrap()
    }

    async fn seed_question(repo: &InMemoryForumRepository, upvotes: usize) -> VoteTarget {
        let created = repo
            .create_question(
                &NewQuestion {
                    title: "How do I pin a future?".to_string(),
                    body: "Box::pin or pin!?".to_string(),
                    summary: "Pinning futures".to_string(),
                    tags: vec!["rust".to_string()],
                    author: Author {
                        id: "author".to_string(),
                        name: "Author".to_string(),
                        avatar_url: String::new(),
                    },
                },
                None,
            )
            .await
            .unwrap();
        let target = VoteTarget::question(created.question.id);
        for i in 0..upvotes {
            repo.apply_vote_change(&user(&format!("fan-{i}")), &target, None, VoteAction::ClickUp)
                .await
                .unwrap();
        }
        target
    }

    #[tokio::test]
    async fn test_toggle_and_switch_sequence() {
        let repo = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&repo, 10).await;
        let service = VoteService::new(repo.clone());
        let alice = user("alice");

        let down = service
            .cast_vote(Some(&alice), target, VoteAction::ClickDown)
            .await
            .unwrap();
        assert_eq!(down, CastOutcome { vote: Some(VoteValue::Down), upvotes: 9 });

        let up = service
            .cast_vote(Some(&alice), target, VoteAction::ClickUp)
            .await
            .unwrap();
        assert_eq!(up, CastOutcome { vote: Some(VoteValue::Up), upvotes: 11 });

        let cleared = service
            .cast_vote(Some(&alice), target, VoteAction::ClickUp)
            .await
            .unwrap();
        assert_eq!(cleared, CastOutcome { vote: None, upvotes: 10 });

        assert_eq!(service.get_vote_state(Some(&alice), target).await.unwrap(), None);
        assert_eq!(repo.vote_records(&target), 10);
    }

    #[tokio::test]
    async fn test_anonymous_vote_is_rejected_without_side_effects() {
        let repo = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&repo, 3).await;
        let service = VoteService::new(repo.clone());

        let err = service
            .cast_vote(None, target, VoteAction::ClickUp)
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::Unauthenticated));

        let summary = service.get_vote_summary(None, target).await.unwrap();
        assert_eq!(summary, CastOutcome { vote: None, upvotes: 3 });
        assert_eq!(repo.vote_records(&target), 3);
    }

    #[tokio::test]
    async fn test_invalid_action_string() {
        let repo = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&repo, 0).await;
        let service = VoteService::new(repo.clone());

        let err = service
            .cast_vote_str(Some(&user("bob")), target, "sideways")
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::InvalidAction(ref a) if a == "sideways"));

        let err = service.cast_vote_str(None, target, "sideways").await.unwrap_err();
        assert!(matches!(err, VoteError::Unauthenticated));
        assert_eq!(repo.vote_records(&target), 0);
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let repo = Arc::new(InMemoryForumRepository::new());
        let service = VoteService::new(repo);
        let target = VoteTarget::answer(uuid::Uuid::new_v4());

        let err = service
            .cast_vote(Some(&user("bob")), target, VoteAction::ClickUp)
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::TargetNotFound(t) if t == target));
    }

    /// Holds the first two reads at a barrier so both callers observe the
    /// same prior state before either writes.
    struct RendezvousRepository {
        inner: Arc<InMemoryForumRepository>,
        barrier: Barrier,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl VoteRepository for RendezvousRepository {
        async fn get_vote(
            &self,
            user_id: &UserId,
            target: &VoteTarget,
        ) -> Result<Option<VoteValue>, RepositoryError> {
            let vote = self.inner.get_vote(user_id, target).await?;
            if self.reads.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(vote)
        }

        async fn apply_vote_change(
            &self,
            user_id: &UserId,
            target: &VoteTarget,
            prior: Option<VoteValue>,
            action: VoteAction,
        ) -> Result<VoteChange, RepositoryError> {
            self.inner.apply_vote_change(user_id, target, prior, action).await
        }

        async fn get_votes_count(
            &self,
            target: &VoteTarget,
        ) -> Result<VotesCount, RepositoryError> {
            self.inner.get_votes_count(target).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_click_counts_once() {
        let inner = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&inner, 0).await;
        let repo = Arc::new(RendezvousRepository {
            inner: inner.clone(),
            barrier: Barrier::new(2),
            reads: AtomicUsize::new(0),
        });
        let service = VoteService::new(repo);
        let carol = user("carol");

        let (first, second) = tokio::join!(
            service.cast_vote(Some(&carol), target, VoteAction::ClickUp),
            service.cast_vote(Some(&carol), target, VoteAction::ClickUp),
        );

        let expected = CastOutcome { vote: Some(VoteValue::Up), upvotes: 1 };
        assert_eq!(first.unwrap(), expected);
        assert_eq!(second.unwrap(), expected);
        assert_eq!(inner.vote_records(&target), 1);
        assert_eq!(inner.get_votes_count(&target).await.unwrap().upvotes, 1);
    }

    /// Reports a conflict on every write, optionally after letting a
    /// competing write land first.
    struct ConflictingRepository {
        inner: Arc<InMemoryForumRepository>,
        conflicts_left: AtomicUsize,
        interloper: Option<(UserId, VoteAction)>,
    }

    #[async_trait]
    impl VoteRepository for ConflictingRepository {
        async fn get_vote(
            &self,
            user_id: &UserId,
            target: &VoteTarget,
        ) -> Result<Option<VoteValue>, RepositoryError> {
            self.inner.get_vote(user_id, target).await
        }

        async fn apply_vote_change(
            &self,
            user_id: &UserId,
            target: &VoteTarget,
            prior: Option<VoteValue>,
            action: VoteAction,
        ) -> Result<VoteChange, RepositoryError> {
            if self.conflicts_left.load(Ordering::SeqCst) > 0 {
                self.conflicts_left.fetch_sub(1, Ordering::SeqCst);
                if let Some((other, other_action)) = &self.interloper {
                    let current = self.inner.get_vote(other, target).await?;
                    self.inner
                        .apply_vote_change(other, target, current, *other_action)
                        .await?;
                }
                return Err(RepositoryError::Conflict(*target));
            }
            self.inner.apply_vote_change(user_id, target, prior, action).await
        }

        async fn get_votes_count(
            &self,
            target: &VoteTarget,
        ) -> Result<VotesCount, RepositoryError> {
            self.inner.get_votes_count(target).await
        }
    }

    #[tokio::test]
    async fn test_conflict_is_retried_from_fresh_state() {
        let inner = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&inner, 5).await;
        let dave = user("dave");
        // Another session of the same user downvotes before our write lands.
        let repo = Arc::new(ConflictingRepository {
            inner: inner.clone(),
            conflicts_left: AtomicUsize::new(1),
            interloper: Some((dave.clone(), VoteAction::ClickDown)),
        });
        let service = VoteService::new(repo);

        let outcome = service
            .cast_vote(Some(&dave), target, VoteAction::ClickUp)
            .await
            .unwrap();

        // down -> up moves the counter by two on top of the interloper's -1.
        assert_eq!(outcome, CastOutcome { vote: Some(VoteValue::Up), upvotes: 6 });
        assert_eq!(inner.vote_records(&target), 6);
    }

    #[tokio::test]
    async fn test_second_conflict_is_reported() {
        let inner = Arc::new(InMemoryForumRepository::new());
        let target = seed_question(&inner, 2).await;
        let repo = Arc::new(ConflictingRepository {
            inner: inner.clone(),
            conflicts_left: AtomicUsize::new(usize::MAX),
            interloper: None,
        });
        let service = VoteService::new(repo);

        let err = service
            .cast_vote(Some(&user("erin")), target, VoteAction::ClickDown)
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::Conflict));
        assert_eq!(inner.get_votes_count(&target).await.unwrap().upvotes, 2);
        assert_eq!(inner.vote_records(&target), 2);
    }

    struct UnavailableRepository;

    #[async_trait]
    impl VoteRepository for UnavailableRepository {
        async fn get_vote(
            &self,
            _user_id: &UserId,
            _target: &VoteTarget,
        ) -> Result<Option<VoteValue>, RepositoryError> {
            Ok(None)
        }

        async fn apply_vote_change(
            &self,
            _user_id: &UserId,
            _target: &VoteTarget,
            _prior: Option<VoteValue>,
            _action: VoteAction,
        ) -> Result<VoteChange, RepositoryError> {
            Err(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut))
        }

        async fn get_votes_count(
            &self,
            _target: &VoteTarget,
        ) -> Result<VotesCount, RepositoryError> {
            Err(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_transient() {
        let service = VoteService::new(Arc::new(UnavailableRepository));
        let err = service
            .cast_vote(
                Some(&user("frank")),
                VoteTarget::question(uuid::Uuid::new_v4()),
                VoteAction::ClickUp,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::TransientStorage(_)));
    }
}
