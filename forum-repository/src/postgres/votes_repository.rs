//! PostgreSQL implementation of the vote store.
//!
//! Every vote mutation runs in one transaction that:
//!
//! 1. locks the target row (`SELECT ... FOR UPDATE`), serializing all vote
//!    writers of that target,
//! 2. re-reads the caller's vote and rejects the change with `Conflict` when it
//!    differs from the state the caller observed,
//! 3. inserts, updates or deletes the vote row,
//! 4. applies the counter delta with `upvotes = upvotes + $delta`.
//!
//! ## Database Tables
//!
//! - `votes`: one row per (user, target), absent when the user has no vote
//! - `questions` / `answers`: hold the `upvotes` counter of each target
use async_trait::async_trait;
use forum_shared::transition;
use forum_shared::types::{UserId, VoteAction, VoteChange, VoteTarget, VoteValue, VotesCount};
use tracing::debug;

use super::codec::{decode_vote, encode_kind, encode_vote, target_table};
use crate::{RepositoryError, VoteRepository};

/// PostgreSQL implementation of the vote store.
pub struct PostgresVoteRepository {
    pool: sqlx::PgPool,
}

impl PostgresVoteRepository {
    /// Creates a new PostgreSQL vote repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the forum schema
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Locks the target row and returns its current counter.
    async fn lock_target_tx(
        &self,
        target: &VoteTarget,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<i64, RepositoryError> {
        let sql = format!(
            "SELECT upvotes FROM {} WHERE id = $1 FOR UPDATE",
            target_table(target.kind)
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(target.id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, *target))?
            .ok_or(RepositoryError::TargetNotFound(*target))
    }

    async fn read_vote_tx(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Option<VoteValue>, RepositoryError> {
        let code = sqlx::query_scalar::<_, i16>(
            "SELECT vote_type FROM votes WHERE user_id = $1 AND target_id = $2",
        )
        .bind(user_id.as_str())
        .bind(target.id)
        .fetch_optional(&mut **tx)
        .await?;
        code.map(decode_vote).transpose()
    }

    /// Writes the vote row for a `prior -> next` transition.
    async fn write_vote_tx(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
        prior: Option<VoteValue>,
        next: Option<VoteValue>,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        let query = match (prior, next) {
            (None, Some(vote)) => sqlx::query(
                r#"
                INSERT INTO votes
                    (user_id, target_id, target_kind, vote_type, created_at, updated_at)
                VALUES ($1, $2, $3, $4, NOW(), NOW())
                "#,
            )
            .bind(user_id.as_str())
            .bind(target.id)
            .bind(encode_kind(target.kind))
            .bind(encode_vote(vote)),
            (Some(_), Some(vote)) => sqlx::query(
                r#"
                UPDATE votes SET vote_type = $3, updated_at = NOW()
                WHERE user_id = $1 AND target_id = $2
                "#,
            )
            .bind(user_id.as_str())
            .bind(target.id)
            .bind(encode_vote(vote)),
            (Some(_), None) => {
                sqlx::query("DELETE FROM votes WHERE user_id = $1 AND target_id = $2")
                    .bind(user_id.as_str())
                    .bind(target.id)
            }
            (None, None) => return Ok(()),
        };
        query
            .execute(&mut **tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, *target))?;
        Ok(())
    }

    async fn apply_delta_tx(
        &self,
        target: &VoteTarget,
        delta: i64,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<i64, RepositoryError> {
        let sql = format!(
            "UPDATE {} SET upvotes = upvotes + $1 WHERE id = $2 RETURNING upvotes",
            target_table(target.kind)
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(delta)
            .bind(target.id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, *target))
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn get_vote(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
    ) -> Result<Option<VoteValue>, RepositoryError> {
        let code = sqlx::query_scalar::<_, i16>(
            "SELECT vote_type FROM votes WHERE user_id = $1 AND target_id = $2",
        )
        .bind(user_id.as_str())
        .bind(target.id)
        .fetch_optional(&self.pool)
        .await?;
        code.map(decode_vote).transpose()
    }

    /// Applies one transition in a single transaction.
    ///
    /// The target row lock taken first makes concurrent read-modify-write
    /// sequences on the same target run one after the other, so two requests
    /// that both observed "no vote" cannot both insert and both add +1: the
    /// second one sees the first one's row and fails with `Conflict`.
    async fn apply_vote_change(
        &self,
        user_id: &UserId,
        target: &VoteTarget,
        prior: Option<VoteValue>,
        action: VoteAction,
    ) -> Result<VoteChange, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        self.lock_target_tx(target, &mut tx).await?;
        let stored = self.read_vote_tx(user_id, target, &mut tx).await?;
        if stored != prior {
            debug!(%user_id, %target, ?prior, ?stored, "Vote changed since it was read");
            return Err(RepositoryError::Conflict(*target));
        }

        let step = transition(prior, action);
        self.write_vote_tx(user_id, target, prior, step.next, &mut tx).await?;
        let upvotes = self.apply_delta_tx(target, step.delta, &mut tx).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::from_write(e, *target))?;

        Ok(VoteChange {
            previous: prior,
            next: step.next,
            delta: step.delta,
            upvotes,
        })
    }

    async fn get_votes_count(&self, target: &VoteTarget) -> Result<VotesCount, RepositoryError> {
        let sql = format!("SELECT upvotes FROM {} WHERE id = $1", target_table(target.kind));
        let upvotes = sqlx::query_scalar::<_, i64>(&sql)
            .bind(target.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::TargetNotFound(*target))?;
        Ok(VotesCount {
            target: *target,
            upvotes,
        })
    }
}
