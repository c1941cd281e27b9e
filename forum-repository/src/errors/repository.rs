//! Error types for the forum repository.
//! Defines specific errors that can occur during database operations on votes,
//! questions and answers.
use forum_shared::types::{QuestionId, VoteTarget};
use thiserror::Error;

/// PostgreSQL error codes that mean a concurrent writer won.
const UNIQUE_VIOLATION: &str = "23505";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Represents errors that can occur within the forum repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The stored vote no longer matches what the caller observed.
    #[error("Concurrent modification of the vote on {0}")]
    Conflict(VoteTarget),

    #[error("Target not found: {0}")]
    TargetNotFound(VoteTarget),

    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),
}

impl RepositoryError {
    /// Classifies a database error raised while mutating `target`.
    ///
    /// Unique violations, serialization failures and deadlocks become
    /// `Conflict`; every other error is kept as a database error.
    pub fn from_write(err: sqlx::Error, target: VoteTarget) -> Self {
        let is_conflict = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| {
                code == UNIQUE_VIOLATION
                    || code == SERIALIZATION_FAILURE
                    || code == DEADLOCK_DETECTED
            });
        if is_conflict {
            RepositoryError::Conflict(target)
        } else {
            RepositoryError::DatabaseError(err)
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_non_database_error_is_not_a_conflict() {
        let target = VoteTarget::question(Uuid::new_v4());
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound, target);
        assert!(matches!(err, RepositoryError::DatabaseError(sqlx::Error::RowNotFound)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_display() {
        let target = VoteTarget::answer(Uuid::nil());
        let err = RepositoryError::Conflict(target);
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "Concurrent modification of the vote on answer 00000000-0000-0000-0000-000000000000"
        );
    }
}
