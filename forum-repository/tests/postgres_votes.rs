//! Integration tests for the PostgreSQL vote store.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `cargo test --test postgres_votes`

use forum_repository::{
    PostgresQuestionRepository, PostgresVoteRepository, QuestionRepository, RepositoryError,
    VoteRepository,
};
use forum_shared::types::{
    Author, NewAnswer, NewQuestion, UserId, VoteAction, VoteTarget, VoteValue,
};
use uuid::Uuid;

/// Creates a question with the given counter value and returns its target.
async fn seed_question(pool: &sqlx::PgPool, upvotes: i64) -> VoteTarget {
    let repository = PostgresQuestionRepository::new(pool.clone());
    let created = repository
        .create_question(
            &NewQuestion {
                title: "Where is the library annex?".to_string(),
                body: "Looking for the quiet study rooms.".to_string(),
                summary: "Library annex location".to_string(),
                tags: vec!["campus".to_string()],
                author: Author {
                    id: "student-1".to_string(),
                    name: "Student".to_string(),
                    avatar_url: String::new(),
                },
            },
            None,
        )
        .await
        .unwrap();
    sqlx::query("UPDATE questions SET upvotes = $1 WHERE id = $2")
        .bind(upvotes)
        .bind(created.question.id)
        .execute(pool)
        .await
        .unwrap();
    VoteTarget::question(created.question.id)
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

async fn vote_rows(pool: &sqlx::PgPool, target: &VoteTarget) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM votes WHERE target_id = $1")
        .bind(target.id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ============================================================================
// Lookups
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_get_vote_missing_record(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool.clone());
    let target = seed_question(&pool, 0).await;

    let vote = repository.get_vote(&user("u1"), &target).await.unwrap();
    assert_eq!(vote, None);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_get_votes_count_unknown_target(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool);
    let target = VoteTarget::answer(Uuid::new_v4());

    let err = repository.get_votes_count(&target).await.unwrap_err();
    assert!(matches!(err, RepositoryError::TargetNotFound(t) if t == target));
}

// ============================================================================
// Transitions
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_down_up_up_scenario(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool.clone());
    let target = seed_question(&pool, 10).await;
    let u1 = user("u1");

    let change = repository
        .apply_vote_change(&u1, &target, None, VoteAction::ClickDown)
        .await
        .unwrap();
    assert_eq!((change.next, change.delta, change.upvotes), (Some(VoteValue::Down), -1, 9));
    assert_eq!(repository.get_vote(&u1, &target).await.unwrap(), Some(VoteValue::Down));

    let change = repository
        .apply_vote_change(&u1, &target, Some(VoteValue::Down), VoteAction::ClickUp)
        .await
        .unwrap();
    assert_eq!((change.next, change.delta, change.upvotes), (Some(VoteValue::Up), 2, 11));
    // Switching direction updates the existing row in place.
    let (rows, touched): (i64, bool) = sqlx::query_as(
        "SELECT COUNT(*), BOOL_AND(updated_at >= created_at) FROM votes \
         WHERE user_id = $1 AND target_id = $2",
    )
    .bind(u1.as_str())
    .bind(target.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((rows, touched), (1, true));

    let change = repository
        .apply_vote_change(&u1, &target, Some(VoteValue::Up), VoteAction::ClickUp)
        .await
        .unwrap();
    assert_eq!((change.next, change.delta, change.upvotes), (None, -1, 10));
    assert_eq!(repository.get_vote(&u1, &target).await.unwrap(), None);
    assert_eq!(vote_rows(&pool, &target).await, 0);
    assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 10);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_answer_votes_update_answer_counter(pool: sqlx::PgPool) {
    let question = seed_question(&pool, 3).await;
    let answer = PostgresQuestionRepository::new(pool.clone())
        .create_answer(&NewAnswer::by_user(
            question.id,
            "Second floor, east wing.".to_string(),
            &user("helper"),
            "Helper".to_string(),
            String::new(),
        ))
        .await
        .unwrap();
    let target = VoteTarget::answer(answer.id);
    let repository = PostgresVoteRepository::new(pool.clone());

    let change = repository
        .apply_vote_change(&user("u1"), &target, None, VoteAction::ClickUp)
        .await
        .unwrap();
    assert_eq!(change.upvotes, 1);

    // The question counter is untouched.
    assert_eq!(repository.get_votes_count(&question).await.unwrap().upvotes, 3);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_stale_prior_is_rejected_without_writes(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool.clone());
    let target = seed_question(&pool, 5).await;
    let u1 = user("u1");

    repository
        .apply_vote_change(&u1, &target, None, VoteAction::ClickUp)
        .await
        .unwrap();

    let err = repository
        .apply_vote_change(&u1, &target, Some(VoteValue::Down), VoteAction::ClickUp)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(repository.get_vote(&u1, &target).await.unwrap(), Some(VoteValue::Up));
    assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 6);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_unknown_target_writes_nothing(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool.clone());
    let target = VoteTarget::question(Uuid::new_v4());

    let err = repository
        .apply_vote_change(&user("u1"), &target, None, VoteAction::ClickUp)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::TargetNotFound(_)));
    assert_eq!(vote_rows(&pool, &target).await, 0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_concurrent_first_votes_increment_once(pool: sqlx::PgPool) {
    let repository = PostgresVoteRepository::new(pool.clone());
    let target = seed_question(&pool, 0).await;
    let u1 = user("u1");

    // Both requests observed "no vote" before either one wrote.
    let (first, second) = tokio::join!(
        repository.apply_vote_change(&u1, &target, None, VoteAction::ClickUp),
        repository.apply_vote_change(&u1, &target, None, VoteAction::ClickUp),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Err(e) if e.is_conflict())));
    assert_eq!(vote_rows(&pool, &target).await, 1);
    assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 1);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_concurrent_users_all_counted(pool: sqlx::PgPool) {
    let repository = std::sync::Arc::new(PostgresVoteRepository::new(pool.clone()));
    let target = seed_question(&pool, 0).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let action = if i % 2 == 0 { VoteAction::ClickUp } else { VoteAction::ClickDown };
            repository
                .apply_vote_change(&user(&format!("user-{i}")), &target, None, action)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(vote_rows(&pool, &target).await, 8);
    assert_eq!(repository.get_votes_count(&target).await.unwrap().upvotes, 0);
}
