//! PostgreSQL implementations of the forum repository traits.
mod codec;
mod questions_repository;
mod votes_repository;

pub use questions_repository::PostgresQuestionRepository;
pub use votes_repository::PostgresVoteRepository;

/// Embedded schema migrations for the forum tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");

/// Applies all pending migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), crate::RepositoryError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
