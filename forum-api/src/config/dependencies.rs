use std::sync::Arc;

use forum_repository::postgres::run_migrations;
use forum_repository::{PostgresQuestionRepository, PostgresVoteRepository};
use forum_voting::VoteService;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::ai::{HttpTextGenerator, TextGenerator};
use crate::config::ApiConfig;
use crate::errors::StartupError;
use crate::http::AppState;
use crate::services::QuestionService;

/// `Dependencies` holds the wired components of the forum API.
///
/// It owns the database pool, the services built on top of it, and the
/// configuration they were built from.
pub struct Dependencies {
    pub config: ApiConfig,
    pub pool: sqlx::PgPool,
    pub state: AppState,
}

impl Dependencies {
    /// Creates a new `Dependencies` instance.
    ///
    /// Connects to PostgreSQL, applies migrations when enabled, and builds the
    /// vote and question services. The text generator is only created when an
    /// AI endpoint is configured.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `StartupError` if any dependency fails to initialize.
    pub async fn new(config: ApiConfig) -> Result<Self, StartupError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        info!(max_connections = config.max_connections, "Connected to PostgreSQL");

        if config.run_migrations {
            run_migrations(&pool).await?;
            info!("Database migrations applied");
        }

        let generator: Option<Arc<dyn TextGenerator>> = match &config.ai {
            Some(ai) => {
                info!(endpoint = %ai.endpoint, "AI text generation enabled");
                let generator: Arc<dyn TextGenerator> = Arc::new(HttpTextGenerator::new(
                    &ai.endpoint,
                    ai.api_key.clone(),
                    ai.timeout,
                )?);
                Some(generator)
            }
            None => {
                info!("AI_ENDPOINT not set, AI summaries and answers disabled");
                None
            }
        };

        let state = AppState {
            votes: VoteService::new(Arc::new(PostgresVoteRepository::new(pool.clone()))),
            questions: QuestionService::new(
                Arc::new(PostgresQuestionRepository::new(pool.clone())),
                generator,
            ),
        };

        Ok(Dependencies { config, pool, state })
    }
}
