//! Error types for the Forum API application.
//! `ApiError` is what route handlers return; `StartupError` covers everything
//! that can stop the process before it starts serving.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use forum_voting::VoteError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::ai::AiError;
use crate::config::ConfigError;
use crate::services::QuestionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Vote(e) => match e {
                VoteError::Unauthenticated => StatusCode::UNAUTHORIZED,
                VoteError::InvalidAction(_) => StatusCode::BAD_REQUEST,
                VoteError::Conflict => StatusCode::CONFLICT,
                VoteError::TargetNotFound(_) => StatusCode::NOT_FOUND,
                VoteError::TransientStorage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Question(e) => match e {
                QuestionError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                QuestionError::Validation(_) => StatusCode::BAD_REQUEST,
                QuestionError::NotFound(_) => StatusCode::NOT_FOUND,
                QuestionError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage details stay in the logs.
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Service temporarily unavailable, please try again".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

/// Errors that stop the API before it serves requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] forum_repository::RepositoryError),
    #[error("Text generator error: {0}")]
    TextGenerator(#[from] AiError),
    #[error("Invalid CORS origin: {0}")]
    CorsOrigin(String),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
