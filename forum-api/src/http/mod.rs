//! HTTP surface of the forum.
mod identity;
mod questions;
mod votes;

pub use identity::{Identity, MaybeIdentity};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use forum_shared::types::{USER_AVATAR_HEADER, USER_ID_HEADER, USER_NAME_HEADER};
use forum_voting::VoteService;
use tower_http::cors::CorsLayer;

use crate::errors::StartupError;
use crate::services::QuestionService;

/// Shared state of the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub votes: VoteService,
    pub questions: QuestionService,
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Forum API is running")
}

/// Builds the router with CORS restricted to `allowed_origins`.
pub fn router(state: AppState, allowed_origins: &[String]) -> Result<Router, StartupError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| StartupError::CorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_NAME_HEADER),
            HeaderName::from_static(USER_AVATAR_HEADER),
        ]);

    Ok(Router::new()
        .route("/health", get(health_check))
        .route(
            "/v1/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/v1/questions/:id", get(questions::get_question))
        .route("/v1/questions/:id/answers", post(questions::create_answer))
        .route(
            "/v1/questions/:id/vote",
            get(votes::get_question_vote).post(votes::cast_question_vote),
        )
        .route(
            "/v1/answers/:id/vote",
            get(votes::get_answer_vote).post(votes::cast_answer_vote),
        )
        .layer(cors)
        .with_state(state))
}
