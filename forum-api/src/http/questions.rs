//! Question feed, detail, ask and answer routes.
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use forum_shared::types::{Answer, Question, QuestionFilter, QuestionWithAnswers};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, MaybeIdentity};
use crate::errors::ApiError;
use crate::services::{AskQuestion, PostAnswer};

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    filter: Option<String>,
    limit: Option<i64>,
}

fn parse_question_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid question id: {raw}")))
}

pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let filter = match params.filter.as_deref() {
        Some(raw) => raw
            .parse::<QuestionFilter>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => QuestionFilter::default(),
    };
    let questions = state.questions.list_questions(filter, params.limit).await?;
    Ok(Json(questions))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuestionWithAnswers>, ApiError> {
    let question = state.questions.get_question(parse_question_id(&id)?).await?;
    Ok(Json(question))
}

pub async fn create_question(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Json(request): Json<AskQuestion>,
) -> Result<(StatusCode, Json<QuestionWithAnswers>), ApiError> {
    let created = state
        .questions
        .create_question(identity.author(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn create_answer(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<String>,
    Json(request): Json<PostAnswer>,
) -> Result<(StatusCode, Json<Answer>), ApiError> {
    let answer = state
        .questions
        .create_answer(identity.author(), parse_question_id(&id)?, request)
        .await?;
    Ok((StatusCode::CREATED, Json(answer)))
}
