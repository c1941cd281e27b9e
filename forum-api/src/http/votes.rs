//! `getVoteState` and `castVote` routes for questions and answers.
use axum::{
    Json,
    extract::{Path, State},
};
use forum_shared::types::{CastOutcome, CastVoteRequest, TargetKind, VoteState, VoteTarget};
use uuid::Uuid;

use super::{AppState, MaybeIdentity};
use crate::errors::ApiError;

fn parse_target(kind: TargetKind, raw_id: &str) -> Result<VoteTarget, ApiError> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| ApiError::BadRequest(format!("invalid {kind} id: {raw_id}")))?;
    Ok(VoteTarget { kind, id })
}

async fn vote_state(
    state: &AppState,
    identity: &MaybeIdentity,
    target: VoteTarget,
) -> Result<Json<VoteState>, ApiError> {
    let Some(user_id) = identity.user_id() else {
        return Err(forum_voting::VoteError::Unauthenticated.into());
    };
    let vote = state.votes.get_vote_state(Some(user_id), target).await?;
    Ok(Json(VoteState { vote }))
}

async fn cast(
    state: &AppState,
    identity: &MaybeIdentity,
    target: VoteTarget,
    request: &CastVoteRequest,
) -> Result<Json<CastOutcome>, ApiError> {
    let outcome = state
        .votes
        .cast_vote_str(identity.user_id(), target, &request.action)
        .await?;
    Ok(Json(outcome))
}

pub async fn get_question_vote(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<String>,
) -> Result<Json<VoteState>, ApiError> {
    vote_state(&state, &identity, parse_target(TargetKind::Question, &id)?).await
}

pub async fn get_answer_vote(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<String>,
) -> Result<Json<VoteState>, ApiError> {
    vote_state(&state, &identity, parse_target(TargetKind::Answer, &id)?).await
}

pub async fn cast_question_vote(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<String>,
    Json(request): Json<CastVoteRequest>,
) -> Result<Json<CastOutcome>, ApiError> {
    cast(&state, &identity, parse_target(TargetKind::Question, &id)?, &request).await
}

pub async fn cast_answer_vote(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(id): Path<String>,
    Json(request): Json<CastVoteRequest>,
) -> Result<Json<CastOutcome>, ApiError> {
    cast(&state, &identity, parse_target(TargetKind::Answer, &id)?, &request).await
}
