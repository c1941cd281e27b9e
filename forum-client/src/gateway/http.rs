use async_trait::async_trait;
use forum_shared::types::{
    CastOutcome, CastVoteRequest, USER_ID_HEADER, UserId, VoteAction, VoteState, VoteTarget,
    VoteValue,
};
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::VoteGateway;
use crate::errors::ClientError;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gateway that calls the forum API over HTTP.
///
/// # Example
///
/// ```ignore
/// let gateway = HttpVoteGateway::new("https://forum.example.com");
/// let vote = gateway.fetch_vote(&user, VoteTarget::answer(id)).await?;
/// ```
pub struct HttpVoteGateway {
    base_url: String,
    client: ReqwestClient,
}

impl HttpVoteGateway {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, ReqwestClient::new())
    }

    pub fn with_client(base_url: &str, client: ReqwestClient) -> Self {
        HttpVoteGateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn vote_url(&self, target: VoteTarget) -> String {
        format!(
            "{}/v1/{}/{}/vote",
            self.base_url,
            target.kind.collection(),
            target.id
        )
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(error_for_status(status, message))
    }
}

/// Maps a non-success status of the vote routes to a `ClientError`.
fn error_for_status(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthenticated,
        StatusCode::BAD_REQUEST => ClientError::InvalidAction(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict,
        _ => ClientError::Transient(format!("{status}: {message}")),
    }
}

#[async_trait]
impl VoteGateway for HttpVoteGateway {
    async fn fetch_vote(
        &self,
        user_id: &UserId,
        target: VoteTarget,
    ) -> Result<Option<VoteValue>, ClientError> {
        let url = self.vote_url(target);
        debug!(url = %url, "Fetching vote state");
        let response = self
            .client
            .get(&url)
            .header(USER_ID_HEADER, user_id.as_str())
            .send()
            .await?;
        let state: VoteState = Self::check(response).await?.json().await?;
        Ok(state.vote)
    }

    async fn cast_vote(
        &self,
        user_id: &UserId,
        target: VoteTarget,
        action: VoteAction,
    ) -> Result<CastOutcome, ClientError> {
        let url = self.vote_url(target);
        debug!(url = %url, action = %action, "Casting vote");
        let response = self
            .client
            .post(&url)
            .header(USER_ID_HEADER, user_id.as_str())
            .json(&CastVoteRequest {
                action: action.as_str().to_string(),
            })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
