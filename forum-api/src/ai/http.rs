use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};

use super::{AiError, TextGenerator};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Text generator backed by an HTTP endpoint.
///
/// Posts `{"prompt": ...}` and reads `{"text": ...}`. The API key, when set,
/// is sent as a bearer token.
pub struct HttpTextGenerator {
    endpoint: String,
    api_key: Option<String>,
    client: ReqwestClient,
}

impl HttpTextGenerator {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(HttpTextGenerator {
            endpoint: endpoint.to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let mut request = self.client.post(&self.endpoint).json(&GenerateRequest { prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() { AiError::Timeout } else { AiError::Reqwest(e) }
        })?;
        if !response.status().is_success() {
            return Err(AiError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body.text.trim();
        if text.is_empty() {
            return Err(AiError::Empty);
        }
        Ok(text.to_string())
    }
}
