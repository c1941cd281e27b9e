//! Text generation for question summaries and initial AI answers.
//!
//! [`TextGenerator`] abstracts the model endpoint so question creation can be
//! tested with a mock. [`HttpTextGenerator`] is the production client.
mod http;
pub mod prompts;

pub use http::HttpTextGenerator;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("generator returned status {0}")]
    Status(u16),
    #[error("generator returned empty text")]
    Empty,
    #[error("timeout")]
    Timeout,
}

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}
