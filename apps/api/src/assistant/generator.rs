use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by the generation service")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerationError::RateLimited)
    }
}

/// One generation call: the visitor's question plus the system context.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub query: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub thinking_budget: Option<u32>,
}

/// A text-generation backend. Returns the reply text verbatim; empty when the
/// service produced none.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Builds a generator bound to a credential.
pub trait GeneratorFactory: Send + Sync {
    fn connect(&self, api_key: &str) -> Arc<dyn TextGenerator>;
}
