//! Google Gemini `generateContent` client — the only code that talks to the
//! generation service.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assistant::generator::{
    GenerationError, GenerationRequest, GeneratorFactory, TextGenerator,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, skipping thought parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.query,
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<GeminiError>(&body) {
                Ok(e) if e.error.status.as_deref() == Some("RESOURCE_EXHAUSTED") => {
                    GenerationError::RateLimited
                }
                Ok(e) => GenerationError::Api {
                    status: status.as_u16(),
                    message: e.error.message,
                },
                Err(_) => GenerationError::Api {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let body = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;
        debug!(
            "Gemini call succeeded: candidates={}",
            parsed.candidates.len()
        );
        Ok(parsed.text())
    }
}

/// Shares one HTTP connection pool across every client it hands out.
#[derive(Clone)]
pub struct GeminiFactory {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiFactory {
    pub fn new(base_url: String, model: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            base_url,
            model,
        })
    }
}

impl GeneratorFactory for GeminiFactory {
    fn connect(&self, api_key: &str) -> Arc<dyn TextGenerator> {
        Arc::new(GeminiClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: api_key.to_string(),
        })
    }
}
