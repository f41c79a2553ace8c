//! AI Assistance Gateway — forwards a visitor question plus profile context to
//! the generation service and always hands back a displayable string.
//!
//! Per call: credential check → offline reply, or one request → reply text,
//! busy reply (rate limited) or error reply. No retries here; the caller decides.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::models::profile::{GlobalData, Language};

pub mod credentials;
pub mod gemini;
pub mod generator;
pub mod prompts;

use credentials::{CredentialSource, EnvCredential, StaticCredential};
use gemini::GeminiFactory;
use generator::{GenerationError, GenerationRequest, GeneratorFactory, TextGenerator};

/// When the generation client is built, and therefore when the credential is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Once, at construction.
    Eager,
    /// On every call, so a rotated or late-provisioned key is picked up.
    Lazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogVerbosity {
    Quiet,
    Normal,
    Verbose,
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognised value '{0}'")]
pub struct ParseOptionError(String);

impl FromStr for ClientMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eager" => Ok(ClientMode::Eager),
            "lazy" => Ok(ClientMode::Lazy),
            _ => Err(ParseOptionError(s.to_string())),
        }
    }
}

impl FromStr for LogVerbosity {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(LogVerbosity::Quiet),
            "normal" => Ok(LogVerbosity::Normal),
            "verbose" => Ok(LogVerbosity::Verbose),
            _ => Err(ParseOptionError(s.to_string())),
        }
    }
}

enum Backend {
    Eager(Option<Arc<dyn TextGenerator>>),
    Lazy {
        credentials: Arc<dyn CredentialSource>,
        factory: Arc<dyn GeneratorFactory>,
    },
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Eager(client) => write!(f, "Eager(connected: {})", client.is_some()),
            Backend::Lazy { .. } => f.write_str("Lazy"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    profile: Arc<GlobalData>,
    backend: Backend,
    temperature: f32,
    max_output_tokens: u32,
    thinking_budget: Option<u32>,
    verbosity: LogVerbosity,
}

/// Cheap to clone; all clones share one backend.
#[derive(Debug, Clone)]
pub struct AssistantGateway {
    inner: Arc<Inner>,
}

impl AssistantGateway {
    /// Wires the Gemini backend. Eager mode uses the configured key; lazy mode
    /// re-reads `GEMINI_API_KEY` / `API_KEY` on each call.
    pub fn from_config(
        config: &AssistantConfig,
        profile: Arc<GlobalData>,
    ) -> Result<Self, GenerationError> {
        let factory = Arc::new(GeminiFactory::new(
            config.base_url.clone(),
            config.model.clone(),
        )?);
        let credentials: Arc<dyn CredentialSource> = match config.client_mode {
            ClientMode::Eager => Arc::new(StaticCredential(config.api_key.clone())),
            ClientMode::Lazy => Arc::new(EnvCredential::new(["GEMINI_API_KEY", "API_KEY"])),
        };
        Ok(Self::new(config, profile, credentials, factory))
    }

    pub fn new(
        config: &AssistantConfig,
        profile: Arc<GlobalData>,
        credentials: Arc<dyn CredentialSource>,
        factory: Arc<dyn GeneratorFactory>,
    ) -> Self {
        let backend = match config.client_mode {
            ClientMode::Eager => {
                Backend::Eager(credentials.api_key().map(|key| factory.connect(&key)))
            }
            ClientMode::Lazy => Backend::Lazy {
                credentials,
                factory,
            },
        };

        Self {
            inner: Arc::new(Inner {
                profile,
                backend,
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                thinking_budget: config.thinking_budget,
                verbosity: config.log_verbosity,
            }),
        }
    }

    /// Whether a call right now would reach the generation service.
    pub fn is_online(&self) -> bool {
        match &self.inner.backend {
            Backend::Eager(client) => client.is_some(),
            Backend::Lazy { credentials, .. } => credentials.api_key().is_some(),
        }
    }

    fn client(&self) -> Option<Arc<dyn TextGenerator>> {
        match &self.inner.backend {
            Backend::Eager(client) => client.clone(),
            Backend::Lazy {
                credentials,
                factory,
            } => credentials.api_key().map(|key| factory.connect(&key)),
        }
    }

    /// Answers `query` in `language`. Never fails: every path yields a string.
    pub async fn get_assistance(&self, query: &str, language: Language) -> String {
        let inner = &self.inner;
        let contact_email = &inner.profile.email;

        let Some(client) = self.client() else {
            if inner.verbosity >= LogVerbosity::Normal {
                warn!("Generation API key missing; answering in offline mode");
            }
            return prompts::offline_message(language).to_string();
        };

        let Some(profile) = inner.profile.profile(language) else {
            warn!("No profile content for language '{language}'");
            return prompts::error_message(language, contact_email);
        };

        let request = GenerationRequest {
            query: query.to_string(),
            system_instruction: prompts::build_system_context(profile, contact_email, language),
            temperature: inner.temperature,
            max_output_tokens: inner.max_output_tokens,
            thinking_budget: inner.thinking_budget,
        };

        if inner.verbosity >= LogVerbosity::Verbose {
            info!(
                "Assistance request: language={language}, query_chars={}, context_chars={}",
                request.query.chars().count(),
                request.system_instruction.chars().count()
            );
        }

        match client.generate(&request).await {
            Ok(reply) => {
                if inner.verbosity >= LogVerbosity::Verbose {
                    info!("Assistance reply: chars={}", reply.chars().count());
                } else {
                    debug!("Assistance reply received");
                }
                reply
            }
            Err(e) if e.is_rate_limited() => {
                if inner.verbosity >= LogVerbosity::Normal {
                    warn!("Generation service rate limited the request");
                }
                prompts::busy_message(language).to_string()
            }
            Err(e) => {
                if inner.verbosity >= LogVerbosity::Normal {
                    warn!("Generation failed: {e}");
                }
                prompts::error_message(language, contact_email)
            }
        }
    }
}
