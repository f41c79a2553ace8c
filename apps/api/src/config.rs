use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::assistant::{ClientMode, LogVerbosity};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Remote CMS settings for the profile provider.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub access_token: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub retry_jitter: bool,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            access_token: String::new(),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(5),
            retry_jitter: false,
        }
    }
}

/// Settings for the assistance gateway. `api_key` may legitimately be absent.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub thinking_budget: Option<u32>,
    pub client_mode: ClientMode,
    pub log_verbosity: LogVerbosity,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: 0.7,
            max_output_tokens: 500,
            thinking_budget: None,
            client_mode: ClientMode::Eager,
            log_verbosity: LogVerbosity::Normal,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Only a malformed value is an error; missing credentials are not.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub cms: CmsConfig,
    pub assistant: AssistantConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cms_defaults = CmsConfig::default();
        let cms = CmsConfig {
            enabled: parse_or(&get, "CMS_ENABLED", cms_defaults.enabled, parse_bool)?,
            endpoint: get("CMS_ENDPOINT").unwrap_or_default(),
            access_token: get("CMS_ACCESS_TOKEN").unwrap_or_default(),
            max_retries: parse_or(&get, "CMS_MAX_RETRIES", cms_defaults.max_retries, |v| {
                v.parse::<u32>().ok()
            })?,
            retry_delay: parse_or(&get, "CMS_RETRY_DELAY_MS", cms_defaults.retry_delay, |v| {
                v.parse::<u64>().ok().map(Duration::from_millis)
            })?,
            timeout: parse_or(&get, "CMS_TIMEOUT_SECS", cms_defaults.timeout, |v| {
                v.parse::<u64>().ok().map(Duration::from_secs)
            })?,
            retry_jitter: parse_or(&get, "CMS_RETRY_JITTER", cms_defaults.retry_jitter, parse_bool)?,
        };

        if cms.enabled && cms.endpoint.is_empty() {
            bail!("CMS_ENABLED is set but CMS_ENDPOINT is missing");
        }

        let assistant_defaults = AssistantConfig::default();
        let assistant = AssistantConfig {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            base_url: get("GEMINI_BASE_URL").unwrap_or(assistant_defaults.base_url),
            model: get("GEMINI_MODEL").unwrap_or(assistant_defaults.model),
            temperature: parse_or(
                &get,
                "ASSISTANT_TEMPERATURE",
                assistant_defaults.temperature,
                |v| v.parse::<f32>().ok().filter(|t| (0.0..=2.0).contains(t)),
            )?,
            max_output_tokens: parse_or(
                &get,
                "ASSISTANT_MAX_OUTPUT_TOKENS",
                assistant_defaults.max_output_tokens,
                |v| v.parse::<u32>().ok().filter(|n| *n > 0),
            )?,
            thinking_budget: get("ASSISTANT_THINKING_BUDGET")
                .map(|v| {
                    v.parse::<u32>()
                        .context("ASSISTANT_THINKING_BUDGET must be a non-negative integer")
                })
                .transpose()?,
            client_mode: parse_or(
                &get,
                "ASSISTANT_CLIENT_MODE",
                assistant_defaults.client_mode,
                |v| v.parse().ok(),
            )?,
            log_verbosity: parse_or(
                &get,
                "ASSISTANT_LOG",
                assistant_defaults.log_verbosity,
                |v| v.parse().ok(),
            )?,
        };

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            cms,
            assistant,
        })
    }
}

fn parse_or<T, G, P>(get: &G, key: &str, default: T, parse: P) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => parse(raw.trim())
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
