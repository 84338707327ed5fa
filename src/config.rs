//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;
use crate::llm::openai::DEFAULT_BASE_URL;
use crate::pipeline::enrich::DEFAULT_BATCH_DELAY;

/// Identity the assistant writes and signs as.
pub const DEFAULT_IDENTITY: &str = "Inbox Agent";

/// Default model for agent queries.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// JSON file with the inbox. `None` uses the bundled sample.
    pub messages_path: Option<PathBuf>,
    /// JSON file with prompt templates. `None` uses the built-in set.
    pub templates_path: Option<PathBuf>,
    /// Name the assistant signs drafted replies with.
    pub identity: String,
    /// Simulated latency of the batch enrichment pass.
    pub batch_delay: Duration,
    /// Model settings. The API key may be empty; requests then fail upstream.
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            messages_path: None,
            templates_path: None,
            identity: DEFAULT_IDENTITY.to_string(),
            batch_delay: DEFAULT_BATCH_DELAY,
            llm: LlmConfig {
                api_key: SecretString::from(""),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                max_tokens: 1024,
            },
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_or("INBOX_AGENT_PORT", &lookup, defaults.port)?;
        let batch_delay_ms = parse_or(
            "INBOX_AGENT_BATCH_DELAY_MS",
            &lookup,
            defaults.batch_delay.as_millis() as u64,
        )?;
        let max_tokens = parse_or("INBOX_AGENT_MAX_TOKENS", &lookup, defaults.llm.max_tokens)?;

        let identity = lookup("INBOX_AGENT_IDENTITY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.identity);

        Ok(Self {
            port,
            messages_path: lookup("INBOX_AGENT_MESSAGES_PATH").map(PathBuf::from),
            templates_path: lookup("INBOX_AGENT_TEMPLATES_PATH").map(PathBuf::from),
            identity,
            batch_delay: Duration::from_millis(batch_delay_ms),
            llm: LlmConfig {
                api_key: SecretString::from(lookup("OPENAI_API_KEY").unwrap_or_default()),
                model: lookup("INBOX_AGENT_MODEL").unwrap_or(defaults.llm.model),
                base_url: lookup("INBOX_AGENT_LLM_BASE_URL").unwrap_or(defaults.llm.base_url),
                max_tokens,
            },
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}
