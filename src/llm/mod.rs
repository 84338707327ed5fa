//! LLM integration for Inbox Agent.
//!
//! The agent only needs single-shot text completion, so the `LlmProvider`
//! trait is small. `OpenAiProvider` talks to any OpenAI-compatible
//! `/chat/completions` endpoint.

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if config.base_url.trim().is_empty() {
        return Err(LlmError::RequestFailed {
            provider: "openai".to_string(),
            reason: "Base URL is empty".to_string(),
        });
    }
    tracing::info!("Using OpenAI-compatible endpoint {} (model: {})", config.base_url, config.model);
    Ok(Arc::new(OpenAiProvider::new(
        config.api_key.clone(),
        &config.model,
        &config.base_url,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            api_key: secrecy::SecretString::from("sk-test"),
            model: "gpt-4o-mini".to_string(),
            base_url: base_url.to_string(),
            max_tokens: 1024,
        }
    }

    #[test]
    fn test_create_provider_constructs_without_network() {
        // The key is only checked by the server when a request is made.
        let provider = create_provider(&config(openai::DEFAULT_BASE_URL)).unwrap();
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_provider_rejects_empty_base_url() {
        assert!(create_provider(&config("  ")).is_err());
    }
}
