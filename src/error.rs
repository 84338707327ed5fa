//! Error types for Inbox Agent.

use std::time::Duration;

use crate::pipeline::intent::Intent;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading the message or template data source.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate message id {id}")]
    DuplicateId { id: i64 },

    #[error("No template bound for intent {intent}")]
    MissingTemplate { intent: Intent },
}

/// Failures at the prompt assembly boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Could not locate email content for ID {id}")]
    NotFound { id: String },

    #[error("No prompt template found for intent {intent}")]
    TemplateMissing { intent: Intent },
}

/// LLM provider errors.
///
/// Upstream failure text is carried in `reason` untouched.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rejected credentials: {reason}")]
    AuthFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited: {reason}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
        reason: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error returned by a single agent query: either the prompt could not be
/// assembled, or the model call failed.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Upstream(#[from] LlmError),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
