//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider};
use crate::error::LlmError;

const PROVIDER: &str = "openai";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for any endpoint speaking the `/chat/completions` protocol.
pub struct OpenAiProvider {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, messages = request.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Completion request rejected");
            return Err(status_error(status, error_text, retry_after));
        }

        let text = response.text().await.map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        })?;
        parse_chat_response(&text)
    }
}

/// Map a non-success status to an error, keeping the response body as-is.
fn status_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthFailed {
            provider: PROVIDER.to_string(),
            reason: body,
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after,
            reason: body,
        },
        _ => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("({status}) {body}"),
        },
    }
}

fn parse_chat_response(text: &str) -> Result<CompletionResponse, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(text)?;
    let usage = parsed.usage.unwrap_or(Usage {
        prompt_tokens: 0,
        completion_tokens: 0,
    });
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "No response content from model".to_string(),
        })?;

    Ok(CompletionResponse {
        content,
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hi Maria,"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 30}
        }"#;
        let resp = parse_chat_response(raw).unwrap();
        assert_eq!(resp.content, "Hi Maria,");
        assert_eq!(resp.input_tokens, 120);
        assert_eq!(resp.output_tokens, 30);
    }

    #[test]
    fn empty_choices_is_invalid_response() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
    }

    #[test]
    fn malformed_body_is_json_error() {
        assert!(matches!(
            parse_chat_response("not json"),
            Err(LlmError::Json(_))
        ));
    }

    #[test]
    fn quota_status_maps_to_rate_limited() {
        let err = status_error(
            StatusCode::TOO_MANY_REQUESTS,
            "You exceeded your current quota".into(),
            Some(Duration::from_secs(20)),
        );
        match err {
            LlmError::RateLimited {
                retry_after,
                reason,
                ..
            } => {
                assert_eq!(retry_after, Some(Duration::from_secs(20)));
                assert_eq!(reason, "You exceeded your current quota");
            }
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn auth_statuses_map_to_auth_failed() {
        let body = "Incorrect API key provided: sk-***";
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            match status_error(status, body.into(), None) {
                LlmError::AuthFailed { reason, .. } => assert_eq!(reason, body),
                other => panic!("Expected AuthFailed for {status}, got {:?}", other),
            }
        }
    }

    #[test]
    fn other_status_keeps_body_verbatim() {
        let body = r#"{"error":{"message":"model overloaded"}}"#;
        match status_error(StatusCode::SERVICE_UNAVAILABLE, body.into(), None) {
            LlmError::RequestFailed { reason, .. } => assert!(reason.contains(body)),
            other => panic!("Expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let provider = OpenAiProvider::new(
            SecretString::from("sk-test"),
            "gpt-4o-mini",
            "http://localhost:8000/v1/",
        );
        assert_eq!(provider.endpoint(), "http://localhost:8000/v1/chat/completions");
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }
}
