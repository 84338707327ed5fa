//! Query agent: one instruction about one message, answered by the model.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::QueryError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::prompt::{AssembledPrompt, assemble};
use crate::store::{MessageStore, TemplateStore};

/// Assembles prompts against the shared inbox and forwards them to the model.
pub struct QueryAgent {
    messages: Arc<RwLock<MessageStore>>,
    templates: Arc<TemplateStore>,
    llm: Arc<dyn LlmProvider>,
    identity: String,
    max_tokens: u32,
}

impl QueryAgent {
    pub fn new(
        messages: Arc<RwLock<MessageStore>>,
        templates: Arc<TemplateStore>,
        llm: Arc<dyn LlmProvider>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            messages,
            templates,
            llm,
            identity: identity.into(),
            max_tokens: 1024,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the prompt without calling the model.
    pub async fn prepare(
        &self,
        message_id: &str,
        instruction: &str,
    ) -> Result<AssembledPrompt, QueryError> {
        let messages = self.messages.read().await;
        let prompt = assemble(
            &*messages,
            &*self.templates,
            message_id,
            instruction,
            &self.identity,
        )?;
        Ok(prompt)
    }

    /// Assemble the prompt and return the model's response text.
    ///
    /// Model failures are returned as `QueryError::Upstream` unchanged; no
    /// retry is attempted.
    pub async fn query(&self, message_id: &str, instruction: &str) -> Result<String, QueryError> {
        let prompt = self.prepare(message_id, instruction).await?;

        info!(
            message_id = prompt.message_id,
            intent = %prompt.intent,
            model = %self.llm.model_name(),
            "Sending agent query"
        );

        let request = CompletionRequest::new(vec![ChatMessage::user(prompt.text)])
            .with_max_tokens(self.max_tokens);

        match self.llm.complete(request).await {
            Ok(response) => {
                info!(
                    message_id = prompt.message_id,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Agent query answered"
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!(message_id = prompt.message_id, error = %e, "Agent query failed upstream");
                Err(QueryError::Upstream(e))
            }
        }
    }
}
