//! OpenAI-compatible [`LlmClient`]: wraps openai-client, prepends the system message.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use super::{chat_message_to_openai, LlmClient, LlmError};

const PROVIDER: &str = "openrouter";

/// [`LlmClient`] over any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    system_prompt: Option<String>,
    timeout: Duration,
}

impl OpenAILlmClient {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let messages = prompt::to_messages(self.system_prompt.as_deref(), prompt)
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>, _>>()?;

        let reply = tokio::time::timeout(
            self.timeout,
            self.client.chat_completion(&self.model, messages),
        )
        .await
        .map_err(|_| LlmError::Request(format!("timed out after {:?}", self.timeout)))?
        .map_err(|e| LlmError::Request(e.to_string()))?;

        let text = reply.map(|t| t.trim().to_string()).unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse(PROVIDER.to_string()));
        }
        debug!(reply_len = text.len(), "openai-compatible reply");
        Ok(text)
    }
}
