//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (one prompt in, one reply out) and two providers:
//! [`GeminiLlmClient`] (Google Generative Language REST API) and [`OpenAILlmClient`]
//! (any OpenAI-compatible endpoint, e.g. OpenRouter). [`build_llm_client`] picks one from
//! [`EnvLlmConfig`].

use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};

mod config;
mod error;
mod gemini_llm;
mod openai_llm;

pub use config::{build_llm_client, parse_duration, EnvLlmConfig, LlmProvider};
pub use error::LlmError;
pub use gemini_llm::{GeminiLlmClient, GEMINI_BASE_URL};
pub use openai_llm::OpenAILlmClient;

/// LLM client interface. Implementations prepend their configured system prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for logs.
    fn provider(&self) -> &'static str;

    /// Returns the model's reply to `prompt`, trimmed.
    ///
    /// A blank reply is [`LlmError::EmptyResponse`].
    async fn ask(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
    let content = msg.content.clone();
    let built: Result<ChatCompletionRequestMessage, _> = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map(Into::into),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map(Into::into),
    };
    built.map_err(|e| LlmError::Request(format!("build message: {}", e)))
}
