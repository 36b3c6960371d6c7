//! # Prompt
//!
//! Builds the text handed to language models from an incoming chat message.
//!
//! ## Format
//!
//! - **Plain**: the user's text as-is.
//! - **With quote**: `Context (replying to): "{quoted}"` + blank line + `User message: {text}`.
//! - **Single-string providers** (no role support): system prompt + newline + prompt.
//!
//! ## Usage
//!
//! The bot's chat handler calls [`frame_with_quote`]; `llm-client` providers turn the result into
//! [`ChatMessage`]s or a single string.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

/// A single chat message, one element of an OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// System instruction used when none is configured.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Prompt used when the user only mentioned the bot and sent no text.
pub const DEFAULT_EMPTY_MENTION_PROMPT: &str =
    "The user only mentioned you with no specific question. Please greet them briefly and invite them to ask.";

/// Prefix of the quoted-context line.
pub const QUOTE_CONTEXT_PREFIX: &str = "Context (replying to): ";

/// Prefix of the user line when a quote is present.
pub const USER_MESSAGE_PREFIX: &str = "User message: ";

/// Frames `text` with the message it replies to. Without a (non-empty) quote, returns `text`.
pub fn frame_with_quote(quote: Option<&str>, text: &str) -> String {
    match quote.filter(|q| !q.is_empty()) {
        Some(q) => format!(
            "{}\"{}\"\n\n{}{}",
            QUOTE_CONTEXT_PREFIX, q, USER_MESSAGE_PREFIX, text
        ),
        None => text.to_string(),
    }
}

/// Joins a system prompt and a user prompt for providers that accept one text part.
/// An empty or blank system prompt yields the prompt alone.
pub fn join_system_prompt(system_prompt: Option<&str>, prompt: &str) -> String {
    match system_prompt.filter(|s| !s.trim().is_empty()) {
        Some(system) => format!("{}\n{}", system, prompt),
        None => prompt.to_string(),
    }
}

/// Builds the message list for role-aware providers: optional system, then the user prompt.
pub fn to_messages(system_prompt: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}
