//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error; [`HandlerError`] is used for handler failures.
//! The extractor and the deduper never produce errors; everything here comes from the
//! gateway, the LLM backend, local files, or reply routing.

use llm_client::LlmError;
use thiserror::Error;

/// Top-level error for the bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Network failure or non-success status from the chat gateway.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Gateway body could not be decoded as JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Group lookup miss.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local media file could not be read.
    #[error("File error: {0}")]
    File(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors produced by handlers.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HandlerError {
    /// Neither a group nor a sender to reply to.
    #[error("Message has no reply destination")]
    NoDestination,
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BotError::Decode(e.to_string())
        } else {
            BotError::Transport(e.to_string())
        }
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
