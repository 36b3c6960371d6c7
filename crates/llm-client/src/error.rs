use thiserror::Error;

/// Errors returned by [`crate::LlmClient::ask`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Transport failure, timeout, or non-success HTTP status.
    #[error("LLM request failed: {0}")]
    Request(String),

    /// The provider answered without any usable text.
    #[error("no response from {0}")]
    EmptyResponse(String),

    /// The provider's body could not be decoded.
    #[error("LLM response decode error: {0}")]
    Decode(String),
}
