//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries what was sent so `after()` hooks can see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; nothing was sent.
    Stop,
    /// Stop the chain; a reply with this text (or caption) went out.
    Reply(String),
}
