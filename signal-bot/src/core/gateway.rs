//! Chat gateway abstraction.
//!
//! [`ChatGateway`] is transport-agnostic; [`crate::signal::SignalClient`] implements it over the
//! signal-cli REST API and tests substitute in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

use super::error::Result;

/// Receive and send operations the bot needs from the chat platform.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Fetches pending events in delivery order. Each event is the raw, loosely-typed envelope.
    async fn receive_events(&self) -> Result<Vec<Value>>;

    /// Resolves an internal group id (as seen on inbound events) to the id used for sending.
    /// Fails with `NotFound` when no group matches.
    async fn group_public_id(&self, internal_id: &str) -> Result<String>;

    /// Sends a text message to a recipient (group public id, phone number, or UUID).
    async fn send_message(&self, target: &str, text: &str) -> Result<()>;

    /// Sends a local file as an attachment; `caption` may be empty.
    async fn send_file(&self, target: &str, path: &Path, caption: &str) -> Result<()>;
}
