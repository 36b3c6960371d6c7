//! Outgoing message routing.

use std::path::Path;
use std::sync::Arc;
use tracing::error;

use crate::core::{ChatGateway, HandlerError, Message, Result};
use crate::extract::target_label;

/// Sent when a request fails in a way the user cannot fix by rephrasing.
pub const GENERIC_ERROR: &str =
    "An error occurred while processing your request. Please try again later.";

/// Sends replies back to where a message came from: its group (resolved to the public id), else
/// the sender's number, else the sender's UUID.
///
/// Send failures are logged and swallowed; a failed group lookup drops only that reply.
#[derive(Clone)]
pub struct Replier {
    gateway: Arc<dyn ChatGateway>,
}

impl Replier {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }

    /// Resolves the recipient for replies to `message`. A group that the gateway cannot resolve
    /// is an error, as is a message with no group and no sender.
    pub async fn destination(&self, message: &Message) -> Result<String> {
        if let Some(group) = &message.group_id {
            return self.gateway.group_public_id(group).await;
        }
        message
            .source_number
            .clone()
            .or_else(|| message.source_uuid.clone())
            .ok_or_else(|| HandlerError::NoDestination.into())
    }

    /// Like [`Replier::destination`], logging the failure instead of returning it.
    async fn resolve(&self, message: &Message) -> Option<String> {
        match self.destination(message).await {
            Ok(to) => Some(to),
            Err(e) => {
                error!(
                    target = %target_label(message),
                    event_hash = %message.event_hash,
                    error = %e,
                    "Failed to resolve reply destination"
                );
                None
            }
        }
    }

    pub async fn send_text(&self, message: &Message, text: &str) {
        let Some(to) = self.resolve(message).await else {
            return;
        };
        if let Err(e) = self.gateway.send_message(&to, text).await {
            error!(target = %target_label(message), error = %e, "Failed to send message");
        }
    }

    pub async fn send_file(&self, message: &Message, path: &Path, caption: &str) {
        let Some(to) = self.resolve(message).await else {
            return;
        };
        if let Err(e) = self.gateway.send_file(&to, path, caption).await {
            error!(
                target = %target_label(message),
                file = %path.display(),
                error = %e,
                "Failed to send file"
            );
        }
    }

    pub async fn send_error(&self, message: &Message) {
        self.send_text(message, GENERIC_ERROR).await;
    }
}
