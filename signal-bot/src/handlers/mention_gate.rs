//! Drops every message that does not address the bot.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{Handler, Message, Result};
use crate::extract::target_label;

/// Chain gate: `before` lets a message through only when the bot was mentioned.
#[derive(Clone, Default)]
pub struct MentionGate;

impl MentionGate {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for MentionGate {
    fn name(&self) -> &'static str {
        "mention_gate"
    }

    async fn before(&self, message: &Message) -> Result<bool> {
        if !message.bot_mentioned {
            debug!(event_hash = %message.event_hash, "not addressed to bot, skipping");
            return Ok(false);
        }
        info!(
            target = %target_label(message),
            clean_text = %message.clean_text,
            "step: MentionGate, bot mentioned"
        );
        Ok(true)
    }
}
