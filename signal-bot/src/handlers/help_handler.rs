use async_trait::async_trait;

use super::{command_args, Replier};
use crate::core::{Handler, HandlerResponse, Message, Result};

/// Static command overview sent for `/help`.
pub const HELP_TEXT: &str = "\u{1F916} Signal Bot Commands

Available commands:
\u{2022} /download - Download an Instagram video
  \u{2022} Reply to a message containing an Instagram URL with '@bot /download'
  \u{2022} Or use '@bot /download <instagram_url>'

\u{2022} /help - Show this help message

General usage:
\u{2022} Mention @bot in any message to chat with the AI
\u{2022} The bot responds to your questions and conversations
\u{2022} When you reply to a message, the bot includes that context in its response";

/// Answers `/help` with [`HELP_TEXT`].
#[derive(Clone)]
pub struct HelpHandler {
    replier: Replier,
}

impl HelpHandler {
    pub fn new(replier: Replier) -> Self {
        Self { replier }
    }
}

#[async_trait]
impl Handler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if command_args(&message.clean_text, "/help").is_none() {
            return Ok(HandlerResponse::Continue);
        }
        self.replier.send_text(message, HELP_TEXT).await;
        Ok(HandlerResponse::Reply(HELP_TEXT.to_string()))
    }
}
