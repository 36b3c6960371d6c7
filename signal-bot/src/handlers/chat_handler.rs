//! Default handler: forwards the message to the LLM and relays its answer.

use async_trait::async_trait;
use llm_client::LlmClient;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{Replier, GENERIC_ERROR};
use crate::core::{Handler, HandlerResponse, Message, Result};

/// Asks the LLM about every message that reaches it; always ends the chain with a reply.
#[derive(Clone)]
pub struct ChatHandler {
    llm: Arc<dyn LlmClient>,
    replier: Replier,
}

impl ChatHandler {
    pub fn new(llm: Arc<dyn LlmClient>, replier: Replier) -> Self {
        Self { llm, replier }
    }

    /// Prompt for `message`: its clean text (or a greeting request when empty), framed with the
    /// quoted message when there is one.
    pub fn build_prompt(message: &Message) -> String {
        let text = if message.clean_text.is_empty() {
            prompt::DEFAULT_EMPTY_MENTION_PROMPT
        } else {
            message.clean_text.as_str()
        };
        if let Some(quote) = &message.quote {
            debug!(author = %quote.author, quote = %quote.text, "including reply context");
        }
        prompt::frame_with_quote(message.quote_text(), text)
    }

    async fn answer(&self, message: &Message) -> Result<String> {
        let prompt = Self::build_prompt(message);
        Ok(self.llm.ask(&prompt).await?)
    }
}

#[async_trait]
impl Handler for ChatHandler {
    fn name(&self) -> &'static str {
        "chat"
    }

    #[instrument(
        skip(self, message),
        fields(event_hash = %message.event_hash, provider = self.llm.provider())
    )]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match self.answer(message).await {
            Ok(reply) => {
                info!(reply_len = reply.len(), "step: ChatHandler, LLM answered");
                self.replier.send_text(message, &reply).await;
                Ok(HandlerResponse::Reply(reply))
            }
            Err(e) => {
                error!(error = %e, "Error generating LLM response");
                self.replier.send_error(message).await;
                Ok(HandlerResponse::Reply(GENERIC_ERROR.to_string()))
            }
        }
    }
}
