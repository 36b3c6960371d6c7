//! Normalized message produced by the extractor.

use serde_json::Value;
use std::sync::Arc;

use super::event::MentionSpan;

/// A quoted (replied-to) message. Only materialized when its text is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: i64,
    /// Phone number or UUID of the quoted author; `authorUuid` when `author` was empty.
    pub author: String,
    pub text: String,
}

/// One inbound message after extraction. Owned by the extraction call; holds no references into
/// the deduper or the gateway.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub source_number: Option<String>,
    pub source_uuid: Option<String>,
    pub group_id: Option<String>,
    pub raw_text: String,
    /// `raw_text` with mention spans (or the bot number) removed and whitespace normalized.
    pub clean_text: String,
    /// Mention spans in the order they were received.
    pub mentions: Vec<MentionSpan>,
    pub bot_mentioned: bool,
    pub quote: Option<Quote>,
    /// Hex digest of the raw event; set by the poll loop.
    pub event_hash: String,
    pub raw_event: Option<Arc<Value>>,
}

impl Message {
    /// Attaches the externally computed event hash and the original event.
    pub fn with_event(mut self, event_hash: impl Into<String>, raw_event: Arc<Value>) -> Self {
        self.event_hash = event_hash.into();
        self.raw_event = Some(raw_event);
        self
    }

    /// Quoted text when a quote is present.
    pub fn quote_text(&self) -> Option<&str> {
        self.quote.as_ref().map(|q| q.text.as_str())
    }
}
