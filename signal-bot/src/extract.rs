//! Message extraction: raw gateway event → [`Message`].
//!
//! [`extract`] never fails. Missing or malformed fields produce a less-populated message, never an
//! error. The bot-addressed decision uses mention spans when the message has any, and falls back to
//! a substring search for the bot's number otherwise.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::{Envelope, Message, Quote, QuotePayload};
use crate::mention::{
    looks_like_phone, remove_mention_spans, spans_mention_bot, strip_bot_number,
    text_mentions_bot_number,
};

/// The bot's own identity, used for mention matching.
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub number: String,
    pub uuid: String,
}

impl BotIdentity {
    pub fn new(number: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            uuid: uuid.into(),
        }
    }
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Splits the envelope's source fields into (phone number, UUID).
///
/// `sourceNumber` wins over `source` when both are phone-like. A non-phone-like source string is
/// treated as a UUID unless `sourceUuid` is already set.
fn classify_source(env: &Envelope) -> (Option<String>, Option<String>) {
    let mut number: Option<String> = None;
    let mut uuid: Option<String> = non_empty(env.source_uuid.as_ref()).map(str::to_string);

    for candidate in [env.source_number.as_ref(), env.source.as_ref()] {
        let Some(candidate) = non_empty(candidate) else {
            continue;
        };
        if looks_like_phone(candidate) {
            if number.is_none() {
                number = Some(candidate.to_string());
            }
        } else if uuid.is_none() {
            uuid = Some(candidate.to_string());
        }
    }
    (number, uuid)
}

fn materialize_quote(payload: &QuotePayload) -> Option<Quote> {
    let text = payload.text.as_deref().unwrap_or_default();
    if text.is_empty() {
        return None;
    }
    let author = match payload.author.as_deref() {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => payload.author_uuid.clone().unwrap_or_default(),
    };
    Some(Quote {
        id: payload.id,
        author,
        text: text.to_string(),
    })
}

/// Extracts a normalized [`Message`] from one raw event.
///
/// `event_hash` and `raw_event` are left empty; the poll loop attaches them with
/// [`Message::with_event`].
pub fn extract(event: &Value, bot_number: &str, bot_uuid: &str) -> Message {
    let env = Envelope::from_value(event);

    let Some(dm) = env.data_message.as_ref() else {
        let raw_text = env.message.clone().unwrap_or_default();
        return Message {
            clean_text: raw_text.trim().to_string(),
            raw_text,
            ..Default::default()
        };
    };

    let (source_number, source_uuid) = classify_source(&env);
    let group_id = dm
        .group_info
        .as_ref()
        .and_then(|g| non_empty(g.group_id.as_ref()))
        .map(str::to_string);

    let raw_text = dm.message.clone().unwrap_or_default();
    let (clean_text, bot_mentioned) = if dm.mentions.is_empty() {
        let trimmed = raw_text.trim();
        if text_mentions_bot_number(trimmed, bot_number) {
            (strip_bot_number(trimmed, bot_number), true)
        } else {
            (trimmed.to_string(), false)
        }
    } else {
        (
            remove_mention_spans(&raw_text, &dm.mentions),
            spans_mention_bot(&dm.mentions, bot_number, bot_uuid),
        )
    };

    Message {
        source_number,
        source_uuid,
        group_id,
        raw_text,
        clean_text,
        mentions: dm.mentions.clone(),
        bot_mentioned,
        quote: dm.quote.as_ref().and_then(materialize_quote),
        event_hash: String::new(),
        raw_event: None,
    }
}

/// Human-readable destination tag for logs: group, then number, then UUID.
pub fn target_label(message: &Message) -> String {
    if let Some(group) = &message.group_id {
        return format!("group {}", group);
    }
    if let Some(number) = &message.source_number {
        return format!("user {}", number);
    }
    if let Some(uuid) = &message.source_uuid {
        return format!("user-uuid {}", uuid);
    }
    "unknown".to_string()
}

/// Rebuilds `value` with object keys inserted in sorted order at every level.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::with_capacity(map.len());
            for key in keys {
                out.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Hex SHA-256 of the event's canonical JSON serialization (keys sorted), so two deliveries of
/// the same event hash equally regardless of key order on the wire.
pub fn event_hash(event: &Value) -> String {
    let canonical = serde_json::to_vec(&canonicalize(event)).unwrap_or_default();
    hex::encode(Sha256::digest(&canonical))
}
