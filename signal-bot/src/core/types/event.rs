//! Inbound event schema as delivered by the signal-cli REST gateway.
//!
//! Every field is optional and every field decodes leniently: a value of the wrong JSON type
//! becomes the field's default instead of failing the whole envelope. Decoding an [`Envelope`]
//! from any [`serde_json::Value`] therefore never fails; malformed data only shows up as
//! absent fields.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decodes `T` from whatever JSON is present, falling back to `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Integer fields may arrive as JSON integers, floats (`4.0`), or numeric strings.
fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// One element of the `/v1/receive` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeWrapper {
    #[serde(default)]
    pub envelope: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<String>,
}

/// One inbound delivery unit. May or may not carry an actual data message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    pub source_number: Option<String>,
    /// Generic source; either a phone number or a UUID depending on the sender's privacy settings.
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source_uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub data_message: Option<DataMessage>,
    /// Bare text fragment carried by some alternate event shapes that have no `dataMessage`.
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

impl Envelope {
    /// Best-effort decode of a raw event. Non-object values yield an empty envelope.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub mentions: Vec<MentionSpan>,
    #[serde(default, deserialize_with = "lenient")]
    pub group_info: Option<GroupInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub quote: Option<QuotePayload>,
}

/// Keeps every decodable element of an array; drops the rest.
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub group_id: Option<String>,
}

/// Positional `@`-reference inside the message text. `start` and `length` count Unicode code
/// points, not bytes, and are taken as received (possibly negative, overlapping, unordered).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub start: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub length: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uuid: Option<String>,
}

impl MentionSpan {
    pub fn new(start: i64, length: i64) -> Self {
        Self {
            start,
            length,
            number: None,
            uuid: None,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}

/// Quoted-message reference as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author_uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}
