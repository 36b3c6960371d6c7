//! [`SignalClient`]: [`ChatGateway`] over the signal-cli REST API (`/v1/receive`, `/v1/groups`,
//! `/v2/send`).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::core::{BotError, ChatGateway, EnvelopeWrapper, Result};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(15);
const GROUPS_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_FILE_TIMEOUT: Duration = Duration::from_secs(60);

/// Quote attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingQuote {
    /// Timestamp of the quoted message.
    pub id: i64,
    pub author: String,
    pub text: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    number: &'a str,
    recipients: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    quote_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote_author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    base64_attachments: Vec<String>,
}

impl<'a> SendRequest<'a> {
    fn new(number: &'a str, target: &'a str) -> Self {
        Self {
            message: None,
            number,
            recipients: [target],
            quote_timestamp: None,
            quote_author: None,
            quote_message: None,
            base64_attachments: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct GroupEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    internal_id: String,
}

/// MIME type for an attachment, from its extension (case-insensitive).
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Decodes a `/v1/receive` body: an array of wrappers, or a single wrapper object.
fn decode_receive_body(body: &[u8]) -> Result<Vec<Value>> {
    let trimmed = String::from_utf8_lossy(body);
    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let wrappers: Vec<EnvelopeWrapper> = match serde_json::from_str(trimmed) {
        Ok(list) => list,
        Err(list_err) => match serde_json::from_str::<EnvelopeWrapper>(trimmed) {
            Ok(single) => vec![single],
            Err(_) => {
                return Err(BotError::Decode(format!(
                    "decode receive response: {}",
                    list_err
                )))
            }
        },
    };
    Ok(wrappers
        .into_iter()
        .map(|w| w.envelope)
        .filter(|e| !e.is_null())
        .collect())
}

/// Client for one registered account on a signal-cli REST gateway.
#[derive(Clone)]
pub struct SignalClient {
    http: reqwest::Client,
    base_url: String,
    number: String,
}

impl SignalClient {
    pub fn new(base_url: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            number: number.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Sends `text` to `target` as a reply to `quote`.
    pub async fn send_message_with_quote(
        &self,
        target: &str,
        text: &str,
        quote: Option<&OutgoingQuote>,
    ) -> Result<()> {
        let mut body = SendRequest::new(&self.number, target);
        body.message = Some(text);
        if let Some(q) = quote {
            debug!(author = %q.author, id = q.id, "including quote");
            body.quote_timestamp = Some(q.id);
            body.quote_author = Some(&q.author);
            body.quote_message = Some(&q.text);
        }
        self.post_send(&body, SEND_TIMEOUT).await
    }

    async fn post_send(&self, body: &SendRequest<'_>, timeout: Duration) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/v2/send", self.base_url))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        if status.as_u16() >= 300 {
            let text = resp.text().await.unwrap_or_default();
            return Err(BotError::Transport(format!(
                "send returned {}: {}",
                status.as_u16(),
                text
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for SignalClient {
    #[instrument(skip(self), fields(number = %self.number))]
    async fn receive_events(&self) -> Result<Vec<Value>> {
        let resp = self
            .http
            .get(format!("{}/v1/receive/{}", self.base_url, self.number))
            .timeout(RECEIVE_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if status != reqwest::StatusCode::OK {
            return Err(BotError::Transport(format!(
                "receive returned {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }
        let events = decode_receive_body(&body)?;
        debug!(count = events.len(), "received events");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn group_public_id(&self, internal_id: &str) -> Result<String> {
        let resp = self
            .http
            .get(format!("{}/v1/groups/{}", self.base_url, self.number))
            .timeout(GROUPS_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            return Err(BotError::Transport(format!(
                "groups returned {}: {}",
                status.as_u16(),
                text
            )));
        }
        let groups: Vec<GroupEntry> = resp.json().await?;
        groups
            .into_iter()
            .find(|g| g.internal_id == internal_id && !g.id.is_empty())
            .map(|g| g.id)
            .ok_or_else(|| {
                BotError::NotFound(format!(
                    "public group id not found for internal id: {}",
                    internal_id
                ))
            })
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn send_message(&self, target: &str, text: &str) -> Result<()> {
        self.send_message_with_quote(target, text, None).await
    }

    #[instrument(skip(self, caption))]
    async fn send_file(&self, target: &str, path: &Path, caption: &str) -> Result<()> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| BotError::File(format!("failed to read {}: {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data_uri = format!(
            "data:{};filename={};base64,{}",
            mime_for_path(path),
            filename,
            STANDARD.encode(&content)
        );
        info!(file = %filename, bytes = content.len(), "sending attachment");

        let mut body = SendRequest::new(&self.number, target);
        body.message = Some(caption).filter(|c| !c.is_empty());
        body.base64_attachments.push(data_uri);
        self.post_send(&body, SEND_FILE_TIMEOUT).await
    }
}
