//! In-memory fakes for the bot's collaborators: gateway, LLM, media downloader.
//!
//! Every outgoing call is recorded so tests can assert on what the bot sent and where.

#![allow(dead_code)]

use async_trait::async_trait;
use llm_client::{LlmClient, LlmError};
use media_downloader::{DownloadError, DownloadResult, MediaDownloader};
use serde_json::{json, Value};
use signal_bot::{BotError, ChatGateway, Result};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const BOT_NUMBER: &str = "+15550009999";
pub const BOT_UUID: &str = "bot-uuid-0001";

/// One recorded outgoing message or attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { to: String, text: String },
    File { to: String, path: PathBuf, caption: String },
}

impl Sent {
    pub fn to(&self) -> &str {
        match self {
            Sent::Text { to, .. } | Sent::File { to, .. } => to,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Sent::Text { text, .. } => Some(text),
            Sent::File { .. } => None,
        }
    }
}

/// Gateway fake: serves queued batches, resolves groups from a map, records sends.
#[derive(Default)]
pub struct MockGateway {
    batches: Mutex<VecDeque<Result<Vec<Value>>>>,
    groups: Mutex<HashMap<String, String>>,
    sent: Mutex<Vec<Sent>>,
    fail_sends: Mutex<bool>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, events: Vec<Value>) {
        self.batches.lock().unwrap().push_back(Ok(events));
    }

    pub fn push_error(&self, error: BotError) {
        self.batches.lock().unwrap().push_back(Err(error));
    }

    pub fn add_group(&self, internal_id: &str, public_id: &str) {
        self.groups
            .lock()
            .unwrap()
            .insert(internal_id.to_string(), public_id.to_string());
    }

    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|s| s.text().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn receive_events(&self) -> Result<Vec<Value>> {
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn group_public_id(&self, internal_id: &str) -> Result<String> {
        self.groups
            .lock()
            .unwrap()
            .get(internal_id)
            .cloned()
            .ok_or_else(|| BotError::NotFound(internal_id.to_string()))
    }

    async fn send_message(&self, target: &str, text: &str) -> Result<()> {
        if *self.fail_sends.lock().unwrap() {
            return Err(BotError::Transport("send failed".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Text {
            to: target.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_file(&self, target: &str, path: &Path, caption: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::File {
            to: target.to_string(),
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// LLM fake: echoes a fixed reply (or error) and records prompts.
pub struct MockLlm {
    reply: std::result::Result<String, LlmError>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn provider(&self) -> &'static str {
        "mock"
    }

    async fn ask(&self, prompt: &str) -> std::result::Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// Downloader fake: detects Instagram URLs like the real one; on success writes a small file
/// into `dir`.
pub struct MockDownloader {
    dir: PathBuf,
    succeed: bool,
    urls: Mutex<Vec<String>>,
}

impl MockDownloader {
    pub fn new(dir: &Path, succeed: bool) -> Self {
        Self {
            dir: dir.to_path_buf(),
            succeed,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaDownloader for MockDownloader {
    fn find_url(&self, text: &str) -> Option<String> {
        media_downloader::extract_instagram_url(text)
    }

    async fn download(&self, url: &str) -> DownloadResult {
        self.urls.lock().unwrap().push(url.to_string());
        if !self.succeed {
            return DownloadResult::failed("X", DownloadError::NotAVideo);
        }
        let path = self.dir.join("X.mp4");
        std::fs::write(&path, b"video").unwrap();
        DownloadResult::saved("X", path)
    }
}

/// A direct message event from `source` with optional mention spans.
pub fn dm_event(source: &str, text: &str, mentions: Value) -> Value {
    json!({
        "source": source,
        "sourceNumber": source,
        "timestamp": 1700000000000_i64,
        "dataMessage": {
            "message": text,
            "mentions": mentions,
        }
    })
}

/// A group message event that mentions the bot at offset 0 with a one-char placeholder.
pub fn group_mention_event(group_id: &str, source: &str, after_mention: &str, ts: i64) -> Value {
    json!({
        "sourceNumber": source,
        "timestamp": ts,
        "dataMessage": {
            "message": format!("\u{FFFC} {}", after_mention),
            "mentions": [{ "start": 0, "length": 1, "number": BOT_NUMBER }],
            "groupInfo": { "groupId": group_id },
        }
    })
}
