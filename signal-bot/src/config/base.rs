//! Base config: signal-cli gateway connection, bot identity, polling, logging, downloads.
//! Loaded from env.

use anyhow::{bail, Context, Result};
use llm_client::parse_duration;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::mention::looks_like_phone;

const DEFAULT_API_URL: &str = "http://localhost:8089";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Base config: everything except the LLM provider.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// SIGNAL_API_URL
    pub signal_api_url: String,
    /// SIGNAL_NUMBER: the bot's registered phone number
    pub signal_number: String,
    /// SIGNAL_UUID: the bot's account UUID, for mentions that carry only a UUID
    pub signal_uuid: String,
    /// BOT_NAME, display only
    pub bot_name: Option<String>,
    pub poll_interval: Duration,
    pub log_file: String,
    /// Where `/download` saves videos before sending them
    pub download_dir: PathBuf,
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl BaseConfig {
    /// Load from environment variables. `number` overrides SIGNAL_NUMBER if provided.
    pub fn load(number: Option<String>) -> Result<Self> {
        let signal_number = number
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| env_non_empty("SIGNAL_NUMBER"))
            .context("SIGNAL_NUMBER not set")?;
        let signal_api_url = env_non_empty("SIGNAL_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let poll_interval = match env_non_empty("POLL_INTERVAL") {
            Some(v) => parse_duration(&v).context("POLL_INTERVAL is not a valid duration")?,
            None => DEFAULT_POLL_INTERVAL,
        };

        Ok(Self {
            signal_api_url,
            signal_number,
            signal_uuid: env_non_empty("SIGNAL_UUID").unwrap_or_default(),
            bot_name: env_non_empty("BOT_NAME"),
            poll_interval,
            log_file: env_non_empty("LOG_FILE")
                .unwrap_or_else(|| "logs/signal-bot.log".to_string()),
            download_dir: env_non_empty("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Validate config: the gateway URL must parse and the number must look like a phone number.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.signal_api_url).is_err() {
            bail!("SIGNAL_API_URL is not a valid URL: {}", self.signal_api_url);
        }
        if !looks_like_phone(&self.signal_number) {
            bail!(
                "SIGNAL_NUMBER must be a phone number like +15551234567, got '{}'",
                self.signal_number
            );
        }
        if self.poll_interval.is_zero() {
            bail!("POLL_INTERVAL must be greater than zero");
        }
        Ok(())
    }
}
