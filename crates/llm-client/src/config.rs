//! LLM configuration loaded from the environment, and provider selection.

use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::{GeminiLlmClient, LlmClient, OpenAILlmClient};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "xiaomi/mimo-v2-flash:free";
const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Which backend answers chat prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenRouter,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "gemini" => Ok(Self::Gemini),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(anyhow!("unknown LLM_PROVIDER '{}'", other)),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => f.write_str("gemini"),
            Self::OpenRouter => f.write_str("openrouter"),
        }
    }
}

/// Parses `500ms`, `5s`, `2m`, `1h`, or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let s = raw.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        bail!("invalid duration '{}'", raw);
    }
    let n: u64 = digits
        .parse()
        .with_context(|| format!("invalid duration '{}'", raw))?;
    let secs_per_unit = match unit.trim() {
        "ms" => return Ok(Duration::from_millis(n)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3600,
        other => bail!("invalid duration unit '{}' in '{}'", other, raw),
    };
    let secs = n
        .checked_mul(secs_per_unit)
        .with_context(|| format!("duration '{}' is too large", raw))?;
    Ok(Duration::from_secs(secs))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_duration(key: &str, default: Duration) -> Result<Duration> {
    match env_opt(key) {
        Some(v) => parse_duration(&v).with_context(|| format!("{} is not a valid duration", key)),
        None => Ok(default),
    }
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub provider: LlmProvider,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub openrouter_timeout: Duration,
    pub system_prompt: String,
}

impl EnvLlmConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let provider = env::var("LLM_PROVIDER")
            .unwrap_or_default()
            .parse::<LlmProvider>()?;
        Ok(Self {
            provider,
            google_api_key: env_opt("GOOGLE_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_timeout: env_duration("GEMINI_TIMEOUT", DEFAULT_LLM_TIMEOUT)?,
            openrouter_api_key: env_opt("OPENROUTER_API_KEY"),
            openrouter_base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            openrouter_model: env_or("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
            openrouter_timeout: env_duration("OPENROUTER_TIMEOUT", DEFAULT_LLM_TIMEOUT)?,
            system_prompt: env_or("SYSTEM_PROMPT", prompt::DEFAULT_SYSTEM_MESSAGE),
        })
    }

    /// API key of the selected provider, if set.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            LlmProvider::Gemini => self.google_api_key.as_deref(),
            LlmProvider::OpenRouter => self.openrouter_api_key.as_deref(),
        }
    }

    /// Fails when the selected provider has no API key.
    pub fn validate(&self) -> Result<()> {
        if self.api_key().is_none() {
            let var = match self.provider {
                LlmProvider::Gemini => "GOOGLE_API_KEY",
                LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            };
            bail!("{} not set (LLM_PROVIDER={})", var, self.provider);
        }
        Ok(())
    }
}

/// Builds the client for the configured provider.
pub fn build_llm_client(cfg: &EnvLlmConfig) -> Arc<dyn LlmClient> {
    let key = cfg.api_key().unwrap_or_default().to_string();
    let system_prompt = Some(cfg.system_prompt.clone()).filter(|s| !s.trim().is_empty());
    match cfg.provider {
        LlmProvider::Gemini => Arc::new(
            GeminiLlmClient::new(key, cfg.gemini_model.clone())
                .with_system_prompt_opt(system_prompt)
                .with_timeout(cfg.gemini_timeout),
        ),
        LlmProvider::OpenRouter => Arc::new(
            OpenAILlmClient::with_base_url(key, cfg.openrouter_base_url.clone())
                .with_model(cfg.openrouter_model.clone())
                .with_system_prompt_opt(system_prompt)
                .with_timeout(cfg.openrouter_timeout),
        ),
    }
}
