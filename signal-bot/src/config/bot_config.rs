//! BotConfig: BaseConfig + LLM config. Use load() for env-based loading.

use anyhow::Result;
use llm_client::EnvLlmConfig;

use super::BaseConfig;

/// Bot config: BaseConfig + LLM provider settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: EnvLlmConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `number` is provided it overrides
    /// SIGNAL_NUMBER. Call validate() after load to check config before init.
    pub fn load(number: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(number)?;
        let llm = EnvLlmConfig::from_env()?;
        Ok(Self { base, llm })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.llm.validate()
    }

    pub fn signal_api_url(&self) -> &str {
        &self.base.signal_api_url
    }
    pub fn signal_number(&self) -> &str {
        &self.base.signal_number
    }
    pub fn signal_uuid(&self) -> &str {
        &self.base.signal_uuid
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
}
