//! Bot configuration: BaseConfig (gateway + polling + log + downloads) + LLM config.

mod base;
mod bot_config;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
