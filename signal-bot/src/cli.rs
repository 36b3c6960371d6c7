//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "signal-bot")]
#[command(about = "Signal group/DM assistant bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; number can override SIGNAL_NUMBER).
    Run {
        #[arg(short, long)]
        number: Option<String>,
    },
}

/// Load BotConfig from environment. If `number` is provided it overrides SIGNAL_NUMBER.
pub fn load_config(number: Option<String>) -> Result<BotConfig> {
    BotConfig::load(number)
}
