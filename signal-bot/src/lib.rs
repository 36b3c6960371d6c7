//! # Signal bot
//!
//! Polls a signal-cli REST gateway, deduplicates redelivered events, extracts messages that
//! address the bot, and answers them through a handler chain (`/help`, `/download`, LLM chat).

pub mod chain;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod dedup;
pub mod extract;
pub mod handlers;
pub mod mention;
pub mod runner;
pub mod signal;

pub use cli::{load_config, Cli, Commands};

pub use core::{
    init_tracing, BotError, ChatGateway, Handler, HandlerError, HandlerResponse, MentionSpan,
    Message, Quote, Result,
};

pub use chain::HandlerChain;
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig};
pub use dedup::{Deduper, DEDUP_TTL};
pub use extract::{event_hash, extract, target_label, BotIdentity};
pub use runner::{run_bot, EventOutcome, SignalBot};
pub use signal::SignalClient;
