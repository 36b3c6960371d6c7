//! Poll loop and process lifecycle.

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::core::{init_tracing, HandlerResponse};
use crate::extract::{event_hash, extract};

/// What happened to one received event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Already handled within the dedup window.
    Duplicate,
    /// Ran through the handler chain.
    Handled(HandlerResponse),
    /// The handler chain returned an error (logged).
    Failed,
}

/// SignalBot: components, handler chain, and poll interval.
pub struct SignalBot {
    components: BotComponents,
    handler_chain: HandlerChain,
    poll_interval: Duration,
}

impl SignalBot {
    /// Creates a bot with the standard handler chain.
    pub fn new(components: BotComponents, poll_interval: Duration) -> Self {
        let handler_chain = build_handler_chain(&components);
        Self::with_handler_chain(components, handler_chain, poll_interval)
    }

    pub fn with_handler_chain(
        components: BotComponents,
        handler_chain: HandlerChain,
        poll_interval: Duration,
    ) -> Self {
        Self {
            components,
            handler_chain,
            poll_interval,
        }
    }

    pub fn components(&self) -> &BotComponents {
        &self.components
    }

    /// Hash → dedup → extract → handler chain for one raw event.
    pub async fn handle_event(&self, event: Value) -> EventOutcome {
        let hash = event_hash(&event);
        if self.components.deduper.seen(&hash) {
            debug!(event_hash = %hash, "skipping duplicate");
            return EventOutcome::Duplicate;
        }

        let identity = &self.components.identity;
        let message =
            extract(&event, &identity.number, &identity.uuid).with_event(hash, Arc::new(event));

        match self.handler_chain.handle(&message).await {
            Ok(response) => EventOutcome::Handled(response),
            Err(e) => {
                error!(event_hash = %message.event_hash, error = %e, "Handler chain failed");
                EventOutcome::Failed
            }
        }
    }

    /// Receives one batch and handles its events in order. A receive failure is logged and the
    /// batch skipped. Returns the outcome of each received event.
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> Vec<EventOutcome> {
        let events = match self.components.gateway.receive_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Error receiving events");
                return Vec::new();
            }
        };
        if !events.is_empty() {
            debug!(count = events.len(), "received batch");
        }

        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.handle_event(event).await);
        }
        outcomes
    }

    /// Polls every `poll_interval` until `shutdown` becomes true. A batch in progress always
    /// finishes before shutdown is observed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow() {
            return;
        }
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(poll_interval = ?self.poll_interval, "Poll loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Poll loop stopped");
    }
}

/// Resolves on ctrl-c, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Main entry: validate config, init logging, build components, then poll until ctrl-c/SIGTERM.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(Some(config.log_file()))?;

    info!(
        number = %config.signal_number(),
        bot_name = ?config.base.bot_name,
        provider = %config.llm.provider,
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let bot = Arc::new(SignalBot::new(components, config.base.poll_interval));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_bot = bot.clone();
    let poll_loop = tokio::spawn(async move { loop_bot.run(shutdown_rx).await });

    info!("Bot started successfully");
    shutdown_signal().await;
    info!("Shutdown signal received, stopping");

    let _ = shutdown_tx.send(true);
    bot.components().deduper.stop();
    poll_loop.await.context("poll loop task panicked")?;

    info!("Bot stopped");
    Ok(())
}
