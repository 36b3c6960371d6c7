//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use llm_client::{build_llm_client, LlmClient};
use media_downloader::{InstagramDownloader, MediaDownloader};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::core::ChatGateway;
use crate::dedup::{Deduper, DEDUP_TTL};
use crate::extract::BotIdentity;
use crate::handlers::{ChatHandler, DownloadHandler, HelpHandler, MentionGate, Replier};
use crate::signal::SignalClient;

/// Collaborators shared by the poll loop and the handlers.
#[derive(Clone)]
pub struct BotComponents {
    pub gateway: Arc<dyn ChatGateway>,
    pub llm: Arc<dyn LlmClient>,
    pub downloader: Arc<dyn MediaDownloader>,
    pub deduper: Arc<Deduper>,
    pub identity: BotIdentity,
}

impl BotComponents {
    /// Assembles components from explicit collaborators and starts a deduper with
    /// [`DEDUP_TTL`]. Must be called inside a tokio runtime.
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        llm: Arc<dyn LlmClient>,
        downloader: Arc<dyn MediaDownloader>,
        identity: BotIdentity,
    ) -> Self {
        Self {
            gateway,
            llm,
            downloader,
            deduper: Arc::new(Deduper::new(DEDUP_TTL)),
            identity,
        }
    }
}

/// Builds BotComponents from config: signal-cli client, configured LLM provider, Instagram
/// downloader.
#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    std::fs::create_dir_all(&config.base.download_dir)?;

    let gateway: Arc<dyn ChatGateway> = Arc::new(SignalClient::new(
        config.signal_api_url(),
        config.signal_number(),
    ));
    let llm = build_llm_client(&config.llm);
    let downloader: Arc<dyn MediaDownloader> =
        Arc::new(InstagramDownloader::new(config.base.download_dir.clone()));

    info!(
        api_url = %config.signal_api_url(),
        provider = llm.provider(),
        download_dir = %config.base.download_dir.display(),
        "Components built"
    );

    Ok(BotComponents::new(
        gateway,
        llm,
        downloader,
        BotIdentity::new(config.signal_number(), config.signal_uuid()),
    ))
}

/// Builds the handler chain (mention gate → /help → /download → LLM chat).
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    let replier = Replier::new(components.gateway.clone());
    HandlerChain::new()
        .add_handler(Arc::new(MentionGate::new()))
        .add_handler(Arc::new(HelpHandler::new(replier.clone())))
        .add_handler(Arc::new(DownloadHandler::new(
            components.downloader.clone(),
            replier.clone(),
        )))
        .add_handler(Arc::new(ChatHandler::new(components.llm.clone(), replier)))
}
