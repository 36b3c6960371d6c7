//! `/download`: fetch an Instagram video and send it back as an attachment.

use async_trait::async_trait;
use media_downloader::MediaDownloader;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{command_args, Replier};
use crate::core::{Handler, HandlerResponse, Message, Result};

pub const DOWNLOAD_USAGE_TEXT: &str = "To download an Instagram video:
\u{2022} Reply to a message containing an Instagram URL with '@bot /download'
\u{2022} Or use '@bot /download <instagram_url>'";

pub const DOWNLOAD_PROGRESS_TEXT: &str = "Downloading Instagram video... This may take a moment.";

pub const DOWNLOAD_FAILED_TEXT: &str =
    "Failed to download Instagram video. Please check the URL and try again.";

/// Handles `/download [url]`.
///
/// The URL comes from the command arguments, else the raw message text, else the quoted message.
#[derive(Clone)]
pub struct DownloadHandler {
    downloader: Arc<dyn MediaDownloader>,
    replier: Replier,
}

impl DownloadHandler {
    pub fn new(downloader: Arc<dyn MediaDownloader>, replier: Replier) -> Self {
        Self {
            downloader,
            replier,
        }
    }

    fn resolve_url(&self, args: &str, message: &Message) -> Option<String> {
        Some(args)
            .filter(|a| !a.is_empty())
            .and_then(|a| self.downloader.find_url(a))
            .or_else(|| self.downloader.find_url(&message.raw_text))
            .or_else(|| {
                message
                    .quote_text()
                    .and_then(|q| self.downloader.find_url(q))
            })
    }
}

#[async_trait]
impl Handler for DownloadHandler {
    fn name(&self) -> &'static str {
        "download"
    }

    #[instrument(skip(self, message), fields(event_hash = %message.event_hash))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(args) = command_args(&message.clean_text, "/download") else {
            return Ok(HandlerResponse::Continue);
        };

        let Some(url) = self.resolve_url(args, message) else {
            self.replier.send_text(message, DOWNLOAD_USAGE_TEXT).await;
            return Ok(HandlerResponse::Reply(DOWNLOAD_USAGE_TEXT.to_string()));
        };

        info!(url = %url, "step: DownloadHandler, downloading");
        self.replier.send_text(message, DOWNLOAD_PROGRESS_TEXT).await;

        let result = self.downloader.download(&url).await;
        let path = match result.file_path {
            Some(path) if result.success => path,
            _ => {
                warn!(
                    video_id = %result.video_id,
                    error = ?result.error,
                    "Instagram download failed"
                );
                self.replier.send_text(message, DOWNLOAD_FAILED_TEXT).await;
                return Ok(HandlerResponse::Reply(DOWNLOAD_FAILED_TEXT.to_string()));
            }
        };

        self.replier.send_file(message, &path, "").await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(file = %path.display(), error = %e, "Failed to remove downloaded file");
        }
        Ok(HandlerResponse::Reply(path.display().to_string()))
    }
}
