//! # Media downloader
//!
//! Finds Instagram links in chat text and downloads the video behind them.
//!
//! - [`extract_instagram_url`] / [`extract_shortcode`]: pure URL helpers.
//! - [`MediaDownloader`]: trait the bot's `/download` handler depends on.
//! - [`InstagramDownloader`]: GraphQL lookup + streamed file download.
//!
//! Downloads never fail with `Err`; every outcome is a [`DownloadResult`].

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

mod instagram;
mod url;

pub use instagram::{InstagramDownloader, INSTAGRAM_GRAPHQL_URL};
pub use url::{extract_instagram_url, extract_shortcode};

/// Why a download failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    #[error("invalid Instagram URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("post does not contain a video")]
    NotAVideo,

    #[error("io error: {0}")]
    Io(String),
}

/// Outcome of one download attempt.
#[derive(Debug, Clone, Default)]
pub struct DownloadResult {
    /// Local path of the saved video; set only on success.
    pub file_path: Option<PathBuf>,
    /// Shortcode of the post, empty when the URL could not be parsed.
    pub video_id: String,
    pub success: bool,
    pub error: Option<DownloadError>,
}

impl DownloadResult {
    pub fn failed(video_id: impl Into<String>, error: DownloadError) -> Self {
        Self {
            file_path: None,
            video_id: video_id.into(),
            success: false,
            error: Some(error),
        }
    }

    pub fn saved(video_id: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            file_path: Some(file_path),
            video_id: video_id.into(),
            success: true,
            error: None,
        }
    }
}

/// Downloads media referenced by a URL found in chat text.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// First downloadable URL in `text`, if any.
    fn find_url(&self, text: &str) -> Option<String>;

    /// Downloads `url`. Never panics; failures are reported in the result.
    async fn download(&self, url: &str) -> DownloadResult;
}
