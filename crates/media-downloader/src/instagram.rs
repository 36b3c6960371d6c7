//! Instagram video download via the public web GraphQL endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::{
    extract_instagram_url, extract_shortcode, DownloadError, DownloadResult, MediaDownloader,
};

/// Web GraphQL endpoint used for post lookups.
pub const INSTAGRAM_GRAPHQL_URL: &str = "https://www.instagram.com/api/graphql";

const DOC_ID: &str = "10015901848480474";
const FRIENDLY_NAME: &str = "PolarisPostActionLoadPostQueryQuery";
const LSD: &str = "AVqbxe3J_YA";
const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 11; SAMSUNG SM-G973U) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/14.2 Chrome/87.0.4280.141 Mobile Safari/537.36";

#[derive(Deserialize, Default)]
struct GraphQlResponse {
    #[serde(default)]
    data: GraphQlData,
}

#[derive(Deserialize, Default)]
struct GraphQlData {
    #[serde(default)]
    xdt_shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Deserialize, Default)]
struct ShortcodeMedia {
    #[serde(default)]
    is_video: bool,
    #[serde(default)]
    video_url: Option<String>,
}

fn graphql_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_USER_AGENT));
    for (name, value) in [
        ("x-fb-friendly-name", FRIENDLY_NAME),
        ("x-csrftoken", "RVDUooU5MYsBbS1CNN3CzVAuEP8oHB52"),
        ("x-ig-app-id", "1217981644879628"),
        ("x-fb-lsd", LSD),
        ("x-asbd-id", "129477"),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
    ] {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

fn graphql_variables(shortcode: &str) -> String {
    serde_json::json!({
        "shortcode": shortcode,
        "fetch_comment_count": "null",
        "fetch_related_profile_media_count": "null",
        "parent_comment_count": "null",
        "child_comment_count": "null",
        "fetch_like_count": "null",
        "fetch_tagged_user_count": "null",
        "fetch_preview_comment_count": "null",
        "has_threaded_comments": "false",
        "hoisted_comment_id": "null",
        "hoisted_reply_id": "null"
    })
    .to_string()
}

/// Downloads Instagram videos into a local directory as `{shortcode}.mp4`.
#[derive(Clone)]
pub struct InstagramDownloader {
    http: reqwest::Client,
    graphql_url: String,
    download_dir: PathBuf,
}

impl InstagramDownloader {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self::with_endpoint(INSTAGRAM_GRAPHQL_URL, download_dir)
    }

    /// Uses a custom GraphQL endpoint (tests point this at a mock server).
    pub fn with_endpoint(graphql_url: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            graphql_url: graphql_url.into(),
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn fetch_video_url(&self, shortcode: &str) -> Result<String, DownloadError> {
        let variables = graphql_variables(shortcode);
        let form: [(&str, &str); 9] = [
            ("av", "0"),
            ("__d", "www"),
            ("__user", "0"),
            ("__a", "1"),
            ("lsd", LSD),
            ("fb_api_caller_class", "RelayModern"),
            ("fb_api_req_friendly_name", FRIENDLY_NAME),
            ("variables", &variables),
            ("doc_id", DOC_ID),
        ];
        let resp = self
            .http
            .post(&self.graphql_url)
            .headers(graphql_headers())
            .form(&form)
            .send()
            .await
            .map_err(|e| DownloadError::Request(e.to_string()))?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(DownloadError::Request(format!(
                "unexpected status code: {}",
                resp.status().as_u16()
            )));
        }

        let body: GraphQlResponse = resp
            .json()
            .await
            .map_err(|e| DownloadError::Request(format!("failed to decode response: {}", e)))?;
        let media = body.data.xdt_shortcode_media.unwrap_or_default();
        if !media.is_video {
            return Err(DownloadError::NotAVideo);
        }
        media
            .video_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DownloadError::Request("video URL is empty".to_string()))
    }

    async fn save(&self, video_url: &str, path: &Path) -> Result<(), DownloadError> {
        let mut resp = self
            .http
            .get(video_url)
            .send()
            .await
            .map_err(|e| DownloadError::Request(e.to_string()))?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(DownloadError::Request(format!(
                "download failed with status code: {}",
                resp.status().as_u16()
            )));
        }

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| DownloadError::Io(format!("{}: {}", path.display(), e)))?;
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| DownloadError::Request(e.to_string()))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::Io(e.to_string()))?;
        }
        file.flush().await.map_err(|e| DownloadError::Io(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MediaDownloader for InstagramDownloader {
    fn find_url(&self, text: &str) -> Option<String> {
        extract_instagram_url(text)
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str) -> DownloadResult {
        let shortcode = match extract_shortcode(url) {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "cannot parse Instagram URL");
                return DownloadResult::failed("", e);
            }
        };

        let video_url = match self.fetch_video_url(&shortcode).await {
            Ok(u) => u,
            Err(e) => {
                warn!(shortcode = %shortcode, error = %e, "video lookup failed");
                return DownloadResult::failed(shortcode, e);
            }
        };

        let path = self.download_dir.join(format!("{}.mp4", shortcode));
        if let Err(e) = self.save(&video_url, &path).await {
            warn!(shortcode = %shortcode, error = %e, "video download failed");
            // Drop the partial file; a missing file is fine.
            let _ = tokio::fs::remove_file(&path).await;
            return DownloadResult::failed(shortcode, e);
        }

        info!(shortcode = %shortcode, path = %path.display(), "Instagram video saved");
        DownloadResult::saved(shortcode, path)
    }
}
