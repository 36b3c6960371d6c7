use reqwest::Url;

use crate::DownloadError;

const INSTAGRAM_HOST: &str = "instagram.com";

/// First whitespace-separated word containing `instagram.com`, with trailing `.,!?;` removed.
pub fn extract_instagram_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|word| word.contains(INSTAGRAM_HOST))
        .map(|word| {
            word.trim_end_matches(['.', ',', '!', '?', ';'])
                .to_string()
        })
}

/// Post shortcode from an Instagram URL.
///
/// `/p/X`, `/reel/X` and `/reels/X` give `X`; any other path gives its first segment. A missing
/// scheme is treated as `https://`.
pub fn extract_shortcode(url: &str) -> Result<String, DownloadError> {
    let with_scheme = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };
    let parsed = Url::parse(&with_scheme)
        .map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", url, e)))?;
    let host = parsed.host_str().unwrap_or_default();
    if !host.contains(INSTAGRAM_HOST) {
        return Err(DownloadError::InvalidUrl(format!(
            "domain must be instagram.com, got '{}'",
            host
        )));
    }

    let parts: Vec<&str> = parsed.path().trim_matches('/').split('/').collect();
    let code = match parts.as_slice() {
        ["p" | "reel" | "reels", code, ..] => *code,
        [first, ..] => *first,
        [] => "",
    };
    if code.is_empty() {
        return Err(DownloadError::InvalidUrl(format!(
            "could not extract shortcode from {}",
            url
        )));
    }
    Ok(code.to_string())
}
