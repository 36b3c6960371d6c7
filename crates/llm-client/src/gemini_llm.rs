//! Gemini [`LlmClient`] over the `generateContent` REST endpoint.
//!
//! Gemini gets a single text part: the system prompt and the user prompt joined by a newline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{LlmClient, LlmError};

/// Public Generative Language API base.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const PROVIDER: &str = "gemini";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// [`LlmClient`] for Google Gemini models.
#[derive(Clone)]
pub struct GeminiLlmClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
    timeout: Duration,
}

impl GeminiLlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model,
            system_prompt: None,
            timeout: Duration::from_secs(120),
        }
    }

    /// Overrides the API base (tests point this at a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// The request URL carries the API key as a query parameter; it must not reach error text.
fn request_error(e: reqwest::Error) -> LlmError {
    LlmError::Request(e.without_url().to_string())
}

#[async_trait]
impl LlmClient for GeminiLlmClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let full_prompt = prompt::join_system_prompt(self.system_prompt.as_deref(), prompt);
        info!(
            api_key = %openai_client::mask_token(&self.api_key),
            prompt_len = full_prompt.len(),
            "gemini request"
        );

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &full_prompt }],
            }],
        };
        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(request_error)?;
        if status != reqwest::StatusCode::OK {
            return Err(LlmError::Request(format!(
                "gemini error {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&bytes)
            )));
        }

        let parsed: GenerateResponse =
            serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(e.to_string()))?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse(PROVIDER.to_string()))?;

        debug!(reply_len = text.len(), "gemini reply");
        Ok(text)
    }
}
