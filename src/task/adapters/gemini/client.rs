//! HTTP client for the Gemini `generateContent` endpoint.

use crate::config::AiConfig;
use crate::task::ports::{ProviderError, ProviderResponse, ProviderResult, TextGenerationProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini text-generation client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Builds a client from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn from_config(config: &AiConfig) -> ProviderResult<Option<Self>> {
        let Some(api_key) = config.credential() else {
            return Ok(None);
        };
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ProviderError::transport)?;
        Ok(Some(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            api_key: api_key.to_owned(),
        }))
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint,
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.api_key),
        )
    }
}

#[async_trait]
impl TextGenerationProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> ProviderResult<ProviderResponse> {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::transport(err.without_url()))?;
        let checked = check_response(response).await?;
        let text = checked
            .text()
            .await
            .map_err(|err| ProviderError::transport(err.without_url()))?;
        parse_response(&text)
    }
}

/// Maps a non-success status to [`ProviderError::Status`].
async fn check_response(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ProviderError::Status {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}

/// Extracts the first text part of every candidate.
///
/// Candidates without any text part are skipped.
fn parse_response(body: &str) -> ProviderResult<ProviderResponse> {
    let decoded: GenerateResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
    let candidates = decoded.candidates.into_iter().filter_map(|candidate| {
        candidate
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    });
    Ok(ProviderResponse::new(candidates))
}
