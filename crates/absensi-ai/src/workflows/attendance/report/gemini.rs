use crate::config::GeminiConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to reach the text generation service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("text generation service rejected the request (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("could not encode the report prompt: {0}")]
    Prompt(#[source] serde_json::Error),
}

impl GenerationError {
    /// True when the service refused the credential rather than the request.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Seam between report assembly and the hosted model. Implementations make a
/// single non-streaming request; `Ok(None)` models a reply whose text field
/// was absent.
#[async_trait]
pub trait TextGenerationGateway: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

#[async_trait]
impl<G: TextGenerationGateway + ?Sized> TextGenerationGateway for std::sync::Arc<G> {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        (**self).generate_text(prompt).await
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// The credential is sent as-is; an empty or invalid key is only diagnosed by
/// the service itself, surfacing here as an auth-status [`GenerationError`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerationGateway for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorEnvelope>()
                .await
                .ok()
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        Ok(payload.into_text())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated part texts of the first candidate; `None` when the reply
    /// carries no text at all.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let parts = candidate.content?.parts;
        if parts.is_empty() {
            return None;
        }
        Some(
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_candidate_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r##"{"candidates":[{"content":{"parts":[{"text":"# Laporan"},{"text":" Absensi"}]}}]}"##,
        )
        .expect("response parses");
        assert_eq!(payload.into_text().as_deref(), Some("# Laporan Absensi"));
    }

    #[test]
    fn missing_candidates_yield_no_text() {
        let payload: GenerateContentResponse =
            serde_json::from_str("{}").expect("empty response parses");
        assert_eq!(payload.into_text(), None);

        let payload: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#)
                .expect("partless response parses");
        assert_eq!(payload.into_text(), None);
    }

    #[test]
    fn auth_statuses_are_recognized() {
        let forbidden = GenerationError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert!(forbidden.is_auth());

        let quota = GenerationError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(!quota.is_auth());
    }
}
