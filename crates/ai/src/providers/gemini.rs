//! Google Gemini `generateContent` client.
//!
//! Gemini is the vendor that tends to ignore "JSON only" instructions, so a
//! trailing reminder is appended to every prompt. The reply text arrives as
//! an array of parts under `candidates[0].content.parts` which must be
//! concatenated.

use async_trait::async_trait;
use planner_core::planning::ProviderKind;
use serde::{Deserialize, Serialize};

use crate::provider::{check_status, CompletionProvider, ProviderError, TEST_PROMPT};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-pro";

/// Appended to every prompt for this vendor only.
const JSON_REMINDER: &str = "\n\nRemember: Respond with ONLY valid JSON, no markdown.";

pub struct GeminiClient {
    api_key: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn generate_content(&self, text: String) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        };

        // The API key travels as a query parameter on this API.
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let response = self.client.post(url).json(&request).send().await?;
        let response = check_status(self.kind(), response).await?;

        let body: GenerateContentResponse = response.json().await?;
        extract_text(self.kind(), body)
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_content(format!("{prompt}{JSON_REMINDER}")).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.generate_content(TEST_PROMPT.to_string()).await.map(|_| ())
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(
    provider: ProviderKind,
    body: GenerateContentResponse,
) -> Result<String, ProviderError> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::UnexpectedShape {
            provider,
            detail: "no text parts in candidate".to_string(),
        });
    }
    Ok(text)
}

// Request/response envelope types.

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
