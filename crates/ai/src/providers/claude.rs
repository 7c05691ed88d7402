//! Anthropic Messages API client.
//!
//! The reply is a content-block array; only blocks with `type == "text"`
//! carry reply text, so the array must be filtered.

use async_trait::async_trait;
use planner_core::planning::ProviderKind;
use serde::{Deserialize, Serialize};

use crate::provider::{check_status, CompletionProvider, ProviderError, TEST_PROMPT};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;

pub struct ClaudeClient {
    api_key: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl ClaudeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn send_message(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;
        let response = check_status(self.kind(), response).await?;

        let body: MessagesResponse = response.json().await?;
        extract_text_block(self.kind(), body)
    }
}

#[async_trait]
impl CompletionProvider for ClaudeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.send_message(prompt, MAX_TOKENS).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.send_message(TEST_PROMPT, 10).await.map(|_| ())
    }
}

/// First `text` block of the content array.
fn extract_text_block(
    provider: ProviderKind,
    body: MessagesResponse,
) -> Result<String, ProviderError> {
    body.content
        .into_iter()
        .find(|block| block.block_type == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| ProviderError::UnexpectedShape {
            provider,
            detail: "no text content block in response".to_string(),
        })
}

// Request/response envelope types.

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
