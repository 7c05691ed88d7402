//! OpenAI Chat Completions client.
//!
//! Sends a system + user message pair and requests `json_object` output.
//! The reply arrives as a single text blob in `choices[0].message.content`.

use async_trait::async_trait;
use planner_core::planning::ProviderKind;
use serde::{Deserialize, Serialize};

use crate::provider::{check_status, CompletionProvider, ProviderError, TEST_PROMPT};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
/// Cheaper model used only by the connectivity self-test.
const TEST_MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str =
    "You are an expert educational content creator. Generate peer study planning sheets in JSON format.";

pub struct OpenAiClient {
    api_key: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn chat(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        let response = check_status(self.kind(), response).await?;

        let body: ChatCompletionResponse = response.json().await?;
        extract_content(self.kind(), body)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Openai
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        self.chat(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ChatCompletionRequest {
            model: TEST_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: TEST_PROMPT.to_string(),
            }],
            temperature: TEMPERATURE,
            max_tokens: 10,
            response_format: None,
        };
        self.chat(&request).await.map(|_| ())
    }
}

/// Pull the reply text out of a parsed completion response.
fn extract_content(
    provider: ProviderKind,
    body: ChatCompletionResponse,
) -> Result<String, ProviderError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::UnexpectedShape {
            provider,
            detail: "no content in response".to_string(),
        })
}

// Request/response envelope types.

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
