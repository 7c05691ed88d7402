//! The uniform text-completion capability all vendor clients implement.

use async_trait::async_trait;
use planner_core::planning::ProviderKind;

/// Minimal prompt sent by [`CompletionProvider::test_connection`]. Any reply
/// counts as success; the content is discarded.
pub const TEST_PROMPT: &str = r#"Respond with: {"status": "ok"}"#;

/// A text-completion capability over one LLM vendor.
///
/// Implementations hide the vendor's native request envelope and response
/// wrapping; `complete` returns the reply's raw text exactly as the vendor
/// produced it (fence stripping and validation happen downstream, uniformly).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Which vendor this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Send a fully-formed prompt and return the raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Connectivity self-test: send [`TEST_PROMPT`] and expect any successful
    /// reply. Configuration diagnostics only; not part of the generation path.
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Errors from a vendor client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The vendor returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: ProviderKind,
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The vendor replied 2xx but the response shape was not usable
    /// (no choices, no text content block, ...).
    #[error("Unexpected {provider} response: {detail}")]
    UnexpectedShape {
        provider: ProviderKind,
        detail: String,
    },
}

/// Pass a 2xx response through; turn anything else into
/// [`ProviderError::Api`] carrying the body for diagnostics.
pub(crate) async fn check_status(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            provider,
            status,
            body,
        })
    }
}
