//! Vendor clients, one module per provider.

pub mod claude;
pub mod gemini;
pub mod openai;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
