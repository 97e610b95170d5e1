//! Chat completion client for OpenAI and Azure OpenAI.
//!
//! Callers depend on the [`LlmClient`] trait; [`OpenAiClient`] is the HTTP
//! implementation, configured from the environment via [`LlmConfig`].

pub mod config;
pub mod error;
pub mod openai;
pub mod types;

use async_trait::async_trait;

pub use config::{LlmConfig, Provider, ProviderSettings};
pub use error::LlmError;
pub use openai::OpenAiClient;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent, MessageRole,
    Usage,
};

/// A text (and vision) capable chat completion endpoint
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Run one completion and return the first choice. No retries.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}
