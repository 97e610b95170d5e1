use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{SecondsFormat, Utc};
use llm_client::{ChatMessage, ChatRequest, LlmClient};
use serde::Serialize;
use serde_json::Value as JsonValue;
use trustnet_core::AnalysisReport;

use crate::error::ApiError;
use crate::prompts;

mod defaults {
    pub const ANALYSIS_TEMPERATURE: f32 = 0.3;
    pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
    pub const CHAT_TEMPERATURE: f32 = 0.7;
    pub const CHAT_MAX_TOKENS: u32 = 800;
}

/// Assistant reply for the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub timestamp: String,
}

/// Orchestrates prompts, the completion call and reply parsing
#[derive(Clone)]
pub struct AiService {
    llm: Arc<dyn LlmClient>,
}

impl AiService {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Analyze text content for trustworthiness and risk factors
    pub async fn analyze_content(&self, text: &str, detailed: bool) -> Result<AnalysisReport, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::validation("Text content is required for analysis"));
        }

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(prompts::text_analysis_prompt(text, detailed)),
        ])
        .with_temperature(defaults::ANALYSIS_TEMPERATURE)
        .with_max_tokens(defaults::ANALYSIS_MAX_TOKENS);

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|source| ApiError::Upstream {
                context: "AI analysis failed",
                source,
            })?;

        Ok(AnalysisReport::from_llm_reply(&response.content))
    }

    /// Analyze an image for scams and manipulative content
    pub async fn analyze_image(
        &self,
        image: &[u8],
        mime_type: &str,
        detailed: bool,
    ) -> Result<AnalysisReport, ApiError> {
        if image.is_empty() {
            return Err(ApiError::validation("Image file is required"));
        }

        let data_url = format!("data:{};base64,{}", mime_type, BASE64.encode(image));

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::IMAGE_SYSTEM_PROMPT),
            ChatMessage::user_with_image(prompts::image_analysis_prompt(detailed), data_url),
        ])
        .with_temperature(defaults::ANALYSIS_TEMPERATURE)
        .with_max_tokens(defaults::ANALYSIS_MAX_TOKENS);

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|source| ApiError::Upstream {
                context: "AI image analysis failed",
                source,
            })?;

        Ok(AnalysisReport::from_llm_reply(&response.content))
    }

    /// Answer a follow-up question, optionally grounded on a previous analysis
    pub async fn chat_with_context(
        &self,
        message: &str,
        context: Option<&JsonValue>,
        history: Vec<ChatMessage>,
    ) -> Result<ChatReply, ApiError> {
        if message.trim().is_empty() {
            return Err(ApiError::validation("Message is required"));
        }

        let mut messages = vec![ChatMessage::system(prompts::ASSISTANT_SYSTEM_PROMPT)];
        if let Some(context) = context.filter(|c| !c.is_null()) {
            messages.push(ChatMessage::system(prompts::analysis_context_prompt(context)));
        }
        messages.extend(history);
        messages.push(ChatMessage::user(message));

        let request = ChatRequest::new(messages)
            .with_temperature(defaults::CHAT_TEMPERATURE)
            .with_max_tokens(defaults::CHAT_MAX_TOKENS);

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|source| ApiError::Upstream {
                context: "Chat failed",
                source,
            })?;

        Ok(ChatReply {
            message: response.content,
            timestamp: timestamp(),
        })
    }
}

/// Current time as ISO 8601 with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
