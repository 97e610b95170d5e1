//! Chat API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use llm_client::{ChatMessage, MessageRole};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::ApiError;
use crate::routes::ApiResponse;
use crate::service::ChatReply;
use crate::AppState;

/// Body of POST /api/chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(default)]
    pub message: Option<String>,
    /// Previous `/analyze` result as the client holds it
    #[serde(default)]
    pub analysis_context: Option<JsonValue>,
    #[serde(default)]
    pub conversation_history: Option<Vec<HistoryEntry>>,
}

/// One earlier turn of the conversation
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        ChatMessage::new(entry.role, entry.content)
    }
}

/// POST /api/chat
/// Answers a question about a previous analysis
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatReply>>, ApiError> {
    let Json(payload) = payload?;

    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Message is required"))?;

    let history: Vec<ChatMessage> = payload
        .conversation_history
        .unwrap_or_default()
        .into_iter()
        .map(Into::into)
        .collect();

    let reply = state
        .ai
        .chat_with_context(&message, payload.analysis_context.as_ref(), history)
        .await?;

    Ok(Json(ApiResponse::ok(reply)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use llm_client::MessageRole;
    use serde_json::json;

    use crate::routes::test_util::{app_with, json_request, send};
    use crate::service::mock::MockLlm;

    #[tokio::test]
    async fn test_chat_success() {
        let mock = Arc::new(MockLlm::replying("The link points to a lookalike domain."));
        let request = json_request(
            "/api/chat",
            json!({
                "message": "Why is the score so high?",
                "analysisContext": {
                    "riskScore": 85,
                    "trustLevel": "low",
                    "confidence": "high",
                    "analysis": {"summary": "Phishing email", "factors": []}
                },
                "conversationHistory": [
                    {"role": "user", "content": "Is this email real?"},
                    {"role": "assistant", "content": "It shows signs of phishing."}
                ]
            }),
        );

        let (status, body) = send(app_with(&mock), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["message"], "The link points to a lookalike domain.");
        assert!(body["data"]["timestamp"].is_string());

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.messages.len(), 5);
        assert!(sent.messages[1].text().contains("Risk Score: 85"));
        assert_eq!(sent.messages[3].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_chat_null_context() {
        let mock = Arc::new(MockLlm::replying("Hi!"));
        let request = json_request("/api/chat", json!({"message": "Hello", "analysisContext": null}));

        let (status, _) = send(app_with(&mock), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mock.last_request().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_chat_requires_message() {
        for payload in [json!({}), json!({"message": "   "})] {
            let mock = Arc::new(MockLlm::replying("unused"));
            let (status, body) = send(app_with(&mock), json_request("/api/chat", payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["message"], "Message is required");
            assert_eq!(mock.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_chat_rejects_unknown_role() {
        let mock = Arc::new(MockLlm::replying("unused"));
        let request = json_request(
            "/api/chat",
            json!({
                "message": "Hello",
                "conversationHistory": [{"role": "bot", "content": "Hi there"}]
            }),
        );

        let (status, body) = send(app_with(&mock), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure() {
        let mock = Arc::new(MockLlm::failing());
        let request = json_request("/api/chat", json!({"message": "Hello"}));

        let (status, body) = send(app_with(&mock), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Chat failed: "));
    }
}
