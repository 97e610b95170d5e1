/// OpenAI / Azure OpenAI chat completions client (raw HTTP via reqwest)
///
/// Endpoints:
/// - Azure:  POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version=...
/// - OpenAI: POST {base_url}/chat/completions
///
/// Both speak the same request/response format. Azure authenticates with an
/// `api-key` header and takes the model from the deployment; OpenAI uses a
/// bearer token and a `model` field in the body.
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{LlmConfig, Provider, ProviderSettings};
use crate::error::LlmError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Usage};
use crate::LlmClient;

mod defaults {
    /// Upper bound on how much of an error body ends up in `LlmError::Api`
    pub const ERROR_BODY_CHARS: usize = 500;
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// CLIENT IMPLEMENTATION
// ============================================================================

pub struct OpenAiClient {
    config: LlmConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build the outbound HTTP request for a chat completion
    fn prepare(&self, request: &ChatRequest) -> RequestBuilder {
        let model = match &self.config.settings {
            ProviderSettings::Azure { .. } => None,
            ProviderSettings::OpenAi { model, .. } => Some(model.as_str()),
        };

        let body = WireRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let builder = self.client.post(self.config.chat_url()).json(&body);

        match self.config.provider() {
            Provider::Azure => builder.header("api-key", &self.config.api_key),
            Provider::OpenAi => builder.bearer_auth(&self.config.api_key),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        let provider = self.config.provider();

        if err.is_timeout() {
            LlmError::Timeout {
                provider,
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            LlmError::Network {
                provider,
                message: err.to_string(),
            }
        }
    }
}

/// Map a non-success status to a typed error
fn status_error(
    provider: Provider,
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> LlmError {
    let message: String = body.chars().take(defaults::ERROR_BODY_CHARS).collect();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth { provider, message },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider,
            retry_after_secs,
        },
        _ => LlmError::Api {
            provider,
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull the first choice out of a decoded response
fn into_chat_response(
    provider: Provider,
    response: WireResponse,
    latency_ms: u64,
) -> Result<ChatResponse, LlmError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider,
            message: "No choices in response".to_string(),
        })?;

    let content = choice
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse {
            provider,
            message: "Empty message content".to_string(),
        })?;

    Ok(ChatResponse {
        content,
        finish_reason: choice.finish_reason,
        model: response.model,
        usage: response.usage.unwrap_or_default(),
        latency_ms,
    })
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> Provider {
        self.config.provider()
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let provider = self.config.provider();

        tracing::debug!(
            %provider,
            model = self.config.target(),
            messages = request.messages.len(),
            "Calling chat completions"
        );

        let start = Instant::now();
        let response = self
            .prepare(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();

            tracing::warn!(%provider, status = status.as_u16(), "Chat completion rejected");
            return Err(status_error(provider, status, retry_after, &body));
        }

        let wire = response
            .json::<WireResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.transport_error(e)
                } else {
                    LlmError::InvalidResponse {
                        provider,
                        message: format!("Failed to decode response: {e}"),
                    }
                }
            })?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let response = into_chat_response(provider, wire, latency_ms)?;

        tracing::debug!(
            %provider,
            model = response.model.as_deref().unwrap_or_default(),
            latency_ms = response.latency_ms,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            finish_reason = response.finish_reason.as_deref().unwrap_or_default(),
            "Chat completion received"
        );
        if response.is_truncated() {
            tracing::warn!(
                %provider,
                completion_tokens = response.usage.completion_tokens,
                "Chat completion hit max_tokens, reply is truncated"
            );
        }

        Ok(response)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn azure_config() -> LlmConfig {
        LlmConfig {
            api_key: "azure-key".into(),
            settings: ProviderSettings::Azure {
                endpoint: "https://example.openai.azure.com".into(),
                deployment: "gpt4o".into(),
                api_version: "2024-02-01".into(),
            },
            timeout: Duration::from_secs(30),
        }
    }

    fn openai_config() -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".into(),
            settings: ProviderSettings::OpenAi {
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4o-mini".into(),
            },
            timeout: Duration::from_secs(30),
        }
    }

    fn sample_request() -> ChatRequest {
        ChatRequest::new(vec![ChatMessage::system("sys"), ChatMessage::user("hello")])
            .with_temperature(0.3)
            .with_max_tokens(1500)
    }

    fn body_json(request: &reqwest::Request) -> Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_azure_request() {
        let client = OpenAiClient::new(azure_config()).unwrap();
        let request = client.prepare(&sample_request()).build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt4o/chat/completions?api-version=2024-02-01"
        );
        assert_eq!(request.headers()["api-key"], "azure-key");
        assert!(request.headers().get(header::AUTHORIZATION).is_none());

        let body = body_json(&request);
        assert!(body.get("model").is_none());
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_openai_request() {
        let client = OpenAiClient::new(openai_config()).unwrap();
        let request = client.prepare(&sample_request()).build().unwrap();

        assert_eq!(request.url().as_str(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer sk-test");
        assert_eq!(body_json(&request)["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_status_errors() {
        let err = status_error(Provider::Azure, StatusCode::UNAUTHORIZED, None, "bad key");
        assert!(matches!(err, LlmError::Auth { .. }));

        let err = status_error(Provider::Azure, StatusCode::TOO_MANY_REQUESTS, Some(12), "");
        assert!(matches!(
            err,
            LlmError::RateLimited {
                retry_after_secs: Some(12),
                ..
            }
        ));

        let long_body = "e".repeat(2000);
        let err = status_error(Provider::OpenAi, StatusCode::BAD_GATEWAY, None, &long_body);
        match err {
            LlmError::Api { status, message, .. } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), defaults::ERROR_BODY_CHARS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_choice_is_used() {
        let wire: WireResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        let response = into_chat_response(Provider::OpenAi, wire, 42).unwrap();
        assert_eq!(response.content, "first");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.total_tokens, 15);
        assert_eq!(response.latency_ms, 42);
    }

    #[test]
    fn test_empty_responses_are_invalid() {
        let wire: WireResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            into_chat_response(Provider::Azure, wire, 0),
            Err(LlmError::InvalidResponse { .. })
        ));

        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "content_filter"}]
        }))
        .unwrap();
        assert!(matches!(
            into_chat_response(Provider::Azure, wire, 0),
            Err(LlmError::InvalidResponse { .. })
        ));
    }
}
