//! HTTP client implementing the completion service port

use super::error::OpenAiError;
use super::protocol::{
    ApiErrorBody, ChatRequest, ChatResponse, ResponseFormat, WireMessage, tools_from_spec,
};
use async_trait::async_trait;
use concord_application::{
    CompletionError, CompletionRequest, CompletionService, ModelTurn,
};
use concord_domain::{Message, Model, ToolSpec, extract_json_value};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "CONCORD_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection settings for the completion backend
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Endpoint root, joined with `/chat/completions`
    pub base_url: String,
    /// Bearer token; falls back to `CONCORD_API_KEY` when unset
    pub api_key: Option<String>,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpenAiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// `CompletionService` adapter over an OpenAI-compatible HTTP endpoint.
///
/// No retries: transport and API failures map to port errors and
/// propagate to the caller.
pub struct OpenAiCompletionService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompletionService {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
        let api_key = config
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(OpenAiError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build from environment only (default endpoint and timeout)
    pub fn from_env() -> Result<Self, OpenAiError> {
        Self::new(OpenAiConfig::default())
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, OpenAiError> {
        debug!(model = %request.model, messages = request.messages.len(), "Sending chat request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "Backend returned an error");
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ChatResponse>().await?)
    }

    fn prompt_messages(request: &CompletionRequest) -> Vec<WireMessage> {
        vec![
            WireMessage {
                role: "system",
                content: request.system.clone(),
            },
            WireMessage {
                role: "user",
                content: request.user.clone(),
            },
        ]
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<Vec<String>, CompletionError> {
        let body = ChatRequest {
            model: request.model.as_str().to_string(),
            messages: Self::prompt_messages(&request),
            n: (request.candidate_count > 1).then_some(request.candidate_count as u32),
            response_format: None,
            tools: None,
        };

        let response = self.send(&body).await.map_err(CompletionError::from)?;
        let candidates: Vec<String> = response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect();

        if candidates.is_empty() {
            return Err(OpenAiError::EmptyResponse.into());
        }
        Ok(candidates)
    }

    async fn complete_structured(
        &self,
        request: CompletionRequest,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, CompletionError> {
        let mut messages = Self::prompt_messages(&request);
        messages.push(WireMessage {
            role: "system",
            content: format!(
                "Respond with a single JSON object conforming to this schema:\n{}",
                schema
            ),
        });

        let body = ChatRequest {
            model: request.model.as_str().to_string(),
            messages,
            n: None,
            response_format: Some(ResponseFormat::json_object()),
            tools: None,
        };

        let response = self.send(&body).await.map_err(CompletionError::from)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OpenAiError::EmptyResponse)
            .map_err(CompletionError::from)?;

        // Tolerate fenced or prose-wrapped JSON despite the
        // response_format constraint; not every backend honors it.
        extract_json_value(&content).ok_or_else(|| {
            CompletionError::from(OpenAiError::Parse {
                error: "no JSON value found in response".to_string(),
                raw: content,
            })
        })
    }

    async fn complete_with_tools(
        &self,
        model: &Model,
        history: &[Message],
        tools: &ToolSpec,
    ) -> Result<ModelTurn, CompletionError> {
        let body = ChatRequest {
            model: model.as_str().to_string(),
            messages: history.iter().map(WireMessage::from).collect(),
            n: None,
            response_format: None,
            tools: (!tools.is_empty()).then(|| tools_from_spec(tools)),
        };

        let response = self.send(&body).await.map_err(CompletionError::from)?;
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(OpenAiError::EmptyResponse)
            .map_err(CompletionError::from)?;

        message.into_turn().map_err(CompletionError::SchemaParse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_an_error() {
        let config = OpenAiConfig::default().with_base_url("http://localhost:1");
        // Explicit empty key: the env fallback must not mask it.
        let config = OpenAiConfig {
            api_key: Some("  ".to_string()),
            ..config
        };
        let result = OpenAiCompletionService::new(config);
        assert!(matches!(result, Err(OpenAiError::MissingApiKey)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = OpenAiConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
        };
        let service = OpenAiCompletionService::new(config).unwrap();
        assert_eq!(service.base_url, "http://localhost:8080/v1");
    }
}
