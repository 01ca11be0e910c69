//! Completion service port
//!
//! Defines the interface for the external text-generation backend.
//! Adapters live in the infrastructure layer; tests use a scripted
//! fake. Each call is one blocking round trip: no caching, no
//! idempotency key, no in-core retry.

use async_trait::async_trait;
use concord_domain::{Message, Model, ToolCall, ToolSpec};
use thiserror::Error;

/// Errors that can occur during completion service operations
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Transport, auth, or rate-limit failure from the backend
    #[error("Service error: {0}")]
    Service(String),

    /// Structured response did not conform to the requested schema
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,
}

impl CompletionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }
}

/// One logical completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model to query
    pub model: Model,
    /// System prompt
    pub system: String,
    /// User prompt
    pub user: String,
    /// How many independent candidates to request in this one call
    pub candidate_count: usize,
}

impl CompletionRequest {
    pub fn new(model: Model, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model,
            system: system.into(),
            user: user.into(),
            candidate_count: 1,
        }
    }

    /// Request several independent candidates for the same prompt
    pub fn with_candidates(mut self, count: usize) -> Self {
        self.candidate_count = count.max(1);
        self
    }
}

/// A tool-enabled model turn: either plain text or one tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    Text(String),
    ToolCall(ToolCall),
}

/// Port for the external completion backend
///
/// Identical prompts issued twice produce independent, possibly
/// divergent results; candidates within one call are interchangeable
/// and returned in backend order.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Request `candidate_count` independent completions for one prompt
    async fn complete(&self, request: CompletionRequest) -> Result<Vec<String>, CompletionError>;

    /// Request exactly one completion constrained to parse into `schema`
    async fn complete_structured(
        &self,
        request: CompletionRequest,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, CompletionError>;

    /// Send a conversation history with tool specifications; the model
    /// replies with text or one tool call
    async fn complete_with_tools(
        &self,
        model: &Model,
        history: &[Message],
        tools: &ToolSpec,
    ) -> Result<ModelTurn, CompletionError>;
}

/// Convenience: one completion, first candidate
pub async fn complete_one(
    service: &dyn CompletionService,
    request: CompletionRequest,
) -> Result<String, CompletionError> {
    let mut candidates = service.complete(request).await?;
    if candidates.is_empty() {
        return Err(CompletionError::Service(
            "backend returned no candidates".to_string(),
        ));
    }
    Ok(candidates.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_count_floor() {
        let request = CompletionRequest::new(Model::default(), "s", "u").with_candidates(0);
        assert_eq!(request.candidate_count, 1);
    }

    #[test]
    fn test_error_display() {
        let error = CompletionError::Service("rate limited".to_string());
        assert_eq!(error.to_string(), "Service error: rate limited");
        assert!(!error.is_cancelled());
        assert!(CompletionError::Cancelled.is_cancelled());
    }
}
