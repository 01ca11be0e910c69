//! Error types for the OpenAI-compatible adapter

use concord_application::CompletionError;
use thiserror::Error;

/// Errors that can occur when communicating with the completion backend
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No API key: set CONCORD_API_KEY or configure service.api_key")]
    MissingApiKey,

    #[error("Backend returned no choices")]
    EmptyResponse,

    #[error("Failed to parse structured response: {error}\nRaw response: {raw}")]
    Parse { error: String, raw: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<OpenAiError> for CompletionError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::Http(e) if e.is_timeout() => CompletionError::Timeout,
            OpenAiError::Parse { error, raw } => {
                CompletionError::SchemaParse(format!("{error} (raw: {raw})"))
            }
            other => CompletionError::Service(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_service() {
        let error = OpenAiError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        let mapped: CompletionError = error.into();
        assert!(matches!(mapped, CompletionError::Service(_)));
        assert!(mapped.to_string().contains("429"));
    }

    #[test]
    fn test_parse_error_maps_to_schema_parse() {
        let error = OpenAiError::Parse {
            error: "expected object".to_string(),
            raw: "not json".to_string(),
        };
        let mapped: CompletionError = error.into();
        assert!(matches!(mapped, CompletionError::SchemaParse(_)));
    }
}
