//! OpenAI-compatible completion backend adapter
//!
//! Implements the application layer's `CompletionService` port over a
//! `chat/completions`-style HTTP endpoint.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{OpenAiCompletionService, OpenAiConfig};
pub use error::OpenAiError;
