//! Infrastructure layer for concord
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod openai;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileModelsConfig, FileOutputConfig,
    FilePipelineConfig, FileServiceConfig, Severity,
};
pub use openai::{OpenAiCompletionService, OpenAiConfig, OpenAiError};
pub use tools::LocalToolExecutor;
