//! Configuration loading and validation

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileModelsConfig, FileOutputConfig, FilePipelineConfig,
    FileServiceConfig, Severity,
};
pub use loader::ConfigLoader;
