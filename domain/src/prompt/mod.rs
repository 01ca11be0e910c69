//! Prompt templates for every phase operation

pub mod template;

pub use template::PromptTemplate;
