//! Ports: interfaces implemented by infrastructure adapters

pub mod completion;
pub mod progress;
pub mod tool_executor;
