//! Tool domain: statically declared capability table and call records
//!
//! The tool surface is a fixed table built at startup. There is no
//! runtime reflection: each tool declares its name, description, and
//! typed parameter list up front, and dispatch is an exact name match.

pub mod entities;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult};
