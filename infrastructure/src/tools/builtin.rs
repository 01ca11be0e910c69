//! Builtin tools available to the conversation variant
//!
//! The tool table is fixed at startup: every tool is declared here
//! with its name, description, and parameter schema, and nothing is
//! registered dynamically at runtime.

use chrono::Utc;
use concord_domain::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec};

pub const CURRENT_TIME: &str = "current_time";
pub const WORD_COUNT: &str = "word_count";

/// The default statically declared tool table
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(current_time_definition())
        .register(word_count_definition())
}

fn current_time_definition() -> ToolDefinition {
    ToolDefinition::new(
        CURRENT_TIME,
        "Get the current date and time in UTC, RFC 3339 formatted.",
    )
}

fn word_count_definition() -> ToolDefinition {
    ToolDefinition::new(WORD_COUNT, "Count the words in a piece of text.").with_parameter(
        ToolParameter::new("text", "The text to count words in", true).with_type("string"),
    )
}

pub fn execute_current_time(call: &ToolCall) -> Result<ToolResult, ToolError> {
    let _ = call;
    Ok(ToolResult::new(
        CURRENT_TIME,
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    ))
}

pub fn execute_word_count(call: &ToolCall) -> Result<ToolResult, ToolError> {
    let text = call
        .require_string("text")
        .map_err(|message| ToolError::invalid_arguments(WORD_COUNT, message))?;
    let count = text.split_whitespace().count();
    Ok(ToolResult::new(WORD_COUNT, count.to_string()))
}
