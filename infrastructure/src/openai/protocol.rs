//! Wire types for the `chat/completions` endpoint
//!
//! Request and response structures for an OpenAI-compatible API,
//! plus the conversions between domain types and the wire format.
//! Argument payloads for tool calls arrive as a JSON string per the
//! OpenAI convention and are parsed here.

use concord_application::ModelTurn;
use concord_domain::{Message, Role, ToolCall, ToolSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A chat message on the wire
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

/// Constraint asking the backend for a JSON object response
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

/// A tool declaration on the wire
#[derive(Debug, Clone, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Build the `tools` array from the declared tool table
pub fn tools_from_spec(spec: &ToolSpec) -> Vec<WireTool> {
    let mut tools: Vec<WireTool> = spec
        .all()
        .map(|def| {
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for param in &def.parameters {
                properties.insert(
                    param.name.clone(),
                    serde_json::json!({
                        "type": param.param_type,
                        "description": param.description,
                    }),
                );
                if param.required {
                    required.push(serde_json::Value::String(param.name.clone()));
                }
            }
            WireTool {
                tool_type: "function",
                function: WireFunction {
                    name: def.name.clone(),
                    description: def.description.clone(),
                    parameters: serde_json::json!({
                        "type": "object",
                        "properties": properties,
                        "required": required,
                    }),
                },
            }
        })
        .collect();
    // HashMap iteration order is arbitrary; keep the wire stable.
    tools.sort_by(|a, b| a.function.name.cmp(&b.function.name));
    tools
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireToolCall {
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON object encoded as a string, per the OpenAI convention
    pub arguments: String,
}

impl ChoiceMessage {
    /// Interpret the first choice as a model turn. A tool call wins
    /// over any accompanying text.
    pub fn into_turn(self) -> Result<ModelTurn, String> {
        if let Some(wire_call) = self.tool_calls.into_iter().next() {
            let arguments: HashMap<String, serde_json::Value> =
                serde_json::from_str(&wire_call.function.arguments)
                    .map_err(|e| format!("invalid tool arguments: {e}"))?;
            return Ok(ModelTurn::ToolCall(ToolCall {
                tool_name: wire_call.function.name,
                arguments,
            }));
        }
        match self.content {
            Some(content) => Ok(ModelTurn::Text(content)),
            None => Err("choice carried neither content nor a tool call".to_string()),
        }
    }
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
