//! Agent value objects

use serde::{Deserialize, Serialize};

/// Opaque agent identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional identifier for the agent at a panel index
    pub fn indexed(index: usize) -> Self {
        Self(format!("agent-{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId::new(s)
    }
}

/// An agent's verdict on the current shared artifact (Value Object)
///
/// This is the sole acceptance mechanism: an agent's consensus flag is
/// set only from a critique with `accepted = true`, never assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    /// Whether the agent accepts the artifact as-is
    pub accepted: bool,
    /// Feedback to fold into a revision when rejected
    pub feedback: String,
}

impl Critique {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            feedback: String::new(),
        }
    }

    pub fn reject(feedback: impl Into<String>) -> Self {
        Self {
            accepted: false,
            feedback: feedback.into(),
        }
    }

    /// JSON schema for the structured critique completion
    pub fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "accepted": { "type": "boolean" },
                "feedback": { "type": "string" }
            },
            "required": ["accepted", "feedback"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_id() {
        assert_eq!(AgentId::indexed(0).as_str(), "agent-0");
        assert_eq!(AgentId::indexed(2).to_string(), "agent-2");
    }

    #[test]
    fn test_critique_constructors() {
        assert!(Critique::accept().accepted);
        let reject = Critique::reject("missing edge case");
        assert!(!reject.accepted);
        assert_eq!(reject.feedback, "missing edge case");
    }

    #[test]
    fn test_critique_deserializes_from_schema_shape() {
        let value = serde_json::json!({"accepted": false, "feedback": "too vague"});
        let critique: Critique = serde_json::from_value(value).unwrap();
        assert!(!critique.accepted);
        assert_eq!(critique.feedback, "too vague");
    }
}
