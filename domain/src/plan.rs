//! Plan steps and tolerant parsing of structured model output
//!
//! The planning phase asks the backend for a JSON plan. Models wrap
//! JSON in markdown fences or prefix it with prose often enough that
//! the parser extracts the first JSON value it can find before
//! deserializing.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// One step of an execution plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// What this step accomplishes
    pub description: String,
    /// The method or technique used
    pub method: String,
    /// What the step needs as input
    pub required_input: String,
    /// What the step is expected to produce
    pub expected_output: String,
}

impl PlanStep {
    pub fn new(
        description: impl Into<String>,
        method: impl Into<String>,
        required_input: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            method: method.into(),
            required_input: required_input.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// An ordered sequence of plan steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Render the plan as numbered text for embedding in prompts
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}\n   Method: {}\n   Input: {}\n   Output: {}\n",
                i + 1,
                step.description,
                step.method,
                step.required_input,
                step.expected_output
            ));
        }
        out
    }

    /// JSON schema for the structured planning completion
    pub fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "steps": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": { "type": "string" },
                            "method": { "type": "string" },
                            "required_input": { "type": "string" },
                            "expected_output": { "type": "string" }
                        },
                        "required": ["description", "method", "required_input", "expected_output"]
                    }
                }
            },
            "required": ["steps"]
        })
    }
}

/// Extract the first JSON value embedded in free-form model output.
///
/// Handles raw JSON, ```json fenced blocks, and JSON preceded or
/// followed by prose. Returns `None` when nothing parses.
pub fn extract_json_value(response: &str) -> Option<serde_json::Value> {
    // Fast path: the whole response is JSON
    if let Ok(value) = serde_json::from_str(response.trim()) {
        return Some(value);
    }

    // Fenced block
    if let Some(start) = response.find("```") {
        let after = &response[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```")
            && let Ok(value) = serde_json::from_str(after[..end].trim())
        {
            return Some(value);
        }
    }

    // First balanced-looking object or array in the text
    for open in ['{', '['] {
        let close = if open == '{' { '}' } else { ']' };
        if let Some(start) = response.find(open)
            && let Some(end) = response.rfind(close)
            && end > start
            && let Ok(value) = serde_json::from_str(&response[start..=end])
        {
            return Some(value);
        }
    }

    None
}

/// Parse a plan from a structured completion value
pub fn parse_plan(value: &serde_json::Value) -> Result<Plan, DomainError> {
    let plan: Plan = serde_json::from_value(value.clone())
        .map_err(|e| DomainError::InvalidPlan(e.to_string()))?;
    if plan.is_empty() {
        return Err(DomainError::InvalidPlan("plan has no steps".to_string()));
    }
    Ok(plan)
}
