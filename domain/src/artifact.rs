//! Shared phase artifacts
//!
//! Every phase works on a single shared artifact that all agents
//! critique. Most phases produce text; the planning phase carries a
//! structured [`Plan`] alongside its rendered form.

use serde::{Deserialize, Serialize};

use crate::plan::Plan;

/// The working output of a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Artifact {
    /// Free-form text (understanding, representation, execution,
    /// verification, compilation)
    Text(String),
    /// Structured plan produced by the planning phase
    Plan(Plan),
}

impl Artifact {
    /// Render the artifact as prompt-embeddable text
    pub fn render(&self) -> String {
        match self {
            Artifact::Text(text) => text.clone(),
            Artifact::Plan(plan) => plan.render(),
        }
    }

    pub fn as_plan(&self) -> Option<&Plan> {
        match self {
            Artifact::Plan(plan) => Some(plan),
            Artifact::Text(_) => None,
        }
    }
}

impl From<String> for Artifact {
    fn from(text: String) -> Self {
        Artifact::Text(text)
    }
}

impl From<&str> for Artifact {
    fn from(text: &str) -> Self {
        Artifact::Text(text.to_string())
    }
}

impl From<Plan> for Artifact {
    fn from(plan: Plan) -> Self {
        Artifact::Plan(plan)
    }
}
