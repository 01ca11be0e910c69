//! Domain layer for concord
//!
//! This crate contains the core entities and value objects for the
//! phase/consensus orchestration harness. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Phases
//!
//! A run moves through a fixed sequence of problem-solving phases:
//! understanding, representation, planning, execution, verification,
//! and compilation. Phases never reopen once completed.
//!
//! ## Consensus
//!
//! Within a phase, a panel of agents critiques a single shared
//! artifact. An agent's `consensus` flag is only meaningful for the
//! artifact version it last saw: any revision resets every flag.

pub mod agent;
pub mod artifact;
pub mod core;
pub mod orchestration;
pub mod plan;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    entities::AgentState,
    value_objects::{AgentId, Critique},
};
pub use artifact::Artifact;
pub use self::core::{error::DomainError, model::Model, problem::Problem};
pub use orchestration::{
    phase::{Phase, PhaseState},
    value_objects::{PhaseOutcome, PipelineResult},
};
pub use plan::{Plan, PlanStep, extract_json_value, parse_plan};
pub use prompt::PromptTemplate;
pub use session::entities::{Message, Role};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
