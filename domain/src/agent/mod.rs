//! Agent domain: identity, critique results, and per-agent state

pub mod entities;
pub mod value_objects;

pub use entities::AgentState;
pub use value_objects::{AgentId, Critique};
