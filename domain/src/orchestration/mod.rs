//! Orchestration domain: phases and run results

pub mod phase;
pub mod value_objects;

pub use phase::{Phase, PhaseState};
pub use value_objects::{PhaseOutcome, PipelineResult};
