//! Application layer for concord
//!
//! Defines the ports the orchestration core depends on and the use
//! cases that drive it: the fan-out/merge aggregator, the
//! phase/consensus pipeline controller, and the two-agent role-play
//! conversation variant.

pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use ports::completion::{
    CompletionError, CompletionRequest, CompletionService, ModelTurn,
};
pub use ports::progress::{NoProgress, ProgressNotifier};
pub use ports::tool_executor::ToolExecutorPort;
pub use use_cases::aggregate::Aggregator;
pub use use_cases::agent_runner::AgentRunner;
pub use use_cases::run_conversation::{
    ConversationError, ConversationPhaseOutcome, ConversationResult, RunConversationInput,
    RunConversationUseCase,
};
pub use use_cases::run_pipeline::{
    PipelineError, RunPipelineInput, RunPipelineUseCase,
};
