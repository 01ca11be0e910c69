//! Use cases: the orchestration logic driving the ports

pub mod agent_runner;
pub mod aggregate;
pub mod run_conversation;
pub mod run_pipeline;
