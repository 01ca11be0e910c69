//! Input and error types for the pipeline use case

use crate::ports::completion::CompletionError;
use concord_domain::{DomainError, Model, Problem};
use thiserror::Error;

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No agents configured for the pipeline")]
    NoAgents,

    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            PipelineError::Cancelled | PipelineError::Completion(CompletionError::Cancelled)
        )
    }
}

impl From<DomainError> for PipelineError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Cancelled => PipelineError::Cancelled,
            DomainError::NoAgents => PipelineError::NoAgents,
            other => PipelineError::PlanningFailed(other.to_string()),
        }
    }
}

/// Input for the pipeline use case
#[derive(Debug, Clone)]
pub struct RunPipelineInput {
    /// The problem to solve
    pub problem: Problem,
    /// One model per agent, in fixed panel order
    pub agents: Vec<Model>,
    /// Model used for merge completions (defaults to the first agent)
    pub moderator: Option<Model>,
    /// Consensus sweep ceiling per phase; 0 skips critique entirely
    pub max_iterations: usize,
    /// Candidates requested per initial-draft completion
    pub candidate_count: usize,
}

impl RunPipelineInput {
    pub fn new(problem: impl Into<Problem>, agents: Vec<Model>) -> Self {
        Self {
            problem: problem.into(),
            agents,
            moderator: None,
            max_iterations: 3,
            candidate_count: 1,
        }
    }

    pub fn with_moderator(mut self, model: Model) -> Self {
        self.moderator = Some(model);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_candidate_count(mut self, count: usize) -> Self {
        self.candidate_count = count.max(1);
        self
    }

    /// The merge moderator, defaulting to the first agent's model
    pub fn moderator(&self) -> Model {
        self.moderator
            .clone()
            .or_else(|| self.agents.first().cloned())
            .unwrap_or_default()
    }
}
