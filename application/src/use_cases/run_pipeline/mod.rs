//! Phase/consensus pipeline controller
//!
//! The orchestration state machine. Phases run strictly in
//! [`Phase::ALL`] order and never reopen. Within a phase, agents
//! produce initial drafts (merged through the aggregator into one
//! shared artifact), then a bounded consensus loop critiques and
//! revises that artifact until every agent accepts it or the sweep
//! ceiling forces the advance.
//!
//! Two invariants the loop enforces explicitly rather than by
//! accident of ordering:
//!
//! - any revision resets *every* agent's consensus flag, so no flag is
//!   ever true for an artifact version the agent never saw;
//! - the sweep counter bounds the loop regardless of agreement, so a
//!   phase always terminates.

mod types;

pub use types::{PipelineError, RunPipelineInput};

use crate::ports::completion::CompletionService;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::agent_runner::AgentRunner;
use crate::use_cases::aggregate::Aggregator;
use concord_domain::{
    AgentId, AgentState, Artifact, Phase, PhaseOutcome, PhaseState, PipelineResult, Plan,
    PromptTemplate, parse_plan,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case driving a full pipeline run
pub struct RunPipelineUseCase {
    service: Arc<dyn CompletionService>,
    runner: AgentRunner,
    cancellation_token: Option<CancellationToken>,
}

impl RunPipelineUseCase {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        let runner = AgentRunner::new(Arc::clone(&service));
        Self {
            service,
            runner,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the run with default (no-op) progress
    pub async fn execute(&self, input: RunPipelineInput) -> Result<PipelineResult, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the run with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineResult, PipelineError> {
        if input.agents.is_empty() {
            return Err(PipelineError::NoAgents);
        }

        info!(
            agents = input.agents.len(),
            max_iterations = input.max_iterations,
            "Starting pipeline"
        );

        let mut agents: Vec<AgentState> = input
            .agents
            .iter()
            .enumerate()
            .map(|(i, model)| AgentState::new(AgentId::indexed(i), model.clone()))
            .collect();

        let mut phases = PhaseState::full_sequence();
        let mut outcomes: Vec<PhaseOutcome> = Vec::with_capacity(phases.len());
        let mut prior: Option<String> = None;

        for phase_state in &mut phases {
            let phase = phase_state.phase();
            let outcome = self
                .run_phase(phase, &input, &mut agents, prior.as_deref(), progress)
                .await?;

            prior = Some(outcome.artifact.render());
            for agent in &mut agents {
                agent.record_artifact(phase, &outcome.artifact);
            }

            phase_state.complete();
            progress.on_phase_complete(phase, outcome.consensus_reached);
            outcomes.push(outcome);
        }

        Ok(PipelineResult::new(
            input.problem.content(),
            input.agents.iter().map(|m| m.to_string()).collect(),
            outcomes,
        ))
    }

    /// Run one phase to its settled artifact.
    ///
    /// Advances regardless of agreement once the sweep ceiling is hit;
    /// the outcome records whether consensus was genuine.
    async fn run_phase(
        &self,
        phase: Phase,
        input: &RunPipelineInput,
        agents: &mut [AgentState],
        prior: Option<&str>,
        progress: &dyn ProgressNotifier,
    ) -> Result<PhaseOutcome, PipelineError> {
        info!(phase = phase.as_str(), "Phase start");
        progress.on_phase_start(phase, agents.len());

        // A new phase means a new artifact; stale flags from the
        // previous phase's artifact must not carry over.
        for agent in agents.iter_mut() {
            agent.clear_consensus();
        }

        let mut text = self.initial_artifact(phase, input, agents, prior, progress).await?;

        let mut iterations = 0;
        while !agents.iter().all(AgentState::has_consensus) && iterations < input.max_iterations {
            self.check_cancelled()?;

            for idx in 0..agents.len() {
                if agents[idx].has_consensus() {
                    continue;
                }
                self.check_cancelled()?;

                let critique = self
                    .runner
                    .critique(&mut agents[idx], phase, &input.problem, &text)
                    .await?;
                progress.on_critique(phase, agents[idx].id(), critique.accepted);

                if !critique.accepted {
                    let revised = self
                        .runner
                        .revise(&agents[idx], phase, &input.problem, &text, &critique.feedback)
                        .await?;
                    text = revised;

                    // The approved version no longer exists: reset
                    // every consensus flag, including ones granted
                    // earlier in this same sweep.
                    for agent in agents.iter_mut() {
                        agent.clear_consensus();
                    }
                    progress.on_revision(phase, agents[idx].id());
                }
            }
            iterations += 1;
        }

        let consensus_reached = agents.iter().all(AgentState::has_consensus);
        if !consensus_reached && input.max_iterations > 0 {
            warn!(
                phase = phase.as_str(),
                iterations, "Iteration ceiling reached, advancing without consensus"
            );
        }

        let artifact = if phase == Phase::Planning {
            Artifact::Plan(self.structure_plan(input, &text).await?)
        } else {
            Artifact::Text(text)
        };

        Ok(PhaseOutcome::new(phase, artifact, iterations, consensus_reached))
    }

    /// Produce and merge the panel's initial drafts into the shared
    /// artifact. Agents are visited sequentially in fixed index order.
    async fn initial_artifact(
        &self,
        phase: Phase,
        input: &RunPipelineInput,
        agents: &[AgentState],
        prior: Option<&str>,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, PipelineError> {
        let mut candidates = Vec::new();
        for agent in agents {
            self.check_cancelled()?;
            let drafts = self
                .runner
                .produce_initial(agent, phase, &input.problem, prior, input.candidate_count)
                .await?;
            candidates.extend(drafts);
        }

        if candidates.len() > 1 {
            progress.on_merge(phase, candidates.len());
        }

        let aggregator = Aggregator::new(Arc::clone(&self.service), input.moderator());
        let merged = aggregator.aggregate(candidates, None).await?;
        debug!(phase = phase.as_str(), "Initial artifact settled");
        Ok(merged)
    }

    /// Convert the planning phase's settled text into structured steps
    async fn structure_plan(
        &self,
        input: &RunPipelineInput,
        text: &str,
    ) -> Result<Plan, PipelineError> {
        use crate::ports::completion::CompletionRequest;

        let request = CompletionRequest::new(
            input.moderator(),
            PromptTemplate::panel_system(),
            PromptTemplate::plan_request(input.problem.content(), text),
        );
        let value = self
            .service
            .complete_structured(request, &Plan::schema())
            .await?;

        parse_plan(&value).map_err(|e| PipelineError::PlanningFailed(e.to_string()))
    }

    fn check_cancelled(&self) -> Result<(), PipelineError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}
