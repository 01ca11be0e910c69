//! Progress notification port
//!
//! Reports pipeline progress to the presentation layer. Verbose or
//! quiet display never affects control flow.

use concord_domain::{AgentId, Phase};

/// Callback for progress updates during a pipeline run
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts, with the number of panel agents
    fn on_phase_start(&self, phase: Phase, agents: usize);

    /// Called after an agent's critique of the shared artifact
    fn on_critique(&self, phase: Phase, agent: &AgentId, accepted: bool);

    /// Called when a rejecting agent has rewritten the shared artifact
    fn on_revision(&self, phase: Phase, agent: &AgentId);

    /// Called when multiple initial drafts were merged into one
    fn on_merge(&self, phase: Phase, candidates: usize) {
        let _ = (phase, candidates);
    }

    /// Called when a phase completes; `consensus` is false when the
    /// iteration cap forced the advance
    fn on_phase_complete(&self, phase: Phase, consensus: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _agents: usize) {}
    fn on_critique(&self, _phase: Phase, _agent: &AgentId, _accepted: bool) {}
    fn on_revision(&self, _phase: Phase, _agent: &AgentId) {}
    fn on_phase_complete(&self, _phase: Phase, _consensus: bool) {}
}
