//! Orchestration value objects - immutable result types for a run.
//!
//! - [`PhaseOutcome`] - One phase's final artifact plus loop accounting
//! - [`PipelineResult`] - Complete result across all phases

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::orchestration::phase::Phase;

/// Outcome of a single phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseOutcome {
    /// Which phase this outcome belongs to
    pub phase: Phase,
    /// The artifact the phase settled on
    pub artifact: Artifact,
    /// How many consensus sweeps ran (0 when the loop was skipped)
    pub iterations: usize,
    /// Whether every agent accepted the final artifact, or the
    /// iteration cap forced the advance
    pub consensus_reached: bool,
}

impl PhaseOutcome {
    pub fn new(
        phase: Phase,
        artifact: Artifact,
        iterations: usize,
        consensus_reached: bool,
    ) -> Self {
        Self {
            phase,
            artifact,
            iterations,
            consensus_reached,
        }
    }

    /// True when the iteration cap exited the loop without agreement
    pub fn was_forced(&self) -> bool {
        !self.consensus_reached
    }
}

/// Complete result of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The original problem statement
    pub problem: String,
    /// Models that participated, in agent index order
    pub agents: Vec<String>,
    /// One outcome per executed phase, in phase order
    pub phases: Vec<PhaseOutcome>,
    /// The final phase's rendered artifact
    pub final_artifact: String,
}

impl PipelineResult {
    pub fn new(
        problem: impl Into<String>,
        agents: Vec<String>,
        phases: Vec<PhaseOutcome>,
    ) -> Self {
        let final_artifact = phases
            .last()
            .map(|o| o.artifact.render())
            .unwrap_or_default();
        Self {
            problem: problem.into(),
            agents,
            phases,
            final_artifact,
        }
    }

    /// Outcome for a specific phase, if it ran
    pub fn outcome(&self, phase: Phase) -> Option<&PhaseOutcome> {
        self.phases.iter().find(|o| o.phase == phase)
    }

    /// Iterate over phases the iteration cap forced past disagreement
    pub fn forced_phases(&self) -> impl Iterator<Item = &PhaseOutcome> {
        self.phases.iter().filter(|o| o.was_forced())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(phase: Phase, consensus: bool) -> PhaseOutcome {
        PhaseOutcome::new(phase, Artifact::from(phase.as_str()), 1, consensus)
    }

    #[test]
    fn test_final_artifact_is_last_phase() {
        let result = PipelineResult::new(
            "problem",
            vec!["gpt-4o-mini".to_string()],
            vec![
                outcome(Phase::Understanding, true),
                outcome(Phase::Compilation, true),
            ],
        );
        assert_eq!(result.final_artifact, "compilation");
    }

    #[test]
    fn test_outcome_lookup() {
        let result = PipelineResult::new(
            "problem",
            vec![],
            vec![outcome(Phase::Planning, false)],
        );
        assert!(result.outcome(Phase::Planning).is_some());
        assert!(result.outcome(Phase::Execution).is_none());
    }

    #[test]
    fn test_forced_phases() {
        let result = PipelineResult::new(
            "problem",
            vec![],
            vec![
                outcome(Phase::Understanding, true),
                outcome(Phase::Representation, false),
            ],
        );
        let forced: Vec<_> = result.forced_phases().collect();
        assert_eq!(forced.len(), 1);
        assert_eq!(forced[0].phase, Phase::Representation);
    }

    #[test]
    fn test_empty_phases_final_artifact() {
        let result = PipelineResult::new("problem", vec![], vec![]);
        assert!(result.final_artifact.is_empty());
    }
}
