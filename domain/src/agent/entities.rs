//! Agent entity
//!
//! Agents are owned exclusively by the pipeline controller: created at
//! orchestration start, dropped at run end. All mutation happens on
//! the controller's thread.

use serde::{Deserialize, Serialize};

use crate::agent::value_objects::AgentId;
use crate::artifact::Artifact;
use crate::core::model::Model;
use crate::orchestration::phase::Phase;
use crate::session::entities::Message;

/// Mutable per-agent state (Entity)
///
/// The `consensus` flag refers to the artifact version the agent most
/// recently critiqued. Whenever the shared artifact is rewritten the
/// controller calls [`AgentState::clear_consensus`] on every agent, so
/// a flag is never true for an artifact the agent has not seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    id: AgentId,
    model: Model,
    consensus: bool,
    /// Artifact slots, one per phase family
    pub understanding: Option<Artifact>,
    pub representation: Option<Artifact>,
    pub plan: Option<Artifact>,
    pub solution: Option<Artifact>,
    /// Conversation history, used only by the role-play variant
    pub history: Vec<Message>,
}

impl AgentState {
    pub fn new(id: AgentId, model: Model) -> Self {
        Self {
            id,
            model,
            consensus: false,
            understanding: None,
            representation: None,
            plan: None,
            solution: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn has_consensus(&self) -> bool {
        self.consensus
    }

    /// Set the consensus flag after an accepting critique
    pub fn grant_consensus(&mut self) {
        self.consensus = true;
    }

    /// Reset the consensus flag. Called on every agent whenever the
    /// shared artifact is rewritten: the version the agent approved no
    /// longer exists.
    pub fn clear_consensus(&mut self) {
        self.consensus = false;
    }

    /// Record the phase's settled artifact into the matching slot
    pub fn record_artifact(&mut self, phase: Phase, artifact: &Artifact) {
        match phase {
            Phase::Understanding => self.understanding = Some(artifact.clone()),
            Phase::Representation => self.representation = Some(artifact.clone()),
            Phase::Planning => self.plan = Some(artifact.clone()),
            Phase::Execution | Phase::Verification | Phase::Compilation => {
                self.solution = Some(artifact.clone())
            }
        }
    }

    /// Append a message to the persistent conversation history
    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    fn agent() -> AgentState {
        AgentState::new(AgentId::indexed(0), Model::default())
    }

    #[test]
    fn test_consensus_defaults_false() {
        assert!(!agent().has_consensus());
    }

    #[test]
    fn test_consensus_grant_and_clear() {
        let mut a = agent();
        a.grant_consensus();
        assert!(a.has_consensus());
        a.clear_consensus();
        assert!(!a.has_consensus());
    }

    #[test]
    fn test_record_artifact_slots() {
        let mut a = agent();
        a.record_artifact(Phase::Understanding, &Artifact::from("u"));
        a.record_artifact(Phase::Execution, &Artifact::from("partial"));
        a.record_artifact(Phase::Compilation, &Artifact::from("final"));

        assert_eq!(a.understanding, Some(Artifact::from("u")));
        assert!(a.representation.is_none());
        // Later solution-family phases overwrite the solution slot
        assert_eq!(a.solution, Some(Artifact::from("final")));
    }

    #[test]
    fn test_history_appends_in_order() {
        let mut a = agent();
        a.push_message(Message::new(Role::User, "hello"));
        a.push_message(Message::new(Role::Assistant, "hi"));
        assert_eq!(a.history.len(), 2);
        assert_eq!(a.history[0].role, Role::User);
    }
}
