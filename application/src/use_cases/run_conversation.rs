//! Two-agent role-play conversation variant
//!
//! Instead of the critique/revise consensus loop, two named agents
//! talk a phase through: the lead opens, the partner answers, and they
//! keep alternating. After every full exchange a structured probe over
//! the lead's transcript decides whether the phase goal has been met.
//!
//! Phase advancement is never left to the probe alone: a per-phase
//! turn budget bounds the loop, and exhausting it advances the phase
//! with `completed = false` recorded on the outcome.

use crate::ports::completion::{
    CompletionError, CompletionRequest, CompletionService,
};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::agent_runner::{AgentOpError, AgentRunner};
use concord_domain::{
    AgentId, AgentState, Message, Model, Phase, PhaseState, Problem, PromptTemplate, Role,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default chat turns allowed per phase before a forced advance
pub const DEFAULT_TURN_BUDGET: usize = 8;

/// Errors that can occur during a conversation run
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Agent(#[from] AgentOpError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Input for the conversation use case
#[derive(Debug, Clone)]
pub struct RunConversationInput {
    /// The problem the pair works through
    pub problem: Problem,
    /// Model backing the lead agent (opens every phase)
    pub lead: Model,
    /// Model backing the partner agent
    pub partner: Model,
    /// Display name of the lead agent
    pub lead_name: String,
    /// Display name of the partner agent
    pub partner_name: String,
    /// Chat turns allowed per phase before a forced advance
    pub turn_budget: usize,
}

impl RunConversationInput {
    pub fn new(problem: impl Into<Problem>, lead: Model, partner: Model) -> Self {
        Self {
            problem: problem.into(),
            lead,
            partner,
            lead_name: "Proposer".to_string(),
            partner_name: "Reviewer".to_string(),
            turn_budget: DEFAULT_TURN_BUDGET,
        }
    }

    pub fn with_names(mut self, lead: impl Into<String>, partner: impl Into<String>) -> Self {
        self.lead_name = lead.into();
        self.partner_name = partner.into();
        self
    }

    /// Budget floor is one turn; zero would make every phase vacuous
    pub fn with_turn_budget(mut self, budget: usize) -> Self {
        self.turn_budget = budget.max(1);
        self
    }
}

/// Per-phase record of a conversation run
#[derive(Debug, Clone, Serialize)]
pub struct ConversationPhaseOutcome {
    pub phase: Phase,
    /// Chat turns spent in this phase
    pub turns: usize,
    /// False when the turn budget forced the advance
    pub completed: bool,
    /// The probe's stated reason for its last verdict
    pub reason: String,
}

/// Complete result of a conversation run
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResult {
    pub problem: String,
    pub phases: Vec<ConversationPhaseOutcome>,
    /// The lead agent's full history, spanning all phases
    pub transcript: Vec<Message>,
}

impl ConversationResult {
    /// The last assistant message of the transcript, if any
    pub fn final_reply(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

/// Structured verdict from the phase-done probe
#[derive(Debug, Deserialize)]
struct PhaseDone {
    done: bool,
    #[serde(default)]
    reason: String,
}

impl PhaseDone {
    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "done": { "type": "boolean" },
                "reason": { "type": "string" }
            },
            "required": ["done"]
        })
    }
}

/// Use case driving a full two-agent conversation run
pub struct RunConversationUseCase {
    service: Arc<dyn CompletionService>,
    runner: AgentRunner,
    tools: Arc<dyn ToolExecutorPort>,
    cancellation_token: Option<CancellationToken>,
}

impl RunConversationUseCase {
    pub fn new(service: Arc<dyn CompletionService>, tools: Arc<dyn ToolExecutorPort>) -> Self {
        let runner = AgentRunner::new(Arc::clone(&service));
        Self {
            service,
            runner,
            tools,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run all phases as one continuous conversation
    pub async fn execute(
        &self,
        input: RunConversationInput,
    ) -> Result<ConversationResult, ConversationError> {
        info!(
            lead = %input.lead,
            partner = %input.partner,
            turn_budget = input.turn_budget,
            "Starting conversation run"
        );

        let mut lead = AgentState::new(AgentId::new(&input.lead_name), input.lead.clone());
        let mut partner =
            AgentState::new(AgentId::new(&input.partner_name), input.partner.clone());

        // Each participant sees the other as its counterpart; the
        // shared dialogue is mirrored into both histories by `chat`.
        lead.push_message(Message::system(PromptTemplate::conversation_system(
            &input.lead_name,
            &input.partner_name,
        )));
        partner.push_message(Message::system(PromptTemplate::conversation_system(
            &input.partner_name,
            &input.lead_name,
        )));

        let mut phases = PhaseState::full_sequence();
        let mut outcomes = Vec::with_capacity(phases.len());

        for phase_state in &mut phases {
            let phase = phase_state.phase();
            let outcome = self
                .run_phase(phase, &input, &mut lead, &mut partner)
                .await?;
            phase_state.complete();
            outcomes.push(outcome);
        }

        Ok(ConversationResult {
            problem: input.problem.content().to_string(),
            phases: outcomes,
            transcript: lead.history.clone(),
        })
    }

    /// Talk one phase through, bounded by the turn budget.
    ///
    /// The lead opens on the phase goal; afterwards each reply is fed
    /// to the other agent verbatim. The probe runs after every full
    /// exchange, and only its verdict ends the phase early.
    async fn run_phase(
        &self,
        phase: Phase,
        input: &RunConversationInput,
        lead: &mut AgentState,
        partner: &mut AgentState,
    ) -> Result<ConversationPhaseOutcome, ConversationError> {
        info!(phase = phase.as_str(), "Conversation phase start");

        let opening = PromptTemplate::conversation_opening(phase, input.problem.content());
        let mut turns = 0;
        let mut reason = String::new();

        self.check_cancelled()?;
        let mut reply = self.runner.chat(lead, &opening, self.tools.as_ref()).await?;
        turns += 1;

        while turns < input.turn_budget {
            self.check_cancelled()?;

            reply = self.runner.chat(partner, &reply, self.tools.as_ref()).await?;
            turns += 1;

            let verdict = self.probe_phase_done(phase, input, lead, &reply).await?;
            reason = verdict.reason;
            if verdict.done {
                debug!(phase = phase.as_str(), turns, "Phase goal met");
                return Ok(ConversationPhaseOutcome {
                    phase,
                    turns,
                    completed: true,
                    reason,
                });
            }

            if turns >= input.turn_budget {
                break;
            }

            reply = self.runner.chat(lead, &reply, self.tools.as_ref()).await?;
            turns += 1;
        }

        warn!(
            phase = phase.as_str(),
            turns, "Turn budget exhausted, advancing phase"
        );
        Ok(ConversationPhaseOutcome {
            phase,
            turns,
            completed: false,
            reason,
        })
    }

    /// One structured completion judging the lead's transcript.
    ///
    /// The partner's latest reply has not been fed back to the lead
    /// yet, so it is appended to the rendered transcript explicitly.
    async fn probe_phase_done(
        &self,
        phase: Phase,
        input: &RunConversationInput,
        lead: &AgentState,
        latest_reply: &str,
    ) -> Result<PhaseDone, ConversationError> {
        let mut transcript = render_transcript(&lead.history);
        transcript.push_str(&format!("\n{}: {}", input.partner_name, latest_reply));
        let request = CompletionRequest::new(
            input.lead.clone(),
            PromptTemplate::panel_system(),
            PromptTemplate::phase_done_probe(phase, &transcript),
        );
        let value = self
            .service
            .complete_structured(request, &PhaseDone::schema())
            .await?;
        let verdict: PhaseDone = serde_json::from_value(value)
            .map_err(|e| CompletionError::SchemaParse(e.to_string()))?;
        Ok(verdict)
    }

    fn check_cancelled(&self) -> Result<(), ConversationError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(ConversationError::Cancelled);
        }
        Ok(())
    }
}

/// Flatten a history into "role: content" lines, skipping the system
/// preamble
fn render_transcript(history: &[Message]) -> String {
    history
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion::ModelTurn;
    use crate::test_support::{Scripted, ScriptedService};
    use async_trait::async_trait;
    use concord_domain::{ToolCall, ToolError, ToolResult, ToolSpec};

    struct NoTools {
        spec: ToolSpec,
    }

    impl NoTools {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new(),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for NoTools {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            Err(ToolError::UnknownTool(call.tool_name.clone()))
        }
    }

    fn use_case(script: Vec<Scripted>) -> (RunConversationUseCase, Arc<ScriptedService>) {
        let service = Arc::new(ScriptedService::new(script));
        let use_case = RunConversationUseCase::new(
            Arc::clone(&service) as Arc<dyn CompletionService>,
            Arc::new(NoTools::new()),
        );
        (use_case, service)
    }

    fn input() -> RunConversationInput {
        RunConversationInput::new("test problem", Model::default(), Model::default())
    }

    async fn run_single_phase(
        use_case: &RunConversationUseCase,
        input: &RunConversationInput,
    ) -> ConversationPhaseOutcome {
        let mut lead = AgentState::new(AgentId::new(&input.lead_name), input.lead.clone());
        let mut partner =
            AgentState::new(AgentId::new(&input.partner_name), input.partner.clone());
        use_case
            .run_phase(Phase::Understanding, input, &mut lead, &mut partner)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_phase_completes_on_done_verdict() {
        // Lead opens, partner answers, probe says done: 2 turns.
        let (use_case, service) = use_case(vec![
            Scripted::Text("lead opens".to_string()),
            Scripted::Text("partner answers".to_string()),
            Scripted::phase_done(true, "goal stated clearly"),
        ]);

        let outcome = run_single_phase(&use_case, &input()).await;

        assert!(outcome.completed);
        assert_eq!(outcome.turns, 2);
        assert_eq!(outcome.reason, "goal stated clearly");
        assert_eq!(service.structured_count(), 1);
        assert_eq!(service.remaining(), 0);
    }

    #[tokio::test]
    async fn test_turn_budget_forces_advance() {
        // Probe never says done; budget 4 allows two full exchanges.
        let (use_case, service) = use_case(vec![
            Scripted::Text("t1".to_string()),
            Scripted::Text("t2".to_string()),
            Scripted::phase_done(false, "still circling"),
            Scripted::Text("t3".to_string()),
            Scripted::Text("t4".to_string()),
            Scripted::phase_done(false, "still circling"),
        ]);
        let input = input().with_turn_budget(4);

        let outcome = run_single_phase(&use_case, &input).await;

        assert!(!outcome.completed);
        assert_eq!(outcome.turns, 4);
        assert_eq!(service.structured_count(), 2);
        assert_eq!(service.remaining(), 0);
    }

    #[tokio::test]
    async fn test_budget_of_one_never_probes() {
        let (use_case, service) = use_case(vec![Scripted::Text("only turn".to_string())]);
        let input = input().with_turn_budget(1);

        let outcome = run_single_phase(&use_case, &input).await;

        assert!(!outcome.completed);
        assert_eq!(outcome.turns, 1);
        assert_eq!(service.structured_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_the_turn() {
        let call = ToolCall::new("launch_missiles");
        let (use_case, _service) = use_case(vec![
            Scripted::Text("lead opens".to_string()),
            Scripted::Turn(ModelTurn::ToolCall(call)),
        ]);

        let mut lead = AgentState::new(AgentId::new("Proposer"), Model::default());
        let mut partner = AgentState::new(AgentId::new("Reviewer"), Model::default());
        let result = use_case
            .run_phase(Phase::Understanding, &input(), &mut lead, &mut partner)
            .await;

        assert!(matches!(
            result,
            Err(ConversationError::Agent(AgentOpError::Tool(
                ToolError::UnknownTool(_)
            )))
        ));
        // Partner history: the incoming user message and the
        // triggering assistant turn; nothing after the failed lookup.
        assert_eq!(partner.history.len(), 2);
    }

    #[tokio::test]
    async fn test_full_run_visits_all_phases() {
        let mut script = Vec::new();
        for _ in Phase::ALL {
            script.push(Scripted::Text("lead".to_string()));
            script.push(Scripted::Text("partner".to_string()));
            script.push(Scripted::phase_done(true, "met"));
        }
        let (use_case, _service) = use_case(script);

        let result = use_case.execute(input()).await.unwrap();

        assert_eq!(result.phases.len(), 6);
        assert!(result.phases.iter().all(|o| o.completed));
        let order: Vec<Phase> = result.phases.iter().map(|o| o.phase).collect();
        assert_eq!(order, Phase::ALL.to_vec());
        // System preamble plus user/assistant pairs for the lead's
        // six opening turns.
        assert_eq!(result.transcript[0].role, Role::System);
        assert_eq!(result.final_reply(), Some("lead"));
    }

    #[tokio::test]
    async fn test_transcript_rendering_skips_system() {
        let history = vec![
            Message::system("preamble"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];
        let rendered = render_transcript(&history);
        assert_eq!(rendered, "user: hello\nassistant: hi");
    }

    #[tokio::test]
    async fn test_cancellation_stops_the_run() {
        let token = CancellationToken::new();
        token.cancel();

        let service = Arc::new(ScriptedService::new(vec![]));
        let use_case = RunConversationUseCase::new(
            service as Arc<dyn CompletionService>,
            Arc::new(NoTools::new()),
        )
        .with_cancellation_token(token);

        let result = use_case.execute(input()).await;
        assert!(matches!(result, Err(ConversationError::Cancelled)));
    }
}
