//! Agent operations
//!
//! Each operation is a thin composition over the completion port:
//! `produce_initial`, `critique`, and `revise` drive the pipeline's
//! consensus loop, `chat` drives the role-play conversation variant.
//! State mutation only happens after a call returns successfully, so a
//! failed call leaves agent and artifact state untouched.

use crate::ports::completion::{
    CompletionError, CompletionRequest, CompletionService, ModelTurn, complete_one,
};
use crate::ports::tool_executor::ToolExecutorPort;
use concord_domain::{
    AgentState, Critique, Message, Phase, Problem, PromptTemplate, ToolError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from a tool-enabled chat turn
#[derive(Error, Debug)]
pub enum AgentOpError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Stateless executor of agent operations against the completion port
pub struct AgentRunner {
    service: Arc<dyn CompletionService>,
}

impl AgentRunner {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Generate an agent's first-draft candidates for a phase.
    ///
    /// One completion call; `candidate_count` independent candidates
    /// are requested from the backend in that single call.
    pub async fn produce_initial(
        &self,
        agent: &AgentState,
        phase: Phase,
        problem: &Problem,
        prior: Option<&str>,
        candidate_count: usize,
    ) -> Result<Vec<String>, CompletionError> {
        let prompt = PromptTemplate::initial(phase, problem.content(), prior);
        let request =
            CompletionRequest::new(agent.model().clone(), PromptTemplate::panel_system(), prompt)
                .with_candidates(candidate_count);
        self.service.complete(request).await
    }

    /// Critique the shared artifact: one structured completion.
    ///
    /// This is the sole acceptance mechanism. The agent's consensus
    /// flag is set true only when the critique accepts; it is never
    /// assumed.
    pub async fn critique(
        &self,
        agent: &mut AgentState,
        phase: Phase,
        problem: &Problem,
        artifact: &str,
    ) -> Result<Critique, CompletionError> {
        let prompt = PromptTemplate::critique(phase, problem.content(), artifact);
        let request = CompletionRequest::new(
            agent.model().clone(),
            PromptTemplate::critique_system(),
            prompt,
        );

        let value = self
            .service
            .complete_structured(request, &Critique::schema())
            .await?;
        let critique: Critique = serde_json::from_value(value)
            .map_err(|e| CompletionError::SchemaParse(e.to_string()))?;

        debug!(
            agent = %agent.id(),
            accepted = critique.accepted,
            "Critique received"
        );

        if critique.accepted {
            agent.grant_consensus();
        }

        Ok(critique)
    }

    /// Produce a replacement artifact folding in critique feedback.
    ///
    /// The caller installs the result as the new shared artifact and
    /// resets every agent's consensus flag.
    pub async fn revise(
        &self,
        agent: &AgentState,
        phase: Phase,
        problem: &Problem,
        artifact: &str,
        feedback: &str,
    ) -> Result<String, CompletionError> {
        let prompt = PromptTemplate::revise(phase, problem.content(), artifact, feedback);
        let request =
            CompletionRequest::new(agent.model().clone(), PromptTemplate::panel_system(), prompt);
        complete_one(self.service.as_ref(), request).await
    }

    /// One conversation turn: append the incoming message, query the
    /// backend with the full history, dispatch at most one tool call,
    /// and return the assistant reply.
    ///
    /// On tool dispatch failure the history keeps the triggering
    /// assistant turn and nothing after it.
    pub async fn chat(
        &self,
        agent: &mut AgentState,
        message: &str,
        tools: &dyn ToolExecutorPort,
    ) -> Result<String, AgentOpError> {
        agent.push_message(Message::user(message));

        let turn = self
            .service
            .complete_with_tools(agent.model(), &agent.history, tools.spec())
            .await?;

        let call = match turn {
            ModelTurn::Text(reply) => {
                agent.push_message(Message::assistant(&reply));
                return Ok(reply);
            }
            ModelTurn::ToolCall(call) => call,
        };

        // Record the triggering assistant turn before dispatch so a
        // failed lookup leaves the history at exactly that point.
        let call_json = serde_json::to_string(&call)
            .map_err(|e| CompletionError::SchemaParse(e.to_string()))?;
        agent.push_message(Message::assistant(&call_json));

        let result = tools.execute(&call).await?;
        agent.push_message(Message::tool(&result.content));

        // Follow-up turn with the tool result in context; one level of
        // tool invocation per chat turn.
        let turn = self
            .service
            .complete_with_tools(agent.model(), &agent.history, tools.spec())
            .await?;

        let reply = match turn {
            ModelTurn::Text(reply) => reply,
            ModelTurn::ToolCall(call) => {
                return Err(ToolError::execution_failed(
                    call.tool_name,
                    "tool call requested after the per-turn tool budget was spent",
                )
                .into());
            }
        };

        agent.push_message(Message::assistant(&reply));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Scripted, ScriptedService};
    use async_trait::async_trait;
    use concord_domain::{
        AgentId, Model, ToolCall, ToolDefinition, ToolResult, ToolSpec,
    };

    struct FixedTools {
        spec: ToolSpec,
    }

    impl FixedTools {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new()
                    .register(ToolDefinition::new("current_time", "Current UTC time")),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for FixedTools {
        fn spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            if self.spec.get(&call.tool_name).is_none() {
                return Err(ToolError::UnknownTool(call.tool_name.clone()));
            }
            Ok(ToolResult::new(&call.tool_name, "12:00:00Z"))
        }
    }

    fn agent() -> AgentState {
        AgentState::new(AgentId::indexed(0), Model::default())
    }

    #[tokio::test]
    async fn test_critique_accept_grants_consensus() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::critique(true, "")]));
        let runner = AgentRunner::new(service);
        let mut a = agent();

        let critique = runner
            .critique(&mut a, Phase::Understanding, &Problem::new("p"), "draft")
            .await
            .unwrap();

        assert!(critique.accepted);
        assert!(a.has_consensus());
    }

    #[tokio::test]
    async fn test_critique_reject_leaves_consensus_false() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::critique(
            false,
            "missing edge case",
        )]));
        let runner = AgentRunner::new(service);
        let mut a = agent();

        let critique = runner
            .critique(&mut a, Phase::Understanding, &Problem::new("p"), "draft")
            .await
            .unwrap();

        assert!(!critique.accepted);
        assert_eq!(critique.feedback, "missing edge case");
        assert!(!a.has_consensus());
    }

    #[tokio::test]
    async fn test_failed_critique_mutates_nothing() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::Error(
            "rate limited".to_string(),
        )]));
        let runner = AgentRunner::new(service);
        let mut a = agent();

        let result = runner
            .critique(&mut a, Phase::Understanding, &Problem::new("p"), "draft")
            .await;

        assert!(result.is_err());
        assert!(!a.has_consensus());
    }

    #[tokio::test]
    async fn test_chat_plain_text_turn() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::Text(
            "hello back".to_string(),
        )]));
        let runner = AgentRunner::new(service);
        let mut a = agent();
        let tools = FixedTools::new();

        let reply = runner.chat(&mut a, "hello", &tools).await.unwrap();

        assert_eq!(reply, "hello back");
        assert_eq!(a.history.len(), 2); // user + assistant
    }

    #[tokio::test]
    async fn test_chat_dispatches_one_tool_call() {
        let service = Arc::new(ScriptedService::new(vec![
            Scripted::Turn(ModelTurn::ToolCall(ToolCall::new("current_time"))),
            Scripted::Text("it is noon".to_string()),
        ]));
        let runner = AgentRunner::new(service);
        let mut a = agent();
        let tools = FixedTools::new();

        let reply = runner.chat(&mut a, "what time is it?", &tools).await.unwrap();

        assert_eq!(reply, "it is noon");
        // user, assistant tool call, tool result, assistant reply
        assert_eq!(a.history.len(), 4);
        assert_eq!(a.history[2].content, "12:00:00Z");
    }

    #[tokio::test]
    async fn test_chat_unknown_tool_stops_at_triggering_turn() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::Turn(
            ModelTurn::ToolCall(ToolCall::new("frobnicate")),
        )]));
        let runner = AgentRunner::new(service);
        let mut a = agent();
        let tools = FixedTools::new();

        let result = runner.chat(&mut a, "go", &tools).await;

        assert!(matches!(
            result,
            Err(AgentOpError::Tool(ToolError::UnknownTool(_)))
        ));
        // History ends at the triggering assistant turn: no tool
        // message, no follow-up reply.
        assert_eq!(a.history.len(), 2);
        assert!(a.history[1].content.contains("frobnicate"));
    }
}
