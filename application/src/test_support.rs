//! Scripted fake completion service for deterministic flow tests.
//!
//! The fake pops canned responses in call order, which is well defined
//! because the controller is sequential. Call counts per operation are
//! recorded so tests can assert exact critique/revise accounting.

use crate::ports::completion::{
    CompletionError, CompletionRequest, CompletionService, ModelTurn,
};
use async_trait::async_trait;
use concord_domain::{Message, Model, ToolSpec};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A scripted response for the fake service
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    /// Single-candidate text response for `complete`
    Text(String),
    /// Multi-candidate response for `complete` fan-out calls
    Candidates(Vec<String>),
    /// Structured value for `complete_structured`
    Json(serde_json::Value),
    /// Tool-enabled turn for `complete_with_tools`
    Turn(ModelTurn),
    /// Fail the call with a service error
    Error(String),
}

impl Scripted {
    /// Structured critique response
    pub(crate) fn critique(accepted: bool, feedback: &str) -> Self {
        Scripted::Json(serde_json::json!({
            "accepted": accepted,
            "feedback": feedback,
        }))
    }

    /// Structured phase-done probe response
    pub(crate) fn phase_done(done: bool, reason: &str) -> Self {
        Scripted::Json(serde_json::json!({
            "done": done,
            "reason": reason,
        }))
    }
}

/// Fake `CompletionService` returning scripted responses in order
pub(crate) struct ScriptedService {
    responses: Mutex<VecDeque<Scripted>>,
    /// User prompts seen by `complete`, for prompt-shape assertions
    pub complete_prompts: Mutex<Vec<String>>,
    pub complete_calls: Mutex<usize>,
    pub structured_calls: Mutex<usize>,
    pub tool_turn_calls: Mutex<usize>,
}

impl ScriptedService {
    pub(crate) fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            complete_prompts: Mutex::new(Vec::new()),
            complete_calls: Mutex::new(0),
            structured_calls: Mutex::new(0),
            tool_turn_calls: Mutex::new(0),
        }
    }

    fn next_response(&self) -> Scripted {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::Text("(script exhausted)".to_string()))
    }

    pub(crate) fn complete_count(&self) -> usize {
        *self.complete_calls.lock().unwrap()
    }

    pub(crate) fn structured_count(&self) -> usize {
        *self.structured_calls.lock().unwrap()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: CompletionRequest) -> Result<Vec<String>, CompletionError> {
        *self.complete_calls.lock().unwrap() += 1;
        self.complete_prompts.lock().unwrap().push(request.user);

        match self.next_response() {
            Scripted::Text(text) => Ok(vec![text]),
            Scripted::Candidates(candidates) => Ok(candidates),
            Scripted::Json(value) => Ok(vec![value.to_string()]),
            Scripted::Turn(_) => Err(CompletionError::Service(
                "scripted turn response for a plain completion".to_string(),
            )),
            Scripted::Error(message) => Err(CompletionError::Service(message)),
        }
    }

    async fn complete_structured(
        &self,
        _request: CompletionRequest,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, CompletionError> {
        *self.structured_calls.lock().unwrap() += 1;

        match self.next_response() {
            Scripted::Json(value) => Ok(value),
            Scripted::Text(text) => {
                serde_json::from_str(&text).map_err(|e| CompletionError::SchemaParse(e.to_string()))
            }
            Scripted::Candidates(_) | Scripted::Turn(_) => Err(CompletionError::SchemaParse(
                "scripted response is not structured".to_string(),
            )),
            Scripted::Error(message) => Err(CompletionError::Service(message)),
        }
    }

    async fn complete_with_tools(
        &self,
        _model: &Model,
        _history: &[Message],
        _tools: &ToolSpec,
    ) -> Result<ModelTurn, CompletionError> {
        *self.tool_turn_calls.lock().unwrap() += 1;

        match self.next_response() {
            Scripted::Turn(turn) => Ok(turn),
            Scripted::Text(text) => Ok(ModelTurn::Text(text)),
            Scripted::Candidates(_) | Scripted::Json(_) => Err(CompletionError::Service(
                "scripted response is not a model turn".to_string(),
            )),
            Scripted::Error(message) => Err(CompletionError::Service(message)),
        }
    }
}
