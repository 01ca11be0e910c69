//! Local tool executor, the concrete implementation of `ToolExecutorPort`

use super::builtin;
use async_trait::async_trait;
use concord_application::ToolExecutorPort;
use concord_domain::{ToolCall, ToolError, ToolResult, ToolSpec};
use tracing::debug;

/// Executor that runs the builtin tools in-process.
///
/// Dispatch is by exact name against the declared spec; a name the
/// spec does not carry fails with [`ToolError::UnknownTool`] before
/// any callable runs.
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
}

impl LocalToolExecutor {
    pub fn new() -> Self {
        Self {
            tool_spec: builtin::default_tool_spec(),
        }
    }

    /// Restrict the executor to a custom spec (testing, specialized
    /// setups). Names outside the builtin set will resolve in the
    /// spec but still fail dispatch.
    pub fn with_tools(tool_spec: ToolSpec) -> Self {
        Self { tool_spec }
    }
}

impl Default for LocalToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        if self.tool_spec.get(&call.tool_name).is_none() {
            return Err(ToolError::UnknownTool(call.tool_name.clone()));
        }

        debug!(tool = %call.tool_name, "Dispatching tool call");
        match call.tool_name.as_str() {
            builtin::CURRENT_TIME => builtin::execute_current_time(call),
            builtin::WORD_COUNT => builtin::execute_word_count(call),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}
