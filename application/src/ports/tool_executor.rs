//! Tool executor port
//!
//! Dispatches a backend-requested tool call to a locally registered
//! callable. Implementations live in the infrastructure layer.

use async_trait::async_trait;
use concord_domain::{ToolCall, ToolError, ToolResult, ToolSpec};

/// Port for executing tools requested by the completion service
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The statically declared tool table exposed to the backend
    fn spec(&self) -> &ToolSpec;

    /// Execute one tool call by exact name match.
    ///
    /// Fails with [`ToolError::UnknownTool`] when no callable is
    /// registered under the requested name; argument validation is
    /// whatever the target callable enforces.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;
}
