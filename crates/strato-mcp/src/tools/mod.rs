//! Built-in tools wrapping the Strato management API.

pub mod auth;
pub mod project;

use strato_core::StratoError;
use tracing::warn;

use crate::content::ToolResult;
use crate::registry::ToolRegistry;

pub use crate::registry::NO_PROJECT_MESSAGE;

pub use auth::{DisableUserTool, GetUserTool, ListUsersTool};
pub use project::GetProjectTool;

/// A registry holding every built-in tool.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(GetProjectTool)
        .register(GetUserTool)
        .register(DisableUserTool)
        .register(ListUsersTool);
    registry
}

/// Report a management API failure to the agent.
pub(crate) fn api_failure(tool: &str, err: StratoError) -> ToolResult {
    warn!(tool, error = %err, "management API call failed");
    ToolResult::error(format!("{tool} failed: {err}"))
}
