//! Tool registry — lookup and guarded dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::content::ToolResult;
use crate::error::{McpError, McpResult};
use crate::tool::{Tool, ToolContext, ToolDefinition};

/// Message returned when a tool needs credentials the caller lacks.
pub const NOT_AUTHENTICATED_MESSAGE: &str =
    "This tool requires authentication. Set STRATO_TOKEN or add a token to the Strato config file.";

/// Message returned when a tool needs a project and none is active.
pub const NO_PROJECT_MESSAGE: &str = "No current project detected. Pass --project when starting the server or run it inside a directory with a .stratorc file.";

/// Tools by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.definition().name;
        debug!(tool = %name, "registering tool");
        self.tools.insert(name, Arc::new(tool));
        self
    }

    /// Definitions of all tools, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Names of all tools, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name.
    ///
    /// Tools whose requirements the context does not meet (no credentials,
    /// no active project) get an error result; the tool itself is not run.
    pub async fn call(&self, name: &str, args: Value, ctx: &ToolContext) -> McpResult<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        let requirements = tool.definition().requirements;
        if requirements.requires_auth && !ctx.authenticated {
            debug!(tool = %name, "refusing unauthenticated call");
            return Ok(ToolResult::error(NOT_AUTHENTICATED_MESSAGE));
        }
        if requirements.requires_project && ctx.project_id().is_none() {
            debug!(tool = %name, "refusing call without an active project");
            return Ok(ToolResult::error(NO_PROJECT_MESSAGE));
        }

        info!(tool = %name, project = ?ctx.project_id(), "calling tool");
        let result = tool.call(args, ctx).await?;
        debug!(tool = %name, is_error = result.is_error, "tool finished");
        Ok(result)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::tool::{ToolAnnotations, ToolRequirements};
    use crate::tools::testing::{context, FakeApi};

    #[derive(Default)]
    struct CountingTool {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "count".into(),
                description: "Counts calls.".into(),
                input_schema: json!({"type": "object"}),
                annotations: ToolAnnotations::default(),
                requirements: ToolRequirements {
                    requires_auth: true,
                    requires_project: true,
                },
            }
        }

        async fn call(&self, _args: Value, _ctx: &ToolContext) -> McpResult<ToolResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResult::text("counted"))
        }
    }

    fn registry() -> (ToolRegistry, Arc<AtomicUsize>) {
        let tool = CountingTool::default();
        let calls = tool.calls.clone();
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        (registry, calls)
    }

    #[tokio::test]
    async fn test_missing_project_skips_tool() {
        let (registry, calls) = registry();
        let (_, ctx) = context(FakeApi::default(), None);

        let result = registry.call("count", Value::Null, &ctx).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.text_content(), NO_PROJECT_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let (_, ctx) = context(FakeApi::default(), Some(""));
        let result = registry.call("count", Value::Null, &ctx).await.unwrap();
        assert_eq!(result.text_content(), NO_PROJECT_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_checked_before_project() {
        let (registry, calls) = registry();
        let (api, _) = context(FakeApi::default(), None);
        let ctx = ToolContext::new(api, None, false);

        let result = registry.call("count", Value::Null, &ctx).await.unwrap();
        assert_eq!(result.text_content(), NOT_AUTHENTICATED_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runs_when_requirements_met() {
        let (registry, calls) = registry();
        let (_, ctx) = context(FakeApi::default(), Some("demo-app"));

        let result = registry.call("count", Value::Null, &ctx).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = registry.call("nope", Value::Null, &ctx).await.unwrap_err();
        assert!(matches!(err, McpError::UnknownTool(_)));
    }
}
