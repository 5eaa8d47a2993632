//! `project_get` — fetch the active project.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::content::ToolResult;
use crate::error::McpResult;
use crate::tool::{
    input_schema, parse_args, Tool, ToolAnnotations, ToolContext, ToolDefinition,
    ToolRequirements,
};
use crate::tools::{api_failure, NO_PROJECT_MESSAGE};

const NAME: &str = "project_get";

/// No arguments; the project comes from the server's context.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetProjectParams {}

/// Returns the active project resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetProjectTool;

#[async_trait]
impl Tool for GetProjectTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Retrieves information about the currently active Strato project.".into(),
            input_schema: input_schema::<GetProjectParams>(),
            annotations: ToolAnnotations {
                title: Some("Get current project".into()),
                read_only_hint: Some(true),
                ..ToolAnnotations::default()
            },
            requirements: ToolRequirements {
                requires_auth: true,
                requires_project: true,
            },
        }
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> McpResult<ToolResult> {
        let GetProjectParams {} = parse_args(NAME, args)?;
        let Some(project_id) = ctx.project_id() else {
            return Ok(ToolResult::error(NO_PROJECT_MESSAGE));
        };
        match ctx.api.get_project(project_id).await {
            Ok(project) => Ok(ToolResult::json(&project)?),
            Err(e) => Ok(api_failure(NAME, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{context, FakeApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_returns_active_project() {
        let (_, ctx) = context(FakeApi::default(), Some("demo-app"));
        let result = GetProjectTool.call(Value::Null, &ctx).await.unwrap();
        assert!(!result.is_error);
        let project: Value = serde_json::from_str(&result.text_content()).unwrap();
        assert_eq!(project["projectId"], "demo-app");
        assert_eq!(project["state"], "ACTIVE");
    }

    #[tokio::test]
    async fn test_no_project_is_error_result() {
        let (_, ctx) = context(FakeApi::default(), Some(""));
        let result = GetProjectTool.call(json!({}), &ctx).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.text_content(), NO_PROJECT_MESSAGE);
    }

    #[tokio::test]
    async fn test_rejects_unexpected_arguments() {
        let (_, ctx) = context(FakeApi::default(), Some("demo-app"));
        let err = GetProjectTool
            .call(json!({"projectId": "other"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::McpError::InvalidArguments { .. }));
    }
}
