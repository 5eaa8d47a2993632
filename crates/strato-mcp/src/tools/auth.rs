//! Auth user tools: look up, list, and disable or enable users.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use strato_core::client::MAX_USER_PAGE;
use tracing::info;

use crate::content::ToolResult;
use crate::error::{McpError, McpResult};
use crate::tool::{
    input_schema, parse_args, Tool, ToolAnnotations, ToolContext, ToolDefinition,
    ToolRequirements,
};
use crate::tools::{api_failure, NO_PROJECT_MESSAGE};

fn auth_requirements() -> ToolRequirements {
    ToolRequirements {
        requires_auth: true,
        requires_project: true,
    }
}

// ── auth_get_user ────────────────────────────────────────────

const GET_USER: &str = "auth_get_user";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetUserParams {
    /// The localId or UID of the user to retrieve.
    pub uid: String,
}

/// Looks up a single user.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetUserTool;

#[async_trait]
impl Tool for GetUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_USER.into(),
            description: "Retrieves a user by UID from Strato Auth.".into(),
            input_schema: input_schema::<GetUserParams>(),
            annotations: ToolAnnotations {
                title: Some("Get a user".into()),
                read_only_hint: Some(true),
                ..ToolAnnotations::default()
            },
            requirements: auth_requirements(),
        }
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> McpResult<ToolResult> {
        let params: GetUserParams = parse_args(GET_USER, args)?;
        let Some(project_id) = ctx.project_id() else {
            return Ok(ToolResult::error(NO_PROJECT_MESSAGE));
        };
        match ctx.api.get_user(project_id, &params.uid).await {
            Ok(Some(user)) => Ok(ToolResult::json(&user)?),
            Ok(None) => Ok(ToolResult::error(format!(
                "No user with UID {} in project {project_id}.",
                params.uid
            ))),
            Err(e) => Ok(api_failure(GET_USER, e)),
        }
    }
}

// ── auth_disable_user ────────────────────────────────────────

const DISABLE_USER: &str = "auth_disable_user";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DisableUserParams {
    /// The localId or UID of the user to disable or enable.
    pub uid: String,
    /// true disables the user, false enables the user.
    pub disabled: bool,
}

/// Disables or re-enables a user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableUserTool;

#[async_trait]
impl Tool for DisableUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: DISABLE_USER.into(),
            description: "Disables or enables a user based on a UID.".into(),
            input_schema: input_schema::<DisableUserParams>(),
            annotations: ToolAnnotations {
                title: Some("Disable or enable a particular user".into()),
                destructive_hint: Some(false),
                idempotent_hint: Some(true),
                ..ToolAnnotations::default()
            },
            requirements: auth_requirements(),
        }
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> McpResult<ToolResult> {
        let params: DisableUserParams = parse_args(DISABLE_USER, args)?;
        if params.uid.trim().is_empty() {
            return Err(McpError::InvalidArguments {
                tool: DISABLE_USER.into(),
                message: "uid must not be empty".into(),
            });
        }
        let Some(project_id) = ctx.project_id() else {
            return Ok(ToolResult::error(NO_PROJECT_MESSAGE));
        };

        info!(uid = %params.uid, disabled = params.disabled, "updating user");
        match ctx
            .api
            .set_user_disabled(project_id, &params.uid, params.disabled)
            .await
        {
            Ok(user) => Ok(ToolResult::json(&user)?),
            Err(e) => Ok(api_failure(DISABLE_USER, e)),
        }
    }
}

// ── auth_list_users ──────────────────────────────────────────

const LIST_USERS: &str = "auth_list_users";

fn default_limit() -> u32 {
    100
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListUsersParams {
    /// Maximum number of users to return (1-1000).
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Token from a previous call to continue listing.
    #[serde(default)]
    pub page_token: Option<String>,
}

/// Lists users one page at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListUsersTool;

#[async_trait]
impl Tool for ListUsersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: LIST_USERS.into(),
            description: "Lists users in the active project, up to 1000 per call.".into(),
            input_schema: input_schema::<ListUsersParams>(),
            annotations: ToolAnnotations {
                title: Some("List users".into()),
                read_only_hint: Some(true),
                ..ToolAnnotations::default()
            },
            requirements: auth_requirements(),
        }
    }

    async fn call(&self, args: Value, ctx: &ToolContext) -> McpResult<ToolResult> {
        let params: ListUsersParams = parse_args(LIST_USERS, args)?;
        if params.limit == 0 || params.limit > MAX_USER_PAGE {
            return Err(McpError::InvalidArguments {
                tool: LIST_USERS.into(),
                message: format!("limit must be between 1 and {MAX_USER_PAGE}"),
            });
        }
        let Some(project_id) = ctx.project_id() else {
            return Ok(ToolResult::error(NO_PROJECT_MESSAGE));
        };
        match ctx
            .api
            .list_users(project_id, params.limit, params.page_token.as_deref())
            .await
        {
            Ok(page) => Ok(ToolResult::json(&page)?),
            Err(e) => Ok(api_failure(LIST_USERS, e)),
        }
    }
}
