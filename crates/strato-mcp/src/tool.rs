//! Tool — a schema-validated operation exposed to agents.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strato_core::ManagementApi;

use crate::content::ToolResult;
use crate::error::{McpError, McpResult};

/// What `tools/list` reports for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,

    /// What the tool does, for the agent.
    pub description: String,

    /// JSON Schema for the arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,

    /// Behavioural hints.
    #[serde(default)]
    pub annotations: ToolAnnotations,

    /// What the tool needs from its context.
    #[serde(rename = "_meta", default)]
    pub requirements: ToolRequirements,
}

/// Behavioural hints for clients deciding whether to confirm a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
}

/// Context a tool requires before it can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequirements {
    /// Needs API credentials.
    #[serde(default)]
    pub requires_auth: bool,

    /// Needs an active project.
    #[serde(default)]
    pub requires_project: bool,
}

/// Ambient context handed to every tool call.
#[derive(Clone)]
pub struct ToolContext {
    /// The active project, if one was resolved.
    pub project_id: Option<String>,

    /// Whether API credentials are configured.
    pub authenticated: bool,

    /// Management API client.
    pub api: Arc<dyn ManagementApi>,
}

impl ToolContext {
    /// Build a context.
    pub fn new(api: Arc<dyn ManagementApi>, project_id: Option<String>, authenticated: bool) -> Self {
        Self {
            project_id,
            authenticated,
            api,
        }
    }

    /// The active project, ignoring empty values.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref().filter(|p| !p.is_empty())
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("project_id", &self.project_id)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

/// A tool agents can call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description, schema and requirements.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with raw JSON arguments.
    ///
    /// Expected failures are returned as error results; `Err` is reserved
    /// for arguments that fail validation and internal faults.
    async fn call(&self, args: Value, ctx: &ToolContext) -> McpResult<ToolResult>;
}

/// JSON Schema of a parameter type.
pub fn input_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
}

/// Validate and decode tool arguments. `null` is treated as `{}`.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> McpResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| McpError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}
