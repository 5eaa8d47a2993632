//! MCP server — dispatches JSON-RPC requests to the tool registry.
//!
//! Notifications (no `id`) are handled without a response. Lines that are
//! not valid JSON-RPC get a parse error with a null id.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::error::{McpError, McpResult};
use crate::jsonrpc::{
    methods, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION,
};
use crate::registry::ToolRegistry;
use crate::tool::ToolContext;
use crate::transport::StdioTransport;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "strato";

/// Parameters of `tools/call`.
#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Serves a tool registry to one client.
#[derive(Debug)]
pub struct McpServer {
    registry: ToolRegistry,
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve requests until the input closes.
    pub async fn run<R, W>(&self, transport: &mut StdioTransport<R, W>) -> McpResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            tools = self.registry.len(),
            project = ?self.ctx.project_id(),
            "MCP server listening on stdio"
        );
        loop {
            let response = match transport.read_line().await {
                Ok(None) => break,
                Ok(Some(line)) if line.is_empty() => continue,
                Ok(Some(line)) => self.handle_line(&line).await,
                Err(McpError::InvalidUtf8(e)) => {
                    warn!(error = %e, "received a line that is not UTF-8");
                    Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())))
                }
                Err(e) => return Err(e),
            };
            if let Some(response) = response {
                transport.write_line(&serde_json::to_string(&response)?).await?;
            }
        }
        info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one raw line. `None` means nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!(error = %e, "failed to parse JSON-RPC message");
                Some(JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())))
            }
        }
    }

    /// Dispatch a parsed request. Notifications yield `None`.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            if request.method == methods::INITIALIZED {
                info!("client finished initialization");
            } else {
                debug!(method = %request.method, "ignoring notification");
            }
            return None;
        };
        debug!(method = %request.method, id = ?id, "received request");

        if request.jsonrpc != JSONRPC_VERSION {
            let detail = format!("unsupported jsonrpc version {:?}", request.jsonrpc);
            return Some(JsonRpcResponse::error(Some(id), JsonRpcError::invalid_request(detail)));
        }

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => Ok(self.initialize()),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => Ok(json!({ "tools": self.registry.definitions() })),
            methods::TOOLS_CALL => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };
        Some(respond(id, outcome))
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        match self.registry.call(&params.name, params.arguments, &self.ctx).await {
            Ok(result) => {
                serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
            }
            Err(e @ (McpError::UnknownTool(_) | McpError::InvalidArguments { .. })) => {
                Err(JsonRpcError::invalid_params(e.to_string()))
            }
            Err(e) => Err(JsonRpcError::internal_error(e.to_string())),
        }
    }
}

fn respond(id: RequestId, outcome: Result<Value, JsonRpcError>) -> JsonRpcResponse {
    match outcome {
        Ok(result) => JsonRpcResponse::success(Some(id), result),
        Err(error) => JsonRpcResponse::error(Some(id), error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_registry;
    use crate::tools::testing::{context, FakeApi};
    use pretty_assertions::assert_eq;

    fn server(project: Option<&str>) -> McpServer {
        let (_, ctx) = context(FakeApi::with_user("u1"), project);
        McpServer::new(default_registry(), ctx)
    }

    #[tokio::test]
    async fn test_initialize_reports_tools_capability() {
        let resp = server(None)
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "strato");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let resp = server(None)
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_is_sorted() {
        let resp = server(None)
            .handle_line(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let names: Vec<String> = resp.result.unwrap()["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["auth_disable_user", "auth_get_user", "auth_list_users", "project_get"]
        );
        assert_eq!(resp.id, Some(RequestId::String("a".into())));
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_arguments_are_invalid_params() {
        let srv = server(Some("demo-app"));

        let resp = srv
            .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"nope"}}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32602);

        let resp = srv
            .handle_line(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"auth_disable_user","arguments":{"uid":"u1"}}}"#,
            )
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_missing_project_is_tool_error_not_protocol_error() {
        let resp = server(None)
            .handle_line(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"project_get","arguments":{}}}"#,
            )
            .await
            .unwrap();
        assert!(!resp.is_error());
        assert_eq!(resp.result.unwrap()["isError"], true);
    }

    #[tokio::test]
    async fn test_garbage_and_unknown_method() {
        let srv = server(None);

        let resp = srv.handle_line("not json").await.unwrap();
        assert_eq!(resp.id, None);
        assert_eq!(resp.error.unwrap().code, -32700);

        let resp = srv
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32601);

        let resp = srv
            .handle_line(r#"{"jsonrpc":"1.0","id":6,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_non_utf8_line_gets_parse_error_and_session_continues() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#);
        input.push(b'\n');
        let mut transport = StdioTransport::new(std::io::Cursor::new(input), Vec::new());

        server(None).run(&mut transport).await.unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], 7);
        assert_eq!(responses[1]["result"], json!({}));
    }
}
