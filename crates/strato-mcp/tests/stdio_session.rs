//! End-to-end session over an in-memory stdio transport:
//! initialize → initialized → tools/list → tools/call.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use strato_core::{
    ManagementApi, Project, ProjectState, StratoError, StratoResult, UserPage, UserRecord,
};
use strato_mcp::{
    default_registry, McpServer, StdioTransport, ToolContext, NOT_AUTHENTICATED_MESSAGE,
};

struct StaticApi;

#[async_trait]
impl ManagementApi for StaticApi {
    async fn list_projects(&self) -> StratoResult<Vec<Project>> {
        Ok(vec![])
    }

    async fn get_project(&self, project_id: &str) -> StratoResult<Project> {
        Ok(Project {
            project_id: project_id.to_string(),
            project_number: None,
            display_name: Some("Demo".into()),
            name: None,
            state: ProjectState::Active,
            resources: None,
        })
    }

    async fn get_user(&self, _: &str, _: &str) -> StratoResult<Option<UserRecord>> {
        Ok(None)
    }

    async fn set_user_disabled(&self, _: &str, uid: &str, _: bool) -> StratoResult<UserRecord> {
        Err(StratoError::Api {
            status: 400,
            message: format!("USER_NOT_FOUND: {uid}"),
        })
    }

    async fn list_users(&self, _: &str, _: u32, _: Option<&str>) -> StratoResult<UserPage> {
        Ok(UserPage::default())
    }
}

async fn run_session(input: &str, authenticated: bool) -> Vec<Value> {
    let ctx = ToolContext::new(Arc::new(StaticApi), Some("demo-app".into()), authenticated);
    let server = McpServer::new(default_registry(), ctx);
    let mut transport = StdioTransport::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    server.run(&mut transport).await.expect("session");

    let output = String::from_utf8(transport.into_writer()).expect("utf8");
    output
        .lines()
        .map(|l| serde_json::from_str(l).expect("response json"))
        .collect()
}

#[tokio::test]
async fn full_session_answers_every_request_once() {
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0"}}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"project_get","arguments":{}}}"#,
        r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#,
    ]
    .join("\n");

    let responses = run_session(&input, true).await;
    let ids: Vec<&Value> = responses.iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!(1), &json!(2), &json!(3), &json!(4)]);

    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 4);

    let call = &responses[2]["result"];
    assert_eq!(call["isError"], false);
    let project: Value = serde_json::from_str(call["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(project["projectId"], "demo-app");

    assert_eq!(responses[3]["result"], json!({}));
}

#[tokio::test]
async fn unauthenticated_calls_are_refused_per_tool() {
    let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"auth_get_user","arguments":{"uid":"u1"}}}"#;
    let responses = run_session(input, false).await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    assert_eq!(result["content"][0]["text"], NOT_AUTHENTICATED_MESSAGE);
}

#[tokio::test]
async fn api_errors_surface_as_tool_errors() {
    let input = r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"auth_disable_user","arguments":{"uid":"ghost","disabled":true}}}"#;
    let responses = run_session(input, true).await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("USER_NOT_FOUND: ghost"));
}
