use pretty_assertions::assert_eq;
use serde_json::json;
use strato_core::{ManagementApi, ProjectState, StratoClient, StratoError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> StratoClient {
    StratoClient::new(&server.uri())
        .unwrap()
        .with_token("test-token")
}

#[tokio::test]
async fn get_project_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo-app"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectId": "demo-app",
            "displayName": "Demo App",
            "state": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = client(&server).await.get_project("demo-app").await.unwrap();
    assert_eq!(project.project_id, "demo-app");
    assert_eq!(project.display_name.as_deref(), Some("Demo App"));
    assert_eq!(project.state, ProjectState::Active);
}

#[tokio::test]
async fn list_projects_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"projectId": "second"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"projectId": "first"}],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let projects = client(&server).await.list_projects().await.unwrap();
    let ids: Vec<_> = projects.iter().map(|p| p.project_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
}

#[tokio::test]
async fn api_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Project missing not found."}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .get_project("missing")
        .await
        .unwrap_err();
    match err {
        StratoError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Project missing not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_user_returns_none_for_unknown_uid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/demo-app/accounts:lookup"))
        .and(body_json(json!({"localId": ["nobody"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let user = client(&server)
        .await
        .get_user("demo-app", "nobody")
        .await
        .unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn set_user_disabled_posts_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/demo-app/accounts:update"))
        .and(body_json(json!({"localId": "uid-1", "disableUser": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "email": "ada@example.com",
            "disabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server)
        .await
        .set_user_disabled("demo-app", "uid-1", true)
        .await
        .unwrap();
    assert!(user.disabled);
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn list_users_clamps_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo-app/accounts:batchGet"))
        .and(query_param("maxResults", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"localId": "a"}, {"localId": "b", "disabled": true}],
            "nextPageToken": "next"
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .await
        .list_users("demo-app", 5000, None)
        .await
        .unwrap();
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.next_page_token.as_deref(), Some("next"));
}
