//! Strato Client — connects to the Strato management API.
//!
//! Provides a high-level API for project lookup and auth user management.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::StratoConfig;
use crate::error::{StratoError, StratoResult};
use crate::resources::{Project, ProjectList, UserPage, UserRecord};

/// Largest page `accounts:batchGet` accepts.
pub const MAX_USER_PAGE: u32 = 1000;

/// Operations the CLI and the tool handlers need from the management API.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// List projects visible to the caller.
    async fn list_projects(&self) -> StratoResult<Vec<Project>>;

    /// Fetch a single project.
    async fn get_project(&self, project_id: &str) -> StratoResult<Project>;

    /// Look up a user by UID. Returns `None` when no such user exists.
    async fn get_user(&self, project_id: &str, uid: &str) -> StratoResult<Option<UserRecord>>;

    /// Disable (`true`) or re-enable (`false`) a user.
    async fn set_user_disabled(
        &self,
        project_id: &str,
        uid: &str,
        disabled: bool,
    ) -> StratoResult<UserRecord>;

    /// Fetch one page of users.
    async fn list_users(
        &self,
        project_id: &str,
        limit: u32,
        page_token: Option<&str>,
    ) -> StratoResult<UserPage>;
}

/// Client for interacting with the Strato management API.
#[derive(Debug, Clone)]
pub struct StratoClient {
    /// API base URL.
    base_url: Url,

    /// HTTP client.
    http: Client,

    /// Bearer token.
    token: Option<String>,
}

impl StratoClient {
    /// Create a new client for the given API URL.
    pub fn new(base_url: &str) -> StratoResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("strato-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http,
            token: None,
        })
    }

    /// Create from a loaded configuration.
    pub fn from_config(config: &StratoConfig) -> StratoResult<Self> {
        let mut client = Self::new(&config.api_url)?;
        client.token = config.token.clone();
        Ok(client)
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether credentials are configured.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Internal ─────────────────────────────────────────────

    fn url(&self, path: &str) -> StratoResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authed_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> StratoResult<T> {
        let resp = self.authed_request(builder).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

/// Turn a non-success response into [`StratoError::Api`], preferring the
/// body's `error.message`.
async fn check_status(resp: Response) -> StratoResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            }
        });
    debug!(status = status.as_u16(), %message, "management API error");
    Err(StratoError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ManagementApi for StratoClient {
    async fn list_projects(&self) -> StratoResult<Vec<Project>> {
        let mut projects = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.url("/v1/projects")?;
            if let Some(ref token) = page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            let page: ProjectList = self.send(self.http.get(url)).await?;
            projects.extend(page.projects);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }
        Ok(projects)
    }

    async fn get_project(&self, project_id: &str) -> StratoResult<Project> {
        let url = self.url(&format!("/v1/projects/{project_id}"))?;
        self.send(self.http.get(url)).await
    }

    async fn get_user(&self, project_id: &str, uid: &str) -> StratoResult<Option<UserRecord>> {
        let url = self.url(&format!("/v1/projects/{project_id}/accounts:lookup"))?;
        let page: UserPage = self
            .send(
                self.http
                    .post(url)
                    .json(&serde_json::json!({ "localId": [uid] })),
            )
            .await?;
        Ok(page.users.into_iter().next())
    }

    async fn set_user_disabled(
        &self,
        project_id: &str,
        uid: &str,
        disabled: bool,
    ) -> StratoResult<UserRecord> {
        let url = self.url(&format!("/v1/projects/{project_id}/accounts:update"))?;
        self.send(self.http.post(url).json(&serde_json::json!({
            "localId": uid,
            "disableUser": disabled,
        })))
        .await
    }

    async fn list_users(
        &self,
        project_id: &str,
        limit: u32,
        page_token: Option<&str>,
    ) -> StratoResult<UserPage> {
        let limit = limit.clamp(1, MAX_USER_PAGE);
        let mut url = self.url(&format!("/v1/projects/{project_id}/accounts:batchGet"))?;
        url.query_pairs_mut()
            .append_pair("maxResults", &limit.to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("nextPageToken", token);
        }
        self.send(self.http.get(url)).await
    }
}
