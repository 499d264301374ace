//! reqwest-backed implementation of [`ArenaApi`].

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::{
    AdminUser, ArenaSummary, ArenaSummaryDetail, Comment, CommentTarget, DetailKey, ManualRecord,
    NewComment, NewSubmission, NewUser, Role, Server, Submission, SummaryKey, SummaryPage,
};
use crate::query::comment_query;

use super::{ApiConfig, ArenaApi, ClientError, LoginResponse};

/// HTTP client for the arena stats service.
///
/// Holds the bearer token for the session; admin endpoints send it, public
/// ones don't care whether it is set.
pub struct HttpArenaClient {
    client: Client,
    api_root: String,
    service_root: String,
    token: RwLock<Option<String>>,
}

impl HttpArenaClient {
    /// Create a client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("arena-lens/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            service_root: config.service_root(),
            token: RwLock::new(None),
        })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, ClientError> {
        Self::new(ApiConfig::default())
    }

    /// Install or clear the bearer token for subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Attach the bearer token when one is installed.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().unwrap().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Pass through successful responses; turn everything else into an
    /// `Api` error carrying the server's `detail` message when it sent one.
    async fn expect_ok(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ArenaApi for HttpArenaClient {
    fn install_token(&self, token: Option<String>) {
        self.set_token(token);
    }

    async fn health(&self) -> bool {
        let url = format!("{}/", self.service_root);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Backend not reachable: {}", e);
                false
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;
        Ok(response.json().await?)
    }

    async fn reset_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/reset_password"))
            .json(&json!({
                "username": username,
                "old_password": old_password,
                "new_password": new_password,
            }))
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn summaries(
        &self,
        query: &[(String, String)],
    ) -> Result<SummaryPage<ArenaSummary>, ClientError> {
        debug!("Fetching summaries: {:?}", query);
        let response = self
            .client
            .get(self.url("/summaries"))
            .query(query)
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;
        Ok(response.json().await?)
    }

    async fn summary_details(
        &self,
        query: &[(String, String)],
    ) -> Result<SummaryPage<ArenaSummaryDetail>, ClientError> {
        let response = self
            .client
            .get(self.url("/summaries/detail"))
            .query(query)
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;
        Ok(response.json().await?)
    }

    async fn delete_summary(&self, key: &SummaryKey) -> Result<(), ClientError> {
        let request = self.client.post(self.url("/summaries/delete")).json(key);
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn batch_delete(&self, keys: &[SummaryKey]) -> Result<(), ClientError> {
        let request = self
            .client
            .post(self.url("/summaries/batch_delete"))
            .json(&json!({ "items": keys }));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn delete_details(&self, items: &[DetailKey]) -> Result<(), ClientError> {
        let request = self
            .client
            .post(self.url("/summaries/detail/delete"))
            .json(&json!({ "items": items }));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn seasons(&self, server: Server) -> Result<Vec<u32>, ClientError> {
        let mut request = self.client.get(self.url("/seasons"));
        if server != Server::All {
            request = request.query(&[("server", server.as_str())]);
        }
        let response = Self::expect_ok(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn comments(&self, target: &CommentTarget) -> Result<Vec<Comment>, ClientError> {
        let response = self
            .client
            .get(self.url("/comments"))
            .query(&comment_query(target))
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;
        Ok(response.json().await?)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/comments"))
            .json(comment)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: u64) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(&format!("/comments/{}", id)));
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn manual_add(&self, record: &ManualRecord) -> Result<(), ClientError> {
        let request = self.client.post(self.url("/manual_add")).json(record);
        let response = self.authorize(request).send().await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn submit(&self, submission: &NewSubmission) -> Result<(), ClientError> {
        let mut form = Form::new()
            .text("server", submission.server.clone())
            .text("season", submission.season.to_string())
            .text("tag", submission.tag.clone())
            .text("atk_team", NewSubmission::team_field(&submission.atk_team))
            .text("def_team", NewSubmission::team_field(&submission.def_team))
            .text("wins", submission.wins.to_string())
            .text("losses", submission.losses.to_string())
            .text("note", submission.note.clone());

        if let Some(path) = &submission.image {
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "screenshot.png".to_string());
            form = form.part("image", Part::bytes(bytes).file_name(filename));
        }

        let response = self
            .client
            .post(self.url("/submissions"))
            .multipart(form)
            .send()
            .await?;
        Self::expect_ok(response).await?;
        Ok(())
    }

    async fn submissions(&self) -> Result<Vec<Submission>, ClientError> {
        let request = self.client.get(self.url("/submissions"));
        let response = Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn submission_history(&self) -> Result<Vec<Submission>, ClientError> {
        let request = self.client.get(self.url("/submissions/history"));
        let response = Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn approve_submission(&self, id: u64) -> Result<(), ClientError> {
        let request = self
            .client
            .post(self.url(&format!("/submissions/{}/approve", id)));
        Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn reject_submission(&self, id: u64) -> Result<(), ClientError> {
        let request = self
            .client
            .post(self.url(&format!("/submissions/{}/reject", id)));
        Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn revert_submission(&self, id: u64) -> Result<(), ClientError> {
        let request = self
            .client
            .post(self.url(&format!("/submissions/{}/revert", id)));
        Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn users(&self) -> Result<Vec<AdminUser>, ClientError> {
        let request = self.client.get(self.url("/users"));
        let response = Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create_user(&self, user: &NewUser) -> Result<AdminUser, ClientError> {
        let request = self.client.post(self.url("/users")).json(user);
        let response = Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update_user_role(&self, id: u64, role: Role) -> Result<(), ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/users/{}/role", id)))
            .json(&json!({ "role": role }));
        Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<(), ClientError> {
        let request = self.client.delete(self.url(&format!("/users/{}", id)));
        Self::expect_ok(self.authorize(request).send().await?).await?;
        Ok(())
    }
}
