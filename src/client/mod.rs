//! Typed client for the arena stats REST API.
//!
//! The API itself is externally owned; this module is the one place that
//! knows its paths, verbs, auth scheme, and error body shape. Consumers
//! program against the [`ArenaApi`] trait so controllers can be exercised
//! with a scripted implementation in tests.

mod http;

pub use http::HttpArenaClient;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    AdminUser, ArenaSummary, ArenaSummaryDetail, Comment, CommentTarget, DetailKey, ManualRecord,
    NewComment, NewSubmission, NewUser, Role, Server, Submission, SummaryKey, SummaryPage,
};

/// Errors from the stats API client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API rejected the request ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service base URL, with or without the `/api` suffix.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("arena-lens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Root for API endpoints, always ending in `/api`.
    pub fn api_root(&self) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        if trimmed.ends_with("/api") {
            trimmed.to_string()
        } else {
            format!("{}/api", trimmed)
        }
    }

    /// Bare service root, used by the health probe.
    pub fn service_root(&self) -> String {
        let root = self.api_root();
        root.trim_end_matches("/api").to_string()
    }
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,

    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default)]
    pub token_type: Option<String>,
}

/// The full surface of the arena stats service as this client uses it.
#[async_trait]
pub trait ArenaApi: Send + Sync {
    /// Install or clear the bearer token used by authenticated endpoints.
    fn install_token(&self, token: Option<String>);

    /// Probe the service root; true when the backend is reachable.
    async fn health(&self) -> bool;

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError>;

    async fn reset_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError>;

    /// Paginated summary listing; `query` comes from the query composer.
    async fn summaries(
        &self,
        query: &[(String, String)],
    ) -> Result<SummaryPage<ArenaSummary>, ClientError>;

    /// Per-loadout breakdown of one pairing.
    async fn summary_details(
        &self,
        query: &[(String, String)],
    ) -> Result<SummaryPage<ArenaSummaryDetail>, ClientError>;

    async fn delete_summary(&self, key: &SummaryKey) -> Result<(), ClientError>;

    async fn batch_delete(&self, keys: &[SummaryKey]) -> Result<(), ClientError>;

    async fn delete_details(&self, items: &[DetailKey]) -> Result<(), ClientError>;

    /// Seasons with data for a server; `All` asks across servers.
    async fn seasons(&self, server: Server) -> Result<Vec<u32>, ClientError>;

    async fn comments(&self, target: &CommentTarget) -> Result<Vec<Comment>, ClientError>;

    async fn add_comment(&self, comment: &NewComment) -> Result<(), ClientError>;

    async fn delete_comment(&self, id: u64) -> Result<(), ClientError>;

    async fn manual_add(&self, record: &ManualRecord) -> Result<(), ClientError>;

    /// Public submission form; the only anonymous write endpoint.
    async fn submit(&self, submission: &NewSubmission) -> Result<(), ClientError>;

    async fn submissions(&self) -> Result<Vec<Submission>, ClientError>;

    async fn submission_history(&self) -> Result<Vec<Submission>, ClientError>;

    async fn approve_submission(&self, id: u64) -> Result<(), ClientError>;

    async fn reject_submission(&self, id: u64) -> Result<(), ClientError>;

    async fn revert_submission(&self, id: u64) -> Result<(), ClientError>;

    async fn users(&self) -> Result<Vec<AdminUser>, ClientError>;

    async fn create_user(&self, user: &NewUser) -> Result<AdminUser, ClientError>;

    async fn update_user_role(&self, id: u64, role: Role) -> Result<(), ClientError>;

    async fn delete_user(&self, id: u64) -> Result<(), ClientError>;
}
