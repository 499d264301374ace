//! Student catalog client with local caching.
//!
//! The catalog is a static JSON document published per language by a
//! third-party service. It changes rarely and is fetched straight from the
//! client, so responses are cached on disk with a TTL and re-served from
//! there while fresh.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::{CatalogLanguage, StudentCatalog};

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata stored alongside a cached document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_length: usize,
}

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog base URL; the language segment and document name are appended.
    pub base_url: String,

    /// Directory for cached documents.
    pub cache_dir: PathBuf,

    /// How long a cached document is considered fresh.
    pub cache_ttl: Duration,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://schaledb.com/data".to_string(),
            cache_dir: PathBuf::from("./cache/catalog"),
            cache_ttl: Duration::from_secs(24 * 3600),
            timeout: Duration::from_secs(30),
            user_agent: concat!("arena-lens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Catalog fetcher with disk caching.
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
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

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, CatalogError> {
        Self::new(CatalogConfig::default())
    }

    /// Load the student catalog for a language, from cache when fresh.
    pub async fn students(&self, lang: CatalogLanguage) -> Result<StudentCatalog, CatalogError> {
        let url = self.document_url(lang);

        if let Some(raw) = self.read_cache(&url).await? {
            info!("Serving student catalog from cache");
            return Ok(StudentCatalog::parse(&raw)?);
        }

        info!("Fetching student catalog: {}", url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let raw = response.text().await?;

        let catalog = StudentCatalog::parse(&raw)?;
        self.write_cache(&url, &raw).await?;
        Ok(catalog)
    }

    /// Like [`students`](Self::students) but degrades to an empty catalog on
    /// failure, so listings can still render with placeholder names.
    pub async fn students_or_empty(&self, lang: CatalogLanguage) -> StudentCatalog {
        match self.students(lang).await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Failed to load student catalog: {}", e);
                StudentCatalog::default()
            }
        }
    }

    fn document_url(&self, lang: CatalogLanguage) -> String {
        format!(
            "{}/{}/students.json",
            self.config.base_url.trim_end_matches('/'),
            lang.segment()
        )
    }

    /// Cached document path for a URL.
    fn cache_path(&self, url: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}.json", Self::url_hash(url)))
    }

    /// Sidecar metadata path for a URL.
    fn meta_path(&self, url: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}.meta.json", Self::url_hash(url)))
    }

    /// Hash a URL to a short cache key.
    fn url_hash(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }

    /// Read a cached document if present and fresh.
    async fn read_cache(&self, url: &str) -> Result<Option<String>, CatalogError> {
        let cache_path = self.cache_path(url);
        let meta_path = self.meta_path(url);
        if !cache_path.exists() || !meta_path.exists() {
            return Ok(None);
        }

        let meta_raw = fs::read_to_string(&meta_path).await?;
        let meta: CacheMetadata = match serde_json::from_str(&meta_raw) {
            Ok(m) => m,
            Err(_) => return Ok(None),
        };

        let age = Utc::now().signed_duration_since(meta.fetched_at);
        if age.num_seconds() > self.config.cache_ttl.as_secs() as i64 {
            debug!("Catalog cache expired for {}", url);
            return Ok(None);
        }

        Ok(Some(fs::read_to_string(&cache_path).await?))
    }

    async fn write_cache(&self, url: &str, raw: &str) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.config.cache_dir).await?;
        fs::write(self.cache_path(url), raw).await?;

        let meta = CacheMetadata {
            url: url.to_string(),
            fetched_at: Utc::now(),
            content_length: raw.len(),
        };
        fs::write(self.meta_path(url), serde_json::to_string_pretty(&meta)?).await?;
        Ok(())
    }
}
