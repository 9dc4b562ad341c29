//! Icon proxy: bounded-size fetch with a disk-backed TTL cache.

use anyhow::{anyhow, Context, Result};
use axum::extract::{Extension, Query};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::APP_USER_AGENT;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ICON_BYTES: usize = 512 * 1024;
const CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Disk cache plus the outbound HTTP client. Cached entries are a content
/// file keyed by the URL hash and a `.type` sidecar with the content type.
pub struct IconCache {
    client: reqwest::Client,
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create icon cache dir {}", dir.display()))?;
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build icon fetch client")?;
        Ok(Self { client, dir })
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        let mut name = String::with_capacity(digest.len() * 2);
        for byte in digest {
            name.push_str(&format!("{byte:02x}"));
        }
        self.dir.join(name)
    }

    async fn read_fresh(&self, path: &Path) -> Option<(Vec<u8>, String)> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > CACHE_TTL {
            return None;
        }
        let bytes = tokio::fs::read(path).await.ok()?;
        let content_type = tokio::fs::read_to_string(path.with_extension("type"))
            .await
            .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string());
        Some((bytes, content_type.trim().to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, String)> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        if !response.status().is_success() {
            return Err(anyhow!("upstream returned {}", response.status()));
        }
        if let Some(length) = response.content_length() {
            if length as usize > MAX_ICON_BYTES {
                return Err(anyhow!("upstream body of {length} bytes exceeds the cap"));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await.context("failed to read body")?;
        if bytes.len() > MAX_ICON_BYTES {
            return Err(anyhow!("upstream body exceeds the cap"));
        }

        Ok((bytes.to_vec(), content_type))
    }

    async fn store(&self, path: &Path, bytes: &[u8], content_type: &str) {
        // Cache writes are best effort; a miss next time is fine.
        if let Err(err) = tokio::fs::write(path, bytes).await {
            warn!("Failed to write icon cache entry: {err}");
            return;
        }
        if let Err(err) = tokio::fs::write(path.with_extension("type"), content_type).await {
            warn!("Failed to write icon cache sidecar: {err}");
        }
    }
}

#[derive(IntoParams, Deserialize, Debug)]
pub struct IconQuery {
    /// Icon URL to fetch and cache.
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/api/icon",
    params(IconQuery),
    responses(
        (status = 200, description = "Icon bytes, possibly from cache"),
        (status = 400, description = "Not an http(s) URL"),
        (status = 502, description = "Upstream fetch failed or oversized")
    ),
    tag = "navhub"
)]
pub async fn icon(
    query: Query<IconQuery>,
    cache: Extension<Arc<IconCache>>,
) -> Result<Response, ApiError> {
    let url = query.url.trim();
    let valid = Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        return Err(ApiError::Validation("Unsafe URL".to_string()));
    }

    let path = cache.entry_path(url);
    if let Some((bytes, content_type)) = cache.read_fresh(&path).await {
        return Ok(icon_response(bytes, &content_type));
    }

    let (bytes, content_type) = cache.fetch(url).await.map_err(ApiError::Upstream)?;
    cache.store(&path, &bytes, &content_type).await;

    Ok(icon_response(bytes, &content_type))
}

fn icon_response(bytes: Vec<u8>, content_type: &str) -> Response {
    ([(CONTENT_TYPE, content_type.to_string())], bytes).into_response()
}
