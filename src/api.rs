//! HTTP client for the analysis backend.
//!
//! Three operations: health probe, index rebuild, and the single opaque
//! analyze request (audio upload or transcript text). Analysis can take a
//! while, so the client timeout is configurable and defaults to two minutes.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::model::{Ack, Health, Report};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("claimcheck-cli/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> AppResult<Health> {
        let resp = self
            .http
            .get(self.url("/health/ibm"))
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(failure_from_response(resp).await);
        }
        resp.json().await.map_err(transport_error)
    }

    pub async fn rebuild_index(&self) -> AppResult<Ack> {
        let resp = self
            .http
            .post(self.url("/kb/rebuild"))
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(failure_from_response(resp).await);
        }
        resp.json().await.map_err(transport_error)
    }

    /// Upload a recording for the full ASR + fact-check pipeline.
    pub async fn analyze_audio(&self, path: &Path) -> AppResult<Report> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Transport(format!("failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let part = multipart::Part::bytes(data).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("/process-audio"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(failure_from_response(resp).await);
        }
        resp.json().await.map_err(transport_error)
    }

    /// Submit transcript text; the backend skips ASR for this path.
    pub async fn analyze_transcript(&self, text: &str) -> AppResult<Report> {
        let resp = self
            .http
            .post(self.url("/process-transcript"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(transport_error)?;
        if !resp.status().is_success() {
            return Err(failure_from_response(resp).await);
        }
        resp.json().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Transport("request timed out".to_string())
    } else {
        AppError::Transport(err.to_string())
    }
}

async fn failure_from_response(resp: reqwest::Response) -> AppError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    AppError::Transport(extract_detail(status, &body))
}

/// Prefer the backend's structured `detail` message; otherwise report the
/// HTTP status.
fn extract_detail(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            if !detail.is_empty() {
                return detail.to_string();
            }
        }
    }
    format!("request failed with status {status}")
}
