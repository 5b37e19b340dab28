//! GitHub contents API implementation of [`ReportStore`].
//!
//! The persisted report lives as a single file in a repository. GET returns
//! the file content base64-encoded along with its blob sha; PUT uploads new
//! content guarded by that sha and is rejected when the sha is stale.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::{ReportStore, VersionToken};
use crate::table::ReportTable;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "society-reporter";

/// Report store backed by a file in a GitHub repository.
pub struct GithubStore {
    client: Client,
    token: String,
    repo: String,
    path: String,
    base_url: String,
}

/// GET response for a repository file.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    /// Base64 file content; GitHub wraps it with newlines
    content: String,

    /// Blob sha, required for the guarded update
    sha: String,
}

/// PUT request body for a guarded file update.
#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: String,
    content: String,
    sha: &'a str,
}

impl GithubStore {
    /// Create a store for `path` inside `repo` ("owner/name").
    pub fn new(
        token: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            repo: repo.into(),
            path: path.into(),
            base_url: "https://api.github.com".to_string(),
        })
    }

    /// Set a custom API base URL (for GitHub Enterprise or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn contents_url(&self) -> String {
        format!("{}/repos/{}/contents/{}", self.base_url, self.repo, self.path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }
}

/// GitHub rejects a stale sha with 409; some paths report 422.
fn stale_token_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    )
}

/// Decode a contents-API blob. GitHub line-wraps the base64 payload, so
/// whitespace is stripped before decoding.
fn decode_blob(content: &str) -> Result<Vec<u8>, StoreError> {
    let packed: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(packed)
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl ReportStore for GithubStore {
    async fn fetch(&self) -> Result<(ReportTable, VersionToken), StoreError> {
        let response = self
            .request(self.client.get(self.contents_url()))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "report fetch failed");
            return Err(StoreError::Transport(format!(
                "fetch failed ({}): {}",
                status, body
            )));
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let bytes = decode_blob(&contents.content)?;
        let table = ReportTable::from_csv(&bytes)?;
        debug!(rows = table.len(), sha = %contents.sha, "fetched persisted report");

        Ok((table, VersionToken::new(contents.sha)))
    }

    async fn write(&self, table: &ReportTable, token: VersionToken) -> Result<(), StoreError> {
        let bytes = table.to_csv()?;
        let body = UpdateRequest {
            message: format!("Update consolidated society report ({})", Utc::now().format("%Y-%m-%d")),
            content: BASE64.encode(&bytes),
            sha: token.as_str(),
        };

        let response = self
            .request(self.client.put(self.contents_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                debug!(rows = table.len(), "report uploaded");
                Ok(())
            }
            status if stale_token_status(status) => {
                warn!("report write rejected: stale version token");
                Err(StoreError::Conflict)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, error = %body, "report write failed");
                Err(StoreError::Transport(format!(
                    "write failed ({}): {}",
                    status, body
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_blob_strips_line_wrapping() {
        // "Society Name\nFLASCO" encoded and wrapped the way the contents
        // API returns it.
        let encoded = BASE64.encode(b"Society Name\nFLASCO");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{}\n{}\n", head, tail);

        assert_eq!(decode_blob(&wrapped).unwrap(), b"Society Name\nFLASCO");
    }

    #[test]
    fn test_decode_blob_rejects_invalid_base64() {
        assert!(matches!(
            decode_blob("not base64!!"),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_stale_token_statuses() {
        assert!(stale_token_status(StatusCode::CONFLICT));
        assert!(stale_token_status(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!stale_token_status(StatusCode::NOT_FOUND));
        assert!(!stale_token_status(StatusCode::OK));
    }

    #[test]
    fn test_contents_url() {
        let store = GithubStore::new("t", "owner/repo", "report.csv")
            .unwrap()
            .with_base_url("http://localhost:9999");

        assert_eq!(
            store.contents_url(),
            "http://localhost:9999/repos/owner/repo/contents/report.csv"
        );
    }
}
