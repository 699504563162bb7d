use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::StatusCode;
use rw_core::{Error, RemoteBlob, RemoteStore, Result, VersionToken};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, info};

const GITHUB_API_URL: &str = "https://api.github.com";

/// Remote blob store backed by the GitHub contents API.
///
/// The blob sha doubles as the version token: reads return it, writes pass it
/// back as the expected prior revision. GitHub rejects a stale sha, which is
/// exactly the optimistic-concurrency check the pipeline needs.
pub struct GithubStore {
    token: String,
    repo: String,
    branch: String,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for GithubStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubStore")
            .field("token", &"<redacted>")
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

impl GithubStore {
    pub fn new(token: &str, repo: &str, branch: &str) -> Self {
        Self {
            token: token.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            http: reqwest::Client::new(),
            base_url: GITHUB_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.base_url, self.repo, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "riskwire")
    }
}

#[async_trait]
impl RemoteStore for GithubStore {
    async fn get(&self, path: &str) -> Result<Option<RemoteBlob>> {
        let url = self.contents_url(path);
        debug!("Downloading {} from {}@{}", path, self.repo, self.branch);

        let response = self
            .request(self.http.get(&url))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Publish(format!(
                "failed to download {}: {} {}",
                path, status, body
            )));
        }

        let contents: ContentsResponse = response.json().await?;
        let encoded = contents.content.ok_or_else(|| {
            Error::Publish(format!("{} has no inline content (too large?)", path))
        })?;
        let content = decode_base64_content(&encoded)?;

        Ok(Some(RemoteBlob {
            content,
            version: VersionToken(contents.sha),
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected: Option<&VersionToken>,
    ) -> Result<VersionToken> {
        let url = self.contents_url(path);

        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": self.branch,
        });
        if let Some(token) = expected {
            body["sha"] = json!(token.0);
        }

        let response = self.request(self.http.put(&url)).json(&body).send().await?;

        match response.status() {
            // GitHub answers 409 (and sometimes 422) when the sha no longer
            // matches the tip of the branch.
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(Error::VersionConflict {
                    path: path.to_string(),
                })
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Publish(format!(
                    "failed to upload {}: {} {}",
                    path, status, body
                )))
            }
            _ => {
                let put: PutResponse = response.json().await?;
                info!("🚀 Published {} to {}@{}", path, self.repo, self.branch);
                Ok(VersionToken(put.content.sha))
            }
        }
    }
}

/// The contents API wraps base64 at 60 columns; strip whitespace first.
fn decode_base64_content(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| Error::Publish(format!("invalid base64 in contents response: {}", e)))
}
