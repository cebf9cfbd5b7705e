//! Remote store backed by a file in a GitHub repository.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lexis_core::error::{ErrorCode, LexisError, LexisResult};
use lexis_core::{RemoteDocument, RemoteStore, SyncConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_AGENT: &str = concat!("lexis/", env!("CARGO_PKG_VERSION"));

/// Reads and writes the vocabulary document through the GitHub contents API.
///
/// `fetch` is `GET /repos/{owner}/{repo}/contents/{path}`; `put` is the
/// matching `PUT`, carrying the blob `sha` as the revision marker.
pub struct GithubContentsStore {
    client: Client,
    token: SecretString,
    url: Url,
    commit_message: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<PutContent>,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

impl GithubContentsStore {
    /// Create a store from sync configuration.
    ///
    /// Fails when the configuration is incomplete or `api_base` is not a URL.
    pub fn new(config: &SyncConfig) -> LexisResult<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or_else(|| LexisError::remote_not_configured("GitHub token is not set"))?;
        let url = contents_url(&config.api_base, &config.owner, &config.repo, &config.path)?;

        let timeout_secs = config.timeout_secs.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LexisError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            url,
            commit_message: config.commit_message.clone(),
            timeout_secs,
        })
    }

    /// The contents endpoint this store talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn headers(&self) -> LexisResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
            .map_err(|_| LexisError::Configuration("GitHub token is not a valid header".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_AGENT));
        Ok(headers)
    }
}

/// Build `{api_base}/repos/{owner}/{repo}/contents/{path}` with each segment escaped.
pub fn contents_url(api_base: &str, owner: &str, repo: &str, path: &str) -> LexisResult<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| LexisError::Configuration(format!("Invalid API base '{}': {}", api_base, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| LexisError::Configuration(format!("API base '{}' cannot hold a path", api_base)))?;
        segments
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(path.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

fn transport_error(operation: &str, timeout_secs: u64, err: reqwest::Error) -> LexisError {
    if err.is_timeout() {
        return LexisError::timeout(operation, timeout_secs);
    }
    LexisError::RemoteUnavailable {
        message: format!("{} failed: {}", operation, err),
        code: ErrorCode::RemConnectionFailed,
        source: Some(Box::new(err)),
    }
}

fn decode_contents(body: ContentsResponse) -> LexisResult<RemoteDocument> {
    if let Some(ref encoding) = body.encoding {
        if encoding != "base64" {
            return Err(LexisError::remote_malformed(format!(
                "Unsupported content encoding '{}'",
                encoding
            )));
        }
    }

    let encoded: String = body
        .content
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| LexisError::remote_malformed(format!("Invalid base64 content: {}", e)))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| LexisError::remote_malformed(format!("Content is not UTF-8: {}", e)))?;

    Ok(RemoteDocument {
        content,
        revision: Some(body.sha),
    })
}

async fn error_body(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[async_trait]
impl RemoteStore for GithubContentsStore {
    async fn fetch(&self) -> LexisResult<Option<RemoteDocument>> {
        let response = self
            .client
            .get(self.url.clone())
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| transport_error("fetch", self.timeout_secs, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(url = %self.url, "Remote vocabulary file does not exist");
            return Ok(None);
        }
        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            return Err(LexisError::from_http_status(status, &body));
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| LexisError::remote_malformed(e.to_string()))?;
        let document = decode_contents(body)?;
        debug!(url = %self.url, bytes = document.content.len(), "Fetched remote vocabulary");
        Ok(Some(document))
    }

    async fn put(&self, content: &str, revision: Option<String>) -> LexisResult<Option<String>> {
        let request = PutRequest {
            message: &self.commit_message,
            content: STANDARD.encode(content.as_bytes()),
            sha: revision,
        };

        let response = self
            .client
            .put(self.url.clone())
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("put", self.timeout_secs, e))?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            return Err(LexisError::from_http_status(status, &body));
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| LexisError::remote_malformed(e.to_string()))?;
        let sha = body.content.map(|c| c.sha);
        debug!(url = %self.url, sha = sha.as_deref().unwrap_or("-"), "Updated remote vocabulary");
        Ok(sha)
    }
}
