//! GitHub REST API client for pull request descriptions

use crate::error::{Error, Result};
use serde::Deserialize;

/// Default public API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The subset of the pull request object we read
#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    #[allow(dead_code)]
    number: u64,
    /// `null` when the description was left empty
    body: Option<String>,
}

/// GitHub API client for fetching PR descriptions
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(base_url: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prref/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Endpoint for a single pull request
    pub fn pull_request_url(&self, owner: &str, repo: &str, number: u64) -> String {
        format!("{}/repos/{}/{}/pulls/{}", self.base_url, owner, repo, number)
    }

    /// Fetch the description of a pull request.
    ///
    /// A `null` body yields an empty string. Transport failures and
    /// non-success statuses are `Error::SourceUnavailable`.
    pub async fn fetch_pull_request_body(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<String> {
        let url = self.pull_request_url(owner, repo, number);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            Error::SourceUnavailable(format!(
                "GitHub API request failed: {}",
                e.without_url()
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "GitHub API returned {} for {}/{}#{}",
                status, owner, repo, number
            )));
        }

        let pr: GitHubPullRequest = response.json().await.map_err(|e| {
            Error::SourceUnavailable(format!(
                "Failed to parse GitHub API response: {}",
                e.without_url()
            ))
        })?;

        Ok(pr.body.unwrap_or_default())
    }
}
