//! Where the pull request text comes from

pub mod client;
pub mod event;

pub use client::GitHubApiClient;
pub use event::{extract_owner_repo, pull_request_number_from_ref, PullRequestEvent};

use crate::error::{Error, Result};
use crate::traits::TextSource;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs for choosing a text source. Borrowed from CLI args where possible.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig<'a> {
    /// Explicit text, wins over everything else
    pub text: Option<Cow<'a, str>>,
    /// File holding the text
    pub text_file: Option<PathBuf>,
    /// `owner/repo`
    pub repository: Option<Cow<'a, str>>,
    /// Explicit PR number
    pub pr_number: Option<u64>,
    /// `GITHUB_REF`, used to infer the PR number
    pub github_ref: Option<Cow<'a, str>>,
    /// Parsed `GITHUB_EVENT_PATH` payload
    pub event: Option<PullRequestEvent>,
    /// API base URL
    pub api_url: Option<Cow<'a, str>>,
    /// API token
    pub token: Option<Cow<'a, str>>,
    /// Skip the API and use the event payload body
    pub no_api: bool,
}

/// A concrete text source
#[derive(Debug)]
pub enum PullRequestText {
    /// Text given directly
    Static(String),
    /// Text read from a file
    File(PathBuf),
    /// Description fetched from the REST API
    Api {
        /// Client
        client: GitHubApiClient,
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// PR number
        number: u64,
    },
    /// Not running for a pull request: no text
    NotAPullRequest,
}

impl PullRequestText {
    /// Pick a source in priority order: explicit text, text file, REST API,
    /// event payload body, then nothing.
    pub fn select(config: SourceConfig<'_>) -> Result<Self> {
        if let Some(text) = config.text {
            return Ok(Self::Static(text.into_owned()));
        }

        if let Some(path) = config.text_file {
            return Ok(Self::File(path));
        }

        let number = config
            .pr_number
            .or_else(|| config.event.as_ref().and_then(|e| e.pull_request_number()))
            .or_else(|| {
                config
                    .github_ref
                    .as_deref()
                    .and_then(pull_request_number_from_ref)
            });

        let Some(number) = number else {
            info!("not a pull request run, no text to scan");
            return Ok(Self::NotAPullRequest);
        };

        if config.no_api {
            return match config.event.as_ref().and_then(|e| e.pull_request_body()) {
                Some(body) => Ok(Self::Static(body.to_string())),
                None => {
                    warn!(pr = number, "API disabled and event payload has no pull request body");
                    Ok(Self::NotAPullRequest)
                }
            };
        }

        let repository = config.repository.ok_or_else(|| {
            Error::Config("GITHUB_REPOSITORY not set; cannot fetch the pull request".to_string())
        })?;
        let (owner, repo) = extract_owner_repo(&repository)?;

        let api_url = config
            .api_url
            .map(Cow::into_owned)
            .unwrap_or_else(|| client::DEFAULT_API_URL.to_string());
        let client = GitHubApiClient::new(api_url, config.token.map(Cow::into_owned));

        Ok(Self::Api {
            client,
            owner,
            repo,
            number,
        })
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Static(_) => "inline text".to_string(),
            Self::File(path) => format!("file {}", path.display()),
            Self::Api {
                owner,
                repo,
                number,
                ..
            } => format!("{}/{}#{}", owner, repo, number),
            Self::NotAPullRequest => "none".to_string(),
        }
    }
}

impl TextSource for PullRequestText {
    async fn fetch_text(&self) -> Result<String> {
        match self {
            Self::Static(text) => Ok(text.clone()),
            Self::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::SourceUnavailable(format!(
                    "Failed to read text file '{}': {}",
                    path.display(),
                    e
                ))
            }),
            Self::Api {
                client,
                owner,
                repo,
                number,
            } => client.fetch_pull_request_body(owner, repo, *number).await,
            Self::NotAPullRequest => Ok(String::new()),
        }
    }
}
