//! GitHub Actions event payload and environment parsing

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// The parts of a `pull_request` / `pull_request_target` event we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestEvent {
    /// Present only for pull request events
    pub pull_request: Option<PullRequestPayload>,
}

/// `pull_request` object embedded in the event
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    /// PR number
    pub number: u64,
    /// Description at the time the event fired; `null` when empty
    pub body: Option<String>,
}

impl PullRequestEvent {
    /// Parse an event payload from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::EventParse(e.to_string()))
    }

    /// Read and parse the event payload at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::EventParse(format!(
                "Failed to read event payload '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Read the payload named by `GITHUB_EVENT_PATH`, `None` outside Actions
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("GITHUB_EVENT_PATH") {
            Ok(path) if !path.is_empty() => Self::from_path(path).map(Some),
            _ => Ok(None),
        }
    }

    /// PR number from the payload
    pub fn pull_request_number(&self) -> Option<u64> {
        self.pull_request.as_ref().map(|pr| pr.number)
    }

    /// PR description from the payload, empty when `null`
    pub fn pull_request_body(&self) -> Option<&str> {
        self.pull_request
            .as_ref()
            .map(|pr| pr.body.as_deref().unwrap_or(""))
    }
}

/// Split `owner/repo` (the `GITHUB_REPOSITORY` format)
pub fn extract_owner_repo(repository: &str) -> Result<(String, String)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "Invalid GITHUB_REPOSITORY format: {}",
            repository
        ))),
    }
}

/// PR number from a `refs/pull/<n>/merge` style ref
pub fn pull_request_number_from_ref(github_ref: &str) -> Option<u64> {
    let rest = github_ref.strip_prefix("refs/pull/")?;
    let (number, _) = rest.split_once('/')?;
    number.parse().ok()
}
