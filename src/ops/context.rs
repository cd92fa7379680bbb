#![allow(async_fn_in_trait)]

use std::path;
use std::sync::LazyLock;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use tracing::instrument;
use url::Url;

use super::github_curl::GithubCurlClient;
use crate::config::Config;
use crate::repo::RepoRef;

/// `[user@]host:path`, the scp-like syntax git accepts for ssh remotes
static SCP_REMOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^@/]+@)?[^:/]+:(.+)$").expect("valid regex"));

// -----------------------------------------------------------------------------
// ContextOps trait

/// Ambient information about the invocation
#[cfg_attr(test, automock)]
pub trait ContextOps {
    /// The repository the current working copy belongs to
    async fn base_repo(&self) -> Result<RepoRef>;

    /// Login of the authenticated user
    async fn auth_login(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

// -----------------------------------------------------------------------------
// RealContext

/// Real implementation backed by the local git repository and the GitHub API
pub struct RealContext {
    path: path::PathBuf,
    repo_override: Option<String>,
    user: Option<String>,
    api_url: String,
    http_client: GithubCurlClient,
}

impl RealContext {
    pub fn new(config: &Config, path: path::PathBuf, http_client: GithubCurlClient) -> Self {
        Self {
            path,
            repo_override: config.repo_override.clone(),
            user: config.user.clone(),
            api_url: config.api_url(),
            http_client,
        }
    }

    /// Detect owner and repo from the `origin` remote URL
    async fn detect_remote_repo(&self) -> Result<RepoRef> {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(["config", "--get", "remote.origin.url"])
            .output()
            .await
            .context("Failed to get git remote URL")?;

        if !output.status.success() {
            bail!("No git remote 'origin' configured");
        }

        let url = String::from_utf8(output.stdout)?.trim().to_string();
        debug!(%url, "Found origin remote");
        parse_remote_url(&url)
    }
}

impl ContextOps for RealContext {
    async fn base_repo(&self) -> Result<RepoRef> {
        if let Some(repo) = &self.repo_override {
            return RepoRef::parse(repo)
                .with_context(|| format!("Invalid repository override: {}", repo));
        }
        self.detect_remote_repo().await
    }

    #[instrument(skip_all)]
    async fn auth_login(&self) -> Result<String> {
        if let Some(user) = &self.user {
            return Ok(user.clone());
        }

        let url = format!("{}/user", self.api_url);
        let body = self.http_client.get(&url).await?.error_for_status()?;
        let user: User = serde_json::from_str(&body)?;
        Ok(user.login)
    }
}

/// Parse a git remote URL into a repository.
///
/// Handles URLs like:
/// - git@github.com:owner/repo.git
/// - ssh://git@github.com/owner/repo.git
/// - https://github.com/owner/repo.git
fn parse_remote_url(remote: &str) -> Result<RepoRef> {
    if remote.contains("://") {
        let url = Url::parse(remote).with_context(|| format!("Invalid remote URL: {}", remote))?;
        return Ok(RepoRef::from_url(&url)?);
    }

    let Some(captures) = SCP_REMOTE.captures(remote) else {
        bail!("Remote URL is not a recognized git URL: {}", remote);
    };
    let path = captures[1].trim_start_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    Ok(RepoRef::from_full_name(path)?)
}
