#![allow(async_fn_in_trait)]

use anyhow::Result;
use anyhow::bail;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::instrument;

use super::github_curl::GithubCurlClient;
use super::github_curl::Response;
use crate::repo::RepoRef;

// -----------------------------------------------------------------------------
// GithubOps trait

/// Operations against the hosting service
#[cfg_attr(test, automock)]
pub trait GithubOps {
    /// Check if a repository exists and is visible to the current user
    async fn repo_exists(&self, repo: &RepoRef) -> Result<bool>;

    /// Fork a repository into the current user's account and return the fork
    async fn fork_repo(&self, repo: &RepoRef) -> Result<RepoRef>;
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    owner: Owner,
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

// -----------------------------------------------------------------------------
// RealGithub

/// Real implementation that calls the GitHub REST API
pub struct RealGithub {
    api_url: String,
    http_client: GithubCurlClient,
}

impl RealGithub {
    pub fn new(api_url: String, http_client: GithubCurlClient) -> Self {
        Self {
            api_url,
            http_client,
        }
    }
}

impl GithubOps for RealGithub {
    #[instrument(skip_all, fields(repo = %repo))]
    async fn repo_exists(&self, repo: &RepoRef) -> Result<bool> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_url,
            repo.owner(),
            repo.name()
        );
        let response = self.http_client.get(&url).await?;
        exists_from_response(response)
    }

    #[instrument(skip_all, fields(repo = %repo))]
    async fn fork_repo(&self, repo: &RepoRef) -> Result<RepoRef> {
        let url = format!(
            "{}/repos/{}/{}/forks",
            self.api_url,
            repo.owner(),
            repo.name()
        );
        let body = self.http_client.post(&url, "{}").await?.error_for_status()?;
        parse_repository(&body)
    }
}

/// 200 means the repository exists. 404 means it does not, and so does a
/// redirect: the name only points at a repository that has been renamed.
fn exists_from_response(response: Response) -> Result<bool> {
    match response.status {
        200 => Ok(true),
        404 | 300..=399 => Ok(false),
        status => {
            response.error_for_status()?;
            bail!("Unexpected status {} from GitHub API", status)
        }
    }
}

fn parse_repository(body: &str) -> Result<RepoRef> {
    let repo: Repository = serde_json::from_str(body)?;
    Ok(RepoRef::new(repo.owner.login, repo.name)?.with_clone_url(repo.clone_url))
}
