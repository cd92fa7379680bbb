use std::path::Path;

use anyhow::Context;
use anyhow::Result;

/// Hostname used when nothing else is configured.
pub const DEFAULT_HOST: &str = "github.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Web host of the hosting service, e.g. `github.com`.
    pub host: String,
    pub github_token: Option<String>,
    /// Login to act as. Looked up from the API when unset.
    pub user: Option<String>,
    /// Explicit `OWNER/NAME` that replaces detection from the git remote.
    pub repo_override: Option<String>,
}

impl Config {
    /// Load config from git config in `path`, falling back to the environment
    pub fn load(path: &Path) -> Result<Self> {
        let host = git_config_get(path, "ghr.host")?
            .or_else(|| env_var("GH_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let github_token = git_config_get(path, "ghr.githubToken")?
            .or_else(|| env_var("GH_TOKEN"))
            .or_else(|| env_var("GITHUB_TOKEN"));
        let user = git_config_get(path, "ghr.user")?;

        Ok(Self {
            host,
            github_token,
            user,
            repo_override: None,
        })
    }

    /// Create a new config with explicit values (useful for tests)
    pub fn new(host: String, github_token: Option<String>, user: Option<String>) -> Self {
        Self {
            host,
            github_token,
            user,
            repo_override: None,
        }
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self::new(DEFAULT_HOST.to_string(), None, None)
    }

    pub fn with_repo_override(mut self, repo: Option<String>) -> Self {
        self.repo_override = repo;
        self
    }

    /// Base URL of the REST API for the configured host
    pub fn api_url(&self) -> String {
        if self.host == DEFAULT_HOST {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }
}

/// Read a single git config value. Returns `None` if the key is unset.
fn git_config_get(path: &Path, key: &str) -> Result<Option<String>> {
    let output = std::process::Command::new("git")
        .current_dir(path)
        .args(["config", "--get", key])
        .output()
        .context("Failed to execute git command")?;

    // Exit code 1 means the key is not set
    if !output.status.success() {
        return Ok(None);
    }

    let value = String::from_utf8(output.stdout)?.trim().to_string();
    Ok(Some(value).filter(|v| !v.is_empty()))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
