use crate::config::Config;
use crate::error::Error;
use crate::ops::browser::BrowserOps;
use crate::ops::context::ContextOps;
use crate::ops::github::GithubOps;
use crate::repo::RepoRef;

pub struct App<C: ContextOps, H: GithubOps, B: BrowserOps> {
    pub config: Config,
    pub ctx: C,
    pub gh: H,
    pub browser: B,
}

impl<C: ContextOps, H: GithubOps, B: BrowserOps> App<C, H, B> {
    pub fn new(config: Config, ctx: C, gh: H, browser: B) -> Self {
        Self {
            config,
            ctx,
            gh,
            browser,
        }
    }
}

/// Shared helper methods for App
impl<C: ContextOps, H: GithubOps, B: BrowserOps> App<C, H, B> {
    /// Resolve the repository of the current working copy
    pub(crate) async fn base_repo(&self) -> Result<RepoRef, Error> {
        self.ctx
            .base_repo()
            .await
            .map_err(Error::BaseRepoResolution)
    }

    /// Web URL for a path on the configured host
    pub(crate) fn web_url(&self, path: &str) -> String {
        format!("https://{}/{}", self.config.host, path)
    }
}
