use anyhow::Result;
use url::Url;

use crate::App;
use crate::error::Error;
use crate::ops::browser::BrowserOps;
use crate::ops::context::ContextOps;
use crate::ops::github::GithubOps;
use crate::repo;

impl<C: ContextOps, H: GithubOps, B: BrowserOps> App<C, H, B> {
    /// Resolve the web page to open for a repository argument.
    ///
    /// - No argument: the page of the current repository.
    /// - A URL: used verbatim.
    /// - Anything else: appended to the host as-is, without validating that
    ///   it has the `OWNER/NAME` shape.
    pub async fn view_url(&self, repo_arg: Option<&str>) -> Result<String, Error> {
        match repo_arg.filter(|arg| !arg.is_empty()) {
            None => {
                let base_repo = self.base_repo().await?;
                Ok(self.web_url(&base_repo.full_name()))
            }
            Some(arg) if repo::is_url(arg) => Ok(arg.to_string()),
            Some(arg) => Ok(self.web_url(arg)),
        }
    }

    /// Open a repository in the browser.
    pub async fn cmd_view(
        &self,
        repo_arg: Option<&str>,
        stderr: &mut impl std::io::Write,
    ) -> Result<()> {
        let open_url = self.view_url(repo_arg).await?;
        self.browser
            .open(&open_url)
            .await
            .map_err(Error::BrowserLaunch)?;

        writeln!(stderr, "Opening {} in your browser.", display_url(&open_url))?;

        Ok(())
    }
}

/// Strip the scheme from a URL for display, e.g. `github.com/owner/repo`
fn display_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}{}", host, parsed.path().trim_end_matches('/')),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}
