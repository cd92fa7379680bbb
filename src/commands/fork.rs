use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::App;
use crate::error::Error;
use crate::ops::browser::BrowserOps;
use crate::ops::context::ContextOps;
use crate::ops::github::GithubOps;
use crate::repo::RepoRef;

impl<C: ContextOps, H: GithubOps, B: BrowserOps> App<C, H, B> {
    /// Fork a repository into the authenticated user's account.
    ///
    /// 1. Resolve the repository to fork: the argument if given (URL or
    ///    `OWNER/NAME`), otherwise the current repository.
    /// 2. Look up the authenticated login.
    /// 3. Check whether `login/name` already exists and refuse if it does.
    /// 4. Create the fork and return it.
    pub async fn fork(&self, repo_arg: Option<&str>) -> Result<RepoRef, Error> {
        let source = self.fork_source(repo_arg).await?;
        self.fork_from(&source).await
    }

    /// Create a fork and print how to use it.
    pub async fn cmd_fork(
        &self,
        repo_arg: Option<&str>,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        let source = self.fork_source(repo_arg).await?;
        let forked = self.fork_from(&source).await?;

        writeln!(
            stdout,
            "{} {} {}!",
            source.full_name().cyan(),
            "successfully forked to".green(),
            forked.full_name().cyan()
        )?;
        if let Some(clone_url) = forked.clone_url() {
            writeln!(
                stdout,
                "Add new fork as a remote: git remote add fork {}",
                clone_url
            )?;
            writeln!(stdout, "Clone the new fork: git clone {}", clone_url)?;
        }

        Ok(())
    }

    async fn fork_source(&self, repo_arg: Option<&str>) -> Result<RepoRef, Error> {
        match repo_arg.filter(|arg| !arg.is_empty()) {
            None => self.base_repo().await,
            Some(arg) => RepoRef::parse(arg),
        }
    }

    async fn fork_from(&self, source: &RepoRef) -> Result<RepoRef, Error> {
        info!("Forking {}...", source);

        let login = self
            .ctx
            .auth_login()
            .await
            .map_err(Error::AuthResolution)?;
        let possible_fork =
            RepoRef::new(login, source.name()).map_err(|e| Error::AuthResolution(e.into()))?;

        let exists = self
            .gh
            .repo_exists(&possible_fork)
            .await
            .map_err(Error::HostingApi)?;
        if exists {
            return Err(Error::ForkAlreadyExists(possible_fork));
        }

        self.gh.fork_repo(source).await.map_err(Error::ForkCreation)
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use crate::App;
    use crate::Config;
    use crate::RepoRef;
    use crate::error::Error;
    use crate::error::ErrorKind;
    use crate::ops::browser::MockBrowserOps;
    use crate::ops::context::MockContextOps;
    use crate::ops::github::MockGithubOps;

    const CLONE_URL: &str = "https://github.com/monalisa/Spoon-Knife.git";

    fn app(
        ctx: MockContextOps,
        gh: MockGithubOps,
    ) -> App<MockContextOps, MockGithubOps, MockBrowserOps> {
        App::new(Config::default_for_tests(), ctx, gh, MockBrowserOps::new())
    }

    fn monalisa_fork() -> RepoRef {
        RepoRef::new("monalisa", "Spoon-Knife")
            .unwrap()
            .with_clone_url(CLONE_URL)
    }

    fn logged_in_as_monalisa() -> MockContextOps {
        let mut ctx = MockContextOps::new();
        ctx.expect_base_repo().never();
        ctx.expect_auth_login()
            .times(1)
            .returning(|| Ok("monalisa".to_string()));
        ctx
    }

    #[tokio::test]
    async fn test_fork_creates_fork() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists()
            .times(1)
            .withf(|repo| repo.full_name() == "monalisa/Spoon-Knife")
            .returning(|_| Ok(false));
        gh.expect_fork_repo()
            .times(1)
            .withf(|repo| repo.full_name() == "octocat/Spoon-Knife")
            .returning(|_| Ok(monalisa_fork()));

        let app = app(ctx, gh);
        let forked = app.fork(Some("octocat/Spoon-Knife")).await.unwrap();
        assert_eq!(forked, monalisa_fork());
        assert_eq!(forked.clone_url(), Some(CLONE_URL));
    }

    #[tokio::test]
    async fn test_fork_probes_before_creating() {
        let mut seq = Sequence::new();
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        gh.expect_fork_repo()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(monalisa_fork()));

        let app = app(ctx, gh);
        app.fork(Some("https://github.com/octocat/Spoon-Knife"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fork_refuses_existing_fork() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().times(1).returning(|_| Ok(true));
        gh.expect_fork_repo().never();

        let app = app(ctx, gh);
        let err = app.fork(Some("octocat/Spoon-Knife")).await.unwrap_err();
        let existing = match err {
            Error::ForkAlreadyExists(existing) => existing,
            other => panic!("expected ForkAlreadyExists, got {:?}", other),
        };
        assert_eq!(existing.owner(), "monalisa");
        assert_eq!(existing.name(), "Spoon-Knife");
    }

    #[tokio::test]
    async fn test_fork_uses_base_repo_without_argument() {
        let mut ctx = MockContextOps::new();
        ctx.expect_base_repo()
            .times(1)
            .returning(|| Ok(RepoRef::new("octocat", "Spoon-Knife").unwrap()));
        ctx.expect_auth_login()
            .returning(|| Ok("monalisa".to_string()));

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().returning(|_| Ok(false));
        gh.expect_fork_repo()
            .withf(|repo| repo.full_name() == "octocat/Spoon-Knife")
            .returning(|_| Ok(monalisa_fork()));

        let app = app(ctx, gh);
        assert_eq!(app.fork(None).await.unwrap(), monalisa_fork());
    }

    #[tokio::test]
    async fn test_fork_base_repo_failure_stops_early() {
        let mut ctx = MockContextOps::new();
        ctx.expect_base_repo()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("No git remote 'origin' configured")));
        ctx.expect_auth_login().never();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().never();
        gh.expect_fork_repo().never();

        let app = app(ctx, gh);
        let err = app.fork(Some("")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BaseRepoResolution);
    }

    #[tokio::test]
    async fn test_fork_rejects_malformed_argument() {
        let mut ctx = MockContextOps::new();
        ctx.expect_base_repo().never();
        ctx.expect_auth_login().never();

        let app = app(ctx, MockGithubOps::new());
        for arg in ["octocat", "/Spoon-Knife", "octocat/", "https://github.com/octocat"] {
            let err = app.fork(Some(arg)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedReference);
            assert!(err.to_string().contains(arg), "{} not in {}", arg, err);
        }
    }

    #[tokio::test]
    async fn test_fork_auth_failure() {
        let mut ctx = MockContextOps::new();
        ctx.expect_auth_login()
            .returning(|| Err(anyhow::anyhow!("GitHub API error (401): Bad credentials")));

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().never();
        gh.expect_fork_repo().never();

        let app = app(ctx, gh);
        let err = app.fork(Some("octocat/Spoon-Knife")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthResolution);
    }

    #[tokio::test]
    async fn test_fork_empty_login_is_auth_error() {
        let mut ctx = MockContextOps::new();
        ctx.expect_auth_login()
            .times(1)
            .returning(|| Ok(String::new()));

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().never();
        gh.expect_fork_repo().never();

        let app = app(ctx, gh);
        let err = app.fork(Some("octocat/Spoon-Knife")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthResolution);
    }

    #[tokio::test]
    async fn test_fork_probe_failure_is_api_error() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists()
            .returning(|_| Err(anyhow::anyhow!("curl command failed: timeout")));
        gh.expect_fork_repo().never();

        let app = app(ctx, gh);
        let err = app.fork(Some("octocat/Spoon-Knife")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HostingApi);
    }

    #[tokio::test]
    async fn test_fork_create_failure_is_distinct() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().returning(|_| Ok(false));
        gh.expect_fork_repo()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("GitHub API error (403): Forbidden")));

        let app = app(ctx, gh);
        let err = app.fork(Some("octocat/Spoon-Knife")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForkCreation);
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "failed to fork: GitHub API error (403): Forbidden"
        );
    }

    #[tokio::test]
    async fn test_cmd_fork_output() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().returning(|_| Ok(false));
        gh.expect_fork_repo().returning(|_| Ok(monalisa_fork()));

        let app = app(ctx, gh);
        let mut stdout = Vec::new();
        app.cmd_fork(Some("octocat/Spoon-Knife"), &mut stdout)
            .await
            .unwrap();
        insta::assert_snapshot!(String::from_utf8(stdout).unwrap(), @r"
        octocat/Spoon-Knife successfully forked to monalisa/Spoon-Knife!
        Add new fork as a remote: git remote add fork https://github.com/monalisa/Spoon-Knife.git
        Clone the new fork: git clone https://github.com/monalisa/Spoon-Knife.git
        ");
    }

    #[tokio::test]
    async fn test_cmd_fork_prints_nothing_on_failure() {
        let ctx = logged_in_as_monalisa();

        let mut gh = MockGithubOps::new();
        gh.expect_repo_exists().returning(|_| Ok(true));

        let app = app(ctx, gh);
        let mut stdout = Vec::new();
        let err = app
            .cmd_fork(Some("octocat/Spoon-Knife"), &mut stdout)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "monalisa/Spoon-Knife already exists!");
        assert!(stdout.is_empty());
    }
}
