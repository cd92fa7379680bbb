use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use ghr::App;
use ghr::Config;
use ghr::ops::browser::RealBrowser;
use ghr::ops::context::RealContext;
use ghr::ops::github::RealGithub;
use ghr::ops::github_curl::GithubCurlClient;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "ghr")]
#[command(about = "Work with GitHub repositories from the command line", long_about = None)]
pub struct Cli {
    /// Select another repository using the OWNER/REPO format
    #[arg(short = 'R', long = "repo", global = true, env = "GH_REPO")]
    pub repo: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with GitHub repositories
    #[command(long_about = "Work with GitHub repositories.

A repository can be supplied as an argument in any of the following formats:
- \"OWNER/REPO\"
- by URL, e.g. \"https://github.com/OWNER/REPO\"")]
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
}

#[derive(Subcommand)]
pub enum RepoCommands {
    /// View a repository in the browser
    ///
    /// With no argument, the repository for the current directory is opened.
    View {
        /// Repository to open (defaults to the current repository)
        repository: Option<String>,
    },
    /// Create a fork of a repository
    ///
    /// With no argument, creates a fork of the current repository.
    Fork {
        /// Repository to fork (defaults to the current repository)
        repository: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    setup_logging()?;

    let path = std::env::current_dir().context("Failed to get current directory")?;
    let config = Config::load(&path)?.with_repo_override(cli.repo);

    let http_client = GithubCurlClient::new(config.github_token.clone());
    let app = App::new(
        config.clone(),
        RealContext::new(&config, path, http_client.clone()),
        RealGithub::new(config.api_url(), http_client),
        RealBrowser,
    );

    match cli.command {
        Commands::Repo {
            command: RepoCommands::View { repository },
        } => {
            app.cmd_view(repository.as_deref(), &mut std::io::stderr())
                .await?
        }
        Commands::Repo {
            command: RepoCommands::Fork { repository },
        } => {
            app.cmd_fork(repository.as_deref(), &mut std::io::stdout())
                .await?
        }
    }

    Ok(())
}

/// Log to stderr, at WARN unless overridden by `RUST_LOG`
fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    tracing_subscriber::fmt()
        .with_timer(timer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
