#![allow(async_fn_in_trait)]

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

// -----------------------------------------------------------------------------
// BrowserOps trait

/// Opening URLs for the user
#[cfg_attr(test, automock)]
pub trait BrowserOps {
    async fn open(&self, url: &str) -> Result<()>;
}

// -----------------------------------------------------------------------------
// RealBrowser

/// Real implementation that launches `$BROWSER` or the platform opener
pub struct RealBrowser;

impl BrowserOps for RealBrowser {
    async fn open(&self, url: &str) -> Result<()> {
        let browser = std::env::var("BROWSER").ok();
        let (program, args) = browser_command(browser.as_deref(), url);
        debug!("Opening {} with {}", url, program);

        let status = Command::new(&program)
            .args(&args)
            .status()
            .await
            .with_context(|| format!("Failed to launch browser: {}", program))?;

        if !status.success() {
            bail!("Browser command {} exited with {}", program, status);
        }

        Ok(())
    }
}

/// Program and arguments that open `url`.
///
/// A non-empty `$BROWSER` wins; it may carry extra arguments, the URL is
/// appended last.
fn browser_command(browser: Option<&str>, url: &str) -> (String, Vec<String>) {
    if let Some(browser) = browser {
        let mut words = browser.split_whitespace();
        if let Some(program) = words.next() {
            let mut args: Vec<String> = words.map(|s| s.to_string()).collect();
            args.push(url.to_string());
            return (program.to_string(), args);
        }
    }

    if cfg!(target_os = "macos") {
        ("open".to_string(), vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.replace('&', "^&"),
            ],
        )
    } else {
        ("xdg-open".to_string(), vec![url.to_string()])
    }
}
