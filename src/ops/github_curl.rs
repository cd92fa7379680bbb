use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use serde::Deserialize;
use tokio::process::Command;

/// HTTP client using curl for making GitHub API requests
#[derive(Clone)]
pub struct GithubCurlClient {
    token: Option<String>,
}

/// Status code and body of a completed request
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct GitHubError {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    documentation_url: Option<String>,
}

impl GithubCurlClient {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.send("GET", url, None).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, json_data: &str) -> Result<Response> {
        self.send("POST", url, Some(json_data)).await
    }

    async fn send(&self, method: &str, url: &str, json_data: Option<&str>) -> Result<Response> {
        let mut args = vec![
            "-s".to_string(),
            "-w".to_string(),
            "\n%{http_code}".to_string(),
            "-X".to_string(),
            method.to_string(),
            "-H".to_string(),
            "Accept: application/vnd.github+json".to_string(),
            "-H".to_string(),
            "User-Agent: ghr-cli".to_string(),
        ];
        if let Some(token) = &self.token {
            args.push("-H".to_string());
            args.push(format!("Authorization: Bearer {}", token));
        }
        if let Some(json_data) = json_data {
            args.push("-H".to_string());
            args.push("Content-Type: application/json".to_string());
            args.push("-d".to_string());
            args.push(json_data.to_string());
        }
        args.push(url.to_string());

        let output = Command::new("curl")
            .args(&args)
            .output()
            .await
            .context("Failed to execute curl command")?;

        if !output.status.success() {
            bail!(
                "curl command failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        parse_response(output.stdout)
    }
}

impl Response {
    /// Return the body, or an error carrying GitHub's message for 4xx/5xx
    pub fn error_for_status(self) -> Result<String> {
        if self.status >= 400 {
            // Try to parse error message from response
            if let Ok(error) = serde_json::from_str::<GitHubError>(&self.body) {
                bail!("GitHub API error ({}): {}", self.status, error.message);
            }
            bail!(
                "GitHub API request failed with status {}: {}",
                self.status,
                self.body
            );
        }

        Ok(self.body)
    }
}

/// Parse curl output with the status code appended on the last line
fn parse_response(stdout: Vec<u8>) -> Result<Response> {
    let output_str = String::from_utf8(stdout)?;
    let (body, status) = output_str.rsplit_once('\n').unwrap_or(("", output_str.as_str()));
    let status = status
        .trim()
        .parse::<u16>()
        .with_context(|| format!("Invalid HTTP status from curl: {:?}", status))?;

    Ok(Response {
        status,
        body: body.to_string(),
    })
}
