use std::fmt::Display;

use url::Url;

use crate::error::Error;

// -----------------------------------------------------------------------------
// Types

/// A repository on the hosting service, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name: String,
    /// Only populated on repositories returned by the hosting service.
    clone_url: Option<String>,
}

/// Whether an argument should be treated as a URL rather than `OWNER/NAME`.
///
/// This is a prefix test only. `http:/` and `https:/` are accepted so that a
/// URL with a missing slash is still routed to URL parsing.
pub fn is_url(arg: &str) -> bool {
    arg.starts_with("http:/") || arg.starts_with("https:/")
}

// -----------------------------------------------------------------------------
// RepoRef impl

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, Error> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() || name.is_empty() {
            return Err(Error::MalformedReference {
                input: format!("{}/{}", owner, name),
                reason: "owner and name must both be non-empty".to_string(),
            });
        }
        Ok(Self {
            owner,
            name,
            clone_url: None,
        })
    }

    /// Attach the clone URL reported by the hosting service.
    pub fn with_clone_url(self, clone_url: impl Into<String>) -> Self {
        Self {
            clone_url: Some(clone_url.into()),
            ..self
        }
    }

    /// Parse a user-supplied reference, either a URL or `OWNER/NAME`.
    pub fn parse(arg: &str) -> Result<Self, Error> {
        if is_url(arg) {
            let url = Url::parse(arg).map_err(|e| Error::MalformedReference {
                input: arg.to_string(),
                reason: e.to_string(),
            })?;
            Self::from_url(&url).map_err(|e| e.with_input(arg))
        } else {
            Self::from_full_name(arg)
        }
    }

    /// Parse `OWNER/NAME`, splitting on the first `/`.
    pub fn from_full_name(full_name: &str) -> Result<Self, Error> {
        let malformed = |reason: &str| Error::MalformedReference {
            input: full_name.to_string(),
            reason: reason.to_string(),
        };

        let (owner, name) = full_name
            .split_once('/')
            .ok_or_else(|| malformed("expected OWNER/NAME"))?;
        if owner.is_empty() {
            return Err(malformed("missing owner"));
        }
        if name.is_empty() {
            return Err(malformed("missing repository name"));
        }

        Self::new(owner, name)
    }

    /// Extract owner and name from the first two segments of a URL path.
    ///
    /// A trailing `.git` on the name is dropped and any further segments
    /// (e.g. `/tree/main`) are ignored.
    pub fn from_url(url: &Url) -> Result<Self, Error> {
        let malformed = |reason: &str| Error::MalformedReference {
            input: url.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = url
            .path_segments()
            .ok_or_else(|| malformed("URL has no path"))?;
        let owner = segments.next().unwrap_or("");
        let name = segments.next().unwrap_or("");
        let name = name.strip_suffix(".git").unwrap_or(name);
        if owner.is_empty() || name.is_empty() {
            return Err(malformed("URL path must contain OWNER/NAME"));
        }

        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clone_url(&self) -> Option<&str> {
        self.clone_url.as_deref()
    }

    /// `OWNER/NAME`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
