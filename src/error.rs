//! Error types for repository operations

use thiserror::Error;

use crate::repo::RepoRef;

/// Errors that can occur while resolving a repository or forking it.
///
/// Wrapping variants keep the collaborator's error as their source, so the
/// full chain is available with `{:#}` or [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum Error {
    /// The argument could not be parsed into an owner and a name
    #[error("could not parse owner or repo name from {input}: {reason}")]
    MalformedReference { input: String, reason: String },

    /// No argument was given and the ambient repository is unavailable
    #[error("unable to determine base repository")]
    BaseRepoResolution(#[source] anyhow::Error),

    /// The authenticated user could not be determined
    #[error("could not determine current username")]
    AuthResolution(#[source] anyhow::Error),

    /// The existence check against the hosting service failed
    #[error("problem with API request")]
    HostingApi(#[source] anyhow::Error),

    /// A repository with the fork's name already exists for the current user
    #[error("{0} already exists!")]
    ForkAlreadyExists(RepoRef),

    /// The hosting service failed to create the fork
    #[error("failed to fork")]
    ForkCreation(#[source] anyhow::Error),

    /// The browser could not be launched
    #[error(transparent)]
    BrowserLaunch(anyhow::Error),
}

/// Classification of an [`Error`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedReference,
    BaseRepoResolution,
    AuthResolution,
    HostingApi,
    ForkAlreadyExists,
    ForkCreation,
    BrowserLaunch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedReference { .. } => ErrorKind::MalformedReference,
            Self::BaseRepoResolution(_) => ErrorKind::BaseRepoResolution,
            Self::AuthResolution(_) => ErrorKind::AuthResolution,
            Self::HostingApi(_) => ErrorKind::HostingApi,
            Self::ForkAlreadyExists(_) => ErrorKind::ForkAlreadyExists,
            Self::ForkCreation(_) => ErrorKind::ForkCreation,
            Self::BrowserLaunch(_) => ErrorKind::BrowserLaunch,
        }
    }

    /// Replace the echoed input of a malformed reference with the original
    /// argument. Other variants are returned unchanged.
    pub(crate) fn with_input(self, arg: &str) -> Self {
        match self {
            Self::MalformedReference { reason, .. } => Self::MalformedReference {
                input: arg.to_string(),
                reason,
            },
            other => other,
        }
    }
}
