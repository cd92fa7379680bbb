//! Operations modules for interacting with the environment.
//!
//! This module contains the integration layers that `ghr` relies on:
//!
//! - [`context`]: Ambient context (the local repository's `origin` remote and the authenticated login)
//! - [`github`]: Repository existence checks and fork creation via the GitHub REST API
//! - [`github_curl`]: Curl-based HTTP client for making GitHub API requests
//! - [`browser`]: Opening URLs in the user's browser
//!
//! Each submodule provides trait-based abstractions with real and mock implementations
//! to support both production use and testing.

pub mod browser;
pub mod context;
pub mod github;
pub mod github_curl;
