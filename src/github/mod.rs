// GitHub API module.
// Upstream client for the organization and repository endpoints.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use endpoints::{RepoQuery, Upstream};
pub use types::*;
