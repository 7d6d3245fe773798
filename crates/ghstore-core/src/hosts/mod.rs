use async_trait::async_trait;

use crate::{
    models::{DeveloperProfile, ReleaseRecord, RepoSummary},
    Result,
};

pub mod github;

pub use github::GitHubHost;

/// Trait for repository hosts - makes testing easier and keeps things flexible
///
/// The pipeline only ever talks to the host through this seam, so tests
/// can substitute mocks and fakes with controlled latency and failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// One page of a user's repositories, host-sorted by recency.
    /// An empty page means the host ran out, not that something failed.
    async fn list_user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>>;

    /// The most recent releases for one repository
    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<ReleaseRecord>>;

    /// A developer's public profile
    async fn get_user(&self, username: &str) -> Result<DeveloperProfile>;
}
