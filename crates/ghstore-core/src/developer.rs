// Developer directory - the library entry point the presentation layer calls
use std::sync::Arc;

use tracing::{error, info};

use crate::{
    enrich,
    hosts::ReleaseHost,
    models::{DeveloperProfile, DeveloperRepository},
    pagination,
    platform::Platform,
    stores::{FavoritesStore, InstalledAppsStore, LocalStateSnapshot},
    Result,
};

/// Discovers a developer's repositories and enriches them with release
/// and local-state metadata
///
/// One call to [`get_developer_repositories`] is one cancellable unit:
/// full pagination, bounded release fan-out, and a merge against a
/// single local-state snapshot.
///
/// [`get_developer_repositories`]: DeveloperDirectory::get_developer_repositories
pub struct DeveloperDirectory {
    host: Arc<dyn ReleaseHost>,
    installed: Arc<dyn InstalledAppsStore>,
    favorites: Arc<dyn FavoritesStore>,
    platform: Platform,
    concurrency_limit: usize,
}

impl DeveloperDirectory {
    pub fn new(
        host: Arc<dyn ReleaseHost>,
        installed: Arc<dyn InstalledAppsStore>,
        favorites: Arc<dyn FavoritesStore>,
        platform: Platform,
    ) -> Self {
        Self {
            host,
            installed,
            favorites,
            platform,
            concurrency_limit: enrich::MAX_CONCURRENT_RELEASE_CHECKS,
        }
    }

    /// Override the release-check concurrency cap (minimum 1)
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Fetch a developer's public profile
    pub async fn get_developer_profile(&self, username: &str) -> Result<DeveloperProfile> {
        self.host.get_user(username).await.map_err(|err| {
            error!(username, %err, "failed to fetch developer profile");
            err
        })
    }

    /// Fetch, enrich, and merge a developer's repositories
    ///
    /// Returns the complete filtered list in discovery order. Individual
    /// release-check failures degrade their item to default facts; a
    /// pagination failure aborts the whole call.
    pub async fn get_developer_repositories(
        &self,
        username: &str,
    ) -> Result<Vec<DeveloperRepository>> {
        let repos = pagination::fetch_all_repositories(self.host.as_ref(), username)
            .await
            .map_err(|err| {
                error!(username, %err, "failed to fetch repositories");
                err
            })?;

        if repos.is_empty() {
            return Ok(Vec::new());
        }

        // One snapshot per batch: every item merges against the same
        // local truth, even if stores are mutated mid-batch
        let snapshot = Arc::new(LocalStateSnapshot::capture(
            self.installed.as_ref(),
            self.favorites.as_ref(),
        )?);

        info!(username, count = repos.len(), "enriching repositories");
        enrich::enrich_repositories(
            Arc::clone(&self.host),
            self.platform,
            snapshot,
            repos,
            self.concurrency_limit,
        )
        .await
    }
}
