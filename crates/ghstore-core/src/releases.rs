// Release inspection for a single repository
use tracing::debug;

use crate::{hosts::ReleaseHost, models::ReleaseFacts, platform::Platform};

/// How many recent releases to look at per repository
pub const RELEASES_PER_PAGE: u32 = 10;

/// Derive release facts for one repository
///
/// Total by contract: every failure path resolves to default facts.
/// This is the one place where an error is downgraded to absence of
/// data - one repository's broken releases endpoint must not take the
/// rest of the batch down with it. Cancellation is unaffected: a
/// cancelled task is dropped at an await point and never reaches the
/// error arm.
pub async fn inspect_releases(
    host: &dyn ReleaseHost,
    owner: &str,
    repo: &str,
    platform: Platform,
) -> ReleaseFacts {
    let releases = match host.list_releases(owner, repo, RELEASES_PER_PAGE).await {
        Ok(releases) => releases,
        Err(err) => {
            debug!(owner, repo, %err, "release check failed, defaulting");
            return ReleaseFacts::default();
        }
    };

    if releases.is_empty() {
        return ReleaseFacts::default();
    }

    // First stable release in host order; drafts and prereleases don't count
    let Some(stable) = releases.iter().find(|release| release.is_stable()) else {
        return ReleaseFacts {
            has_releases: true,
            ..ReleaseFacts::default()
        };
    };

    let has_installable_assets = stable
        .assets
        .iter()
        .any(|asset| platform.is_installable_asset(asset));

    ReleaseFacts {
        has_releases: true,
        has_installable_assets,
        latest_version: has_installable_assets.then(|| stable.tag_name.clone()),
    }
}
