// Full-pagination fetch of a developer's repositories
use tracing::debug;

use crate::{hosts::ReleaseHost, models::RepoSummary, Result};

/// Page size requested from the host
pub const REPOS_PER_PAGE: u32 = 100;

/// Fetch every page of a user's repositories, filtering as pages arrive
///
/// Archived repos and forks are dropped immediately. The loop stops on
/// an empty page or a short page - both mean the host is exhausted.
/// Any host error aborts the whole fetch; a partial page list is never
/// returned.
pub async fn fetch_all_repositories(
    host: &dyn ReleaseHost,
    username: &str,
) -> Result<Vec<RepoSummary>> {
    let mut all_repos = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = host
            .list_user_repositories(username, page, REPOS_PER_PAGE)
            .await?;
        let fetched = batch.len();

        if fetched == 0 {
            break;
        }

        all_repos.extend(batch.into_iter().filter(|repo| !repo.archived && !repo.fork));

        if fetched < REPOS_PER_PAGE as usize {
            break;
        }
        page += 1;
    }

    debug!(
        username,
        pages = page,
        kept = all_repos.len(),
        "pagination complete"
    );
    Ok(all_repos)
}
