// Bounded fan-out of release inspections over one fetched batch
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::{
    hosts::ReleaseHost,
    models::{DeveloperRepository, ReleaseFacts, RepoSummary},
    platform::Platform,
    releases,
    stores::LocalStateSnapshot,
    Error, Result,
};

/// Upper bound on simultaneously active release checks within one batch
pub const MAX_CONCURRENT_RELEASE_CHECKS: usize = 20;

/// Enrich every repository in the batch, preserving input order
///
/// One task per repository, gated by a counting semaphore so at most
/// `concurrency_limit` release checks are in flight at once. The shared
/// snapshot is immutable, so every item reflects the same local state
/// no matter when its task runs. Completion order is irrelevant; the
/// output is reordered to input order before returning.
///
/// Dropping the returned future aborts the whole JoinSet, which is how
/// cancellation reaches in-flight release checks and frees their
/// permits. Partial results are discarded, never returned.
pub async fn enrich_repositories(
    host: Arc<dyn ReleaseHost>,
    platform: Platform,
    snapshot: Arc<LocalStateSnapshot>,
    repos: Vec<RepoSummary>,
    concurrency_limit: usize,
) -> Result<Vec<DeveloperRepository>> {
    let total = repos.len();
    let permits = Arc::new(Semaphore::new(concurrency_limit.max(1)));
    let mut tasks: JoinSet<(usize, DeveloperRepository)> = JoinSet::new();

    for (index, repo) in repos.into_iter().enumerate() {
        let host = Arc::clone(&host);
        let permits = Arc::clone(&permits);
        let snapshot = Arc::clone(&snapshot);

        tasks.spawn(async move {
            // Held for the duration of the release check; waiting here is
            // the suspension point when the cap is saturated
            let _permit = permits
                .acquire_owned()
                .await
                .expect("release-check semaphore is never closed");

            let facts =
                releases::inspect_releases(host.as_ref(), repo.owner(), &repo.name, platform)
                    .await;

            (index, combine(repo, facts, &snapshot))
        });
    }

    let mut indexed = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(item) => indexed.push(item),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => return Err(Error::Cancelled),
        }
    }

    indexed.sort_unstable_by_key(|(index, _)| *index);
    debug!(total, "enrichment batch complete");
    Ok(indexed.into_iter().map(|(_, repo)| repo).collect())
}

/// Join one summary with its release facts and the batch snapshot
fn combine(
    summary: RepoSummary,
    facts: ReleaseFacts,
    snapshot: &LocalStateSnapshot,
) -> DeveloperRepository {
    DeveloperRepository {
        is_installed: snapshot.is_installed(summary.id),
        is_favorite: snapshot.is_favorite(summary.id),
        id: summary.id,
        name: summary.name,
        full_name: summary.full_name,
        description: summary.description,
        html_url: summary.html_url,
        stars: summary.stars,
        language: summary.language,
        updated_at: summary.updated_at,
        has_releases: facts.has_releases,
        has_installable_assets: facts.has_installable_assets,
        latest_version: facts.latest_version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_combine_reads_the_snapshot() {
        let snapshot =
            LocalStateSnapshot::from_sets(HashSet::from([1]), HashSet::from([2]));

        let summary = RepoSummary {
            id: 1,
            name: "widget".into(),
            full_name: "octocat/widget".into(),
            archived: false,
            fork: false,
            description: Some("a widget".into()),
            html_url: "https://github.com/octocat/widget".into(),
            stars: 12,
            language: Some("Rust".into()),
            updated_at: None,
        };
        let facts = ReleaseFacts {
            has_releases: true,
            has_installable_assets: true,
            latest_version: Some("v1.2.3".into()),
        };

        let enriched = combine(summary, facts, &snapshot);
        assert!(enriched.is_installed);
        assert!(!enriched.is_favorite);
        assert_eq!(enriched.latest_version.as_deref(), Some("v1.2.3"));
        assert_eq!(enriched.stars, 12);
    }
}
