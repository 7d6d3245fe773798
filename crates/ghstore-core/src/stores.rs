// Local-state access for the enrichment pipeline
//
// The pipeline never queries stores per item. It captures one snapshot
// before fan-out and every concurrent unit reads that same snapshot, so
// all items in one batch reflect the same instant of local truth.
use std::collections::HashSet;

use ghstore_store::LocalDatabase;

use crate::{Error, Result};

/// Read contract for the installed-apps store
pub trait InstalledAppsStore: Send + Sync {
    fn installed_ids(&self) -> Result<HashSet<i64>>;
}

/// Read contract for the favourites store
pub trait FavoritesStore: Send + Sync {
    fn favorite_ids(&self) -> Result<HashSet<i64>>;
}

impl InstalledAppsStore for LocalDatabase {
    fn installed_ids(&self) -> Result<HashSet<i64>> {
        LocalDatabase::installed_repo_ids(self).map_err(|e| Error::Store(e.to_string()))
    }
}

impl FavoritesStore for LocalDatabase {
    fn favorite_ids(&self) -> Result<HashSet<i64>> {
        LocalDatabase::favorite_repo_ids(self).map_err(|e| Error::Store(e.to_string()))
    }
}

/// Immutable local-state snapshot shared by one enrichment batch
///
/// Captured once, passed by Arc to every concurrent unit, never
/// refetched. Mutations to the underlying stores become visible on the
/// next batch.
#[derive(Debug, Clone, Default)]
pub struct LocalStateSnapshot {
    installed: HashSet<i64>,
    favorites: HashSet<i64>,
}

impl LocalStateSnapshot {
    pub fn capture(
        installed: &dyn InstalledAppsStore,
        favorites: &dyn FavoritesStore,
    ) -> Result<Self> {
        Ok(Self {
            installed: installed.installed_ids()?,
            favorites: favorites.favorite_ids()?,
        })
    }

    /// Build a snapshot from raw id sets, mainly for tests
    pub fn from_sets(installed: HashSet<i64>, favorites: HashSet<i64>) -> Self {
        Self {
            installed,
            favorites,
        }
    }

    pub fn is_installed(&self, repo_id: i64) -> bool {
        self.installed.contains(&repo_id)
    }

    pub fn is_favorite(&self, repo_id: i64) -> bool {
        self.favorites.contains(&repo_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reads_both_stores() {
        let db = LocalDatabase::in_memory().unwrap();
        db.add_favorite(7).unwrap();
        db.record_installed_app(&ghstore_store::InstalledApp {
            repo_id: 3,
            full_name: "octocat/tool".into(),
            package_name: None,
            installed_version: Some("v1.0".into()),
            installed_at: 1_700_000_000,
        })
        .unwrap();

        let snapshot = LocalStateSnapshot::capture(&db, &db).unwrap();
        assert!(snapshot.is_favorite(7));
        assert!(snapshot.is_installed(3));
        assert!(!snapshot.is_favorite(3));
        assert!(!snapshot.is_installed(7));
    }

    #[test]
    fn test_snapshot_is_immutable_after_capture() {
        let db = LocalDatabase::in_memory().unwrap();
        db.add_favorite(1).unwrap();

        let snapshot = LocalStateSnapshot::capture(&db, &db).unwrap();

        // Mutations after capture don't bleed into the snapshot
        db.add_favorite(2).unwrap();
        db.remove_favorite(1).unwrap();

        assert!(snapshot.is_favorite(1));
        assert!(!snapshot.is_favorite(2));
    }
}
