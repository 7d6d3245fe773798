use std::collections::HashSet;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// An application installed from a repository release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    pub repo_id: i64,
    pub full_name: String,
    pub package_name: Option<String>,
    pub installed_version: Option<String>,
    pub installed_at: i64,
}

/// Local state database using SQLite
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Battle-tested and reliable
/// - Doesn't require a separate process
///
/// The connection sits behind a mutex so the database handle can be
/// shared across async tasks; all reads the pipeline cares about happen
/// once per batch anyway.
pub struct LocalDatabase {
    conn: Mutex<Connection>,
}

impl LocalDatabase {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, mainly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favourites (
                repo_id INTEGER PRIMARY KEY,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS installed_apps (
                repo_id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL,
                package_name TEXT,
                installed_version TEXT,
                installed_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }

    // --- favourites ---

    pub fn add_favorite(&self, repo_id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.lock().execute(
            "INSERT OR IGNORE INTO favourites (repo_id, created_at) VALUES (?1, ?2)",
            params![repo_id, now],
        )?;
        debug!(repo_id, "added favourite");
        Ok(())
    }

    pub fn remove_favorite(&self, repo_id: i64) -> Result<()> {
        self.lock()
            .execute("DELETE FROM favourites WHERE repo_id = ?1", params![repo_id])?;
        debug!(repo_id, "removed favourite");
        Ok(())
    }

    pub fn is_favorite(&self, repo_id: i64) -> Result<bool> {
        let conn = self.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT repo_id FROM favourites WHERE repo_id = ?1",
                params![repo_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// All favourite repository ids, readable as one snapshot
    pub fn favorite_repo_ids(&self) -> Result<HashSet<i64>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT repo_id FROM favourites")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<HashSet<i64>>>()?;
        Ok(ids)
    }

    // --- installed apps ---

    pub fn record_installed_app(&self, app: &InstalledApp) -> Result<()> {
        self.lock().execute(
            "INSERT OR REPLACE INTO installed_apps
                (repo_id, full_name, package_name, installed_version, installed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                app.repo_id,
                app.full_name,
                app.package_name,
                app.installed_version,
                app.installed_at
            ],
        )?;
        debug!(repo_id = app.repo_id, "recorded installed app");
        Ok(())
    }

    pub fn remove_installed_app(&self, repo_id: i64) -> Result<()> {
        self.lock().execute(
            "DELETE FROM installed_apps WHERE repo_id = ?1",
            params![repo_id],
        )?;
        Ok(())
    }

    pub fn get_app_by_repository_id(&self, repo_id: i64) -> Result<Option<InstalledApp>> {
        let conn = self.lock();
        let app = conn
            .query_row(
                "SELECT repo_id, full_name, package_name, installed_version, installed_at
                 FROM installed_apps WHERE repo_id = ?1",
                params![repo_id],
                |row| {
                    Ok(InstalledApp {
                        repo_id: row.get(0)?,
                        full_name: row.get(1)?,
                        package_name: row.get(2)?,
                        installed_version: row.get(3)?,
                        installed_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(app)
    }

    /// All installed repository ids, readable as one snapshot
    pub fn installed_repo_ids(&self) -> Result<HashSet<i64>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT repo_id FROM installed_apps")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<HashSet<i64>>>()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app(repo_id: i64) -> InstalledApp {
        InstalledApp {
            repo_id,
            full_name: format!("octocat/app-{}", repo_id),
            package_name: Some("com.octocat.app".to_string()),
            installed_version: Some("v1.0.0".to_string()),
            installed_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_favorites_roundtrip() {
        let db = LocalDatabase::in_memory().unwrap();

        db.add_favorite(1).unwrap();
        db.add_favorite(2).unwrap();
        // Duplicate adds are ignored, not errors
        db.add_favorite(1).unwrap();

        assert!(db.is_favorite(1).unwrap());
        assert!(!db.is_favorite(3).unwrap());
        assert_eq!(db.favorite_repo_ids().unwrap(), HashSet::from([1, 2]));

        db.remove_favorite(1).unwrap();
        assert!(!db.is_favorite(1).unwrap());
        assert_eq!(db.favorite_repo_ids().unwrap(), HashSet::from([2]));
    }

    #[test]
    fn test_installed_apps_roundtrip() {
        let db = LocalDatabase::in_memory().unwrap();

        let app = sample_app(10);
        db.record_installed_app(&app).unwrap();

        let fetched = db.get_app_by_repository_id(10).unwrap();
        assert_eq!(fetched, Some(app));
        assert_eq!(db.get_app_by_repository_id(99).unwrap(), None);
        assert_eq!(db.installed_repo_ids().unwrap(), HashSet::from([10]));

        db.remove_installed_app(10).unwrap();
        assert_eq!(db.get_app_by_repository_id(10).unwrap(), None);
        assert!(db.installed_repo_ids().unwrap().is_empty());
    }

    #[test]
    fn test_record_installed_app_upserts() {
        let db = LocalDatabase::in_memory().unwrap();

        db.record_installed_app(&sample_app(10)).unwrap();

        let mut upgraded = sample_app(10);
        upgraded.installed_version = Some("v2.0.0".to_string());
        db.record_installed_app(&upgraded).unwrap();

        let fetched = db.get_app_by_repository_id(10).unwrap().unwrap();
        assert_eq!(fetched.installed_version.as_deref(), Some("v2.0.0"));
        assert_eq!(db.installed_repo_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_snapshots() {
        let db = LocalDatabase::in_memory().unwrap();
        assert!(db.favorite_repo_ids().unwrap().is_empty());
        assert!(db.installed_repo_ids().unwrap().is_empty());
    }
}
