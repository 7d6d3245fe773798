// Core enrichment pipeline lives here - the brain of the operation
pub mod config;
pub mod developer;
pub mod enrich;
pub mod error;
pub mod hosts;
pub mod models;
pub mod pagination;
pub mod platform;
pub mod releases;
pub mod stores;

pub use config::Config;
pub use developer::DeveloperDirectory;
pub use error::Error;
pub use models::{DeveloperProfile, DeveloperRepository, ReleaseFacts, ReleaseRecord, RepoSummary};
pub use platform::Platform;
pub use stores::{FavoritesStore, InstalledAppsStore, LocalStateSnapshot};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
