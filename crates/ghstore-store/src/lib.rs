// SQLite-backed local state
// Favourites and installed-app records live here so the enrichment
// pipeline can read them as one snapshot per batch.

pub mod store;

pub use store::{InstalledApp, LocalDatabase, StoreError};
