use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository summary as discovered during pagination
///
/// Immutable once fetched; everything downstream reads it, nothing
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Host-assigned stable identity
    pub id: i64,
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    pub archived: bool,
    pub fork: bool,
    pub description: Option<String>,
    pub html_url: String,
    pub stars: u32,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RepoSummary {
    /// Owner half of "owner/name". A full name without a slash is the
    /// owner itself.
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or(&self.full_name)
    }
}

/// One release as returned by the host, transient per inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub draft: bool,
    pub prerelease: bool,
    pub published_at: Option<String>,
    pub assets: Vec<String>,
}

impl ReleaseRecord {
    /// A release counts as stable only when it is neither a draft nor a
    /// prerelease.
    pub fn is_stable(&self) -> bool {
        !self.draft && !self.prerelease
    }
}

/// Facts derived from a repository's releases
///
/// Never partially populated: either fully computed or defaulted to
/// all-absent when the release check fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFacts {
    pub has_releases: bool,
    pub has_installable_assets: bool,
    pub latest_version: Option<String>,
}

/// The final per-repository shape handed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperRepository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stars: u32,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub has_releases: bool,
    pub has_installable_assets: bool,
    pub latest_version: Option<String>,
    pub is_installed: bool,
    pub is_favorite: bool,
}

/// A developer's public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperProfile {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: String,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
}
