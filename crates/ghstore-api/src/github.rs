use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::{with_retry, RetryConfig};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Branches tried when fetching a raw README, in order.
/// This mirrors what GitHub actually serves for most repos today;
/// older repos still default to master, newer ones to main.
const README_BRANCHES: &[&str] = &["master", "main"];

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    raw_base_url: String,
    retry_config: RetryConfig,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise instances or testing with a custom API URL
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("ghstore/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token,
            base_url,
            raw_base_url: GITHUB_RAW_BASE.to_string(),
            retry_config: RetryConfig::default(),
        }
    }

    /// Create client with custom retry configuration
    pub fn with_retry_config(token: Option<String>, retry_config: RetryConfig) -> Self {
        let mut client = Self::new(token);
        client.retry_config = retry_config;
        client
    }

    fn bearer_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// List a user's public repositories, one page at a time.
    ///
    /// Pages are sorted by most recently updated, owner repos only.
    /// An empty page is a normal response, not an error - callers use it
    /// to detect exhaustion.
    pub async fn list_user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GitHubRepo>> {
        let url = format!("{}/users/{}/repos", self.base_url, username);
        let auth_header = self.bearer_header();

        with_retry(&self.retry_config, || async {
            let mut request = self.client.get(&url).query(&[
                ("per_page", per_page.to_string().as_str()),
                ("page", page.to_string().as_str()),
                ("type", "owner"),
                ("sort", "updated"),
                ("direction", "desc"),
            ]);

            if let Some(ref auth) = auth_header {
                request = request.header(reqwest::header::AUTHORIZATION, auth);
            }

            let response = request.send().await?;

            self.check_status(&response, username)?;

            let repos: Vec<GitHubRepo> = response.json().await?;
            Ok(repos)
        })
        .await
    }

    /// List the most recent releases for a repository
    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<GitHubRelease>> {
        let url = format!("{}/repos/{}/{}/releases", self.base_url, owner, repo);
        let auth_header = self.bearer_header();
        let full_name = format!("{}/{}", owner, repo);

        with_retry(&self.retry_config, || async {
            let mut request = self
                .client
                .get(&url)
                .query(&[("per_page", per_page.to_string().as_str())]);

            if let Some(ref auth) = auth_header {
                request = request.header(reqwest::header::AUTHORIZATION, auth);
            }

            let response = request.send().await?;

            self.check_status(&response, &full_name)?;

            let releases: Vec<GitHubRelease> = response.json().await?;
            Ok(releases)
        })
        .await
    }

    /// Get a user's public profile
    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.base_url, username);
        let auth_header = self.bearer_header();

        with_retry(&self.retry_config, || async {
            let mut request = self.client.get(&url);

            if let Some(ref auth) = auth_header {
                request = request.header(reqwest::header::AUTHORIZATION, auth);
            }

            let response = request.send().await?;

            self.check_status(&response, username)?;

            let user: GitHubUser = response.json().await?;
            Ok(user)
        })
        .await
    }

    /// Get a repository's raw README content
    ///
    /// Tries each default branch name in turn because the raw host has no
    /// branch-agnostic endpoint.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<String> {
        for branch in README_BRANCHES {
            let url = format!(
                "{}/{}/{}/{}/README.md",
                self.raw_base_url, owner, repo, branch
            );

            let result = with_retry(&self.retry_config, || async {
                let response = self.client.get(&url).send().await?;

                if response.status() == 404 {
                    return Err(GitHubError::NotFound(format!("{}/{}", owner, repo)));
                }

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(GitHubError::RequestFailed(format!(
                        "Status {}: {}",
                        status, body
                    )));
                }

                let readme_content = response.text().await?;
                Ok(readme_content)
            })
            .await;

            // If this branch had the README, we're done
            if result.is_ok() {
                return result;
            }
        }

        Err(GitHubError::NotFound(format!(
            "README not found for {}/{}",
            owner, repo
        )))
    }

    /// Map non-success statuses to typed errors.
    ///
    /// GitHub reports primary rate limiting as 403, secondary as 429,
    /// so both map to RateLimitExceeded.
    fn check_status(&self, response: &reqwest::Response, subject: &str) -> Result<()> {
        let status = response.status();

        if status == 404 {
            return Err(GitHubError::NotFound(subject.to_string()));
        }

        if status == 401 {
            return Err(GitHubError::AuthRequired);
        }

        if status == 403 || status == 429 {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GitHubError::RequestFailed(format!("Status {}", status)));
        }

        Ok(())
    }
}

/// GitHub repository as returned by the users/{username}/repos endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// GitHub release with its downloadable assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
}

/// GitHub user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub public_repos: u32,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None);
        assert!(client.token.is_none());
        assert_eq!(client.base_url, GITHUB_API_BASE);
    }

    #[test]
    fn test_client_with_token() {
        let client = GitHubClient::new(Some("ghp_test".to_string()));
        assert_eq!(client.bearer_header(), Some("Bearer ghp_test".to_string()));
    }

    #[test]
    fn test_client_with_custom_base_url() {
        let client =
            GitHubClient::with_base_url(None, "https://github.example.com/api/v3".to_string());
        assert_eq!(client.base_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_repo_deserialization_defaults() {
        // GitHub omits several fields for sparse repos; defaults must hold
        let json = r#"{
            "id": 42,
            "name": "widget",
            "full_name": "octocat/widget",
            "description": null,
            "html_url": "https://github.com/octocat/widget",
            "updated_at": "2024-03-01T12:00:00Z"
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 42);
        assert!(!repo.archived);
        assert!(!repo.fork);
        assert_eq!(repo.stargazers_count, 0);
        assert!(repo.topics.is_empty());
    }

    #[test]
    fn test_release_deserialization() {
        let json = r#"{
            "tag_name": "v1.2.0",
            "draft": false,
            "prerelease": true,
            "published_at": "2024-05-01T00:00:00Z",
            "assets": [{"name": "app-v1.2.0.apk"}, {"name": "checksums.txt"}]
        }"#;

        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.2.0");
        assert!(release.prerelease);
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[0].name, "app-v1.2.0.apk");
    }

    #[test]
    fn test_release_deserialization_null_flags() {
        // draft/prerelease can be absent entirely; treat as stable
        let json = r#"{"tag_name": "v0.1.0", "published_at": null, "assets": []}"#;

        let release: GitHubRelease = serde_json::from_str(json).unwrap();
        assert!(!release.draft);
        assert!(!release.prerelease);
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_user_deserialization() {
        let json = r#"{
            "id": 1,
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/1",
            "html_url": "https://github.com/octocat",
            "followers": 1000,
            "following": 9,
            "public_repos": 8,
            "location": "San Francisco",
            "company": "@github",
            "blog": "https://github.blog",
            "twitter_username": null
        }"#;

        let user: GitHubUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.followers, 1000);
        assert_eq!(user.twitter_username, None);
    }
}
