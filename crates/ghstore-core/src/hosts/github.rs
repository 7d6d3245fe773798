// GitHub host implementation - bridges the API client with the ReleaseHost trait
use async_trait::async_trait;
use ghstore_api::{GitHubClient, GitHubError, GitHubRelease, GitHubRepo, GitHubUser};

use crate::{
    hosts::ReleaseHost,
    models::{DeveloperProfile, ReleaseRecord, RepoSummary},
    Error, Result,
};

/// Wrapper around GitHubClient that implements ReleaseHost
pub struct GitHubHost {
    client: GitHubClient,
}

impl GitHubHost {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: GitHubClient::new(token),
        }
    }

    /// Wrap a pre-built client, e.g. one pointed at GitHub Enterprise
    pub fn with_client(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReleaseHost for GitHubHost {
    async fn list_user_repositories(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>> {
        let repos = self
            .client
            .list_user_repositories(username, page, per_page)
            .await
            .map_err(map_github_error)?;

        Ok(repos.into_iter().map(github_to_summary).collect())
    }

    async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<ReleaseRecord>> {
        let releases = self
            .client
            .list_releases(owner, repo, per_page)
            .await
            .map_err(map_github_error)?;

        Ok(releases.into_iter().map(github_to_record).collect())
    }

    async fn get_user(&self, username: &str) -> Result<DeveloperProfile> {
        let user = self
            .client
            .get_user(username)
            .await
            .map_err(map_github_error)?;

        Ok(github_to_profile(user))
    }
}

fn map_github_error(err: GitHubError) -> Error {
    match err {
        GitHubError::NotFound(subject) => Error::NotFound(subject),
        GitHubError::RateLimitExceeded => Error::RateLimited,
        other => Error::Host(other.to_string()),
    }
}

/// Convert a GitHub API repo to our internal summary model
fn github_to_summary(gh: GitHubRepo) -> RepoSummary {
    RepoSummary {
        id: gh.id,
        name: gh.name,
        full_name: gh.full_name,
        archived: gh.archived,
        fork: gh.fork,
        description: gh.description,
        html_url: gh.html_url,
        stars: gh.stargazers_count,
        language: gh.language,
        updated_at: gh.updated_at,
    }
}

fn github_to_record(gh: GitHubRelease) -> ReleaseRecord {
    ReleaseRecord {
        tag_name: gh.tag_name,
        draft: gh.draft,
        prerelease: gh.prerelease,
        published_at: gh.published_at,
        assets: gh.assets.into_iter().map(|asset| asset.name).collect(),
    }
}

fn github_to_profile(gh: GitHubUser) -> DeveloperProfile {
    DeveloperProfile {
        id: gh.id,
        login: gh.login,
        name: gh.name,
        bio: gh.bio,
        avatar_url: gh.avatar_url,
        html_url: gh.html_url,
        followers: gh.followers,
        following: gh.following,
        public_repos: gh.public_repos,
        location: gh.location,
        company: gh.company,
        blog: gh.blog,
        twitter_username: gh.twitter_username,
    }
}
