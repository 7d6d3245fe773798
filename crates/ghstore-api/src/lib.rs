// GitHub REST transport for ghstore
pub mod github;
pub mod retry;

// Re-export common types
pub use github::{
    GitHubAsset, GitHubClient, GitHubError, GitHubRelease, GitHubRepo, GitHubUser,
};
pub use retry::RetryConfig;
