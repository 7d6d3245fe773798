use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ghstore_api::GitHubClient;
use ghstore_core::{
    hosts::GitHubHost, Config, DeveloperDirectory, FavoritesStore, InstalledAppsStore, Platform,
};
use ghstore_store::LocalDatabase;

#[derive(Parser)]
#[command(name = "ghstore")]
#[command(version, about = "GitHub app-store client", long_about = None)]
struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List a developer's repositories with release and install metadata
    Repos {
        /// Developer username
        username: String,
    },
    /// Show a developer's profile
    Profile {
        /// Developer username
        username: String,
    },
    /// Mark a repository as favourite
    Favorite {
        /// Host-assigned repository id
        repo_id: i64,
    },
    /// Remove a repository from favourites
    Unfavorite {
        /// Host-assigned repository id
        repo_id: i64,
    },
}

fn detect_platform() -> anyhow::Result<Platform> {
    Platform::from_target_os(std::env::consts::OS)
        .with_context(|| format!("unsupported platform: {}", std::env::consts::OS))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghstore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let db_path = config.store.resolved_db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Arc::new(
        LocalDatabase::new(&db_path.to_string_lossy()).context("failed to open local database")?,
    );

    match cli.command {
        Commands::Repos { username } => {
            tracing::info!("Listing repositories for {}", username);
            let client = GitHubClient::with_base_url(
                config.github.token.clone(),
                config.github.api_url.clone(),
            );
            let directory = DeveloperDirectory::new(
                Arc::new(GitHubHost::with_client(client)),
                Arc::clone(&db) as Arc<dyn InstalledAppsStore>,
                Arc::clone(&db) as Arc<dyn FavoritesStore>,
                detect_platform()?,
            )
            .with_concurrency_limit(config.enrichment.max_concurrent_release_checks);

            let repos = directory.get_developer_repositories(&username).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&repos)?);
                return Ok(());
            }

            if repos.is_empty() {
                println!("No repositories found for {}", username);
                return Ok(());
            }

            for repo in &repos {
                let mut markers = Vec::new();
                if repo.is_installed {
                    markers.push("installed");
                }
                if repo.is_favorite {
                    markers.push("favourite");
                }
                let version = repo.latest_version.as_deref().unwrap_or("-");
                println!(
                    "{:<40} {:>8}  releases: {:<5} installable: {:<5} version: {:<12} {}",
                    repo.full_name,
                    format!("{}*", repo.stars),
                    repo.has_releases,
                    repo.has_installable_assets,
                    version,
                    markers.join(", ")
                );
            }
        }
        Commands::Profile { username } => {
            tracing::info!("Fetching profile for {}", username);
            let client = GitHubClient::with_base_url(
                config.github.token.clone(),
                config.github.api_url.clone(),
            );
            let directory = DeveloperDirectory::new(
                Arc::new(GitHubHost::with_client(client)),
                Arc::clone(&db) as Arc<dyn InstalledAppsStore>,
                Arc::clone(&db) as Arc<dyn FavoritesStore>,
                detect_platform()?,
            );

            let profile = directory.get_developer_profile(&username).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
                return Ok(());
            }

            println!("{} ({})", profile.name.as_deref().unwrap_or(&profile.login), profile.login);
            if let Some(bio) = &profile.bio {
                println!("{}", bio);
            }
            println!(
                "repos: {}  followers: {}  following: {}",
                profile.public_repos, profile.followers, profile.following
            );
            if let Some(location) = &profile.location {
                println!("location: {}", location);
            }
            println!("{}", profile.html_url);
        }
        Commands::Favorite { repo_id } => {
            db.add_favorite(repo_id)?;
            println!("Added {} to favourites", repo_id);
        }
        Commands::Unfavorite { repo_id } => {
            db.remove_favorite(repo_id)?;
            println!("Removed {} from favourites", repo_id);
        }
    }

    Ok(())
}
