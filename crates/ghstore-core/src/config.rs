use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::enrich::MAX_CONCURRENT_RELEASE_CHECKS;

/// Main configuration structure
///
/// Loaded from a TOML file under the platform config directory.
/// Priority: CLI > Env > File > Defaults (like a sensible person would do)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl Config {
    /// Load config from default location or fall back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Config file path: XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::Config("Could not find config directory".into()))?
            .join("ghstore");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// GitHub personal access token
    /// Get one at https://github.com/settings/tokens
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Override for the local database location
    pub db_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolved database path, defaulting to the platform data directory
    pub fn resolved_db_path(&self) -> crate::Result<PathBuf> {
        if let Some(ref path) = self.db_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::Config("Could not find data directory".into()))?
            .join("ghstore");

        Ok(data_dir.join("store.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Cap on simultaneously active release checks per batch
    #[serde(default = "default_release_check_cap")]
    pub max_concurrent_release_checks: usize,
}

fn default_release_check_cap() -> usize {
    MAX_CONCURRENT_RELEASE_CHECKS
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent_release_checks: default_release_check_cap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.enrichment.max_concurrent_release_checks, 20);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("api_url"));
        assert!(toml.contains("max_concurrent_release_checks"));
    }

    #[test]
    fn test_config_roundtrip_with_overrides() {
        let toml = r#"
            [github]
            token = "ghp_secret"
            api_url = "https://github.example.com/api/v3"

            [store]
            db_path = "/tmp/ghstore-test.db"

            [enrichment]
            max_concurrent_release_checks = 5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.github.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.enrichment.max_concurrent_release_checks, 5);
        assert_eq!(
            config.store.resolved_db_path().unwrap(),
            PathBuf::from("/tmp/ghstore-test.db")
        );
    }

    #[test]
    fn test_missing_enrichment_section_uses_default_cap() {
        let config: Config = toml::from_str("[github]\napi_url = \"https://api.github.com\"\n")
            .unwrap();
        assert_eq!(config.enrichment.max_concurrent_release_checks, 20);
    }
}
