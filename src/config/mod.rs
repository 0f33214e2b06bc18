//! Configuration management for pagemark
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// GitHub remote store configuration
    #[serde(default)]
    pub github: GitHubConfig,

    /// Page fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Blog configuration (where the reading list is rendered)
    #[serde(default)]
    pub blog: BlogConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// GitHub remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Repository owner (empty = local-only mode)
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub repo: String,

    /// Branch holding the readings file
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Path of the readings file inside the repository
    #[serde(default = "default_file_path")]
    pub file_path: String,

    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Personal access token cached by `pagemark init`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable consulted when no token is cached
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Retries after a stale-revision conflict on write
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

/// Page fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_fetch_user_agent")]
    pub user_agent: String,
}

/// Blog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogConfig {
    /// URL of the rendered reading list page, shown after a capture
    #[serde(default)]
    pub reading_list_url: String,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for pagemark data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to the local readings JSON file
    pub readings_file: PathBuf,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
            file_path: default_file_path(),
            api_base: default_api_base(),
            token: None,
            token_env: default_token_env(),
            conflict_retries: default_conflict_retries(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_fetch_user_agent(),
        }
    }
}

impl GitHubConfig {
    /// Whether enough is configured to build the remote store.
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty() && self.token().is_some()
    }

    /// Resolve the access token: the cached value wins, then the
    /// configured environment variable.
    pub fn token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(&self.token_env).ok().filter(|t| !t.is_empty()))
    }
}

impl Config {
    /// Get the default base directory for pagemark (~/.pagemark)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pagemark")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    pub fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            readings_file: base.join("readings.json"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Set up paths based on config file location
        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            readings_file: base.join("readings.json"),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific base directory
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Check if pagemark is initialized (config exists)
    pub fn is_initialized(&self) -> bool {
        self.paths.config_file.exists()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs == 0 {
            return Err(Error::Config(
                "fetch.timeout_secs must be positive".to_string(),
            ));
        }

        if self.github.branch.is_empty() {
            return Err(Error::Config("github.branch must not be empty".to_string()));
        }

        if self.github.file_path.is_empty() || self.github.file_path.starts_with('/') {
            return Err(Error::Config(
                "github.file_path must be a relative repository path".to_string(),
            ));
        }

        if !self.github.owner.is_empty() && self.github.repo.is_empty() {
            return Err(Error::Config(
                "github.repo must be set when github.owner is set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.branch, "main");
        assert_eq!(config.github.file_path, "_data/readings.json");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert!(!config.github.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.github.owner = "jkevinxu".to_string();
        config.github.repo = "github-blog".to_string();

        config.save().unwrap();
        assert!(config.paths.config_file.exists());

        let loaded = Config::load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(loaded.github.owner, "jkevinxu");
        assert_eq!(loaded.github.repo, "github-blog");
        assert_eq!(
            loaded.paths.readings_file,
            tmp.path().join("readings.json")
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.fetch.timeout_secs = 15;
        assert!(config.validate().is_ok());

        config.github.file_path = "/absolute/path.json".to_string();
        assert!(config.validate().is_err());
        config.github.file_path = "_data/readings.json".to_string();

        config.github.owner = "someone".to_string();
        config.github.repo = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_resolution() {
        let mut github = GitHubConfig {
            token_env: "PAGEMARK_TEST_TOKEN_UNSET".to_string(),
            ..Default::default()
        };
        assert_eq!(github.token(), None);

        github.token = Some("ghp_cached".to_string());
        assert_eq!(github.token(), Some("ghp_cached".to_string()));

        // Empty cached token falls through to the (unset) env var
        github.token = Some(String::new());
        assert_eq!(github.token(), None);
    }

    #[test]
    fn test_token_not_serialized_when_absent() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(!toml.contains("token ="));
    }
}
