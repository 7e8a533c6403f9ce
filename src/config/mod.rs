//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend used when neither the config file, the environment nor the
/// command line names one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the configured API URL.
pub const API_URL_ENV: &str = "DAYFLOW_API_URL";

/// Application configuration
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST API, without trailing slash
    pub api_url: Option<String>,
    /// Upper bound on the token refresh call. Unset means wait indefinitely.
    pub refresh_timeout_secs: Option<u64>,
    /// Stored access token
    #[serde(rename = "dayflow_access_token")]
    pub access_token: Option<String>,
    /// Stored refresh token
    #[serde(rename = "dayflow_refresh_token")]
    pub refresh_token: Option<String>,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "dayflow", "dayflow")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains tokens)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Resolve the API base URL: explicit override, then environment, then
    /// config file, then the built-in default.
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env = std::env::var(API_URL_ENV).ok();
        let raw = cli_override
            .map(str::to_string)
            .or(env)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let parsed = url::Url::parse(&raw).with_context(|| format!("Invalid API URL: {}", raw))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API URL must be http or https: {}", raw);
        }
        Ok(raw.trim_end_matches('/').to_string())
    }

    pub fn refresh_timeout(&self) -> Option<Duration> {
        self.refresh_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.api_url.is_none());
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: Some("https://hr.example.com/api".to_string()),
            refresh_timeout_secs: Some(10),
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url, config.api_url);
        assert_eq!(loaded.refresh_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(loaded.access_token.as_deref(), Some("a"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_cli_override_wins_and_is_trimmed() {
        let config = Config {
            api_url: Some("http://from-file/api".to_string()),
            ..Config::default()
        };
        let url = config
            .resolve_api_url(Some("https://override.example/api/"))
            .unwrap();
        assert_eq!(url, "https://override.example/api");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = Config::default();
        assert!(config.resolve_api_url(Some("ftp://example/api")).is_err());
        assert!(config.resolve_api_url(Some("not a url")).is_err());
    }
}
