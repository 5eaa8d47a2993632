//! Configuration for the Strato SDK and CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StratoError, StratoResult};

/// Environment variable overriding the management API URL.
pub const ENV_API_URL: &str = "STRATO_API_URL";
/// Environment variable carrying the API token.
pub const ENV_TOKEN: &str = "STRATO_TOKEN";
/// Environment variable selecting the active project.
pub const ENV_PROJECT: &str = "STRATO_PROJECT";

/// Strato configuration — typically stored at `~/.config/strato/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratoConfig {
    /// Management API URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token (or read from STRATO_TOKEN).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Project used when nothing more specific is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Update notifier settings.
    #[serde(default)]
    pub update: UpdateConfig,

    /// Project taken from STRATO_PROJECT; never persisted.
    #[serde(skip)]
    pub env_project: Option<String>,
}

impl Default for StratoConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            default_project: None,
            update: UpdateConfig::default(),
            env_project: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.strato.dev".into()
}

/// Update notifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Whether to check for new CLI releases.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Endpoint returning `{"version": "x.y.z"}` for the latest release.
    #[serde(default = "default_check_url")]
    pub check_url: String,

    /// Minimum hours between two checks.
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_url: default_check_url(),
            interval_hours: default_interval_hours(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_check_url() -> String {
    "https://releases.strato.dev/cli/latest.json".into()
}

fn default_interval_hours() -> u64 {
    24
}

impl StratoConfig {
    /// Directory holding `config.toml` and `state.json`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs_next::config_dir().map(|d| d.join("strato"))
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load the config from its default location, falling back to defaults
    /// when there is no home directory or no file yet.
    pub fn load() -> StratoResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> StratoResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| StratoError::Config(format!("{}: {e}", path.display())))
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> StratoResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| StratoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    /// Returns the names of the variables that were applied.
    pub fn apply_env(&mut self) -> Vec<&'static str> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut applied = Vec::new();

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
            applied.push(ENV_API_URL);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
            applied.push(ENV_TOKEN);
        }
        if let Some(project) = get(ENV_PROJECT) {
            self.env_project = Some(project);
            applied.push(ENV_PROJECT);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: StratoConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_url, "https://api.strato.dev");
        assert!(config.update.enabled);
        assert_eq!(config.update.interval_hours, 24);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_overrides_are_recorded() {
        let env: HashMap<&str, &str> = [
            ("STRATO_API_URL", "http://localhost:9000"),
            ("STRATO_PROJECT", "demo-app"),
            ("STRATO_TOKEN", ""),
        ]
        .into_iter()
        .collect();

        let mut config = StratoConfig::default();
        let applied = config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(applied, vec![ENV_API_URL, ENV_PROJECT]);
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.env_project.as_deref(), Some("demo-app"));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = StratoConfig {
            token: Some("secret".into()),
            default_project: Some("demo-app".into()),
            env_project: Some("ignored".into()),
            ..StratoConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = StratoConfig::load_from(&path).unwrap();
        assert_eq!(loaded.token.as_deref(), Some("secret"));
        assert_eq!(loaded.default_project.as_deref(), Some("demo-app"));
        assert!(loaded.env_project.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();

        let err = StratoConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, StratoError::Config(_)));
    }
}
