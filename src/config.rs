use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{APP_NAME, USER_AGENT, limits};

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "RECETARIO_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub backend: BackendConfig,

    pub search: SearchConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Root of the search, ingredients and chat endpoints.
    pub base_url: String,

    /// Client-side request timeout in seconds. 0 leaves requests unbounded.
    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_seconds: 0,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Capacity of the selection change channel (default: 64)
    pub event_buffer_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: limits::DEFAULT_EVENT_BUFFER,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,
}

impl Config {
    /// Reads the first config file found, or defaults, then applies the
    /// environment override.
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// First existing file among the search paths.
    #[must_use]
    pub fn locate() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.backend.base_url = url;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_NAME).join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{APP_NAME}")).join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            anyhow::bail!("Backend URL cannot be empty");
        }

        crate::clients::api::parse_base_url(&self.backend.base_url)
            .with_context(|| format!("Invalid backend URL: {}", self.backend.base_url))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:3000");
        assert_eq!(config.backend.request_timeout_seconds, 0);
        assert_eq!(config.search.event_buffer_size, 64);
        assert!(!config.observability.json_logs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("[search]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [backend]
            base_url = "https://recipes.example.com/api"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.backend.base_url, "https://recipes.example.com/api");

        assert_eq!(config.general.worker_threads, 2);
        assert_eq!(config.search.event_buffer_size, 64);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.backend.base_url = "   ".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "localhost without scheme".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "recetario-config-test-{}.toml",
            std::process::id()
        ));
        let mut config = Config::default();
        config.backend.request_timeout_seconds = 15;

        config.save_to_path(&path).unwrap();
        let loaded = Config::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.backend.request_timeout_seconds, 15);
    }

    #[test]
    fn test_locate_only_returns_search_paths_that_exist() {
        let paths = Config::config_paths();
        assert_eq!(paths[0], PathBuf::from("config.toml"));

        match Config::locate() {
            Some(path) => {
                assert!(path.exists());
                assert!(paths.contains(&path));
            }
            None => assert!(paths.iter().all(|p| !p.exists())),
        }
    }
}
