//! Configuration management for Pathwise

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::hardness::HardnessBounds;
use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the learning backend
    pub api_base_url: String,

    /// Selected theme name
    pub theme: String,

    /// Vim mode enabled
    pub vim_mode: bool,

    /// Quiet period before reading progress is saved (milliseconds)
    pub autosave_delay_ms: u64,

    /// Allowed range of the hardness index
    pub hardness_bounds: HardnessBounds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            theme: Theme::MIDNIGHT.to_string(),
            vim_mode: true,
            autosave_delay_ms: 2000,
            hardness_bounds: HardnessBounds::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing the defaults there if it
    /// does not exist yet
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config at {:?}", path))
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "pathwise").context("Failed to determine project directories")
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Get the data directory path (store file and log)
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme, using default");
            Theme::midnight()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn default_config_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.autosave_delay(), Duration::from_secs(2));
        assert!(config.vim_mode);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let json = r#"{"api_base_url":"https://learn.example.com","vim_mode":false}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.api_base_url, "https://learn.example.com");
        assert!(!config.vim_mode);
        assert_eq!(config.hardness_bounds, HardnessBounds::default());
        assert_eq!(config.theme, "Midnight");
    }

    #[test]
    fn load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pathwise").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let changed = Config { autosave_delay_ms: 500, ..config };
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().autosave_delay_ms, 500);
    }

    #[test]
    fn unknown_theme_falls_back() {
        let config = Config { theme: "Neon".into(), ..Config::default() };
        assert_eq!(config.active_theme().name, "Midnight");
    }
}
