use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Appearance
    pub theme: ThemeMode,
    pub gui_scaling: f64,

    // Export
    pub export_dir: String,

    // Autosave
    pub autosave_idle_ms: u64,
    pub autosave_saving_ms: u64,

    // Overlays
    pub floating_toolbar_offset: f32,
    pub palette_caret_gap: f32,

    // Document
    pub initial_content: String,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            gui_scaling: 1.0,
            export_dir: dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .to_string_lossy()
                .to_string(),
            autosave_idle_ms: 1000,
            autosave_saving_ms: 500,
            floating_toolbar_offset: 60.0,
            palette_caret_gap: 5.0,
            initial_content: "Start writing here. Type / for commands.".to_string(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`. A corrupt file is set aside and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(&self.export_dir)
    }

    /// `log_level` as a tracing level, INFO when unrecognized
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("richedit")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.autosave_idle_ms, 1000);
        assert_eq!(config.autosave_saving_ms, 500);
        assert_eq!(config.floating_toolbar_offset, 60.0);
        assert_eq!(config.palette_caret_gap, 5.0);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("richedit").join("config.json");
        let mut config = Config::default();
        config.theme = ThemeMode::Dark;
        config.export_dir = "/tmp/out".to_string();
        config.save_to(&path).expect("save");

        let restored = Config::load_from(&path).expect("load");
        assert_eq!(restored.theme, ThemeMode::Dark);
        assert_eq!(restored.export_dir, "/tmp/out");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(config.theme, ThemeMode::Dark);
        assert_eq!(config.autosave_idle_ms, 1000);
    }

    #[test]
    fn test_config_corrupt_json_is_backed_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let config = Config::load_from(&path).expect("graceful load");
        assert_eq!(config.theme, ThemeMode::Light);
        assert!(!path.exists());
        assert!(dir.path().join("config.json.corrupt").exists());
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = Config::default();
        config.log_level = "debug".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
        config.log_level = "chatty".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
