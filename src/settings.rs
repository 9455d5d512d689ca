//! Game settings
//!
//! Loaded once at startup from a JSON file. Every field is optional in the
//! file; missing ones take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICK_INTERVAL_MS;
use crate::error::{SetupError, SetupResult};

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window title
    pub title: String,
    /// Simulation tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Directory holding `vertex.wgsl` and `fragment.wgsl`.
    /// When unset the built-in shaders are used.
    pub shader_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Brickout".to_string(),
            tick_interval_ms: TICK_INTERVAL_MS,
            vsync: true,
            shader_dir: None,
        }
    }
}

impl Settings {
    /// Default settings file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "brickout.json";

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> SetupResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| SetupError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SetupError::Settings {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    /// Load settings from `path` if given, else `brickout.json` if present,
    /// else defaults. A file that exists must parse, whichever way it was found.
    pub fn load(path: Option<&Path>) -> SetupResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_or_default(Path::new(Self::FILE_NAME)),
        }
    }

    /// Load `path` if it exists, else defaults
    fn load_or_default(path: &Path) -> SetupResult<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        log::info!("Using default settings");
        Ok(Self::default())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> SetupResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SetupError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SetupError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Tick interval as a duration
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// Fixed timestep in seconds
    pub fn sim_dt(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }

    fn sanitized(mut self) -> Self {
        if self.tick_interval_ms == 0 {
            log::warn!("tick_interval_ms must be positive, using {}", TICK_INTERVAL_MS);
            self.tick_interval_ms = TICK_INTERVAL_MS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval_ms, 20);
        assert!((settings.sim_dt() - 0.02).abs() < 1e-6);
        assert!(settings.shader_dir.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "title": "Bricks" }"#).unwrap();
        assert_eq!(settings.title, "Bricks");
        assert_eq!(settings.tick_interval_ms, 20);
        assert!(settings.vsync);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("brickout-settings-{}.json", std::process::id()));
        let settings = Settings {
            tick_interval_ms: 16,
            vsync: false,
            shader_dir: Some(PathBuf::from("shaders")),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_zero_interval_is_replaced() {
        let path = std::env::temp_dir().join(format!("brickout-zero-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "tick_interval_ms": 0 }"#).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.tick_interval_ms, TICK_INTERVAL_MS);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let missing = Path::new("/nonexistent/brickout.json");
        let err = Settings::load(Some(missing)).unwrap_err();
        assert!(matches!(err, SetupError::SettingsIo { .. }));
        assert!(err.to_string().contains("/nonexistent/brickout.json"));
    }

    #[test]
    fn test_absent_default_file_gives_defaults() {
        let missing = std::env::temp_dir().join(format!("brickout-absent-{}.json", std::process::id()));
        assert_eq!(Settings::load_or_default(&missing).unwrap(), Settings::default());
    }

    #[test]
    fn test_malformed_default_file_is_error() {
        let path = std::env::temp_dir().join(format!("brickout-bad-default-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Settings::load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SetupError::Settings { .. })));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = std::env::temp_dir().join(format!("brickout-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(SetupError::Settings { .. })));
    }
}
