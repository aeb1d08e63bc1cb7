use crate::dashboard::dashboard::GridMetrics;
use crate::dashboard::snapshot::LocalStorage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Directory holding the persisted dashboard. Defaults to
    /// `~/.energy_dashboard` when absent.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Initial window size. If absent, a default size is used.
    #[serde(default = "default_window_size")]
    pub window_size: Option<(f32, f32)>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_grid_margin")]
    pub grid_margin: f32,
}

fn default_window_size() -> Option<(f32, f32)> {
    Some((1440.0, 900.0))
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    1.5
}

fn default_row_height() -> f32 {
    80.0
}

fn default_grid_margin() -> f32 {
    12.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            data_dir: None,
            window_size: default_window_size(),
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            row_height: default_row_height(),
            grid_margin: default_grid_margin(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn storage(&self) -> LocalStorage {
        match &self.data_dir {
            Some(dir) => LocalStorage::new(dir),
            None => LocalStorage::new(LocalStorage::default_dir()),
        }
    }

    /// Grid geometry, falling back to defaults for non-positive values.
    pub fn grid_metrics(&self) -> GridMetrics {
        let defaults = GridMetrics::default();
        let row_height = if self.row_height > 0.0 {
            self.row_height
        } else {
            tracing::warn!(row_height = self.row_height, "invalid row height; using default");
            defaults.row_height
        };
        let margin = if self.grid_margin >= 0.0 {
            self.grid_margin
        } else {
            tracing::warn!(grid_margin = self.grid_margin, "invalid grid margin; using default");
            defaults.margin
        };
        GridMetrics { row_height, margin }
    }

    pub fn toast_duration_secs(&self) -> f64 {
        f64::from(self.toast_duration.max(0.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.grid_metrics(), GridMetrics::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"debug_logging": true, "data_dir": "/tmp/dash"}"#).unwrap();
        let settings = Settings::load(path.to_str().unwrap()).unwrap();
        assert!(settings.debug_logging);
        assert!(settings.enable_toasts);
        assert_eq!(settings.toast_duration, 1.5);
        assert_eq!(settings.storage().dir(), std::path::Path::new("/tmp/dash"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = Settings {
            row_height: 60.0,
            enable_toasts: false,
            ..Settings::default()
        };
        settings.save(path).unwrap();
        assert_eq!(Settings::load(path).unwrap(), settings);
    }

    #[test]
    fn invalid_geometry_falls_back() {
        let settings = Settings {
            row_height: 0.0,
            grid_margin: -3.0,
            ..Settings::default()
        };
        assert_eq!(settings.grid_metrics(), GridMetrics::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Settings::load(path.to_str().unwrap()).is_err());
    }
}
