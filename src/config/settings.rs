//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.
//!
//! The consent flag is deliberately absent: consent must be granted anew
//! every run and is never persisted.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::AppPaths;

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Capture-mode settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Whether the "global logging" checkbox starts checked.
    pub global: bool,
}

// ---------------------------------------------------------------------------
// LogConfig
// ---------------------------------------------------------------------------

/// Log file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Override for the log directory. `None` means the platform data dir
    /// (see [`AppPaths`]).
    pub directory: Option<PathBuf>,
}

impl LogConfig {
    /// The effective log file path, honouring the directory override.
    pub fn log_file(&self, paths: &AppPaths) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(AppPaths::LOG_FILE_NAME),
            None => paths.log_file.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels. `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use key_input_logger::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Capture-mode settings.
    pub capture: CaptureConfig,
    /// Log file settings.
    pub log: LogConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.capture.global, loaded.capture.global);
        assert_eq!(original.log.directory, loaded.log.directory);
        assert_eq!(original.ui.window_position, loaded.ui.window_position);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert!(!config.capture.global);
        assert!(config.log.directory.is_none());
        assert!(config.ui.window_position.is_none());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.capture.global = true;
        cfg.log.directory = Some(PathBuf::from("/tmp/keylogs"));
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert!(loaded.capture.global);
        assert_eq!(loaded.log.directory, Some(PathBuf::from("/tmp/keylogs")));
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }

    #[test]
    fn log_file_override_is_honoured() {
        let paths = AppPaths::new();

        let default_cfg = LogConfig::default();
        assert_eq!(default_cfg.log_file(&paths), paths.log_file);

        let overridden = LogConfig {
            directory: Some(PathBuf::from("/var/log/keys")),
        };
        assert_eq!(
            overridden.log_file(&paths),
            PathBuf::from("/var/log/keys/keystrokes.txt")
        );
    }
}
