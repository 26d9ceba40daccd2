//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\key-input-logger\
//!   macOS:   ~/Library/Application Support/key-input-logger/
//!   Linux:   ~/.config/key-input-logger/
//!
//! Data dir (logs):
//!   Windows: %LOCALAPPDATA%\key-input-logger\
//!   macOS:   ~/Library/Application Support/key-input-logger/
//!   Linux:   ~/.local/share/key-input-logger/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory the log file lives in.
    pub log_dir: PathBuf,
    /// Full path to `keystrokes.txt`.
    pub log_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "key-input-logger";

    /// Name of the log file inside the log directory.
    pub const LOG_FILE_NAME: &'static str = "keystrokes.txt";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let log_dir = data_dir.join("logs");
        let log_file = log_dir.join(Self::LOG_FILE_NAME);

        Self {
            config_dir,
            settings_file,
            log_dir,
            log_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.log_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .log_file
            .file_name()
            .is_some_and(|n| n == "keystrokes.txt"));
    }

    #[test]
    fn log_file_lives_inside_the_log_dir() {
        let paths = AppPaths::new();
        assert_eq!(paths.log_file.parent(), Some(paths.log_dir.as_path()));
    }
}
