//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/chordsynth/config.toml`
//! - macOS: `~/Library/Application Support/chordsynth/config.toml`
//! - Windows: `%APPDATA%\chordsynth\config.toml`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "chordsynth";

/// Configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}
