//! Config file discovery and loading.
//!
//! Handles finding the config file across different platforms and loading it.
//! The search order is:
//!
//! 1. `$XDG_CONFIG_HOME/fanrun/config.toml`
//! 2. `~/.config/fanrun/config.toml`
//! 3. Platform default (e.g., `~/Library/Application Support` on macOS)
//!
//! The config is optional: a missing file yields built-in defaults, only a
//! file that exists but fails to read or parse is an error.

use crate::config::Config;
use crate::error::{FanrunError, Result};
use std::path::PathBuf;

/// Determine the config file path.
///
/// Checks locations in order of preference:
/// 1. `$XDG_CONFIG_HOME/fanrun/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/fanrun/config.toml` (common on Linux, often used on macOS)
/// 3. Platform default via `dirs::config_dir()`
///
/// If no existing config is found, returns `~/.config/fanrun/config.toml`
/// as the default location for new configs.
///
/// # Errors
///
/// Returns [`FanrunError::NoConfigDir`] if the home directory cannot be
/// determined.
pub fn default_config_path() -> Result<PathBuf> {
    // Check XDG_CONFIG_HOME first
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("fanrun").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }

    // Check ~/.config (common on Linux and often used on macOS)
    if let Some(home) = dirs::home_dir() {
        let path = home.join(".config").join("fanrun").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }

    // Fall back to platform default
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("fanrun").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }

    // Default location for new configs
    if let Some(home) = dirs::home_dir() {
        Ok(home.join(".config").join("fanrun").join("config.toml"))
    } else {
        Err(FanrunError::NoConfigDir)
    }
}

/// Load and parse a config file from the given path.
///
/// A missing file is not an error; it yields the built-in defaults.
///
/// # Errors
///
/// - [`FanrunError::IoError`] if reading an existing file fails
/// - [`FanrunError::ParseError`] if TOML parsing fails
pub fn load_config(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config = Config::from_str(&contents)?;
    Ok(config)
}

/// Load config from the default path.
///
/// Convenience wrapper that combines [`default_config_path`] and
/// [`load_config`].
pub fn load_default_config() -> Result<Config> {
    let path = default_config_path()?;
    load_config(&path)
}
