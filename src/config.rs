//! Configuration types for fanrun.
//!
//! The config file is optional and only supplies defaults; every setting
//! can be overridden on the command line.
//!
//! # Config Format
//!
//! ```toml
//! # ~/.config/fanrun/config.toml
//!
//! [defaults]
//! parallel = 64
//! prefix = "dc1 "
//! interleave = false
//! quiet = false
//!
//! [remote]
//! program = "ssh"
//! args = ["-o", "BatchMode=yes"]
//! ```

use serde::Deserialize;

/// Parallelism used when neither the CLI nor the config sets one.
pub const DEFAULT_PARALLEL: usize = 512;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default values for CLI flags.
    pub defaults: Defaults,
    /// Remote-execution subprocess settings.
    pub remote: Remote,
}

/// Defaults for flags the operator did not pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Default parallelism degree.
    pub parallel: Option<usize>,
    /// Default output prefix.
    pub prefix: Option<String>,
    /// Interleave output by default.
    pub interleave: bool,
    /// Suppress interleaved host tags by default.
    pub quiet: bool,
}

/// Which subprocess carries the command to each host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Remote {
    /// Program to invoke; defaults to `ssh` when unset.
    pub program: Option<String>,
    /// Arguments inserted before the host and command.
    pub args: Vec<String>,
}

impl Config {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the TOML is malformed or a field has
    /// the wrong type.
    pub fn from_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
