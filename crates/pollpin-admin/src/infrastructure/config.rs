//! TOML configuration for the admin client.
//!
//! ```toml
//! [advisory]
//! console_host = "127.0.0.1"
//! console_port = 1776
//! timeout_secs = 5
//! ```
//!
//! Missing fields take the defaults shown above.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pollpin_core::protocol::DEFAULT_CONSOLE_PORT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::network::ConsoleClientConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level admin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

/// Where the console is and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryConfig {
    #[serde(default = "default_console_host")]
    pub console_host: String,
    #[serde(default = "default_console_port")]
    pub console_port: u16,
    /// Bound on one whole exchange, connect included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_console_host() -> String {
    "127.0.0.1".to_string()
}
fn default_console_port() -> u16 {
    DEFAULT_CONSOLE_PORT
}
fn default_timeout_secs() -> u64 {
    5
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            console_host: default_console_host(),
            console_port: default_console_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AdvisoryConfig {
    /// Network settings for [`crate::infrastructure::network`].
    pub fn client_config(&self) -> ConsoleClientConfig {
        ConsoleClientConfig {
            host: self.console_host.clone(),
            port: self.console_port,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Loads `AdminConfig` from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_admin_config(path: &Path) -> Result<AdminConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
