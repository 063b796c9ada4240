//! TOML-based configuration for the console.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\PollPin\config.toml`
//! - Linux:    `~/.config/pollpin/config.toml` (or `$XDG_CONFIG_HOME/pollpin`)
//! - macOS:    `~/Library/Application Support/PollPin/config.toml`
//!
//! Every section and every field has a default, so an empty file, a partial
//! file, and a missing file all produce a usable configuration:
//!
//! ```toml
//! [console]
//! greeting = "Poll-station credential console"
//! log_level = "info"
//!
//! [network]
//! bind_address = "0.0.0.0"
//! port = 1776
//!
//! [pool]
//! size = 10
//!
//! [random]
//! # seed = 2054        # omit to seed from today's date
//!
//! [monitor]
//! format = "text"      # or "json"
//! # file = "/var/run/pollpin/pins.txt"
//!
//! [protocol]
//! prompt_for_pin = false
//! ```

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use pollpin_core::domain::pool::MIN_POOL_SIZE;
use pollpin_core::protocol::{DEFAULT_CONSOLE_PORT, DEFAULT_GREETING};
use pollpin_core::HOW_MANY_PINS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::monitor::MonitorFormat;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `pool.size` cannot support pool correction.
    #[error("pool.size = {size} is below the minimum of {min}")]
    PoolTooSmall { size: usize, min: usize },

    /// `network.bind_address` is not an IP address.
    #[error("network.bind_address {value:?} is not an IP address: {source}")]
    InvalidBindAddress {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level console configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

/// General console behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    /// Banner sent to every client on accept.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Listener address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port of the credential service.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// PIN pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolConfig {
    /// Number of PINs valid at once.
    #[serde(default = "default_pool_size")]
    pub size: usize,
}

/// Random source seeding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RandomConfig {
    /// Fixed seed.  When absent the seed is derived from today's date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Pool monitor output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub format: MonitorFormat,
    /// Listing file rewritten on every refresh.  Stdout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Wire protocol options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProtocolConfig {
    /// Answer a PIN request with `100 Provide PIN number` and read the PIN
    /// from a second line.
    #[serde(default)]
    pub prompt_for_pin: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_CONSOLE_PORT
}
fn default_pool_size() -> usize {
    HOW_MANY_PINS
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
        }
    }
}

impl AppConfig {
    /// Checks the values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PoolTooSmall`] or
    /// [`ConfigError::InvalidBindAddress`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.size < MIN_POOL_SIZE {
            return Err(ConfigError::PoolTooSmall {
                size: self.pool.size,
                min: MIN_POOL_SIZE,
            });
        }
        self.bind_addr()?;
        Ok(())
    }

    /// The socket address the credential service binds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not
    /// an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr =
            self.network
                .bind_address
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddress {
                    value: self.network.bind_address.clone(),
                    source,
                })?;
        Ok(SocketAddr::new(ip, self.network.port))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform config file, returning
/// `AppConfig::default()` if the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Loads `AppConfig` from an explicit path.  A missing file is an error here.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parses TOML text into an `AppConfig`.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Persists `config` to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the `PollPin`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PollPin"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pollpin"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PollPin")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
