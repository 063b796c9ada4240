//! PollPin credential console: entry point.
//!
//! Mints the PIN pool, binds the credential service, and serves one exchange
//! per connection until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! pollpin-console [OPTIONS]
//!
//! Options:
//!   --config <PATH>            TOML config file [default: platform config dir]
//!   --port <PORT>              TCP port [default: 1776]
//!   --bind <ADDR>              Bind address [default: 0.0.0.0]
//!   --seed <SEED>              Fixed random seed [default: derived from today]
//!   --monitor-format <FORMAT>  text | json [default: text]
//!   --monitor-file <PATH>      Write the PIN listing here instead of stdout
//! ```
//!
//! Command-line values override the config file.  Each flag except the
//! monitor ones can also be set through `POLLPIN_*` environment variables.
//!
//! # Startup order
//!
//! 1. Parse the CLI and load the config file, then apply overrides.
//! 2. Initialise `tracing`: `RUST_LOG` if set, else `console.log_level`.
//! 3. Seed the random source and mint the pool.
//! 4. Bind.  A bind failure ends the process with a non-zero exit code.
//! 5. Run the accept loop until Ctrl+C, which drops it without draining.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use pollpin_console::application::authority::CredentialAuthority;
use pollpin_console::application::monitor::MonitorFormat;
use pollpin_console::infrastructure::monitor_sink::build_sink;
use pollpin_console::infrastructure::network::credential_service::{
    CredentialService, ServiceSettings,
};
use pollpin_console::infrastructure::storage::config::{
    load_config, load_config_from, AppConfig,
};
use pollpin_core::SeededRandom;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PollPin polling-station credential console.
///
/// Serves one-time voter PINs and weak-password advisories over a
/// line-oriented TCP protocol.
#[derive(Debug, Parser)]
#[command(
    name = "pollpin-console",
    about = "Polling-station credential console: rotating PIN pool over TCP",
    version
)]
struct Cli {
    /// TOML config file.  Defaults to `config.toml` in the platform config
    /// directory; a missing default file means built-in defaults.
    #[arg(long, env = "POLLPIN_CONFIG")]
    config: Option<PathBuf>,

    /// TCP port for the credential service.
    #[arg(long, env = "POLLPIN_PORT")]
    port: Option<u16>,

    /// IP address to bind.  `0.0.0.0` accepts connections on every
    /// interface, `127.0.0.1` only local ones.
    #[arg(long, env = "POLLPIN_BIND")]
    bind: Option<String>,

    /// Fixed seed for the random source.  Without it the seed is derived
    /// from today's date.
    #[arg(long, env = "POLLPIN_SEED")]
    seed: Option<u64>,

    /// Monitor output format: `text` or `json`.
    #[arg(long)]
    monitor_format: Option<MonitorFormat>,

    /// Write the monitor listing to this file on every refresh.
    #[arg(long)]
    monitor_file: Option<PathBuf>,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the merged configuration fails validation.
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load platform config")?,
        };
        self.apply_overrides(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(bind) = &self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(seed) = self.seed {
            config.random.seed = Some(seed);
        }
        if let Some(format) = self.monitor_format {
            config.monitor.format = format;
        }
        if let Some(file) = &self.monitor_file {
            config.monitor.file = Some(file.clone());
        }
    }
}

fn init_tracing(configured_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_tracing(&config.console.log_level);
    info!("PollPin console starting");

    let rng = match config.random.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::for_today(),
    };
    debug!(seed = rng.seed(), "random source seeded");

    let authority = CredentialAuthority::new(config.pool.size, Box::new(rng))
        .context("failed to mint PIN pool")?;
    let sink = build_sink(config.monitor.format, config.monitor.file.as_deref());

    let settings = ServiceSettings {
        bind_addr: config.bind_addr()?,
        greeting: config.console.greeting.clone(),
        prompt_for_pin: config.protocol.prompt_for_pin,
    };
    let service = CredentialService::new(settings, authority, sink)
        .bind()
        .await
        .context("credential service could not start")?;

    let run = service.run();
    tokio::pin!(run);

    tokio::select! {
        () = &mut run => {}
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("received Ctrl+C; closing console"),
            Err(e) => {
                error!("failed to listen for Ctrl+C signal: {e}");
                run.await;
            }
        },
    }

    info!("PollPin console stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pollpin-console"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        // Arrange
        let parsed = cli(&[]);
        let mut config = AppConfig::default();

        // Act
        parsed.apply_overrides(&mut config);

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_port_and_bind_override() {
        let parsed = cli(&["--port", "4000", "--bind", "127.0.0.1"]);
        let mut config = AppConfig::default();

        parsed.apply_overrides(&mut config);

        assert_eq!(
            config.bind_addr().unwrap(),
            "127.0.0.1:4000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_cli_seed_override() {
        let parsed = cli(&["--seed", "2054"]);
        let mut config = AppConfig::default();

        parsed.apply_overrides(&mut config);

        assert_eq!(config.random.seed, Some(2054));
    }

    #[test]
    fn test_cli_monitor_overrides() {
        let parsed = cli(&["--monitor-format", "json", "--monitor-file", "/tmp/pins.json"]);
        let mut config = AppConfig::default();

        parsed.apply_overrides(&mut config);

        assert_eq!(config.monitor.format, MonitorFormat::Json);
        assert_eq!(config.monitor.file, Some(PathBuf::from("/tmp/pins.json")));
    }

    #[test]
    fn test_cli_rejects_unknown_monitor_format() {
        let result = Cli::try_parse_from(["pollpin-console", "--monitor-format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_config_missing_explicit_file_is_error() {
        let parsed = cli(&["--config", "/nonexistent/path/that/cannot/exist/config.toml"]);
        assert!(parsed.resolve_config().is_err());
    }

    #[test]
    fn test_resolve_config_rejects_invalid_bind_override() {
        // Arrange: a readable, empty config file
        let path = std::env::temp_dir().join(format!("pollpin_cli_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "").unwrap();
        let path_str = path.to_string_lossy().to_string();
        let parsed = cli(&["--config", &path_str, "--bind", "not.an.ip"]);

        // Act
        let result = parsed.resolve_config();

        // Assert
        assert!(result.is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resolve_config_applies_file_then_flags() {
        let path = std::env::temp_dir().join(format!("pollpin_cli_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[network]\nport = 3000\n[pool]\nsize = 4\n").unwrap();
        let path_str = path.to_string_lossy().to_string();
        let parsed = cli(&["--config", &path_str, "--port", "3001"]);

        let config = parsed.resolve_config().unwrap();

        assert_eq!(config.network.port, 3001);
        assert_eq!(config.pool.size, 4);
        std::fs::remove_file(&path).ok();
    }
}
