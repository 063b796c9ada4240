//! PollPin admin client: entry point.
//!
//! # Usage
//!
//! ```text
//! pollpin-admin [OPTIONS] <COMMAND>
//!
//! Commands:
//!   screen <PASSWORD>            Screen a password against the console's weak list
//!   check-pin <PIN>              Ask the console whether a PIN is valid
//!   unlock <ATTEMPT>             Screen --admin-password, then try ATTEMPT against it
//!
//! Options:
//!   --config <PATH>              TOML config file with an [advisory] section
//!   --console-host <HOST>        Console host [default: 127.0.0.1]
//!   --console-port <PORT>        Console port [default: 1776]
//!   --timeout-secs <SECS>        Per-exchange timeout [default: 5]
//! ```
//!
//! Exit status is 0 when the PIN grants access or the gate unlocks, 1
//! otherwise.  A console that cannot be reached never makes `screen` fail:
//! the password is kept unscreened.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pollpin_admin::application::gate::AdminGate;
use pollpin_admin::infrastructure::config::{load_admin_config, AdminConfig};
use pollpin_admin::infrastructure::network::{check_pin, AdvisoryClient, ConsoleClientConfig};
use pollpin_core::PinVerdict;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PollPin administrative client.
#[derive(Debug, Parser)]
#[command(
    name = "pollpin-admin",
    about = "Weak-password advisory and PIN checks against a PollPin console",
    version
)]
struct Cli {
    /// TOML config file.  Flags override its values.
    #[arg(long, env = "POLLPIN_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Hostname or IP address of the console.
    #[arg(long, env = "POLLPIN_CONSOLE_HOST")]
    console_host: Option<String>,

    /// TCP port of the console.
    #[arg(long, env = "POLLPIN_CONSOLE_PORT")]
    console_port: Option<u16>,

    /// Upper bound on one exchange with the console, connect included.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Screen a candidate administrator password.
    Screen { password: String },

    /// Submit a voter PIN to the console.
    CheckPin { pin: String },

    /// Screen the administrator password, then try an unlock attempt.
    Unlock {
        /// Configured administrator password.
        #[arg(long, env = "POLLPIN_ADMIN_PASSWORD")]
        admin_password: String,
        attempt: String,
    },
}

impl Cli {
    /// Loads the config file (if any) and applies flag overrides.
    fn client_config(&self) -> anyhow::Result<ConsoleClientConfig> {
        let mut config = match &self.config {
            Some(path) => load_admin_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AdminConfig::default(),
        };
        if let Some(host) = &self.console_host {
            config.advisory.console_host = host.clone();
        }
        if let Some(port) = self.console_port {
            config.advisory.console_port = port;
        }
        if let Some(secs) = self.timeout_secs {
            config.advisory.timeout_secs = secs;
        }
        Ok(config.advisory.client_config())
    }
}

fn verdict_message(verdict: PinVerdict) -> &'static str {
    match verdict {
        PinVerdict::Accepted => "PIN accepted",
        PinVerdict::Corrected => "PIN corrected",
        PinVerdict::Denied => "PIN incorrect",
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config()?;

    match cli.command {
        Command::Screen { password } => {
            let screened = AdvisoryClient::new(config).screen(&password).await;
            if screened.was_replaced() {
                println!("weak password replaced; effective password: {}", screened.password());
            } else {
                println!("password kept");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckPin { pin } => {
            let verdict = match check_pin(&config, &pin).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!("PIN check failed: {e}");
                    PinVerdict::Denied
                }
            };
            println!("{}", verdict_message(verdict));
            Ok(if verdict.grants_access() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Unlock {
            admin_password,
            attempt,
        } => {
            let screened = AdvisoryClient::new(config).screen(&admin_password).await;
            let gate = AdminGate::from_screened(screened);
            if gate.unlock(&attempt) {
                println!("unlocked");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("locked");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
