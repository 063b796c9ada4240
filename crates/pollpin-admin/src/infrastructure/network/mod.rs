//! Console client: the admin side of the line protocol.
//!
//! Two exchanges, one connection each:
//!
//! ```text
//! fetch_weak_passwords                 check_pin
//! ────────────────────                 ─────────
//!   ◄── greeting                         ◄── greeting
//! 50 Get Weak Passwords ──►            <pin> ──►
//!   ◄── 700 LIST ','                     ◄── 300 / 500 / 400
//!   ◄── w1,w2,w3,w4,w5,                  (or 100, then <pin> again)
//! ```
//!
//! Every exchange, connect included, is bounded by
//! [`ConsoleClientConfig::timeout`].

use std::time::Duration;

use pollpin_core::protocol::WEAK_PASSWORD_REQUEST_LINE;
use pollpin_core::{
    read_line, write_line, PinVerdict, ProtocolError, StatusCode, WeakPasswordSample,
};
use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::screen_password::{screen_password, ScreenedPassword};

/// Errors talking to the console from the admin side.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// TCP connection to the console failed.
    #[error("failed to connect to console at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The exchange did not finish in time.
    #[error("console did not answer within {0:?}")]
    Timeout(Duration),

    /// The console closed early, answered unexpectedly, or the stream failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Where the console is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ConsoleClientConfig {
    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct ConsoleConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ConsoleConnection {
    /// Connects and consumes the greeting.
    async fn open(config: &ConsoleClientConfig) -> Result<Self, AdvisoryError> {
        let stream = TcpStream::connect((config.host.as_str(), config.port))
            .await
            .map_err(|source| AdvisoryError::ConnectFailed {
                addr: config.addr(),
                source,
            })?;
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let greeting = read_line(&mut reader, "greeting").await?;
        debug!("console greeting: {greeting}");
        Ok(Self { reader, writer })
    }

    async fn send(&mut self, line: &str) -> Result<(), AdvisoryError> {
        Ok(write_line(&mut self.writer, line).await?)
    }

    async fn receive(&mut self, expected: &'static str) -> Result<String, AdvisoryError> {
        Ok(read_line(&mut self.reader, expected).await?)
    }
}

async fn bounded<T, F>(config: &ConsoleClientConfig, exchange: F) -> Result<T, AdvisoryError>
where
    F: std::future::Future<Output = Result<T, AdvisoryError>>,
{
    timeout(config.timeout, exchange)
        .await
        .map_err(|_| AdvisoryError::Timeout(config.timeout))?
}

/// Asks the console for a weak-password sample.
///
/// # Errors
///
/// Returns [`AdvisoryError`] if the console is unreachable, too slow, or
/// answers with anything but a `700` status line.
pub async fn fetch_weak_passwords(
    config: &ConsoleClientConfig,
) -> Result<WeakPasswordSample, AdvisoryError> {
    bounded(config, weak_password_exchange(config)).await
}

async fn weak_password_exchange(
    config: &ConsoleClientConfig,
) -> Result<WeakPasswordSample, AdvisoryError> {
    let mut conn = ConsoleConnection::open(config).await?;
    conn.send(WEAK_PASSWORD_REQUEST_LINE).await?;

    let status = conn.receive("status line").await?;
    if !status.contains("700") {
        return Err(ProtocolError::UnexpectedStatus(status).into());
    }

    let list = conn.receive("weak-password list").await?;
    Ok(WeakPasswordSample::parse_wire_line(&list))
}

/// Submits `pin` to the console and returns its verdict.
///
/// `pin` is sent verbatim.  A console running the two-line exchange answers
/// `100` first; the PIN is then sent a second time.
///
/// # Errors
///
/// Returns [`AdvisoryError`] on connection failure, timeout, or any reply
/// that is not a PIN status line.  Callers treat all of these as rejection.
pub async fn check_pin(config: &ConsoleClientConfig, pin: &str) -> Result<PinVerdict, AdvisoryError> {
    bounded(config, pin_exchange(config, pin)).await
}

async fn pin_exchange(config: &ConsoleClientConfig, pin: &str) -> Result<PinVerdict, AdvisoryError> {
    let mut conn = ConsoleConnection::open(config).await?;
    conn.send(pin).await?;

    let mut status = conn.receive("status line").await?;
    if StatusCode::from_status_line(&status) == Some(StatusCode::ProvidePin) {
        conn.send(pin).await?;
        status = conn.receive("status line").await?;
    }

    match StatusCode::from_status_line(&status).and_then(PinVerdict::from_status) {
        Some(verdict) => Ok(verdict),
        None => Err(ProtocolError::UnexpectedStatus(status).into()),
    }
}

/// Weak-password advisory with fail-open screening.
#[derive(Debug, Clone)]
pub struct AdvisoryClient {
    config: ConsoleClientConfig,
}

impl AdvisoryClient {
    pub fn new(config: ConsoleClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConsoleClientConfig {
        &self.config
    }

    /// See [`fetch_weak_passwords`].
    ///
    /// # Errors
    ///
    /// Same as [`fetch_weak_passwords`].
    pub async fn fetch(&self) -> Result<WeakPasswordSample, AdvisoryError> {
        fetch_weak_passwords(&self.config).await
    }

    /// Screens `candidate` against a freshly fetched sample.  When the
    /// advisory is unavailable the candidate is kept.
    pub async fn screen(&self, candidate: &str) -> ScreenedPassword {
        match self.fetch().await {
            Ok(sample) => screen_password(candidate, Some(&sample)),
            Err(e) => {
                warn!("weak-password advisory unavailable: {e}");
                screen_password(candidate, None)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_joins_host_and_port() {
        let config = ConsoleClientConfig {
            host: "console.local".to_string(),
            port: 1776,
            timeout: Duration::from_secs(5),
        };
        assert_eq!(config.addr(), "console.local:1776");
    }

    #[tokio::test]
    async fn test_bounded_maps_elapsed_to_timeout() {
        let config = ConsoleClientConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            timeout: Duration::from_millis(20),
        };

        let result: Result<(), AdvisoryError> = bounded(&config, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), AdvisoryError>(())
        })
        .await;

        assert!(matches!(result, Err(AdvisoryError::Timeout(d)) if d == config.timeout));
    }
}
