//! CredentialService: the console's TCP accept loop.
//!
//! # Exchange per connection
//!
//! ```text
//! accept ──► greeting ──► request line ──┬─ "50..."  ──► 700 LIST ','
//!                                        │               w1,w2,w3,w4,w5,
//!                                        └─ otherwise ──► parse PIN
//!                                                         300 / 500 / 400
//!        ──► close ──► monitor refresh ──► accept ...
//! ```
//!
//! With `prompt_for_pin` set, the PIN branch first answers
//! `100 Provide PIN number` and reads the PIN from a second line.
//!
//! # Scheduling
//!
//! Connections are served one at a time on the accept loop's own task; no
//! per-connection task is spawned and the server sets no read timeout.  A
//! client that connects and sends nothing holds up the station until it
//! disconnects.
//!
//! Errors on one connection (I/O failure, early end-of-stream, a PIN line
//! that is not an integer) are logged and the connection is dropped without
//! a reply.  The loop itself only stops when the task is dropped.

use std::net::SocketAddr;
use std::time::Duration;

use pollpin_core::protocol::parse_pin_line;
use pollpin_core::{
    classify_request, read_line, write_line, PinVerdict, ProtocolError, Request, StatusCode,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::authority::CredentialAuthority;
use crate::application::monitor::{PoolMonitor, PoolView};
use crate::infrastructure::monitor_sink::MonitorSink;

/// Pause after a failed `accept()` before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Error type for the credential service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listener and wire settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    /// Banner sent on accept.
    pub greeting: String,
    /// Legacy two-line PIN exchange.
    pub prompt_for_pin: bool,
}

/// What one completed exchange did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A weak-password sample of `sent` entries went out.
    WeakPasswords { sent: usize },
    /// A PIN was checked.
    Pin(PinVerdict),
}

/// The console service before it is bound.
pub struct CredentialService {
    settings: ServiceSettings,
    authority: CredentialAuthority,
    monitor: PoolMonitor,
    sink: Box<dyn MonitorSink>,
    served: u64,
}

impl CredentialService {
    /// Wires the service together.  The monitor takes its shuffled initial
    /// order from the authority's pool.
    pub fn new(
        settings: ServiceSettings,
        authority: CredentialAuthority,
        sink: Box<dyn MonitorSink>,
    ) -> Self {
        let monitor = PoolMonitor::new(authority.pool());
        Self {
            settings,
            authority,
            monitor,
            sink,
            served: 0,
        }
    }

    /// Binds the TCP listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BindFailed`] if the address is in use or not
    /// available.
    pub async fn bind(self) -> Result<BoundService, ServiceError> {
        let addr = self.settings.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::BindFailed { addr, source })?;
        Ok(BoundService {
            listener,
            service: self,
        })
    }

    fn publish(&mut self, view: &PoolView) {
        if let Err(e) = self.sink.publish(view) {
            warn!("monitor refresh {} not published: {e}", view.refresh);
        }
    }

    async fn handle_connection(&mut self, stream: TcpStream, peer_addr: SocketAddr) {
        let connection_id = Uuid::new_v4();
        let span = info_span!("connection", id = %connection_id, peer = %peer_addr);
        let settings = &self.settings;
        let authority = &mut self.authority;

        async move {
            debug!("accepted");
            match serve_exchange(stream, settings, authority).await {
                Ok(ExchangeOutcome::WeakPasswords { sent }) => {
                    info!(sent, "weak-password sample sent");
                }
                Ok(ExchangeOutcome::Pin(verdict)) => {
                    info!(?verdict, "PIN checked");
                }
                Err(e) => warn!("exchange abandoned: {e}"),
            }
        }
        .instrument(span)
        .await;

        self.served += 1;
    }
}

/// A bound, not yet running, credential service.
pub struct BoundService {
    listener: TcpListener,
    service: CredentialService,
}

impl BoundService {
    /// The address actually bound (useful with port 0).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Io`] if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ServiceError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop.  Never returns; stop it by dropping the future.
    ///
    /// The initial view is published before the first `accept()`, and a
    /// refreshed view after every connection, before the next `accept()`.
    pub async fn run(self) {
        let BoundService {
            listener,
            mut service,
        } = self;

        match listener.local_addr() {
            Ok(addr) => info!("credential service listening on {addr}"),
            Err(e) => warn!("credential service listening (address unavailable: {e})"),
        }

        let initial = service.monitor.current();
        service.publish(&initial);

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("accept failed: {e}");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            service.handle_connection(stream, peer_addr).await;

            let view = service.monitor.refresh(service.authority.pool());
            service.publish(&view);
            debug!(served = service.served, "monitor refreshed");
        }
    }
}

// ── Per-connection exchange ───────────────────────────────────────────────────

/// Runs one complete exchange on `stream` and shuts down the write side.
///
/// Generic over the stream so tests can drive it with an in-memory mock.
///
/// # Errors
///
/// Returns [`ServiceError::Protocol`] for early end-of-stream, a malformed
/// PIN line, or any read/write failure, and [`ServiceError::Io`] if the
/// final shutdown fails.  Nothing is sent after an error.
pub async fn serve_exchange<S>(
    stream: S,
    settings: &ServiceSettings,
    authority: &mut CredentialAuthority,
) -> Result<ExchangeOutcome, ServiceError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    write_line(&mut writer, &settings.greeting).await?;
    let request = read_line(&mut reader, "request line").await?;

    let outcome = match classify_request(&request) {
        Request::WeakPasswords => {
            let sample = authority.weak_password_sample();
            debug!(%sample, "weak-password sample drawn");
            write_line(&mut writer, StatusCode::WeakPasswordList.status_line()).await?;
            write_line(&mut writer, &sample.to_wire_line()).await?;
            ExchangeOutcome::WeakPasswords { sent: sample.len() }
        }
        Request::PinCheck(line) => {
            let pin_line = if settings.prompt_for_pin {
                write_line(&mut writer, StatusCode::ProvidePin.status_line()).await?;
                read_line(&mut reader, "PIN line").await?
            } else {
                line
            };
            let candidate = parse_pin_line(&pin_line)?;
            let verdict = authority.verify_pin(candidate);
            write_line(&mut writer, verdict.status().status_line()).await?;
            ExchangeOutcome::Pin(verdict)
        }
    };

    writer.shutdown().await?;
    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
