//! Output sinks for the pool monitor.
//!
//! The credential service publishes a [`PoolView`] to one [`MonitorSink`]
//! after every exchange.  Sinks only write; a failing sink is logged by the
//! caller and never stops the service.
//!
//! | Sink          | Target                                        |
//! |---------------|-----------------------------------------------|
//! | `StdoutSink`  | operator terminal, header line + listing      |
//! | `FileSink`    | a listing file, rewritten on every refresh    |
//! | `ChannelSink` | a tokio channel, used by integration tests    |

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::application::monitor::{MonitorFormat, PoolView};

/// Error type for monitor output.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Writing to the terminal failed.
    #[error("monitor output failed: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the listing file failed.
    #[error("failed to write monitor file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The view could not be rendered as JSON.
    #[error("failed to render monitor view as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The receiving side of a [`ChannelSink`] is gone.
    #[error("monitor channel closed")]
    ChannelClosed,
}

/// Destination for pool views.
pub trait MonitorSink: Send {
    /// Publishes one view.
    ///
    /// # Errors
    ///
    /// Returns a [`MonitorError`] when the view cannot be rendered or written.
    fn publish(&mut self, view: &PoolView) -> Result<(), MonitorError>;
}

/// Renders `view` for a terminal: a header line, then the listing.
///
/// The header is omitted for JSON so every line stays machine-readable.
pub fn render_listing(view: &PoolView, format: MonitorFormat) -> Result<String, MonitorError> {
    let body = view.render(format)?;
    Ok(match format {
        MonitorFormat::Text => format!(
            "── valid PINs (refresh {}, {} entries) ──\n{body}",
            view.refresh,
            view.pins.len()
        ),
        MonitorFormat::Json => body,
    })
}

// ── StdoutSink ────────────────────────────────────────────────────────────────

/// Prints every view to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    format: MonitorFormat,
}

impl StdoutSink {
    pub fn new(format: MonitorFormat) -> Self {
        Self { format }
    }
}

impl MonitorSink for StdoutSink {
    fn publish(&mut self, view: &PoolView) -> Result<(), MonitorError> {
        let listing = render_listing(view, self.format)?;
        let mut out = std::io::stdout().lock();
        out.write_all(listing.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

// ── FileSink ──────────────────────────────────────────────────────────────────

/// Replaces the contents of a file with the latest view.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: MonitorFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: MonitorFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MonitorSink for FileSink {
    fn publish(&mut self, view: &PoolView) -> Result<(), MonitorError> {
        let content = view.render(self.format)?;
        std::fs::write(&self.path, content).map_err(|source| MonitorError::File {
            path: self.path.clone(),
            source,
        })
    }
}

// ── ChannelSink ───────────────────────────────────────────────────────────────

/// Forwards every view over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PoolView>,
}

impl ChannelSink {
    /// Creates the sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PoolView>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MonitorSink for ChannelSink {
    fn publish(&mut self, view: &PoolView) -> Result<(), MonitorError> {
        self.tx
            .send(view.clone())
            .map_err(|_| MonitorError::ChannelClosed)
    }
}

/// Picks the sink for the configured output: a file when a path is given,
/// the terminal otherwise.
pub fn build_sink(format: MonitorFormat, file: Option<&Path>) -> Box<dyn MonitorSink> {
    match file {
        Some(path) => Box::new(FileSink::new(path, format)),
        None => Box::new(StdoutSink::new(format)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pollpin_core::Pin;
    use uuid::Uuid;

    fn view(refresh: u64, values: &[u16]) -> PoolView {
        PoolView {
            refresh,
            pins: values.iter().map(|&v| Pin::new(v).unwrap()).collect(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pollpin_{name}_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_render_listing_text_has_header_then_pins() {
        let listing = render_listing(&view(4, &[4821, 1207]), MonitorFormat::Text).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("refresh 4"));
        assert_eq!(&lines[1..], ["4821", "1207"]);
    }

    #[test]
    fn test_render_listing_json_has_no_header() {
        let listing = render_listing(&view(1, &[1000]), MonitorFormat::Json).unwrap();
        assert_eq!(listing, "{\"refresh\":1,\"pins\":[1000]}\n");
    }

    #[test]
    fn test_file_sink_rewrites_file_on_each_publish() {
        // Arrange
        let path = temp_path("listing.txt");
        let mut sink = FileSink::new(&path, MonitorFormat::Text);

        // Act
        sink.publish(&view(0, &[1111, 2222, 3333])).unwrap();
        sink.publish(&view(1, &[2222, 3333, 4444])).unwrap();

        // Assert: only the latest view is on disk
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "2222\n3333\n4444\n");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_sink_json_parses_back() {
        let path = temp_path("listing.json");
        let mut sink = FileSink::new(&path, MonitorFormat::Json);

        sink.publish(&view(7, &[9999])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["refresh"], 7);
        assert_eq!(value["pins"][0], 9999);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_sink_reports_unwritable_path() {
        let path = PathBuf::from("/nonexistent/dir/that/cannot/exist/listing.txt");
        let mut sink = FileSink::new(&path, MonitorFormat::Text);

        let err = sink.publish(&view(0, &[1000])).unwrap_err();

        assert!(matches!(err, MonitorError::File { path: p, .. } if p == path));
    }

    #[test]
    fn test_channel_sink_forwards_views_in_order() {
        let (mut sink, mut rx) = ChannelSink::channel();

        sink.publish(&view(0, &[1000, 1001])).unwrap();
        sink.publish(&view(1, &[1001, 1002])).unwrap();

        assert_eq!(rx.try_recv().unwrap().refresh, 0);
        assert_eq!(rx.try_recv().unwrap(), view(1, &[1001, 1002]));
    }

    #[test]
    fn test_channel_sink_reports_closed_receiver() {
        let (mut sink, rx) = ChannelSink::channel();
        drop(rx);

        let err = sink.publish(&view(0, &[1000])).unwrap_err();

        assert!(matches!(err, MonitorError::ChannelClosed));
    }
}
