//! Newline-terminated line codec.
//!
//! Wire format:
//! ```text
//! <UTF-8 text>\n
//! ```
//! No length prefix, no escaping.  On input a trailing `\r\n` is accepted as
//! well as `\n`, and the terminator is stripped; nothing else is trimmed.
//!
//! The helpers are generic over tokio's `AsyncBufRead` / `AsyncWrite` so the
//! console can drive them over a `TcpStream` and tests can drive them over an
//! in-memory mock.

use std::num::ParseIntError;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Errors that can occur while speaking the line protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The peer closed the stream before the expected line arrived.
    #[error("connection closed while waiting for {expected}")]
    UnexpectedEof { expected: &'static str },

    /// The PIN line is not a decimal integer.
    #[error("malformed PIN line {line:?}: {source}")]
    MalformedPin {
        line: String,
        #[source]
        source: ParseIntError,
    },

    /// The peer answered with a status line the caller did not expect.
    #[error("unexpected status line: {0:?}")]
    UnexpectedStatus(String),

    /// Reading or writing the stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Framing ───────────────────────────────────────────────────────────────────

/// Appends the line terminator.
pub fn encode_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 1);
    out.push_str(line);
    out.push('\n');
    out
}

/// Strips one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(raw: &str) -> &str {
    let without_lf = raw.strip_suffix('\n').unwrap_or(raw);
    without_lf.strip_suffix('\r').unwrap_or(without_lf)
}

// ── Async helpers ─────────────────────────────────────────────────────────────

/// Reads one line, terminator stripped.
///
/// `expected` names the line for the error message when the stream ends
/// first.  A final line without a terminator is returned as-is.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedEof`] on end-of-stream and
/// [`ProtocolError::Io`] on read failure or invalid UTF-8.
pub async fn read_line<R>(reader: &mut R, expected: &'static str) -> Result<String, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = String::new();
    let n = reader.read_line(&mut raw).await?;
    if n == 0 {
        return Err(ProtocolError::UnexpectedEof { expected });
    }
    Ok(strip_line_terminator(&raw).to_string())
}

/// Writes `line` plus terminator and flushes.
///
/// # Errors
///
/// Returns [`ProtocolError::Io`] if the write or flush fails.
pub async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(encode_line(line).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
