//! # pollpin-core
//!
//! Shared library for PollPin containing the credential domain (PINs, the
//! rotating PIN pool, the weak-password catalog, the seeded random source)
//! and the line-oriented protocol spoken between the console and its clients.
//!
//! This crate is used by both the console service and the admin client.
//! It never opens sockets; the protocol helpers work over any tokio
//! `AsyncBufRead` / `AsyncWrite` pair so the caller decides the transport.
//!
//! # Architecture overview
//!
//! A polling station runs one console process.  The console holds a small
//! pool of valid 4-digit PINs and hands them to voters out of band.  A voting
//! machine checks a PIN by opening a TCP connection, sending one line, and
//! reading back a status line.  Each accepted PIN is thrown away and replaced
//! by a freshly minted one, so the pool always has the same size.
//!
//! - **`domain`** – Pure business rules: [`Pin`], [`PinPool`], the
//!   [`RandomSource`] seam, and the [`WeakPasswordCatalog`].
//!
//! - **`protocol`** – Status codes, request classification, and the
//!   newline-terminated line codec.

pub mod domain;
pub mod protocol;

pub use domain::pin::{Pin, PinError, BACKDOOR_PIN};
pub use domain::pool::{PinPool, PoolError, HOW_MANY_PINS};
pub use domain::random::{RandomSource, SeededRandom};
pub use domain::weak_passwords::{WeakPasswordCatalog, WeakPasswordSample, WEAK_SAMPLE_SIZE};
pub use protocol::codec::{read_line, write_line, ProtocolError};
pub use protocol::messages::{classify_request, PinVerdict, Request, StatusCode};
