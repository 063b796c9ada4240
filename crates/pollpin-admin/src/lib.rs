//! pollpin-admin library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does pollpin-admin do?
//!
//! The admin side of a voting machine talks to the credential console in two
//! ways:
//!
//! 1. At startup it asks the console for a sample of weak passwords and
//!    screens the configured administrator password against it.  A weak
//!    password is replaced by the first entry of the sample.  If the console
//!    cannot be reached the password is used unscreened.
//! 2. When a voter types a PIN, it forwards the PIN to the console and shows
//!    the verdict.

/// Application layer: password screening and the admin gate.
pub mod application;

/// Infrastructure layer: console client and configuration.
pub mod infrastructure;
