//! Network infrastructure for the console.
//!
//! # Sub-modules
//!
//! - **`credential_service`** – Binds the TCP listener and runs the
//!   sequential accept loop.  Each accepted connection carries one protocol
//!   exchange (weak-password list or PIN check) and is then closed, after
//!   which the monitor is refreshed.

pub mod credential_service;
