//! Infrastructure layer for the console.
//!
//! Contains the OS-facing adapters: the TCP credential service, the TOML
//! configuration store, and the monitor output sinks.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pollpin_core`, but MUST NOT be imported by the `application` layer.

pub mod monitor_sink;
pub mod network;
pub mod storage;
