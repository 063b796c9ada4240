//! Application layer use cases for the console.
//!
//! Use cases in this layer orchestrate domain objects from `pollpin-core` and
//! contain no network I/O and no file system access.
//!
//! # Sub-modules
//!
//! - **`authority`** – Owns the PIN pool, the random source, and the
//!   weak-password catalog.  Answers PIN checks and produces weak-password
//!   samples.  Every pool mutation goes through here.
//!
//! - **`monitor`** – Keeps the operator's ordering of the pool and turns it
//!   into a [`monitor::PoolView`] after every exchange.

pub mod authority;
pub mod monitor;
