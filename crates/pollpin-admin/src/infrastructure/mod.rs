//! Infrastructure layer for the admin client.
//!
//! - **`network`** – TCP client for the console: weak-password fetch and PIN
//!   checks, each bounded by a timeout.
//! - **`config`** – TOML configuration (`[advisory]` section).

pub mod config;
pub mod network;
