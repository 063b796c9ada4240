//! Application layer for the admin client.
//!
//! Pure logic, no sockets:
//!
//! - **`screen_password`** – Decides whether a candidate password survives a
//!   weak-password sample and what replaces it if not.
//! - **`gate`** – Holds the effective administrator password and checks
//!   unlock attempts against it.

pub mod gate;
pub mod screen_password;
