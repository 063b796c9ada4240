//! Domain entities for PollPin.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no sockets, no files, no clocks other than the calendar date
//! used to seed the random source.
//!
//! # Sub-modules
//!
//! - **`pin`** – The 4-digit access code and the fixed bypass value.
//! - **`pool`** – The fixed-size rotating collection of valid PINs.
//! - **`random`** – The [`random::RandomSource`] trait and the date-seeded
//!   default implementation.
//! - **`weak_passwords`** – The hard-coded weak-password catalog and the
//!   per-request sample drawn from it.

pub mod pin;
pub mod pool;
pub mod random;
pub mod weak_passwords;
