//! Random source used for PIN minting and weak-password sampling.
//!
//! A polling station seeds its generator once at startup from the calendar
//! date, so two restarts on the same day replay the same sequence of PINs.
//! This is weak entropy.  A configured seed overrides it.
//!
//! # Seed formula
//!
//! ```text
//! seed = year + month0 + day      (month0: January = 0)
//! ```
//!
//! For 19 October 2026 that is `2026 + 9 + 19 = 2054`.
//!
//! Everything that needs randomness goes through the [`RandomSource`] trait so
//! tests can inject a fixed seed or a mock.

use chrono::{Datelike, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over the station's single pseudo-random stream.
///
/// The pool and the weak-password sampler share one implementation, owned by
/// the service.  Implementations need not be thread-safe for concurrent use;
/// they only need to be movable into the service task.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    /// Returns a value drawn from `0..bound`.
    ///
    /// Callers never pass `bound == 0`.
    fn next_below(&mut self, bound: u32) -> u32;
}

/// Computes the per-day seed for `date`.
pub fn date_seed(date: NaiveDate) -> u64 {
    let sum = date.year() as i64 + date.month0() as i64 + date.day() as i64;
    sum as u64
}

/// Seed for the current local calendar day.
pub fn seed_for_today() -> u64 {
    date_seed(Local::now().date_naive())
}

/// Default [`RandomSource`]: a `StdRng` seeded from a `u64`.
#[derive(Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a generator from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from today's local date.
    pub fn for_today() -> Self {
        Self::from_seed(seed_for_today())
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}
