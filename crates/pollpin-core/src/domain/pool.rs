//! The rotating PIN pool.
//!
//! # Lifecycle
//!
//! ```text
//! generate(size)  ──►  consume(pin) / correct(n)  ──►  ...  ──►  process exit
//!   mint `size`         remove one, append one
//! ```
//!
//! The pool is an ordered `Vec<Pin>`.  Its length is fixed when it is
//! generated and every mutating operation removes exactly as many entries as
//! it appends, so `len()` never changes.  Entries may repeat: minting does not
//! check for collisions.
//!
//! New entries are always appended at the end, so the order of the pool is
//! the order in which surviving entries were minted.

use thiserror::Error;
use tracing::debug;

use crate::domain::pin::Pin;
use crate::domain::random::RandomSource;

/// Default number of PINs valid at once.
pub const HOW_MANY_PINS: usize = 10;

/// Smallest pool that still supports [`PinPool::correct`].
pub const MIN_POOL_SIZE: usize = 2;

/// Error type for pool construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The requested size cannot support correction (`size - 1` must be ≥ 1).
    #[error("pool size {size} is below the minimum of {min}")]
    TooSmall { size: usize, min: usize },
}

/// Result of one [`PinPool::correct`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Entries removed, in removal order.
    pub removed: Vec<Pin>,
    /// Entries appended, in append order.
    pub minted: Vec<Pin>,
}

/// Fixed-length ordered collection of currently valid PINs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinPool {
    pins: Vec<Pin>,
}

impl PinPool {
    /// Mints `size` fresh PINs.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TooSmall`] when `size < MIN_POOL_SIZE`.
    pub fn generate(size: usize, rng: &mut dyn RandomSource) -> Result<Self, PoolError> {
        check_size(size)?;
        let pins = (0..size).map(|_| Pin::mint(rng)).collect();
        Ok(Self { pins })
    }

    /// Builds a pool from known entries.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TooSmall`] when fewer than `MIN_POOL_SIZE` entries
    /// are supplied.
    pub fn from_pins(pins: Vec<Pin>) -> Result<Self, PoolError> {
        check_size(pins.len())?;
        Ok(Self { pins })
    }

    /// Number of entries.  Constant for the lifetime of the pool.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Always `false`: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Exact membership test.
    pub fn contains(&self, candidate: Pin) -> bool {
        self.pins.contains(&candidate)
    }

    /// Removes the first occurrence of `candidate` and appends a fresh PIN.
    ///
    /// Returns the freshly minted replacement, or `None` (and leaves the pool
    /// untouched) when `candidate` is not present.
    pub fn consume(&mut self, candidate: Pin, rng: &mut dyn RandomSource) -> Option<Pin> {
        let index = self.pins.iter().position(|&p| p == candidate)?;
        self.pins.remove(index);
        let replacement = Pin::mint(rng);
        self.pins.push(replacement);
        Some(replacement)
    }

    /// Self-repair: `times` rounds of "remove the entry at a random index in
    /// `[0, len - 2]`, append a fresh PIN".
    ///
    /// The last entry is never chosen within a round.  No particular PIN is
    /// targeted.
    pub fn correct(&mut self, times: usize, rng: &mut dyn RandomSource) -> Correction {
        let mut removed = Vec::with_capacity(times);
        let mut minted = Vec::with_capacity(times);
        for _ in 0..times {
            let bound = (self.pins.len() - 1) as u32;
            let index = rng.next_below(bound) as usize;
            removed.push(self.pins.remove(index));
            let fresh = Pin::mint(rng);
            self.pins.push(fresh);
            minted.push(fresh);
        }
        debug!(rounds = times, "pool corrected");
        Correction { removed, minted }
    }

    /// Borrowed view of the entries in pool order.
    pub fn as_slice(&self) -> &[Pin] {
        &self.pins
    }

    /// Owned copy of the entries in pool order.
    pub fn snapshot(&self) -> Vec<Pin> {
        self.pins.clone()
    }
}

fn check_size(size: usize) -> Result<(), PoolError> {
    if size < MIN_POOL_SIZE {
        return Err(PoolError::TooSmall {
            size,
            min: MIN_POOL_SIZE,
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
