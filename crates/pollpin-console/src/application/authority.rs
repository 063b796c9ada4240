//! CredentialAuthority: the console's single owner of PIN state.
//!
//! The authority bundles the three pieces of state the protocol touches:
//!
//! - the [`PinPool`] of currently valid PINs,
//! - the [`RandomSource`] shared by minting and weak-password sampling,
//! - the [`WeakPasswordCatalog`].
//!
//! It is owned by value by the credential service and every method takes
//! `&mut self`, so pool mutations are serialized by the borrow checker rather
//! than by a lock.  Independent authorities can coexist in one process (each
//! test builds its own).
//!
//! # PIN check decision table
//!
//! | Candidate                       | Pool effect        | Verdict     |
//! |---------------------------------|--------------------|-------------|
//! | present in pool                 | consume + mint 1   | `Accepted`  |
//! | absent, equals [`BACKDOOR_PIN`] | 2 correction rounds| `Corrected` |
//! | anything else                   | none               | `Denied`    |
//!
//! The presence check comes first, so if 1359 happens to be minted into the
//! pool it is consumed like any other PIN.

use pollpin_core::domain::pool::Correction;
use pollpin_core::{
    Pin, PinPool, PinVerdict, PoolError, RandomSource, WeakPasswordCatalog, WeakPasswordSample,
    BACKDOOR_PIN, WEAK_SAMPLE_SIZE,
};
use tracing::{debug, info};

/// Correction rounds triggered by the bypass value.
pub const CORRECTION_ROUNDS: usize = 2;

/// Owner of the pool, the random source, and the weak-password catalog.
pub struct CredentialAuthority {
    pool: PinPool,
    rng: Box<dyn RandomSource>,
    catalog: WeakPasswordCatalog,
}

impl CredentialAuthority {
    /// Mints a fresh pool of `pool_size` PINs from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TooSmall`] for pools that cannot be corrected.
    pub fn new(pool_size: usize, mut rng: Box<dyn RandomSource>) -> Result<Self, PoolError> {
        let pool = PinPool::generate(pool_size, rng.as_mut())?;
        info!(size = pool.len(), "PIN pool minted");
        Ok(Self {
            pool,
            rng,
            catalog: WeakPasswordCatalog::default(),
        })
    }

    /// Builds an authority around an existing pool.
    pub fn with_pool(pool: PinPool, rng: Box<dyn RandomSource>) -> Self {
        Self {
            pool,
            rng,
            catalog: WeakPasswordCatalog::default(),
        }
    }

    /// Replaces the weak-password catalog.
    pub fn with_catalog(mut self, catalog: WeakPasswordCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Read-only access to the pool.
    pub fn pool(&self) -> &PinPool {
        &self.pool
    }

    /// Checks a parsed PIN line and applies the pool effect from the table in
    /// the module docs.
    pub fn verify_pin(&mut self, candidate: i32) -> PinVerdict {
        let Ok(pin) = Pin::try_from(candidate) else {
            return PinVerdict::Denied;
        };

        if self.pool.consume(pin, self.rng.as_mut()).is_some() {
            return PinVerdict::Accepted;
        }

        if pin == BACKDOOR_PIN {
            let Correction { removed, .. } = self.pool.correct(CORRECTION_ROUNDS, self.rng.as_mut());
            debug!(replaced = removed.len(), "bypass value submitted");
            return PinVerdict::Corrected;
        }

        PinVerdict::Denied
    }

    /// Draws a fresh weak-password sample.
    pub fn weak_password_sample(&mut self) -> WeakPasswordSample {
        self.catalog.sample(WEAK_SAMPLE_SIZE, self.rng.as_mut())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
