//! Administrator password screening.
//!
//! A candidate is weak when it contains any entry of the sample as a
//! case-insensitive substring.  A weak candidate is replaced by the first
//! entry of the sample.  Without a sample (console unreachable) the candidate
//! is kept as-is.

use std::fmt;

use pollpin_core::WeakPasswordSample;

/// The password the admin gate ends up with.
#[derive(Clone, PartialEq, Eq)]
pub struct ScreenedPassword {
    password: String,
    replaced: bool,
}

impl ScreenedPassword {
    /// The effective password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// `true` when the candidate was weak and got replaced.
    pub fn was_replaced(&self) -> bool {
        self.replaced
    }

    pub fn into_password(self) -> String {
        self.password
    }
}

impl fmt::Debug for ScreenedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenedPassword")
            .field("password", &"[REDACTED]")
            .field("replaced", &self.replaced)
            .finish()
    }
}

/// Screens `candidate` against `sample`.
pub fn screen_password(candidate: &str, sample: Option<&WeakPasswordSample>) -> ScreenedPassword {
    let replacement = sample
        .filter(|s| s.is_weak(candidate))
        .and_then(WeakPasswordSample::first);

    match replacement {
        Some(first) => ScreenedPassword {
            password: first.to_string(),
            replaced: true,
        },
        None => ScreenedPassword {
            password: candidate.to_string(),
            replaced: false,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
