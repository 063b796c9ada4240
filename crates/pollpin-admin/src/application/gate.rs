//! AdminGate: unlocks the administrative functions.

use std::fmt;

use tracing::info;

use crate::application::screen_password::ScreenedPassword;

/// Holds the effective administrator password.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Builds the gate from a screening result.
    pub fn from_screened(screened: ScreenedPassword) -> Self {
        if screened.was_replaced() {
            info!("configured admin password was weak and has been replaced");
        }
        Self::new(screened.into_password())
    }

    /// Exact, case-sensitive comparison.
    pub fn unlock(&self, attempt: &str) -> bool {
        self.password == attempt
    }
}

impl fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdminGate([REDACTED])")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::screen_password::screen_password;
    use pollpin_core::WeakPasswordSample;

    #[test]
    fn test_unlock_requires_exact_match() {
        let gate = AdminGate::new("Tr0ub4dor");
        assert!(gate.unlock("Tr0ub4dor"));
        assert!(!gate.unlock("tr0ub4dor"));
        assert!(!gate.unlock("Tr0ub4dor "));
        assert!(!gate.unlock(""));
    }

    #[test]
    fn test_replaced_password_unlocks_with_sample_entry() {
        // Arrange
        let sample = WeakPasswordSample::parse_wire_line("wallach,g,st,e,8,");
        let screened = screen_password("Wallach2004", Some(&sample));

        // Act
        let gate = AdminGate::from_screened(screened);

        // Assert: the configured password no longer works
        assert!(gate.unlock("wallach"));
        assert!(!gate.unlock("Wallach2004"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let gate = AdminGate::new("s3cret");
        assert_eq!(format!("{gate:?}"), "AdminGate([REDACTED])");
    }
}
