//! Console protocol vocabulary.
//!
//! Every connection carries exactly one exchange:
//!
//! ```text
//! Client                                   Console
//! ──────                                   ───────
//!                                ◄──────  greeting banner
//! request line  ──────►
//!   "50 ..."                     ◄──────  700 LIST ','
//!                                ◄──────  w1,w2,w3,w4,w5,
//!   "<digits>"                   ◄──────  300 / 500 / 400 status line
//! ```
//!
//! Status lines begin with a three-digit marker.  Clients look for the marker,
//! not the text that follows it.

use crate::protocol::codec::ProtocolError;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Prefix that turns a request line into a weak-password request.
pub const WEAK_PASSWORD_REQUEST_PREFIX: &str = "50";

/// Request line sent by the admin client.
pub const WEAK_PASSWORD_REQUEST_LINE: &str = "50 Get Weak Passwords";

/// Banner the console sends on accept unless configured otherwise.
pub const DEFAULT_GREETING: &str = "Poll-station credential console";

/// Default TCP port of the console.
pub const DEFAULT_CONSOLE_PORT: u16 = 1776;

// ── Status codes ──────────────────────────────────────────────────────────────

/// Three-digit markers that open every status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// Legacy two-line PIN exchange: the console asks for the PIN.
    ProvidePin = 100,
    PinAccepted = 300,
    PinIncorrect = 400,
    PinCorrected = 500,
    /// A comma-terminated weak-password line follows.
    WeakPasswordList = 700,
}

impl StatusCode {
    /// The numeric marker.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// The full line the console sends.
    pub fn status_line(self) -> &'static str {
        match self {
            StatusCode::ProvidePin => "100 Provide PIN number",
            StatusCode::PinAccepted => "300 PIN accepted",
            StatusCode::PinIncorrect => "400 PIN incorrect",
            StatusCode::PinCorrected => "500 PIN corrected",
            StatusCode::WeakPasswordList => "700 LIST ','",
        }
    }

    /// Reads the marker at the start of a status line.
    pub fn from_status_line(line: &str) -> Option<Self> {
        let marker = line.get(..3)?;
        match marker {
            "100" => Some(StatusCode::ProvidePin),
            "300" => Some(StatusCode::PinAccepted),
            "400" => Some(StatusCode::PinIncorrect),
            "500" => Some(StatusCode::PinCorrected),
            "700" => Some(StatusCode::WeakPasswordList),
            _ => None,
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// What a request line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// The line started with [`WEAK_PASSWORD_REQUEST_PREFIX`].
    WeakPasswords,
    /// Anything else; the raw line is kept for PIN parsing.
    PinCheck(String),
}

/// Classifies a request line by prefix only.
///
/// A numeric PIN that happens to start with `50` (e.g. `5012`) is classified
/// as [`Request::WeakPasswords`].
pub fn classify_request(line: &str) -> Request {
    if line.starts_with(WEAK_PASSWORD_REQUEST_PREFIX) {
        Request::WeakPasswords
    } else {
        Request::PinCheck(line.to_string())
    }
}

/// Parses a PIN line as a signed 32-bit decimal integer.
///
/// No whitespace trimming is done.  Values outside the PIN range parse
/// successfully; they are simply never in the pool.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPin`] for anything that is not an
/// integer.
pub fn parse_pin_line(line: &str) -> Result<i32, ProtocolError> {
    line.parse::<i32>().map_err(|source| ProtocolError::MalformedPin {
        line: line.to_string(),
        source,
    })
}

// ── Verdicts ──────────────────────────────────────────────────────────────────

/// Outcome of a PIN check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinVerdict {
    /// The PIN was in the pool and has been consumed.
    Accepted,
    /// The bypass value was submitted; the pool was corrected.
    Corrected,
    /// Neither.
    Denied,
}

impl PinVerdict {
    /// The status code the console answers with.
    pub fn status(self) -> StatusCode {
        match self {
            PinVerdict::Accepted => StatusCode::PinAccepted,
            PinVerdict::Corrected => StatusCode::PinCorrected,
            PinVerdict::Denied => StatusCode::PinIncorrect,
        }
    }

    /// Maps a status code back to a verdict.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::PinAccepted => Some(PinVerdict::Accepted),
            StatusCode::PinCorrected => Some(PinVerdict::Corrected),
            StatusCode::PinIncorrect => Some(PinVerdict::Denied),
            StatusCode::ProvidePin | StatusCode::WeakPasswordList => None,
        }
    }

    /// `true` when the voter may proceed.
    pub fn grants_access(self) -> bool {
        matches!(self, PinVerdict::Accepted | PinVerdict::Corrected)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines_start_with_their_code() {
        for status in [
            StatusCode::ProvidePin,
            StatusCode::PinAccepted,
            StatusCode::PinIncorrect,
            StatusCode::PinCorrected,
            StatusCode::WeakPasswordList,
        ] {
            let line = status.status_line();
            assert!(line.starts_with(&status.code().to_string()), "{line}");
            assert_eq!(StatusCode::from_status_line(line), Some(status));
        }
    }

    #[test]
    fn test_from_status_line_rejects_unknown_marker() {
        assert_eq!(StatusCode::from_status_line("200 OK"), None);
        assert_eq!(StatusCode::from_status_line("70"), None);
        assert_eq!(StatusCode::from_status_line(""), None);
    }

    #[test]
    fn test_classify_weak_password_request() {
        assert_eq!(
            classify_request(WEAK_PASSWORD_REQUEST_LINE),
            Request::WeakPasswords
        );
        assert_eq!(classify_request("50"), Request::WeakPasswords);
    }

    #[test]
    fn test_classify_pin_starting_with_50_is_weak_password_request() {
        assert_eq!(classify_request("5012"), Request::WeakPasswords);
    }

    #[test]
    fn test_classify_other_lines_as_pin_check() {
        assert_eq!(
            classify_request("1234"),
            Request::PinCheck("1234".to_string())
        );
        assert_eq!(classify_request(" 50"), Request::PinCheck(" 50".to_string()));
    }

    #[test]
    fn test_parse_pin_line_accepts_signed_integers() {
        assert_eq!(parse_pin_line("1359").unwrap(), 1359);
        assert_eq!(parse_pin_line("-7").unwrap(), -7);
        assert_eq!(parse_pin_line("123456").unwrap(), 123456);
    }

    #[test]
    fn test_parse_pin_line_rejects_non_numeric() {
        assert!(matches!(
            parse_pin_line("abcd"),
            Err(ProtocolError::MalformedPin { .. })
        ));
        assert!(parse_pin_line("12 34").is_err());
        assert!(parse_pin_line(" 1234").is_err());
        assert!(parse_pin_line("").is_err());
    }

    #[test]
    fn test_parse_pin_line_rejects_overflow() {
        assert!(parse_pin_line("99999999999").is_err());
    }

    #[test]
    fn test_verdict_status_round_trip() {
        for verdict in [PinVerdict::Accepted, PinVerdict::Corrected, PinVerdict::Denied] {
            assert_eq!(PinVerdict::from_status(verdict.status()), Some(verdict));
        }
        assert_eq!(PinVerdict::from_status(StatusCode::WeakPasswordList), None);
    }

    #[test]
    fn test_only_denied_refuses_access() {
        assert!(PinVerdict::Accepted.grants_access());
        assert!(PinVerdict::Corrected.grants_access());
        assert!(!PinVerdict::Denied.grants_access());
    }
}
