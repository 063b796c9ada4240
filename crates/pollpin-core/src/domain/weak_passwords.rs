//! Weak-password catalog and per-request samples.
//!
//! The console knows a short, fixed list of passwords that must never guard
//! the administrative panel.  It does not hand out the whole list: every
//! request gets a fresh sample of [`WEAK_SAMPLE_SIZE`] distinct entries, and
//! the admin client screens its password against whatever sample it got.
//!
//! # Wire form
//!
//! A sample travels as one line with every entry followed by a comma,
//! including the last one:
//!
//! ```text
//! august,x,15,st,password,
//! ```

use std::fmt;

use crate::domain::random::RandomSource;

/// The built-in catalog, in catalog order.
pub const WEAK_PASSWORDS: [&str; 10] = [
    "password", "hi", "x", "15", "8", "august", "wallach", "g", "st", "e",
];

/// Number of distinct entries drawn per request.
pub const WEAK_SAMPLE_SIZE: usize = 5;

/// Separator used on the wire, also appended after the last entry.
pub const WEAK_LIST_SEPARATOR: char = ',';

/// Immutable ordered list of known-weak passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeakPasswordCatalog {
    entries: Vec<String>,
}

impl Default for WeakPasswordCatalog {
    fn default() -> Self {
        Self::new(WEAK_PASSWORDS.iter().map(|s| s.to_string()).collect())
    }
}

impl WeakPasswordCatalog {
    /// Builds a catalog from arbitrary entries.
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Draws up to `count` distinct entries by rejection sampling.
    ///
    /// Indices are drawn uniformly from the whole catalog; an index that was
    /// already taken is discarded and drawn again.  Entries appear in the
    /// sample in the order they were drawn.
    pub fn sample(&self, count: usize, rng: &mut dyn RandomSource) -> WeakPasswordSample {
        let wanted = count.min(self.entries.len());
        let mut taken = vec![false; self.entries.len()];
        let mut drawn = Vec::with_capacity(wanted);
        while drawn.len() < wanted {
            let index = rng.next_below(self.entries.len() as u32) as usize;
            if taken[index] {
                continue;
            }
            taken[index] = true;
            drawn.push(self.entries[index].clone());
        }
        WeakPasswordSample { entries: drawn }
    }
}

/// One request's worth of weak passwords.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeakPasswordSample {
    entries: Vec<String>,
}

impl WeakPasswordSample {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Parses the comma-delimited wire line.  Empty tokens are dropped.
    pub fn parse_wire_line(line: &str) -> Self {
        let entries = line
            .split(WEAK_LIST_SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Renders the wire line, trailing separator included.
    pub fn to_wire_line(&self) -> String {
        let mut line = String::new();
        for entry in &self.entries {
            line.push_str(entry);
            line.push(WEAK_LIST_SEPARATOR);
        }
        line
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry a rejected password is replaced with.
    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Returns the first sample entry found inside `candidate`, compared
    /// case-insensitively as a substring.
    pub fn matching_entry(&self, candidate: &str) -> Option<&str> {
        let lowered = candidate.to_lowercase();
        self.entries
            .iter()
            .find(|entry| lowered.contains(&entry.to_lowercase()))
            .map(String::as_str)
    }

    /// `true` when `candidate` contains any sample entry (case-insensitive).
    pub fn is_weak(&self, candidate: &str) -> bool {
        self.matching_entry(candidate).is_some()
    }
}

impl fmt::Display for WeakPasswordSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_line())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
