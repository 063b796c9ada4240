//! PoolMonitor: the operator's read-only view of the PIN pool.
//!
//! The monitor never touches the pool.  It keeps its own display order:
//!
//! 1. At construction the current pool is copied and shuffled once.
//! 2. On every [`PoolMonitor::refresh`] the entries that are still in the
//!    pool keep their relative order, entries that left the pool disappear,
//!    and entries that are new since the last refresh are appended in the
//!    order the pool holds them (insertion order).
//!
//! Entries are matched as a multiset, so a PIN minted twice is shown twice.
//!
//! Each refresh produces a [`PoolView`], the DTO handed to a
//! [`MonitorSink`](crate::infrastructure::monitor_sink::MonitorSink).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use pollpin_core::{Pin, PinPool};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One rendering of the pool for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolView {
    /// 0 for the view taken at construction, then +1 per refresh.
    pub refresh: u64,
    /// Entries in display order.
    pub pins: Vec<Pin>,
}

impl PoolView {
    /// One PIN per line, each line newline-terminated.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(self.pins.len() * 5);
        for pin in &self.pins {
            out.push_str(&pin.to_string());
            out.push('\n');
        }
        out
    }

    /// Single-line JSON object: `{"refresh":3,"pins":[4821,1207,...]}`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialisation fails.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Renders in the requested format.
    ///
    /// # Errors
    ///
    /// Only the JSON format can fail.
    pub fn render(&self, format: MonitorFormat) -> Result<String, serde_json::Error> {
        match format {
            MonitorFormat::Text => Ok(self.render_text()),
            MonitorFormat::Json => {
                let mut line = self.render_json()?;
                line.push('\n');
                Ok(line)
            }
        }
    }
}

/// Output format for monitor sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for MonitorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorFormat::Text => f.write_str("text"),
            MonitorFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for MonitorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(MonitorFormat::Text),
            "json" => Ok(MonitorFormat::Json),
            other => Err(format!("unknown monitor format {other:?} (expected text or json)")),
        }
    }
}

/// Display-order tracker for one pool.
#[derive(Debug, Clone)]
pub struct PoolMonitor {
    order: Vec<Pin>,
    refreshes: u64,
}

impl PoolMonitor {
    /// Copies `pool` and shuffles the copy once.
    pub fn new(pool: &PinPool) -> Self {
        let mut order = pool.snapshot();
        order.shuffle(&mut rand::thread_rng());
        Self::with_order(order)
    }

    /// Starts from a known display order.
    pub fn with_order(order: Vec<Pin>) -> Self {
        Self {
            order,
            refreshes: 0,
        }
    }

    /// The view as of the last refresh (or construction).
    pub fn current(&self) -> PoolView {
        PoolView {
            refresh: self.refreshes,
            pins: self.order.clone(),
        }
    }

    /// Reconciles the display order with `pool` and returns the new view.
    pub fn refresh(&mut self, pool: &PinPool) -> PoolView {
        let mut available: HashMap<Pin, usize> = HashMap::new();
        for &pin in pool.as_slice() {
            *available.entry(pin).or_insert(0) += 1;
        }

        let mut kept: HashMap<Pin, usize> = HashMap::new();
        self.order.retain(|pin| match available.get_mut(pin) {
            Some(count) if *count > 0 => {
                *count -= 1;
                *kept.entry(*pin).or_insert(0) += 1;
                true
            }
            _ => false,
        });

        for &pin in pool.as_slice() {
            match kept.get_mut(&pin) {
                Some(count) if *count > 0 => *count -= 1,
                _ => self.order.push(pin),
            }
        }

        self.refreshes += 1;
        self.current()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
