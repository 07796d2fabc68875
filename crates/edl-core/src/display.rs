//! # Presentation Helpers — Safe Date Formatting and Demo Identifiers
//!
//! Human-facing formatting lives here so list endpoints, CLI tables, and
//! exports render timestamps the same way. Absent values render as an
//! em dash placeholder instead of an empty cell or the string "null".
//!
//! ## Design Decision: Deterministic Demo Identifiers
//!
//! Seeded demo data must produce identical identifiers on every run so
//! walkthroughs, screenshots, and integration fixtures stay stable.
//! `DemoIdGenerator` uses a linear congruential generator (Numerical
//! Recipes constants) with a fixed seed, shapes its output into RFC 4122
//! v4-looking UUIDs, and hands out sequential display ids per prefix.
//! Production code paths never touch it; they call the `new()`
//! constructors on the identifier newtypes.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::identity::DisplayId;
use crate::temporal::Timestamp;

/// Placeholder rendered for absent timestamps.
pub const ABSENT_PLACEHOLDER: &str = "—";

/// Presentation format for a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `2024-03-01T10:00:00Z`
    Iso,
    /// `2024-03-01`
    Date,
    /// `10:00`
    Time,
    /// `2024-03-01 10:00`
    Full,
}

/// Format an optional timestamp, rendering the placeholder when absent.
pub fn format_timestamp(ts: Option<&Timestamp>, format: DateFormat) -> String {
    let Some(ts) = ts else {
        return ABSENT_PLACEHOLDER.to_string();
    };
    let dt = ts.as_datetime();
    match format {
        DateFormat::Iso => ts.to_iso8601(),
        DateFormat::Date => dt.format("%Y-%m-%d").to_string(),
        DateFormat::Time => dt.format("%H:%M").to_string(),
        DateFormat::Full => dt.format("%Y-%m-%d %H:%M").to_string(),
    }
}

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const DEFAULT_SEED: u32 = 20_240_101;

/// Deterministic identifier source for seeded demo data.
#[derive(Debug, Clone)]
pub struct DemoIdGenerator {
    state: u32,
    year: u16,
    counters: BTreeMap<String, u32>,
}

impl DemoIdGenerator {
    /// Generator with the fixed demo seed and demo year.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED, 2024)
    }

    /// Generator with an explicit seed, for tests that need divergent
    /// sequences.
    pub fn with_seed(seed: u32, year: u16) -> Self {
        Self {
            state: seed,
            year,
            counters: BTreeMap::new(),
        }
    }

    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next deterministic UUID, shaped as RFC 4122 version 4.
    ///
    /// Sixteen bytes from four generator steps, then the version nibble
    /// is forced to `4` and the variant bits to `10` so the value is
    /// indistinguishable in format from a random v4 UUID.
    pub fn next_uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        for chunk in bytes.chunks_mut(4) {
            chunk.copy_from_slice(&self.step().to_be_bytes());
        }
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Uuid::from_bytes(bytes)
    }

    /// Next sequential display id for a prefix, e.g. `EV-2024-0001`.
    ///
    /// Counters are independent per prefix: evidence and work items each
    /// count from one.
    pub fn next_display_id(&mut self, prefix: &str) -> DisplayId {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        DisplayId::new(format!("{prefix}-{}-{:04}", self.year, counter))
    }
}

impl Default for DemoIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
