use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// A calendar year-month, the time grain of all date-dependent aggregations.
///
/// Orders chronologically and renders as `"YYYY-MM"`, which is also its serde
/// representation (so month keys stay strings in JSON exports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Build a year-month, rejecting invalid months via the calendar.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Parse a raw date cell into a year-month.
    ///
    /// Accepts `"YYYY-M"`, `"YYYY-MM"`, and full `"YYYY-MM-DD"` dates (which
    /// are truncated to their month). Returns `None` for anything else,
    /// including the dataset's literal `"missing"` placeholder.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::new(date.year(), date.month());
        }

        let (year, month) = trimmed.split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid year-month: {s:?}"))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── ReviewRecord ──────────────────────────────────────────────────────────────

/// A single visitor review read from the dataset.
///
/// Immutable once loaded; the full collection is built once per session and
/// only ever read by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Dataset review id.
    pub id: u64,
    /// Star rating 1–5. `None` when the rating cell was not a usable number;
    /// such records still count towards park/location totals but are excluded
    /// from every average.
    pub rating: Option<u8>,
    /// Parsed review month. `None` when the date cell was unparseable; such
    /// records are excluded from date-dependent aggregations only.
    pub year_month: Option<YearMonth>,
    /// Park branch name, never empty.
    pub park: String,
    /// Reviewer origin. May be empty, in which case the empty string is its
    /// own grouping bucket.
    pub location: String,
}
