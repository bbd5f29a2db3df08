//! Per-park summary used by every export format.

use std::collections::{BTreeMap, HashSet};

use review_core::models::ReviewRecord;
use serde::{Deserialize, Serialize};

use crate::aggregator::RatingStats;

/// Ratings at or above this count as positive reviews.
const POSITIVE_THRESHOLD: u8 = 4;

/// Statistics block for one park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkSummary {
    /// Total number of reviews, rated or not.
    pub reviews: u64,
    /// Reviews rated 4 stars or higher.
    pub positive: u64,
    /// Mean rating rounded to two decimals; `None` when no review for the
    /// park carries a usable rating.
    pub average: Option<f64>,
    /// Number of distinct reviewer locations.
    pub locations: u64,
}

#[derive(Default)]
struct SummaryAccum {
    stats: RatingStats,
    positive: u64,
    locations: HashSet<String>,
}

/// Build the per-park summary, keyed by park name in lexical order.
pub fn park_summaries(records: &[ReviewRecord]) -> BTreeMap<String, ParkSummary> {
    let mut buckets: BTreeMap<String, SummaryAccum> = BTreeMap::new();

    for record in records {
        let accum = buckets.entry(record.park.clone()).or_default();
        accum.stats.add(record);
        if record.rating.is_some_and(|r| r >= POSITIVE_THRESHOLD) {
            accum.positive += 1;
        }
        accum.locations.insert(record.location.clone());
    }

    buckets
        .into_iter()
        .map(|(park, accum)| {
            let summary = ParkSummary {
                reviews: accum.stats.reviews,
                positive: accum.positive,
                average: accum.stats.mean(),
                locations: accum.locations.len() as u64,
            };
            (park, summary)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
