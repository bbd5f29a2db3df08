//! The aggregation engine: grouped counts, averages and rankings over the
//! loaded review collection.
//!
//! Every operation is a pure function over `&[ReviewRecord]`, one pass to
//! bucket plus one pass to reduce, O(records) time and O(groups) space, no
//! I/O. String group keys iterate in lexical order and month keys
//! chronologically (both via `BTreeMap`), so exports and tests are
//! reproducible. Averages are rounded to two decimals exactly once, at this
//! boundary.
//!
//! Park name arguments match case-insensitively; a park that matches no
//! record yields [`AnalyzerError::UnknownPark`].

use std::collections::BTreeMap;

use review_core::error::{AnalyzerError, Result};
use review_core::formatting::round2;
use review_core::models::{ReviewRecord, YearMonth};

// ── RatingStats ───────────────────────────────────────────────────────────────

/// Review and rating totals accumulated for one group key.
#[derive(Debug, Clone, Default)]
pub struct RatingStats {
    /// Number of reviews in the group, rated or not.
    pub reviews: u64,
    /// Number of reviews carrying a usable rating.
    pub rated: u64,
    /// Sum of all usable ratings.
    pub rating_sum: u64,
}

impl RatingStats {
    /// Add a single record's contribution to the running totals.
    pub fn add(&mut self, record: &ReviewRecord) {
        self.reviews += 1;
        if let Some(rating) = record.rating {
            self.rated += 1;
            self.rating_sum += u64::from(rating);
        }
    }

    /// Mean rating rounded to two decimals, or `None` when the group has no
    /// rated reviews: the no-data marker, distinct from an average of 0.
    pub fn mean(&self) -> Option<f64> {
        if self.rated == 0 {
            return None;
        }
        Some(round2(self.rating_sum as f64 / self.rated as f64))
    }
}

// ── ReviewAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups review records by park, location and month.
pub struct ReviewAggregator;

impl ReviewAggregator {
    /// Number of reviews per park. Counts every record, rated or not; every
    /// distinct park in the input appears as a key.
    pub fn count_by_park(records: &[ReviewRecord]) -> BTreeMap<String, u64> {
        Self::group_stats(records, |r| Some(r.park.clone()))
            .into_iter()
            .map(|(park, stats)| (park, stats.reviews))
            .collect()
    }

    /// Number of reviews per park and reviewer location. The empty location
    /// string is a real bucket for reviews of unknown origin.
    pub fn count_by_park_location(
        records: &[ReviewRecord],
    ) -> BTreeMap<String, BTreeMap<String, u64>> {
        let mut map: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
        for record in records {
            *map.entry(record.park.clone())
                .or_default()
                .entry(record.location.clone())
                .or_default() += 1;
        }
        map
    }

    /// Mean rating per park, rounded to two decimals. Parks whose reviews all
    /// lack a usable rating map to `None` rather than a numeric zero.
    pub fn average_by_park(records: &[ReviewRecord]) -> BTreeMap<String, Option<f64>> {
        Self::group_stats(records, |r| Some(r.park.clone()))
            .into_iter()
            .map(|(park, stats)| (park, stats.mean()))
            .collect()
    }

    /// Mean rating per park and reviewer location, same no-data-marker rule
    /// per cell as [`Self::average_by_park`].
    pub fn average_by_park_location(
        records: &[ReviewRecord],
    ) -> BTreeMap<String, BTreeMap<String, Option<f64>>> {
        let grouped = Self::group_stats(records, |r| Some((r.park.clone(), r.location.clone())));

        let mut map: BTreeMap<String, BTreeMap<String, Option<f64>>> = BTreeMap::new();
        for ((park, location), stats) in grouped {
            map.entry(park).or_default().insert(location, stats.mean());
        }
        map
    }

    /// Mean rating per observed month for one park, chronological order.
    ///
    /// Records without a parsed month are excluded; months with no rated
    /// review are omitted entirely (months are not enumerable outside the
    /// observed data, so there is nothing to mark).
    pub fn monthly_average(
        records: &[ReviewRecord],
        park: &str,
    ) -> Result<BTreeMap<YearMonth, f64>> {
        let matched = Self::reviews_for_park(records, park)?;
        Ok(
            Self::group_stats(matched.into_iter(), |r| r.year_month)
                .into_iter()
                .filter_map(|(month, stats)| stats.mean().map(|avg| (month, avg)))
                .collect(),
        )
    }

    /// The `n` locations with the most reviews for one park, descending by
    /// count with ties broken by ascending location name.
    pub fn top_locations(
        records: &[ReviewRecord],
        park: &str,
        n: usize,
    ) -> Result<Vec<(String, u64)>> {
        if n == 0 {
            return Err(AnalyzerError::InvalidTopCount(n));
        }
        let matched = Self::reviews_for_park(records, park)?;

        let mut ranked: Vec<(String, u64)> =
            Self::group_stats(matched.into_iter(), |r| Some(r.location.clone()))
                .into_iter()
                .map(|(location, stats)| (location, stats.reviews))
                .collect();

        // The BTreeMap yields names in ascending order; a stable sort on
        // descending count therefore leaves ties name-ascending.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        Ok(ranked)
    }

    /// All reviews for one park, in load order.
    pub fn reviews_for_park<'a>(
        records: &'a [ReviewRecord],
        park: &str,
    ) -> Result<Vec<&'a ReviewRecord>> {
        let matched: Vec<&ReviewRecord> = records
            .iter()
            .filter(|r| r.park.eq_ignore_ascii_case(park))
            .collect();
        if matched.is_empty() {
            return Err(AnalyzerError::UnknownPark(park.to_string()));
        }
        Ok(matched)
    }

    /// Number of reviews for one park whose location contains
    /// `location_query`, case-insensitively.
    pub fn count_for_park_location(
        records: &[ReviewRecord],
        park: &str,
        location_query: &str,
    ) -> Result<u64> {
        let matched = Self::reviews_for_park(records, park)?;
        let needle = location_query.to_lowercase();
        Ok(matched
            .iter()
            .filter(|r| r.location.to_lowercase().contains(&needle))
            .count() as u64)
    }

    /// Mean rating for one park over a calendar year, rounded to two
    /// decimals; `None` when the year holds no rated review for that park.
    pub fn average_for_park_year(
        records: &[ReviewRecord],
        park: &str,
        year: i32,
    ) -> Result<Option<f64>> {
        let matched = Self::reviews_for_park(records, park)?;

        let mut stats = RatingStats::default();
        for record in matched
            .into_iter()
            .filter(|r| r.year_month.is_some_and(|ym| ym.year == year))
        {
            stats.add(record);
        }
        Ok(stats.mean())
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic bucketing driver.
    ///
    /// `key_fn` maps a record to its group key; returning `None` excludes the
    /// record from this aggregation.
    fn group_stats<'a, K, I, F>(records: I, key_fn: F) -> BTreeMap<K, RatingStats>
    where
        K: Ord,
        I: IntoIterator<Item = &'a ReviewRecord>,
        F: Fn(&ReviewRecord) -> Option<K>,
    {
        let mut map: BTreeMap<K, RatingStats> = BTreeMap::new();
        for record in records {
            if let Some(key) = key_fn(record) {
                map.entry(key).or_default().add(record);
            }
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
