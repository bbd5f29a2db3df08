//! CSV dataset loading for the park reviews analyzer.
//!
//! Reads the raw reviews file into [`ReviewRecord`] structs, recovering from
//! row-level damage: structurally broken rows are skipped, unusable ratings
//! and dates become `None`, and each kind of damage is counted so the caller
//! can report it. Only a missing/unreadable file or a dataset with zero
//! parseable rows is fatal.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use review_core::error::{AnalyzerError, Result};
use review_core::models::{ReviewRecord, YearMonth};
use serde::Deserialize;
use tracing::{debug, warn};

// ── Dataset / LoadStats ───────────────────────────────────────────────────────

/// Counters describing what the loader had to recover from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows that deserialized into the expected column shape.
    pub rows_read: u64,
    /// Rows whose rating cell was not an integer in 1–5 (kept, rating = None).
    pub bad_ratings: u64,
    /// Rows whose date cell was unparseable (kept, year_month = None).
    pub bad_dates: u64,
    /// Rows dropped entirely: broken structure or an empty park name.
    pub skipped_rows: u64,
}

/// The immutable review collection for one session, plus load counters.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<ReviewRecord>,
    pub stats: LoadStats,
}

impl Dataset {
    /// Sorted distinct park names, used to drive park selection in the UI.
    pub fn parks(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.park.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Raw dataset row keyed by the CSV header names.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Review_ID")]
    id: u64,
    #[serde(rename = "Rating")]
    rating: String,
    #[serde(rename = "Year_Month")]
    year_month: String,
    #[serde(rename = "Reviewer_Location")]
    location: String,
    #[serde(rename = "Branch")]
    park: String,
}

/// Load the reviews dataset from `path`.
///
/// Returns [`AnalyzerError::FileRead`] when the file cannot be opened and
/// [`AnalyzerError::EmptyDataset`] when not a single row could be parsed.
pub fn load_reviews(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| AnalyzerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records: Vec<ReviewRecord> = Vec::new();
    let mut stats = LoadStats::default();

    for row in reader.deserialize::<RawRow>() {
        let raw = match row {
            Ok(r) => r,
            Err(e) => {
                stats.skipped_rows += 1;
                debug!("Skipping unreadable row: {}", e);
                continue;
            }
        };
        stats.rows_read += 1;

        match map_row(raw, &mut stats) {
            Some(record) => records.push(record),
            None => stats.skipped_rows += 1,
        }
    }

    if records.is_empty() {
        return Err(AnalyzerError::EmptyDataset(path.to_path_buf()));
    }

    if stats.bad_ratings > 0 || stats.bad_dates > 0 || stats.skipped_rows > 0 {
        warn!(
            "Dataset {}: {} rows without a usable rating, {} without a usable date, {} skipped",
            path.display(),
            stats.bad_ratings,
            stats.bad_dates,
            stats.skipped_rows,
        );
    }
    debug!("Loaded {} reviews from {}", records.len(), path.display());

    Ok(Dataset { records, stats })
}

/// Map a raw row to a [`ReviewRecord`], returning `None` when the row has no
/// park name. Rating and date damage is recovered field-by-field.
fn map_row(raw: RawRow, stats: &mut LoadStats) -> Option<ReviewRecord> {
    let park = raw.park.trim().to_string();
    if park.is_empty() {
        debug!("Skipping review {}: empty park name", raw.id);
        return None;
    }

    let rating = parse_rating(&raw.rating);
    if rating.is_none() {
        stats.bad_ratings += 1;
    }

    let year_month = YearMonth::parse(&raw.year_month);
    if year_month.is_none() {
        stats.bad_dates += 1;
    }

    Some(ReviewRecord {
        id: raw.id,
        rating,
        year_month,
        park,
        location: raw.location.trim().to_string(),
    })
}

/// A usable rating is an integer in 1–5; anything else becomes the
/// no-rating marker.
fn parse_rating(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|r| (1..=5).contains(r))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "Review_ID,Rating,Year_Month,Reviewer_Location,Branch";

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── load_reviews ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_reviews_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,5,2019-01,Brazil,Disneyland Paris",
                "2,4,2019-02,USA,Disneyland California",
            ],
        );

        let dataset = load_reviews(&path).unwrap();

        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.stats.rows_read, 2);
        assert_eq!(dataset.stats.bad_ratings, 0);
        assert_eq!(dataset.stats.bad_dates, 0);
        assert_eq!(dataset.stats.skipped_rows, 0);

        let first = &dataset.records[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.rating, Some(5));
        assert_eq!(first.year_month, YearMonth::new(2019, 1));
        assert_eq!(first.park, "Disneyland Paris");
        assert_eq!(first.location, "Brazil");
    }

    #[test]
    fn test_load_reviews_missing_file() {
        let err = load_reviews(Path::new("/tmp/does-not-exist-reviews-test.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::FileRead { .. }));
    }

    #[test]
    fn test_load_reviews_header_only_is_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "reviews.csv", &[HEADER]);

        let err = load_reviews(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyDataset(_)));
    }

    #[test]
    fn test_load_reviews_bad_rating_kept_with_marker() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,great,2019-01,Brazil,Disneyland Paris",
                "2,4,2019-01,USA,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();

        // The damaged row is retained so park/location counts still see it.
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[0].rating, None);
        assert_eq!(dataset.stats.bad_ratings, 1);
    }

    #[test]
    fn test_load_reviews_out_of_range_rating_is_bad() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,0,2019-01,Brazil,Disneyland Paris",
                "2,6,2019-01,USA,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();
        assert!(dataset.records.iter().all(|r| r.rating.is_none()));
        assert_eq!(dataset.stats.bad_ratings, 2);
    }

    #[test]
    fn test_load_reviews_missing_date_kept_with_null_month() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,5,missing,Brazil,Disneyland Paris",
                "2,4,2019-01,USA,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();

        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[0].year_month, None);
        assert_eq!(dataset.records[0].rating, Some(5));
        assert_eq!(dataset.stats.bad_dates, 1);
    }

    #[test]
    fn test_load_reviews_empty_park_row_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,5,2019-01,Brazil,",
                "2,4,2019-01,USA,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.stats.skipped_rows, 1);
    }

    #[test]
    fn test_load_reviews_broken_row_skipped() {
        let dir = TempDir::new().unwrap();
        // Second row has a non-numeric id and cannot be deserialized.
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "not-an-id,5,2019-01,Brazil,Disneyland Paris",
                "2,4,2019-01,USA,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.stats.skipped_rows, 1);
        assert_eq!(dataset.stats.rows_read, 1);
    }

    #[test]
    fn test_load_reviews_empty_location_preserved() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[HEADER, "1,5,2019-01,,Disneyland Paris"],
        );

        let dataset = load_reviews(&path).unwrap();
        // Unknown origin stays as its own (empty) bucket, never dropped.
        assert_eq!(dataset.records[0].location, "");
    }

    // ── Dataset::parks ────────────────────────────────────────────────────────

    #[test]
    fn test_parks_sorted_distinct() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "1,5,2019-01,Brazil,Disneyland Paris",
                "2,4,2019-01,USA,Disneyland California",
                "3,3,2019-01,France,Disneyland Paris",
            ],
        );

        let dataset = load_reviews(&path).unwrap();
        assert_eq!(
            dataset.parks(),
            vec!["Disneyland California", "Disneyland Paris"]
        );
    }

    // ── parse_rating ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_rating_valid_range() {
        assert_eq!(parse_rating("1"), Some(1));
        assert_eq!(parse_rating(" 5 "), Some(5));
    }

    #[test]
    fn test_parse_rating_rejects_non_numeric() {
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("4.5"), None);
        assert_eq!(parse_rating("five"), None);
    }

    #[test]
    fn test_parse_rating_rejects_out_of_range() {
        assert_eq!(parse_rating("0"), None);
        assert_eq!(parse_rating("6"), None);
        assert_eq!(parse_rating("255"), None);
    }
}
