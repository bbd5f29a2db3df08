//! Serialization of the per-park summary to the supported file formats.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use review_core::error::Result;
use review_core::formatting::format_average;
use review_data::summary::ParkSummary;
use serde::Serialize;
use tracing::info;

// ── ExportFormat ──────────────────────────────────────────────────────────────

/// The closed set of summary export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable text, one indented section per park.
    Txt,
    /// Flat rows with a header line, one row per park.
    Csv,
    /// Pretty-printed JSON object keyed by park.
    Json,
}

/// Flat CSV row: the park key becomes the leading column.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    park: &'a str,
    reviews: u64,
    positive: u64,
    average: Option<f64>,
    locations: u64,
}

impl ExportFormat {
    /// Resolve a format from its case-insensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Serialize `summaries` in this format.
    ///
    /// Parks appear in the mapping's own (lexical) key order in every
    /// format, so repeated exports of the same data are byte-identical.
    pub fn serialize(&self, summaries: &BTreeMap<String, ParkSummary>) -> Result<String> {
        match self {
            Self::Txt => Ok(serialize_txt(summaries)),
            Self::Csv => serialize_csv(summaries),
            Self::Json => Ok(serde_json::to_string_pretty(summaries)?),
        }
    }

    /// Write `summary.<ext>` into `dir` and return the file path.
    pub fn export(
        &self,
        summaries: &BTreeMap<String, ParkSummary>,
        dir: &Path,
    ) -> Result<PathBuf> {
        let path = dir.join(format!("summary.{}", self.extension()));
        let content = self.serialize(summaries)?;
        std::fs::write(&path, content)?;
        info!("Summary exported to {}", path.display());
        Ok(path)
    }
}

// ── Per-format serializers ────────────────────────────────────────────────────

fn serialize_txt(summaries: &BTreeMap<String, ParkSummary>) -> String {
    let mut out = String::new();
    for (park, summary) in summaries {
        out.push_str(park);
        out.push('\n');
        out.push_str(&format!("  reviews: {}\n", summary.reviews));
        out.push_str(&format!("  positive: {}\n", summary.positive));
        out.push_str(&format!("  average: {}\n", format_average(summary.average)));
        out.push_str(&format!("  locations: {}\n", summary.locations));
        out.push('\n');
    }
    out
}

fn serialize_csv(summaries: &BTreeMap<String, ParkSummary>) -> Result<String> {
    // Header row is derived from the SummaryRow field names.
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for (park, summary) in summaries {
        writer.serialize(SummaryRow {
            park,
            reviews: summary.reviews,
            positive: summary.positive,
            average: summary.average,
            locations: summary.locations,
        })?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8(bytes).map_err(std::io::Error::other)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
