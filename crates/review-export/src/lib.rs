//! Export layer for the park reviews analyzer.
//!
//! Serializes the per-park summary to TXT, CSV and JSON. Formats are a
//! closed set of enum variants behind a single serialize contract; adding a
//! format means adding one variant arm.

pub mod exporter;

pub use exporter::ExportFormat;
