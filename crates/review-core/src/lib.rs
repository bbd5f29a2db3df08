//! Core types for the park reviews analyzer.
//!
//! Holds the review data model, the shared error taxonomy, number
//! formatting helpers, and CLI settings with last-used persistence.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{AnalyzerError, Result};
