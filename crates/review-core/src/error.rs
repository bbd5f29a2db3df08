use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the park reviews analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The dataset file could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file was readable but contained no parseable review rows.
    #[error("No parseable reviews found in {0}")]
    EmptyDataset(PathBuf),

    /// A park name that matches no record in the loaded dataset.
    #[error("Unknown park: {0}")]
    UnknownPark(String),

    /// A top-N ranking was requested with a non-positive entry count.
    #[error("Top-location count must be positive, got {0}")]
    InvalidTopCount(usize),

    /// A CSV file or row could not be processed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = AnalyzerError::FileRead {
            path: PathBuf::from("/data/reviews.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read dataset"));
        assert!(msg.contains("/data/reviews.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_empty_dataset() {
        let err = AnalyzerError::EmptyDataset(PathBuf::from("/data/empty.csv"));
        let msg = err.to_string();
        assert_eq!(msg, "No parseable reviews found in /data/empty.csv");
    }

    #[test]
    fn test_error_display_unknown_park() {
        let err = AnalyzerError::UnknownPark("Disneyland Mars".to_string());
        assert_eq!(err.to_string(), "Unknown park: Disneyland Mars");
    }

    #[test]
    fn test_error_display_invalid_top_count() {
        let err = AnalyzerError::InvalidTopCount(0);
        assert_eq!(err.to_string(), "Top-location count must be positive, got 0");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AnalyzerError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: AnalyzerError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }
}
