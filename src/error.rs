//! Error types for dayline

use thiserror::Error;

/// Errors that can occur at the session and I/O boundary.
///
/// Missing-data conditions never surface here; they are represented
/// structurally (`is_missing`, empty result vectors, `None` correlations).
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Failed to fetch entries: {0}")]
    FetchError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Unknown period: {0}")]
    UnknownPeriod(String),
}
