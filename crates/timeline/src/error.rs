//! Error types for activity definition loading.

/// Errors that can occur while loading and validating activity definitions.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/deserialization error.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Definition validation error (unknown weekday token, unparsable
    /// time, empty start_times, non-positive duration).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;
