//! Error types for the QSSMA cost pipeline.
//!
//! The pipeline has exactly two error tiers:
//!
//! - [`LoadError`] - load-fatal problems (unreadable file, missing identity
//!   column). No partial record set is ever produced after one of these.
//! - per-cell anomalies - never errors at all. An unparseable or ambiguous
//!   cell classifies as excluded and is dropped; see [`crate::etl::classify`].
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors (fatal)
// =============================================================================

/// Errors that abort a data load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source file is absent or unreadable.
    #[error("No data file could be read: {0}")]
    FileNotReadable(String),

    /// A required identity column is missing from the source.
    #[error("Required column '{0}' not found in the source file")]
    MissingColumn(String),

    /// Source file has no content.
    #[error("Source file is empty")]
    EmptyFile,

    /// No header row found.
    #[error("No header row found in the source file")]
    NoHeaders,

    /// Malformed delimited content.
    #[error("Invalid CSV content: {0}")]
    ParseError(#[from] csv::Error),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Dataset load failed at startup.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_names_the_column() {
        let err = LoadError::MissingColumn("OBRAS".into());
        assert!(err.to_string().contains("OBRAS"));
    }

    #[test]
    fn test_error_conversion_chain() {
        // LoadError -> ServerError
        let load_err = LoadError::EmptyFile;
        let server_err: ServerError = load_err.into();
        assert!(server_err.to_string().contains("empty"));

        // io::Error -> LoadError
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let load_err: LoadError = io_err.into();
        assert!(load_err.to_string().contains("gone"));
    }
}
