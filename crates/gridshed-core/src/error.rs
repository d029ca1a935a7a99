//! Unified error types for the gridshed pipeline
//!
//! This module provides a common error type [`GridshedError`] that can
//! represent errors from any stage of the pipeline. Domain-specific errors
//! are converted to `GridshedError` for uniform handling at API boundaries.

use thiserror::Error;

/// Unified error type for all gridshed operations.
#[derive(Error, Debug)]
pub enum GridshedError {
    /// I/O errors (file access etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GridshedError.
pub type GridshedResult<T> = Result<T, GridshedError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for GridshedError {
    fn from(err: anyhow::Error) -> Self {
        GridshedError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for GridshedError {
    fn from(s: String) -> Self {
        GridshedError::Other(s)
    }
}

impl From<&str> for GridshedError {
    fn from(s: &str) -> Self {
        GridshedError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridshedError::Validation("voltage below zero".to_string());
        assert_eq!(err.to_string(), "Validation error: voltage below zero");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GridshedError = io_err.into();
        assert!(matches!(err, GridshedError::Io(_)));
    }
}
