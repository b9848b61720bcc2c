//! Error types for the passive motion detection engine.
//!
//! The documented pipeline does not fail under valid grid shapes; the errors
//! here cover configuration handling and programmer-error preconditions such
//! as mismatched kernel filter grids.

use thiserror::Error;

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error type for the passive motion detection engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// Validation error for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// Input and output grids passed to the kernel filter have different
    /// shapes. This is a precondition violation, not a runtime condition.
    #[error("Grid shape mismatch: expected {expected:?}, got {actual:?}")]
    GridShapeMismatch {
        /// Expected (columns, rows) shape
        expected: (usize, usize),
        /// Actual (columns, rows) shape
        actual: (usize, usize),
    },
}

impl CoreError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
