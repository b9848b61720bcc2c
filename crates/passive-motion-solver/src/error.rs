//! Error types for the solver shell.

use thiserror::Error;

/// A specialized `Result` type for solver operations.
pub type SolverResult<T> = Result<T, SolverError>;

/// Error type for the solver shell.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SolverError {
    /// Failed to read a configuration file
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration file
    #[error("failed to parse config file: {0}")]
    Config(#[from] serde_json::Error),

    /// A tile payload's length is not a whole number of records
    #[error("malformed tile payload: length {length} is not a multiple of 20")]
    MalformedPayload {
        /// The offending payload length in bytes
        length: usize,
    },
}
