//! Error types for the ordering engine.

use std::path::PathBuf;

/// Errors that can occur while loading an instance or running a solver.
#[derive(Debug, thiserror::Error)]
pub enum NmrError {
    /// A row in the `.nmr` file did not contain two parseable integers.
    #[error("{path}:{line}: malformed edge row: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A solver or segment builder invariant was violated. Always fatal.
    #[error("invariant violated: {what}")]
    InvariantViolation { what: String },

    /// Checkpoint file exists but could not be decoded.
    #[error("checkpoint error: {message}")]
    Checkpoint { message: String },

    /// The brute-force oracle was asked to enumerate too many edges.
    #[error("brute force is infeasible for {n} edges (limit is {limit})")]
    TooManyEdgesForBruteForce { n: usize, limit: usize },

    /// Propagated filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NmrError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn invariant(what: impl Into<String>) -> Self {
        Self::InvariantViolation { what: what.into() }
    }

    pub fn checkpoint(message: impl Into<String>) -> Self {
        Self::Checkpoint {
            message: message.into(),
        }
    }
}

/// Result type used throughout the library.
pub type NmrResult<T> = Result<T, NmrError>;
