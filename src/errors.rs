//! Centralized error handling for RuGaX
//!
//! Every fallible operation in the crate returns [`Result`], so a failing GrADS
//! statement deep inside a sweep surfaces unchanged at the `export` call site.

use crate::dimension::Axis;

/// Main error type for RuGaX operations
#[derive(Debug, thiserror::Error)]
pub enum RuGaXError {
    /// A relayed statement returned a non-zero status
    #[error("GrADS returned rc={status} for the following command:\n{command}")]
    CommandFailed {
        /// The statement exactly as it was sent.
        command: String,
        /// Status code reported by the session.
        status: i32,
        /// Output lines the session produced for the failing statement.
        output: Vec<String>,
    },

    /// The session itself could not answer (pipe closed, malformed reply, ...)
    #[error("GrADS session error: {0}")]
    Session(String),

    /// A 2-D read did not match the shape of the first slice of the sweep
    #[error("slice shape {got:?} does not match expected {expected:?}")]
    SliceShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// An explicit output layout does not cover the varying axes
    #[error("layout {layout:?} is not a permutation of varying axes {varying:?}")]
    InvalidLayout { layout: Vec<Axis>, varying: Vec<Axis> },

    /// Coordinate values do not match the length of their dimension
    #[error("coordinate '{dim}' has {got} values for a dimension of length {expected}")]
    CoordinateMismatch {
        dim: String,
        expected: usize,
        got: usize,
    },

    /// Index selection past the end of a dimension
    #[error("index {index} out of bounds for dimension '{dim}' of length {len}")]
    IndexOutOfBounds { dim: String, index: usize, len: usize },

    /// Dimension lookup on a labeled array failed
    #[error("dimension '{dim}' not found in '{array}'")]
    DimensionNotFound { array: String, dim: String },

    /// Array shape or dimension error
    #[error("array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuGaXError {
    /// The failing statement, when the error came from the relay.
    pub fn command(&self) -> Option<&str> {
        match self {
            RuGaXError::CommandFailed { command, .. } => Some(command),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RuGaXError {
    fn from(error: serde_json::Error) -> Self {
        RuGaXError::Config(error.to_string())
    }
}

/// Result type alias for RuGaX operations
pub type Result<T> = std::result::Result<T, RuGaXError>;
