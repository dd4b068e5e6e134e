//! Error types for argument declaration and extraction.

use thiserror::Error;

use crate::compiler::CoreError;

/// Failure while declaring or extracting a kernel argument.
///
/// Nothing in this crate recovers from these: every variant is surfaced
/// to whoever called declare or extract.
#[derive(Debug, Error)]
pub enum ArgError {
    /// The dtype could not be normalized to a primitive type.
    #[error("unsupported data type '{0}'")]
    UnsupportedType(String),

    /// External arrays are one-dimensional only.
    #[error("unsupported external array dimensionality {0} (only dim=1 is supported)")]
    UnsupportedDimension(usize),

    /// The argument has no shape/dtype facade.
    #[error("invalid buffer argument: {0}")]
    InvalidBuffer(String),

    /// Call-site argument count differs from the kernel's parameter count.
    #[error("kernel takes {expected} arguments but {found} were supplied")]
    ArityMismatch { expected: usize, found: usize },

    /// A positional argument does not fit its parameter's descriptor.
    /// `index` is 0 when a descriptor is used outside a kernel signature.
    #[error("argument {index}: expected {expected}, found {found}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Passed through unchanged from the compiler core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ArgError {
    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        ArgError::ArgumentMismatch {
            index: 0,
            expected,
            found,
        }
    }

    /// Attach the positional index of the failing argument.
    pub(crate) fn at(self, position: usize) -> Self {
        match self {
            ArgError::ArgumentMismatch {
                expected, found, ..
            } => ArgError::ArgumentMismatch {
                index: position,
                expected,
                found,
            },
            other => other,
        }
    }
}

/// Failure while loading a [`CoreConfig`](crate::config::CoreConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {message}")]
    Invalid { path: String, message: String },
}
