//! Error types for sosenvelope.
//!
//! A single `thiserror`-derived enum covers every failure the instance
//! construction pipeline can report. Caller-configuration mistakes are
//! grouped under [`UsageError`]; basis-conversion failures under
//! [`Error::Conversion`]. Non-fatal numeric findings are not errors at all,
//! see [`crate::diagnostics::NumericWarning`].

use thiserror::Error;

/// Caller-configuration errors. Fatal for the call that raised them; the
/// caller must change its input before trying again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UsageError {
    /// No polynomial was registered before building an instance.
    #[error("no polynomial registered, please provide at least two")]
    EmptyInstance,

    /// Exactly one polynomial was registered: nothing to bound against.
    #[error("instance is trivial: only the reference polynomial is registered")]
    TrivialInstance,

    /// Only univariate polynomials are supported.
    #[error("only univariate polynomials are supported, got {0} variables")]
    UnsupportedVariableCount(usize),

    /// The maximum degree must be at least one.
    #[error("maximum degree must be at least 1, got {0}")]
    UnsupportedDegree(usize),

    /// The domain interval must satisfy `lo < hi` with finite ends.
    #[error("invalid domain [{lo}, {hi}]: need finite bounds with lo < hi")]
    InvalidDomain {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
}

/// The top-level error type used throughout sosenvelope.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The caller configured the problem incorrectly.
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    /// Converting a polynomial into the interpolant basis failed.
    #[error("basis conversion failed: {0}")]
    Conversion(String),

    /// A vector or matrix did not have the expected length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The dimension that was supplied.
        actual: usize,
    },

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),
}

/// Shorthand `Result` type used throughout sosenvelope.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use envelope_core::{ensure, errors::Error};
/// fn positive(x: f64) -> envelope_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}
