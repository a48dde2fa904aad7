//! # envelope-core
//!
//! Core types, error definitions, and diagnostics for sosenvelope.
//!
//! Shared by every crate of the workspace. The [`Diagnostics`] sink is
//! passed into constructors; there is no process-wide logger instance.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Diagnostic sink (log forwarding plus recorded numeric warnings).
pub mod diagnostics;

/// Error types and the `ensure!` macro.
pub mod errors;

/// Scalar type of every coefficient, weight and matrix entry.
pub type Real = f64;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use diagnostics::{DiagnosticEvent, Diagnostics, NumericWarning};
pub use errors::{Error, Result, UsageError};
