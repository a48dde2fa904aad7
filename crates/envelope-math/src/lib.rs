//! # envelope-math
//!
//! Numerical building blocks for the lower-envelope formulation:
//! array/matrix newtypes over nalgebra, the decompositions used for basis
//! conversion and dualisation, monomial polynomial helpers, the Lagrange
//! interpolant basis at Chebyshev extrema, and Clenshaw–Curtis weights.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// One-dimensional `Array` newtype.
pub mod array;

/// Chebyshev extrema and the Lagrange interpolant basis.
pub mod chebyshev;

/// Floating-point comparisons.
pub mod comparison;

/// Quadrature rules.
pub mod integrals;

/// Two-dimensional `Matrix` newtype.
pub mod matrix;

/// Inverse, QR/SVD solves, eigen-decomposition, null space.
pub mod matrix_utilities;

/// Monomial-form polynomial helpers.
pub mod polynomial;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use chebyshev::ChebyshevBasis;
pub use integrals::ClenshawCurtis;
pub use matrix::Matrix;
