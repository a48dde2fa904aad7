//! Numerical integration over Chebyshev extrema.
//!
//! Only the Clenshaw–Curtis rule is needed: it integrates exactly any
//! polynomial given by its values at the Chebyshev extrema, which is
//! precisely the interpolant-basis representation.

pub mod clenshaw_curtis;

pub use clenshaw_curtis::{clenshaw_curtis_weights, ClenshawCurtis};
