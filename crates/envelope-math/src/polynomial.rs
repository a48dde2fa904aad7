//! Univariate polynomials in monomial form.
//!
//! A polynomial is stored as its coefficient vector `[c₀, c₁, …, c_{n-1}]`
//! representing `c₀ + c₁x + … + c_{n-1}x^{n-1}`. Only the handful of
//! operations needed by the interpolant basis and the reporting layer live
//! here.

use crate::array::Array;
use envelope_core::Real;

/// Evaluate `coeffs` at `x` with Horner's scheme.
pub fn evaluate(coeffs: &[Real], x: Real) -> Real {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Multiply by `(x − root)` in place, keeping the vector length.
///
/// The leading coefficient is shifted out; callers must leave room for the
/// degree increase.
pub fn multiply_by_linear(coeffs: &mut Array, root: Real) {
    let n = coeffs.size();
    for k in (1..n).rev() {
        coeffs[k] = coeffs[k - 1] - root * coeffs[k];
    }
    if n > 0 {
        coeffs[0] *= -root;
    }
}

/// `∫_lo^hi p(x) dx` by term-wise antiderivatives.
pub fn definite_integral(coeffs: &[Real], lo: Real, hi: Real) -> Real {
    let antiderivative = |x: Real| {
        coeffs
            .iter()
            .enumerate()
            .rev()
            .fold(0.0, |acc, (k, &c)| acc * x + c / (k + 1) as Real)
            * x
    };
    antiderivative(hi) - antiderivative(lo)
}
