//! Clenshaw–Curtis quadrature weights.
//!
//! For `U = 2L − 1` Chebyshev extrema on `[−1, 1]` the weights follow from a
//! discrete cosine transform of the Chebyshev moments:
//!
//! ```text
//! D[k, n] = cos(k n π / (L − 1)) · s(n) / (L − 1),   s(0) = s(L−1) = ½, else 1
//! F[0] = 1,   F[m] = 2 / (1 − 4m²),   F[L−1] = 1 / (1 − (U − 1)²)
//! w[0..L] = Dᵀ F
//! ```
//!
//! The remaining `L − 1` weights mirror the first half, and the shared
//! middle weight is doubled since the half-rule counts it as a boundary node.

use std::f64::consts::PI;

use envelope_core::{ensure, errors::Result, Error, Real};

use crate::array::Array;
use crate::chebyshev::{chebyshev_extrema, map_to_interval};
use crate::matrix::Matrix;

/// Clenshaw–Curtis weights on `[−1, 1]` for `u = 2l − 1` Chebyshev extrema.
///
/// # Errors
/// A precondition error if `l < 2` (the normalisation divides by `l − 1`)
/// or if `u ≠ 2l − 1`.
pub fn clenshaw_curtis_weights(l: usize, u: usize) -> Result<Array> {
    ensure!(l >= 2, "Clenshaw-Curtis weights need at least 2 half-nodes, got {l}");
    ensure!(u == 2 * l - 1, "expected {} nodes for {l} half-nodes, got {u}", 2 * l - 1);

    let last = l - 1;
    let mut d = Matrix::zeros(l, l);
    for k in 0..l {
        for n in 0..l {
            let scale = if n == 0 || n == last { 0.5 } else { 1.0 };
            d[(k, n)] = (k as Real * n as Real * PI / last as Real).cos() * scale / last as Real;
        }
    }

    let mut fourier = Array::zeros(l);
    fourier[0] = 1.0;
    for m in 1..last {
        let two_m = 2.0 * m as Real;
        fourier[m] = 2.0 / (1.0 - two_m * two_m);
    }
    let top = (u - 1) as Real;
    fourier[last] = 1.0 / (1.0 - top * top);

    let half = d.transpose().mul_vec(&fourier);
    let mut weights = Array::concat(&[&half, &half.segment(0, last).reversed()]);
    weights[last] *= 2.0;
    Ok(weights)
}

/// Clenshaw–Curtis rule of degree `d` (`U = 2d + 1` nodes) on `[lo, hi]`.
#[derive(Debug, Clone)]
pub struct ClenshawCurtis {
    nodes: Vec<Real>,
    weights: Array,
}

impl ClenshawCurtis {
    /// Build the rule for maximum degree `degree` on `[lo, hi]`.
    pub fn new(degree: usize, lo: Real, hi: Real) -> Result<Self> {
        ensure!(lo < hi, "invalid interval [{lo}, {hi}]");
        let reference = clenshaw_curtis_weights(degree + 1, 2 * degree + 1)?;
        Ok(Self {
            nodes: map_to_interval(&chebyshev_extrema(2 * degree + 1)?, lo, hi),
            weights: reference.scale(0.5 * (hi - lo)),
        })
    }

    /// Number of nodes `U`.
    pub fn size(&self) -> usize {
        self.weights.size()
    }

    /// Weights scaled to `[lo, hi]`.
    pub fn weights(&self) -> &Array {
        &self.weights
    }

    /// Negated weights: the linear functional `p ↦ −∫ p`.
    pub fn objective(&self) -> Array {
        -&self.weights
    }

    /// Integrate a polynomial given in the interpolant basis.
    pub fn integrate_values(&self, values: &Array) -> Result<Real> {
        if values.size() != self.size() {
            return Err(Error::DimensionMismatch {
                expected: self.size(),
                actual: values.size(),
            });
        }
        Ok(self.weights.dot(values))
    }

    /// Integrate `f` by sampling it at the mapped Chebyshev extrema.
    pub fn integrate<F: Fn(Real) -> Real>(&self, f: F) -> Real {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}
