//! Lagrange interpolant basis at Chebyshev extrema.
//!
//! A polynomial of degree `< U` is represented in the *interpolant basis*
//! by its values at `U` Chebyshev extrema. Basis polynomial `i` is the
//! Lagrange polynomial that is `1` at node `i` and `0` at every other node;
//! its monomial coefficients form column `i` of the basis-change matrix `Q`,
//! so that `monomial = Q · interpolant`.

use std::f64::consts::PI;

use envelope_core::{ensure, errors::Result, Real};

use crate::array::Array;
use crate::matrix::Matrix;
use crate::polynomial;

/// The `n` extrema of `T_{n−1}` on `[−1, 1]`, ascending:
/// `x_i = −cos(iπ / (n − 1))`.
///
/// # Errors
/// A precondition error if `n < 2`: a single extremum is undefined.
pub fn chebyshev_extrema(n: usize) -> Result<Vec<Real>> {
    ensure!(n >= 2, "Chebyshev extrema need at least 2 nodes, got {n}");
    Ok((0..n)
        .map(|i| -(i as Real * PI / (n - 1) as Real).cos())
        .collect())
}

/// Map reference nodes on `[−1, 1]` affinely onto `[lo, hi]`.
pub fn map_to_interval(nodes: &[Real], lo: Real, hi: Real) -> Vec<Real> {
    let mid = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);
    nodes.iter().map(|&t| mid + half * t).collect()
}

/// Lagrange basis polynomials for `nodes`, in monomial coefficients.
///
/// Each polynomial is built incrementally: starting from `1`, multiply by
/// `(x − x_j)` for every other node while accumulating the denominator
/// `∏ (x_i − x_j)` separately, then divide once at the end.
pub fn lagrange_basis(nodes: &[Real]) -> Vec<Array> {
    let n = nodes.len();
    (0..n)
        .map(|i| {
            let mut poly = Array::zeros(n);
            poly[0] = 1.0;
            let mut denom = 1.0;
            for (j, &xj) in nodes.iter().enumerate() {
                if i != j {
                    denom *= nodes[i] - xj;
                    polynomial::multiply_by_linear(&mut poly, xj);
                }
            }
            poly.scale(1.0 / denom)
        })
        .collect()
}

/// The basis-change matrix: column `j` holds the coefficients of `basis[j]`.
pub fn transform_matrix(basis: &[Array]) -> Matrix {
    Matrix::from_columns(basis)
}

/// Chebyshev-extrema interpolant basis on an interval.
#[derive(Debug, Clone)]
pub struct ChebyshevBasis {
    nodes: Vec<Real>,
    basis: Vec<Array>,
    q: Matrix,
}

impl ChebyshevBasis {
    /// Build the basis of dimension `size` on `[lo, hi]`.
    pub fn new(size: usize, lo: Real, hi: Real) -> Result<Self> {
        ensure!(
            lo.is_finite() && hi.is_finite() && lo < hi,
            "invalid interval [{lo}, {hi}]"
        );
        let nodes = map_to_interval(&chebyshev_extrema(size)?, lo, hi);
        let basis = lagrange_basis(&nodes);
        let q = transform_matrix(&basis);
        Ok(Self { nodes, basis, q })
    }

    /// Basis dimension `U`.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Node positions, ascending.
    pub fn nodes(&self) -> &[Real] {
        &self.nodes
    }

    /// Basis polynomials in monomial coefficients.
    pub fn basis_polynomials(&self) -> &[Array] {
        &self.basis
    }

    /// The matrix `Q` with `monomial = Q · interpolant`.
    pub fn transform_matrix(&self) -> &Matrix {
        &self.q
    }

    /// Convert interpolant-basis coefficients to monomial coefficients.
    pub fn to_monomial(&self, interpolant: &Array) -> Array {
        self.q.mul_vec(interpolant)
    }

    /// Interpolant-basis coefficients of `f`: its values at the nodes.
    pub fn interpolate<F: Fn(Real) -> Real>(&self, f: F) -> Array {
        Array::from_vec(self.nodes.iter().map(|&x| f(x)).collect())
    }
}
