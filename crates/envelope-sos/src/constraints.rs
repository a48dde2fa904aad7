//! Linear part of a conic instance: `min c·z  s.t.  A z = b`.

use std::fmt;

use envelope_core::{
    errors::{Error, Result},
    Real,
};
use envelope_math::{matrix_utilities, Array, Matrix};

/// Relative eigenvalue threshold for the null space of `A` in
/// [`Constraints::dual_system`].
pub const KERNEL_TOLERANCE: Real = 1e-10;

/// A linear system `A z = b` with a linear objective `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Constraint matrix (`m × n`).
    pub a: Matrix,
    /// Right-hand side (length `m`).
    pub b: Array,
    /// Objective (length `n`).
    pub c: Array,
}

impl Constraints {
    /// Bundle `(A, b, c)` after checking their dimensions agree.
    pub fn new(a: Matrix, b: Array, c: Array) -> Result<Self> {
        if b.size() != a.rows() {
            return Err(Error::DimensionMismatch {
                expected: a.rows(),
                actual: b.size(),
            });
        }
        if c.size() != a.cols() {
            return Err(Error::DimensionMismatch {
                expected: a.cols(),
                actual: c.size(),
            });
        }
        Ok(Self { a, b, c })
    }

    /// Number of equality rows.
    pub fn num_constraints(&self) -> usize {
        self.a.rows()
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.a.cols()
    }

    /// `c · z`.
    pub fn objective_value(&self, z: &Array) -> Real {
        self.c.dot(z)
    }

    /// `‖A z − b‖₂`.
    pub fn residual(&self, z: &Array) -> Result<Real> {
        if z.size() != self.num_variables() {
            return Err(Error::DimensionMismatch {
                expected: self.num_variables(),
                actual: z.size(),
            });
        }
        Ok((&self.a.mul_vec(z) - &self.b).norm())
    }

    /// The dual system in the same `(A, b, c)` shape.
    ///
    /// For the primal `min c·z, A z = b, z ∈ K`, the dual slack
    /// `s = c − Aᵀy` ranges over `c + range(Aᵀ)`, i.e. `Nᵀ s = Nᵀ c` where the
    /// columns of `N` span `ker A`. With `x₀` any solution of `A x₀ = b`,
    /// `b·y = x₀·c − x₀·s`, so maximising `b·y` becomes
    ///
    /// ```text
    /// min x₀·s   s.t.   Nᵀ s = Nᵀ c,   s ∈ K*
    /// ```
    ///
    /// `N` is orthonormal and `x₀` is the minimum-norm least-squares solution.
    pub fn dual_system(&self) -> Result<Constraints> {
        let kernel = matrix_utilities::null_space(&self.a, KERNEL_TOLERANCE)?;
        let a_dual = kernel.transpose();
        let b_dual = a_dual.mul_vec(&self.c);
        let c_dual = matrix_utilities::least_squares(&self.a, &self.b)?;
        Constraints::new(a_dual, b_dual, c_dual)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A ({}×{}):", self.a.rows(), self.a.cols())?;
        writeln!(f, "{}", self.a)?;
        writeln!(f, "b: {}", self.b)?;
        write!(f, "c: {}", self.c)
    }
}
