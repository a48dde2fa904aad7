//! Dense matrices.
//!
//! [`Matrix`] wraps `nalgebra::DMatrix<f64>` and carries the basis-change
//! matrix `Q` and the block-structured constraint matrix. Constraint rows are
//! assembled slot by slot with [`Matrix::set_scaled_identity_block`].

use std::fmt;
use std::ops::{Index, IndexMut, Mul, Sub};

use envelope_core::Real;
use nalgebra::DMatrix;

use crate::array::Array;

/// Dense real matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// `rows × cols` zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// `I_n`.
    pub fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// From row-major `data`.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Column `j` is `columns[j]`; all columns share one length.
    pub fn from_columns(columns: &[Array]) -> Self {
        let rows = columns.first().map_or(0, Array::size);
        Self(DMatrix::from_fn(rows, columns.len(), |i, j| columns[j][i]))
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Whether `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.0.is_square()
    }

    /// The underlying nalgebra matrix, for decompositions.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// `Mᵀ`.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// `M⁻¹` by LU, `None` when singular or not square.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.clone().try_inverse().map(Self)
    }

    /// Frobenius norm.
    pub fn norm(&self) -> Real {
        self.0.norm()
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> Real {
        self.0.iter().fold(0.0, |m, x| m.max(x.abs()))
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Array {
        Array::from(self.0.column(j).clone_owned())
    }

    /// `M · v`.
    pub fn mul_vec(&self, v: &Array) -> Array {
        Array::from(&self.0 * v.inner())
    }

    /// Write `value · I_n` into the `n × n` block at `(row, col)`,
    /// zeroing its off-diagonal entries.
    ///
    /// # Panics
    /// If the block runs past the matrix.
    pub fn set_scaled_identity_block(&mut self, row: usize, col: usize, n: usize, value: Real) {
        let mut block = self.0.view_mut((row, col), (n, n));
        block.fill(0.0);
        block.fill_diagonal(value);
    }
}

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, ij: (usize, usize)) -> &Real {
        &self.0[ij]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, ij: (usize, usize)) -> &mut Real {
        &mut self.0[ij]
    }
}

impl Sub for &Matrix {
    type Output = Matrix;
    fn sub(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 - &rhs.0)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 * &rhs.0)
    }
}

/// One bracketed row per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .0
            .row_iter()
            .map(|r| {
                let entries: Vec<String> = r.iter().map(|v| v.to_string()).collect();
                format!("[{}]", entries.join(", "))
            })
            .collect();
        write!(f, "{}", rows.join("\n"))
    }
}
