//! Matrix decompositions and solves used by the basis change and the dual
//! system.
//!
//! Wraps nalgebra's decompositions: column-pivoted QR for the canonical
//! monomial → interpolant conversion, LU inversion for the reconstruction
//! diagnostic, SVD for least-squares, and the symmetric eigen-decomposition
//! for null-space bases.

use crate::array::Array;
use crate::matrix::Matrix;
use envelope_core::{
    errors::{Error, Result},
    Real,
};

fn require_square(m: &Matrix) -> Result<()> {
    if !m.is_square() {
        return Err(Error::Precondition(format!(
            "matrix must be square, got {}×{}",
            m.rows(),
            m.cols()
        )));
    }
    Ok(())
}

fn require_rows(m: &Matrix, rhs: &Array) -> Result<()> {
    if rhs.size() != m.rows() {
        return Err(Error::DimensionMismatch {
            expected: m.rows(),
            actual: rhs.size(),
        });
    }
    Ok(())
}

/// Explicit inverse together with the reconstruction error `‖M·M⁻¹ − I‖_F`.
///
/// # Errors
/// `Error::Conversion` if the matrix is singular.
pub fn inverse_with_error(m: &Matrix) -> Result<(Matrix, Real)> {
    require_square(m)?;
    let inv = m
        .try_inverse()
        .ok_or_else(|| Error::Conversion("matrix is singular".into()))?;
    let error = (&(m * &inv) - &Matrix::identity(m.rows())).norm();
    Ok((inv, error))
}

/// Solve `M x = rhs` with a column-pivoted Householder QR.
///
/// The normwise backward error `‖M x − rhs‖ / (‖M‖·‖x‖ + ‖rhs‖)` is returned
/// alongside the solution so the caller can decide whether to trust it. It
/// stays near machine precision for a backward-stable solve however large
/// `‖M‖` grows, unlike the plain residual. A zero system has error `0`.
///
/// # Errors
/// `Error::Conversion` if the factorisation reports a singular system or the
/// solution is not finite.
pub fn qr_solve(m: &Matrix, rhs: &Array) -> Result<(Array, Real)> {
    require_square(m)?;
    require_rows(m, rhs)?;
    let qr = m.inner().clone().col_piv_qr();
    let x = qr
        .solve(rhs.inner())
        .map(Array::from)
        .ok_or_else(|| Error::Conversion("QR solve failed: system is singular".into()))?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(Error::Conversion(
            "QR solve produced non-finite coefficients".into(),
        ));
    }
    let error = backward_error(m, &x, rhs);
    Ok((x, error))
}

/// `‖M x − rhs‖ / (‖M‖·‖x‖ + ‖rhs‖)`, or `0` when the denominator vanishes.
pub fn backward_error(m: &Matrix, x: &Array, rhs: &Array) -> Real {
    let scale = m.norm() * x.norm() + rhs.norm();
    if scale == 0.0 {
        return 0.0;
    }
    (&m.mul_vec(x) - rhs).norm() / scale
}

/// Minimum-norm least-squares solution of `M x ≈ rhs` via SVD.
///
/// Singular values below `max(rows, cols) · ε · σ_max` are treated as zero.
pub fn least_squares(m: &Matrix, rhs: &Array) -> Result<Array> {
    require_rows(m, rhs)?;
    let svd = m.inner().clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0, Real::max);
    let eps = m.rows().max(m.cols()) as Real * f64::EPSILON * sigma_max;
    svd.solve(rhs.inner(), eps)
        .map(Array::from)
        .map_err(|e| Error::Runtime(format!("least-squares solve failed: {e}")))
}

/// Eigenvalue decomposition of a symmetric real matrix.
///
/// Returns `(eigenvalues, eigenvectors)`; column `k` of the eigenvector
/// matrix belongs to eigenvalue `k`. No ordering is guaranteed.
pub fn symmetric_eigen(m: &Matrix) -> Result<(Array, Matrix)> {
    require_square(m)?;
    let eigen = m.inner().clone().symmetric_eigen();
    Ok((
        Array::from(eigen.eigenvalues.clone_owned()),
        Matrix::from(eigen.eigenvectors),
    ))
}

/// Orthonormal basis of the null space of `m`, one basis vector per column.
///
/// Computed from the eigenvectors of `mᵀm` whose eigenvalues fall below
/// `tolerance · max(1, λ_max)`. The result has `m.cols()` rows and may have
/// zero columns.
pub fn null_space(m: &Matrix, tolerance: Real) -> Result<Matrix> {
    let gram = &m.transpose() * m;
    let (values, vectors) = symmetric_eigen(&gram)?;
    let lambda_max = values.iter().copied().fold(1.0, Real::max);
    let cutoff = tolerance * lambda_max;
    let columns: Vec<Array> = (0..values.size())
        .filter(|&k| values[k].abs() <= cutoff)
        .map(|k| vectors.column(k))
        .collect();
    if columns.is_empty() {
        return Ok(Matrix::zeros(m.cols(), 0));
    }
    Ok(Matrix::from_columns(&columns))
}
