//! Registered polynomials, stored in the interpolant basis.
//!
//! Insertion order is significant: entry `0` is the reference polynomial
//! `P₀` that every other entry is compared against when the instance is
//! assembled.

use std::time::Instant;

use envelope_core::{
    errors::{Error, Result},
    Diagnostics, Real,
};
use envelope_math::{matrix_utilities, Array, ChebyshevBasis};

/// Name of the reconstruction metric recorded on the diagnostics sink.
pub const INVERSION_ERROR: &str = "‖Q·Q⁻¹ − I‖";

/// Name of the basis-matrix norm metric.
pub const TRANSFORM_NORM: &str = "‖Q‖";

/// Append-only list of polynomials in the interpolant basis.
#[derive(Debug, Clone)]
pub struct PolynomialRegistry {
    size: usize,
    inversion_tolerance: Real,
    conversion_tolerance: Real,
    polynomials: Vec<Array>,
    monomial_inputs: usize,
    inversion_error: Option<Real>,
}

impl PolynomialRegistry {
    /// Empty registry for coefficient vectors of length `size`.
    pub fn new(size: usize, inversion_tolerance: Real, conversion_tolerance: Real) -> Self {
        Self {
            size,
            inversion_tolerance,
            conversion_tolerance,
            polynomials: Vec::new(),
            monomial_inputs: 0,
            inversion_error: None,
        }
    }

    /// Coefficient vector length `U`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of registered polynomials.
    pub fn len(&self) -> usize {
        self.polynomials.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.polynomials.is_empty()
    }

    /// Registered polynomials in insertion order (interpolant basis).
    pub fn polynomials(&self) -> &[Array] {
        &self.polynomials
    }

    /// The reference polynomial `P₀`, if any.
    pub fn reference(&self) -> Option<&Array> {
        self.polynomials.first()
    }

    /// Polynomial `i` in the interpolant basis.
    pub fn get(&self, i: usize) -> Option<&Array> {
        self.polynomials.get(i)
    }

    /// Whether any entry was supplied in monomial form.
    pub fn has_monomial_inputs(&self) -> bool {
        self.monomial_inputs > 0
    }

    /// `‖Q·Q⁻¹ − I‖_F` measured on the first monomial registration.
    pub fn inversion_error(&self) -> Option<Real> {
        self.inversion_error
    }

    /// The additive identity in the interpolant basis.
    pub fn zero_polynomial(&self) -> Array {
        Array::zeros(self.size)
    }

    /// Register `polynomial` and return its index.
    ///
    /// With `already_in_interpolant_basis` the vector is stored as-is and
    /// `basis` is not consulted. Otherwise it is read as monomial
    /// coefficients and converted by solving `Q · v = polynomial`.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the length is not `U`.
    /// - `Precondition` if a monomial input arrives without a basis or the
    ///   input contains non-finite values.
    /// - `Conversion` if the solve fails or its backward error exceeds the
    ///   conversion tolerance. The registry is left unchanged.
    pub fn register(
        &mut self,
        polynomial: &Array,
        already_in_interpolant_basis: bool,
        basis: Option<&ChebyshevBasis>,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize> {
        if polynomial.size() != self.size {
            return Err(Error::DimensionMismatch {
                expected: self.size,
                actual: polynomial.size(),
            });
        }
        envelope_core::ensure!(
            polynomial.iter().all(|c| c.is_finite()),
            "polynomial coefficients must be finite"
        );

        let stored = if already_in_interpolant_basis {
            polynomial.clone()
        } else {
            let basis = basis.ok_or_else(|| {
                Error::Precondition("monomial input requires the interpolant basis".into())
            })?;
            self.convert_monomial(basis, polynomial, diagnostics)?
        };

        if !already_in_interpolant_basis {
            self.monomial_inputs += 1;
        }
        self.polynomials.push(stored);
        Ok(self.polynomials.len() - 1)
    }

    /// Solve `Q · v = monomial` for the interpolant coefficients `v`.
    ///
    /// The QR solve is the canonical result. The explicit inverse is only
    /// used, once per registry, to measure `‖Q·Q⁻¹ − I‖`; a large value is
    /// reported as a numeric warning and does not abort.
    pub fn convert_monomial(
        &mut self,
        basis: &ChebyshevBasis,
        monomial: &Array,
        diagnostics: &mut Diagnostics,
    ) -> Result<Array> {
        let q = basis.transform_matrix();
        diagnostics.metric(TRANSFORM_NORM, q.norm());

        if self.inversion_error.is_none() {
            let start = Instant::now();
            let error = match matrix_utilities::inverse_with_error(q) {
                Ok((_, error)) => error,
                Err(_) => Real::INFINITY,
            };
            diagnostics.timing("Inversion of transformation matrix", start.elapsed());
            diagnostics.check(INVERSION_ERROR, error, self.inversion_tolerance);
            self.inversion_error = Some(error);
        }

        let start = Instant::now();
        let (solution, residual) = matrix_utilities::qr_solve(q, monomial)?;
        diagnostics.timing("Solving basis conversion system", start.elapsed());
        if residual.is_nan() || residual > self.conversion_tolerance {
            return Err(Error::Conversion(format!(
                "backward error {residual:e} exceeds tolerance {:e}",
                self.conversion_tolerance
            )));
        }
        Ok(solution)
    }
}
