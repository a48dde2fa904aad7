//! Maps a solver's slack vector back to the envelope polynomial.

use envelope_core::{
    errors::{Error, Result},
    Real,
};
use envelope_math::{polynomial, Array, ChebyshevBasis, ClenshawCurtis};

use crate::{domain::Domain, instance::Solution, registry::PolynomialRegistry};

/// Pointwise comparison of the envelope with the registered polynomials.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSample {
    /// Evenly spaced points over the domain.
    pub grid: Vec<Real>,
    /// Envelope values on the grid.
    pub envelope: Vec<Real>,
    /// `polynomials[i][k]` is `P_i(grid[k])`.
    pub polynomials: Vec<Vec<Real>>,
    /// `min_i P_i(x) − envelope(x)` on the grid.
    pub gap: Vec<Real>,
}

impl EnvelopeSample {
    /// Smallest gap; negative where the envelope rises above some `P_i`.
    pub fn min_gap(&self) -> Real {
        self.gap.iter().copied().fold(Real::INFINITY, Real::min)
    }

    /// Whether the envelope stays below every polynomial up to `tolerance`.
    pub fn is_below(&self, tolerance: Real) -> bool {
        self.min_gap() >= -tolerance
    }
}

/// Reads the envelope out of a [`Solution`].
///
/// The first `U` entries of `s` are the slot-0 variable, the gap `P₀ − E`
/// between the reference polynomial and the envelope, so `E = P₀ − s[0..U]`.
#[derive(Debug, Clone, Copy)]
pub struct SolutionProjector<'a> {
    registry: &'a PolynomialRegistry,
    basis: Option<&'a ChebyshevBasis>,
    domain: Domain,
}

impl<'a> SolutionProjector<'a> {
    /// Projector over `registry`. `basis` is needed only to leave the
    /// interpolant basis.
    pub fn new(
        registry: &'a PolynomialRegistry,
        basis: Option<&'a ChebyshevBasis>,
        domain: Domain,
    ) -> Self {
        Self {
            registry,
            basis,
            domain,
        }
    }

    /// The envelope in the interpolant basis.
    pub fn interpolant_envelope(&self, solution: &Solution) -> Result<Array> {
        let u = self.registry.size();
        let p0 = self
            .registry
            .reference()
            .ok_or_else(|| Error::Precondition("no reference polynomial registered".into()))?;
        if solution.s.size() < u {
            return Err(Error::DimensionMismatch {
                expected: u,
                actual: solution.s.size(),
            });
        }
        Ok(p0 - &solution.s.segment(0, u))
    }

    /// The envelope in the form the polynomials were registered in: monomial
    /// coefficients if any entry was given that way, interpolant otherwise.
    pub fn project(&self, solution: &Solution) -> Result<Array> {
        let envelope = self.interpolant_envelope(solution)?;
        if self.registry.has_monomial_inputs() {
            Ok(self.require_basis()?.to_monomial(&envelope))
        } else {
            Ok(envelope)
        }
    }

    /// `∫ E` over the domain.
    pub fn integral(&self, solution: &Solution, quadrature: &ClenshawCurtis) -> Result<Real> {
        quadrature.integrate_values(&self.interpolant_envelope(solution)?)
    }

    /// Evaluate the envelope and every registered polynomial on `points`
    /// evenly spaced points of the domain.
    pub fn sample(&self, solution: &Solution, points: usize) -> Result<EnvelopeSample> {
        let basis = self.require_basis()?;
        let envelope = basis.to_monomial(&self.interpolant_envelope(solution)?);
        let grid = self.domain.grid(points)?;
        let eval = |coeffs: &Array| -> Vec<Real> {
            grid.iter()
                .map(|&x| polynomial::evaluate(coeffs.as_slice(), x))
                .collect()
        };

        let polynomials: Vec<Vec<Real>> = self
            .registry
            .polynomials()
            .iter()
            .map(|p| eval(&basis.to_monomial(p)))
            .collect();
        let envelope = eval(&envelope);
        let gap = envelope
            .iter()
            .enumerate()
            .map(|(k, e)| {
                polynomials
                    .iter()
                    .map(|p| p[k])
                    .fold(Real::INFINITY, Real::min)
                    - e
            })
            .collect();

        Ok(EnvelopeSample {
            grid,
            envelope,
            polynomials,
            gap,
        })
    }

    fn require_basis(&self) -> Result<&'a ChebyshevBasis> {
        self.basis
            .ok_or_else(|| Error::Precondition("interpolant basis not available".into()))
    }
}
