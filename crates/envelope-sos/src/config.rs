//! Problem configuration.
//!
//! [`EnvelopeConfig`] gathers every knob of the instance construction in a
//! plain value that the caller builds and hands to
//! [`crate::EnvelopeProblem::new`]; nothing is read from process-wide state.

use envelope_core::{errors::Result, Real, UsageError};
use envelope_math::Array;

use crate::domain::Domain;

/// Which quadratic multiplier the weighted SOS primitive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MultiplierPolicy {
    /// `(x − lo)(hi − x)`, vanishing at the ends of the actual domain.
    #[default]
    DomainScaled,
    /// `1 − x²`, the multiplier of the reference interval `[−1, 1]`,
    /// regardless of the actual domain.
    Canonical,
}

impl MultiplierPolicy {
    /// Monomial coefficients of the multiplier for `domain`.
    pub fn multiplier(&self, domain: &Domain) -> Array {
        match self {
            Self::DomainScaled => domain.endpoint_multiplier(),
            Self::Canonical => Domain::reference().endpoint_multiplier(),
        }
    }
}

/// Configuration of an [`crate::EnvelopeProblem`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvelopeConfig {
    /// Number of variables. Only `1` is supported.
    pub num_variables: usize,
    /// Maximum degree `d` of the SOS certificate (`d ≥ 1`).
    pub max_degree: usize,
    /// Interval the envelope is certified on.
    pub domain: Domain,
    /// Add a weighted SOS primitive to every non-reference slot.
    pub weighted: bool,
    /// Multiplier used by the weighted primitive.
    pub multiplier: MultiplierPolicy,
    /// Registered polynomials are already in the interpolant basis.
    pub input_in_interpolant_basis: bool,
    /// Threshold on `‖Q·Q⁻¹ − I‖_F` above which a numeric warning is raised.
    pub inversion_tolerance: Real,
    /// Largest accepted normwise backward error of the basis-conversion solve.
    pub conversion_tolerance: Real,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            num_variables: 1,
            max_degree: 2,
            domain: Domain::reference(),
            weighted: true,
            multiplier: MultiplierPolicy::DomainScaled,
            input_in_interpolant_basis: false,
            inversion_tolerance: 1e-6,
            conversion_tolerance: 1e-8,
        }
    }
}

impl EnvelopeConfig {
    /// Default configuration for degree `max_degree` on `domain`.
    pub fn new(max_degree: usize, domain: Domain) -> Self {
        Self {
            max_degree,
            domain,
            ..Self::default()
        }
    }

    /// Set the number of variables.
    pub fn with_num_variables(mut self, n: usize) -> Self {
        self.num_variables = n;
        self
    }

    /// Enable or disable the weighted SOS primitive.
    pub fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Choose the multiplier of the weighted primitive.
    pub fn with_multiplier(mut self, policy: MultiplierPolicy) -> Self {
        self.multiplier = policy;
        self
    }

    /// Declare whether inputs are already in the interpolant basis.
    pub fn with_input_in_interpolant_basis(mut self, flag: bool) -> Self {
        self.input_in_interpolant_basis = flag;
        self
    }

    /// Set the reconstruction-error warning threshold.
    pub fn with_inversion_tolerance(mut self, tolerance: Real) -> Self {
        self.inversion_tolerance = tolerance;
        self
    }

    /// Set the accepted relative residual of the conversion solve.
    pub fn with_conversion_tolerance(mut self, tolerance: Real) -> Self {
        self.conversion_tolerance = tolerance;
        self
    }

    /// `L = d + 1`, the number of Chebyshev extrema of the half rule.
    pub fn num_half_nodes(&self) -> usize {
        self.max_degree + 1
    }

    /// `U = 2d + 1`, the interpolant basis dimension.
    pub fn basis_size(&self) -> usize {
        2 * self.max_degree + 1
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// A [`UsageError`] for more than one variable, degree `0`, or an invalid
    /// domain; a precondition error for non-positive tolerances.
    pub fn validate(&self) -> Result<()> {
        if self.num_variables != 1 {
            return Err(UsageError::UnsupportedVariableCount(self.num_variables).into());
        }
        if self.max_degree == 0 {
            return Err(UsageError::UnsupportedDegree(0).into());
        }
        self.domain.validate()?;
        envelope_core::ensure!(
            self.inversion_tolerance > 0.0 && self.conversion_tolerance > 0.0,
            "tolerances must be positive"
        );
        Ok(())
    }
}
