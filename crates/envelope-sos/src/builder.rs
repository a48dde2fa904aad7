//! Assembly of the conic instance from the registered polynomials.
//!
//! With `N` polynomials `P₀ … P_{N−1}` of `U` interpolant coefficients each,
//! the primal has one slot of `U` variables per polynomial:
//!
//! ```text
//! min  w·X
//! s.t. −X + Y_i = P_i − P₀      i = 1 … N−1
//!      X ∈ SOS,  Y_i ∈ SOS (+ weighted SOS)
//! ```
//!
//! where `w` are the quadrature weights and `X` is the gap between `P₀` and
//! the envelope. Minimising the integrated gap pushes the envelope up.

use std::time::Instant;

use envelope_core::{
    errors::{Error, Result},
    Diagnostics, UsageError,
};
use envelope_math::{Array, Matrix};

use crate::{
    barrier::{Barrier, SosPrimitive},
    config::{EnvelopeConfig, MultiplierPolicy},
    constraints::Constraints,
    instance::Instance,
    registry::PolynomialRegistry,
};

/// Builds an [`Instance`] from a registry and a quadrature objective.
#[derive(Debug, Clone, Copy)]
pub struct InstanceBuilder<'a> {
    config: &'a EnvelopeConfig,
    objective: &'a Array,
}

impl<'a> InstanceBuilder<'a> {
    /// `objective` is the negated quadrature weight vector of length `U`.
    pub fn new(config: &'a EnvelopeConfig, objective: &'a Array) -> Self {
        Self { config, objective }
    }

    /// Linear objective over all `N·U` variables: the quadrature weights
    /// `−objective` on slot 0, zero elsewhere.
    pub fn objective_vector(&self, num_slots: usize) -> Array {
        let u = self.objective.size();
        let mut c = Array::zeros(num_slots * u);
        c.set_segment(0, &-self.objective);
        c
    }

    /// The primal equality system `A z = b` with objective `c`.
    pub fn primal(&self, registry: &PolynomialRegistry) -> Result<Constraints> {
        let n = Self::check_count(registry)?;
        let u = registry.size();
        if self.objective.size() != u {
            return Err(Error::DimensionMismatch {
                expected: u,
                actual: self.objective.size(),
            });
        }
        let p0 = registry
            .reference()
            .ok_or(Error::Usage(UsageError::EmptyInstance))?;

        let mut a = Matrix::zeros((n - 1) * u, n * u);
        let mut b = Array::zeros((n - 1) * u);
        for (i, p) in registry.polynomials().iter().enumerate().skip(1) {
            let row = (i - 1) * u;
            a.set_scaled_identity_block(row, 0, u, -1.0);
            a.set_scaled_identity_block(row, i * u, u, 1.0);
            b.set_segment(row, &(p - p0));
        }
        Constraints::new(a, b, self.objective_vector(n))
    }

    /// One cone factor per slot.
    ///
    /// Slot 0 is a plain SOS cone. Every other slot is a sum of a plain SOS
    /// cone and, in weighted mode, an SOS cone multiplied by the configured
    /// quadratic.
    pub fn barrier(&self, num_slots: usize) -> Result<Barrier> {
        let degree = self.config.max_degree;
        let domain = self.config.domain;
        let dim = self.config.basis_size();
        let multiplier = self.config.multiplier.multiplier(&domain);

        let mut product = Barrier::product();
        product.combine(SosPrimitive::new(degree, domain).into())?;
        for _ in 1..num_slots {
            let mut slot = Barrier::sum(dim);
            slot.combine(SosPrimitive::new(degree, domain).into())?;
            if self.config.weighted {
                slot.combine(SosPrimitive::weighted(degree, domain, multiplier.clone()).into())?;
            }
            product.combine(slot)?;
        }
        Ok(product)
    }

    /// Assemble the primal, its barrier, and the dual system.
    ///
    /// # Errors
    /// [`UsageError::EmptyInstance`] with no polynomial,
    /// [`UsageError::TrivialInstance`] with only the reference one.
    pub fn build(
        &self,
        registry: &PolynomialRegistry,
        diagnostics: &mut Diagnostics,
    ) -> Result<Instance> {
        let n = Self::check_count(registry)?;
        if registry.size() != self.config.basis_size() {
            return Err(Error::DimensionMismatch {
                expected: self.config.basis_size(),
                actual: registry.size(),
            });
        }
        if self.config.weighted
            && self.config.multiplier == MultiplierPolicy::Canonical
            && !self.config.domain.is_reference()
        {
            log::warn!(
                target: diagnostics.target(),
                "canonical multiplier 1 - x^2 used on [{}, {}]",
                self.config.domain.lo(),
                self.config.domain.hi()
            );
        }

        let primal = self.primal(registry)?;
        let barrier = self.barrier(n)?;
        diagnostics.info(format_args!("Primal SOS instance created."));
        if diagnostics.trace_enabled() {
            diagnostics.trace(format_args!("{primal}"));
            diagnostics.trace(format_args!("{barrier}"));
        }

        let start = Instant::now();
        let dual = primal.dual_system()?;
        diagnostics.timing("Dualisation", start.elapsed());
        diagnostics.info(format_args!("Dual formulation created."));
        if diagnostics.trace_enabled() {
            diagnostics.trace(format_args!("{dual}"));
        }

        Ok(Instance::new(dual, primal, barrier, n, registry.size()))
    }

    fn check_count(registry: &PolynomialRegistry) -> Result<usize> {
        match registry.len() {
            0 => Err(UsageError::EmptyInstance.into()),
            1 => Err(UsageError::TrivialInstance.into()),
            n => Ok(n),
        }
    }
}
