//! The top-level lower-envelope problem.
//!
//! An [`EnvelopeProblem`] owns everything that lives across calls: the
//! configuration, the quadrature objective, the interpolant basis (built on
//! first need), the polynomial registry, and the diagnostics sink. Calls
//! follow the order
//!
//! ```text
//! new → register* → build_instance → (external solve) → project
//! ```

use std::time::Instant;

use envelope_core::{
    errors::{Error, Result},
    Diagnostics, Real,
};
use envelope_math::{Array, ChebyshevBasis, ClenshawCurtis};

use crate::{
    builder::InstanceBuilder,
    config::EnvelopeConfig,
    domain::Domain,
    instance::{ConicSolver, Instance, Solution},
    projector::{EnvelopeSample, SolutionProjector},
    registry::PolynomialRegistry,
};

/// Lower envelope of univariate polynomials as a conic instance.
///
/// # Example
/// ```
/// use envelope_core::Diagnostics;
/// use envelope_math::Array;
/// use envelope_sos::{Domain, EnvelopeConfig, EnvelopeProblem};
///
/// let config = EnvelopeConfig::new(1, Domain::reference());
/// let mut problem = EnvelopeProblem::new(config, Diagnostics::default()).unwrap();
/// problem.add_polynomial(&Array::from_slice(&[0.0, 0.0, 0.0])).unwrap();
/// problem.add_polynomial(&Array::from_slice(&[0.0, 0.0, 1.0])).unwrap();
///
/// let instance = problem.build_instance().unwrap();
/// assert_eq!(instance.num_slots(), 2);
/// assert_eq!(instance.primal().a.rows(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeProblem {
    config: EnvelopeConfig,
    basis: Option<ChebyshevBasis>,
    quadrature: ClenshawCurtis,
    objective: Array,
    registry: PolynomialRegistry,
    diagnostics: Diagnostics,
}

impl EnvelopeProblem {
    /// Validate `config` and precompute the quadrature objective.
    ///
    /// The interpolant basis is built here too unless inputs are declared to
    /// be in the interpolant basis already, in which case it is deferred
    /// until something needs it.
    pub fn new(config: EnvelopeConfig, diagnostics: Diagnostics) -> Result<Self> {
        config.validate()?;
        let domain = config.domain;
        let quadrature = ClenshawCurtis::new(config.max_degree, domain.lo(), domain.hi())?;
        let objective = quadrature.objective();
        let registry = PolynomialRegistry::new(
            config.basis_size(),
            config.inversion_tolerance,
            config.conversion_tolerance,
        );
        diagnostics.debug(format_args!(
            "envelope problem of degree {} on [{}, {}]",
            config.max_degree,
            domain.lo(),
            domain.hi()
        ));

        let mut problem = Self {
            config,
            basis: None,
            quadrature,
            objective,
            registry,
            diagnostics,
        };
        if !problem.config.input_in_interpolant_basis {
            problem.basis()?;
        }
        Ok(problem)
    }

    /// The configuration.
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// The domain.
    pub fn domain(&self) -> Domain {
        self.config.domain
    }

    /// The interpolant basis, building and caching it on first call.
    pub fn basis(&mut self) -> Result<&ChebyshevBasis> {
        if self.basis.is_none() {
            let start = Instant::now();
            let domain = self.config.domain;
            let basis = ChebyshevBasis::new(self.config.basis_size(), domain.lo(), domain.hi())?;
            self.diagnostics
                .timing("Construction of interpolant basis", start.elapsed());
            self.basis = Some(basis);
        }
        self.basis
            .as_ref()
            .ok_or_else(|| Error::Runtime("interpolant basis unavailable".into()))
    }

    /// The basis if it has been built.
    pub fn cached_basis(&self) -> Option<&ChebyshevBasis> {
        self.basis.as_ref()
    }

    /// Quadrature rule on the domain.
    pub fn quadrature(&self) -> &ClenshawCurtis {
        &self.quadrature
    }

    /// Negated quadrature weights; the instance builder flips them back so
    /// slot 0 minimises the integrated gap.
    pub fn objective(&self) -> &Array {
        &self.objective
    }

    /// The registered polynomials.
    pub fn registry(&self) -> &PolynomialRegistry {
        &self.registry
    }

    /// The diagnostics sink.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Mutable access to the diagnostics sink, e.g. to clear it.
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Register a polynomial; the first one becomes the reference `P₀`.
    ///
    /// With `already_in_interpolant_basis` the coefficients are node values;
    /// otherwise monomial coefficients, lowest degree first.
    pub fn register(&mut self, polynomial: &Array, already_in_interpolant_basis: bool) -> Result<usize> {
        if !already_in_interpolant_basis {
            self.basis()?;
        }
        self.registry.register(
            polynomial,
            already_in_interpolant_basis,
            self.basis.as_ref(),
            &mut self.diagnostics,
        )
    }

    /// Register a polynomial in the configured input form.
    pub fn add_polynomial(&mut self, polynomial: &Array) -> Result<usize> {
        self.register(polynomial, self.config.input_in_interpolant_basis)
    }

    /// The zero polynomial in the interpolant basis.
    pub fn zero_polynomial(&self) -> Array {
        self.registry.zero_polynomial()
    }

    /// Assemble the instance from the current registry.
    pub fn build_instance(&mut self) -> Result<Instance> {
        InstanceBuilder::new(&self.config, &self.objective)
            .build(&self.registry, &mut self.diagnostics)
    }

    /// The envelope polynomial read from `solution`.
    ///
    /// Returned in monomial coefficients when any polynomial was registered
    /// that way, in the interpolant basis otherwise.
    pub fn project(&mut self, solution: &Solution) -> Result<Array> {
        if self.registry.has_monomial_inputs() {
            self.basis()?;
        }
        self.projector().project(solution)
    }

    /// `∫ E` over the domain for the envelope in `solution`.
    pub fn envelope_integral(&self, solution: &Solution) -> Result<Real> {
        self.projector().integral(solution, &self.quadrature)
    }

    /// Compare the envelope in `solution` with every registered polynomial
    /// on `points` evenly spaced points.
    pub fn sample(&mut self, solution: &Solution, points: usize) -> Result<EnvelopeSample> {
        self.basis()?;
        self.projector().sample(solution, points)
    }

    /// Build the instance, hand it to `solver`, and project the result.
    pub fn solve_with(&mut self, solver: &dyn ConicSolver) -> Result<Array> {
        let instance = self.build_instance()?;
        let start = Instant::now();
        let solution = solver.solve(&instance)?;
        self.diagnostics.timing("Conic solve", start.elapsed());
        solution.check_against(&instance)?;
        self.project(&solution)
    }

    fn projector(&self) -> SolutionProjector<'_> {
        SolutionProjector::new(&self.registry, self.basis.as_ref(), self.config.domain)
    }
}
