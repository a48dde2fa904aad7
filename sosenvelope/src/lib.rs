//! # sosenvelope
//!
//! Lower envelope of a set of univariate polynomials on an interval,
//! formulated as a sum-of-squares conic instance for an external
//! interior-point solver.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `envelope-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use sosenvelope::core::Diagnostics;
//! use sosenvelope::math::Array;
//! use sosenvelope::sos::{Domain, EnvelopeConfig, EnvelopeProblem};
//!
//! // bound 1 − x and 1 + x from below on [−1, 1] with a degree-2 certificate
//! let config = EnvelopeConfig::new(1, Domain::reference());
//! let mut problem = EnvelopeProblem::new(config, Diagnostics::default()).unwrap();
//! problem.add_polynomial(&Array::from_slice(&[1.0, -1.0, 0.0])).unwrap();
//! problem.add_polynomial(&Array::from_slice(&[1.0, 1.0, 0.0])).unwrap();
//!
//! let instance = problem.build_instance().unwrap();
//! assert_eq!(instance.dim(), 6);
//! assert_eq!(instance.barrier().primitives().len(), 3);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, error definitions, and the diagnostics sink.
pub use envelope_core as core;

/// Arrays, matrices, interpolant basis, and quadrature.
pub use envelope_math as math;

/// Registry, barrier tree, instance assembly, and projection.
pub use envelope_sos as sos;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reexports_are_reachable() {
        let cc = math::ClenshawCurtis::new(2, -1.0, 1.0).unwrap();
        assert_abs_diff_eq!(cc.weights().sum(), 2.0, epsilon = 1e-14);
        let cfg = sos::EnvelopeConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        let _: core::Real = 0.0;
    }
}
