//! # envelope-sos
//!
//! Builds the conic instance whose solution is the largest lower bound, in
//! integral, of a set of univariate polynomials on an interval:
//!
//! - [`PolynomialRegistry`] holds the polynomials in the interpolant basis;
//! - [`InstanceBuilder`] assembles the objective, the equality system and the
//!   [`Barrier`] tree, then dualises the system;
//! - a [`ConicSolver`] (external) solves the [`Instance`];
//! - [`SolutionProjector`] reads the envelope back out of the [`Solution`].
//!
//! [`EnvelopeProblem`] ties the pieces together.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// The barrier tree of SOS cones.
pub mod barrier;

/// Instance assembly.
pub mod builder;

/// Problem configuration.
pub mod config;

/// Linear systems and their duals.
pub mod constraints;

/// The certification interval.
pub mod domain;

/// Conic instance, solution, and solver trait.
pub mod instance;

/// The top-level problem object.
pub mod problem;

/// Reading the envelope from a solution.
pub mod projector;

/// Registered polynomials.
pub mod registry;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use barrier::{Barrier, SosPrimitive};
pub use builder::InstanceBuilder;
pub use config::{EnvelopeConfig, MultiplierPolicy};
pub use constraints::Constraints;
pub use domain::Domain;
pub use instance::{ConicSolver, Instance, Solution};
pub use problem::EnvelopeProblem;
pub use projector::{EnvelopeSample, SolutionProjector};
pub use registry::PolynomialRegistry;
