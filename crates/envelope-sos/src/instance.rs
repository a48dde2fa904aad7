//! The conic instance handed to an external interior-point solver, and the
//! seam through which solvers plug in.

use std::fmt;

use envelope_core::{
    errors::{Error, Result},
    Real,
};
use envelope_math::Array;

use crate::{barrier::Barrier, constraints::Constraints};

/// A barrier tree together with the linear data of one envelope problem.
///
/// `constraints` is the dual system the solver works on; `primal` is the
/// system it was derived from, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    constraints: Constraints,
    primal: Constraints,
    barrier: Barrier,
    num_slots: usize,
    slot_size: usize,
}

impl Instance {
    pub(crate) fn new(
        constraints: Constraints,
        primal: Constraints,
        barrier: Barrier,
        num_slots: usize,
        slot_size: usize,
    ) -> Self {
        Self {
            constraints,
            primal,
            barrier,
            num_slots,
            slot_size,
        }
    }

    /// Linear data in the form the solver consumes (dual).
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The primal `min c·z, A z = b` before dualisation.
    pub fn primal(&self) -> &Constraints {
        &self.primal
    }

    /// The cone the solver's slack variable must lie in.
    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    /// Number of slots `N`, one per registered polynomial.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Coefficients per slot `U`.
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Length `N·U` of the solver's `s` vector.
    pub fn dim(&self) -> usize {
        self.num_slots * self.slot_size
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Instance: {} slots of {} coefficients",
            self.num_slots, self.slot_size
        )?;
        write!(f, "{}", self.barrier)?;
        write!(f, "{}", self.constraints)
    }
}

/// Output of a conic solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Multipliers of the equality rows.
    pub x: Array,
    /// Slack vector in the cone; its first block is the envelope gap.
    pub s: Array,
}

impl Solution {
    /// Bundle a solver output.
    pub fn new(x: Array, s: Array) -> Self {
        Self { x, s }
    }

    /// Check that `s` has the length `instance` expects.
    pub fn check_against(&self, instance: &Instance) -> Result<()> {
        if self.s.size() != instance.dim() {
            return Err(Error::DimensionMismatch {
                expected: instance.dim(),
                actual: self.s.size(),
            });
        }
        Ok(())
    }

    /// Objective value `c·s` under the instance's dual system.
    pub fn objective_value(&self, instance: &Instance) -> Real {
        instance.constraints().objective_value(&self.s)
    }
}

/// An interior-point method able to solve an [`Instance`].
///
/// Implementations live outside this crate.
pub trait ConicSolver: fmt::Debug {
    /// Solve `instance` and return its primal/slack pair.
    fn solve(&self, instance: &Instance) -> Result<Solution>;
}
