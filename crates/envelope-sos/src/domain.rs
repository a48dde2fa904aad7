//! The closed interval the envelope is certified on.

use envelope_core::{ensure, errors::Result, Real, UsageError};
use envelope_math::{comparison::close_enough, Array};

/// A closed real interval `[lo, hi]` with `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    lo: Real,
    hi: Real,
}

impl Default for Domain {
    fn default() -> Self {
        Self::reference()
    }
}

impl Domain {
    /// Create `[lo, hi]`.
    ///
    /// # Errors
    /// [`UsageError::InvalidDomain`] unless both ends are finite and `lo < hi`.
    pub fn new(lo: Real, hi: Real) -> Result<Self> {
        let domain = Self { lo, hi };
        domain.validate()?;
        Ok(domain)
    }

    /// The reference interval `[−1, 1]`.
    pub fn reference() -> Self {
        Self { lo: -1.0, hi: 1.0 }
    }

    /// Re-check the invariant (deserialised values bypass [`Domain::new`]).
    pub fn validate(&self) -> Result<()> {
        if self.lo.is_finite() && self.hi.is_finite() && self.lo < self.hi {
            Ok(())
        } else {
            Err(UsageError::InvalidDomain {
                lo: self.lo,
                hi: self.hi,
            }
            .into())
        }
    }

    /// Lower bound.
    pub fn lo(&self) -> Real {
        self.lo
    }

    /// Upper bound.
    pub fn hi(&self) -> Real {
        self.hi
    }

    /// `hi − lo`.
    pub fn length(&self) -> Real {
        self.hi - self.lo
    }

    /// Whether this is `[−1, 1]`.
    pub fn is_reference(&self) -> bool {
        close_enough(self.lo, -1.0, 4) && close_enough(self.hi, 1.0, 4)
    }

    /// `n` evenly spaced points from `lo` to `hi` inclusive.
    ///
    /// # Errors
    /// A precondition error if `n < 2`, which cannot reach both ends.
    pub fn grid(&self, n: usize) -> Result<Vec<Real>> {
        ensure!(n >= 2, "a grid over [{}, {}] needs at least 2 points, got {n}", self.lo, self.hi);
        let step = self.length() / (n - 1) as Real;
        Ok((0..n).map(|i| self.lo + i as Real * step).collect())
    }

    /// Monomial coefficients of `(x − lo)(hi − x)`, the quadratic that is
    /// nonnegative exactly on this interval and vanishes at its ends.
    pub fn endpoint_multiplier(&self) -> Array {
        Array::from_slice(&[-self.lo * self.hi, self.lo + self.hi, -1.0])
    }
}
