//! Floating-point comparisons.

use envelope_core::Real;

/// `|a − b| ≤ n · ε · max(|a|, |b|)` with `ε` the machine epsilon.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = a.abs().max(b.abs()) * Real::EPSILON * Real::from(n);
    (a - b).abs() <= eps
}
