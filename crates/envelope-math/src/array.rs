//! Coefficient vectors.
//!
//! Polynomials (monomial or interpolant basis), quadrature weights, and the
//! stacked right-hand sides of the constraint system are all [`Array`]s, a
//! newtype over `nalgebra::DVector<f64>`. The instance builder works on
//! fixed-length slots, so the block helpers [`Array::segment`],
//! [`Array::set_segment`] and [`Array::concat`] carry most of the weight.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use envelope_core::Real;
use nalgebra::DVector;

/// Dense vector of reals.
#[derive(Debug, Clone, PartialEq)]
pub struct Array(DVector<Real>);

impl Array {
    /// `n` zeros.
    pub fn zeros(n: usize) -> Self {
        Self(DVector::zeros(n))
    }

    /// `n` copies of `value`.
    pub fn from_element(n: usize, value: Real) -> Self {
        Self(DVector::from_element(n, value))
    }

    /// Copy of `data`.
    pub fn from_slice(data: &[Real]) -> Self {
        Self(DVector::from_column_slice(data))
    }

    /// Take ownership of `data`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// `parts` laid end to end.
    pub fn concat(parts: &[&Array]) -> Self {
        Self::from_vec(parts.iter().flat_map(|p| p.iter().copied()).collect())
    }

    /// Length.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Whether the length is zero.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Contiguous view of the entries.
    pub fn as_slice(&self) -> &[Real] {
        self.0.as_slice()
    }

    /// The underlying nalgebra vector, for decompositions.
    pub fn inner(&self) -> &DVector<Real> {
        &self.0
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }

    /// Copy of the slot `[start, start + len)`.
    ///
    /// # Panics
    /// If the slot runs past the end.
    pub fn segment(&self, start: usize, len: usize) -> Self {
        Self(self.0.rows(start, len).clone_owned())
    }

    /// Overwrite the slot starting at `start` with `values`.
    ///
    /// # Panics
    /// If the slot runs past the end.
    pub fn set_segment(&mut self, start: usize, values: &Array) {
        self.0.rows_mut(start, values.size()).copy_from(&values.0);
    }

    /// Entries in reverse order.
    pub fn reversed(&self) -> Self {
        Self::from_vec(self.as_slice().iter().rev().copied().collect())
    }

    /// Inner product.
    pub fn dot(&self, other: &Array) -> Real {
        self.0.dot(&other.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> Real {
        self.0.norm()
    }

    /// Infinity norm; `0` when empty.
    pub fn max_abs(&self) -> Real {
        self.iter().fold(0.0, |m, x| m.max(x.abs()))
    }

    /// Sum of the entries.
    pub fn sum(&self) -> Real {
        self.0.sum()
    }

    /// Whether every entry is exactly `0.0`.
    pub fn is_zero(&self) -> bool {
        self.iter().all(|&x| x == 0.0)
    }

    /// `scalar · self`.
    pub fn scale(&self, scalar: Real) -> Self {
        Self(self.0.scale(scalar))
    }
}

impl From<DVector<Real>> for Array {
    fn from(v: DVector<Real>) -> Self {
        Self(v)
    }
}

impl Index<usize> for Array {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<usize> for Array {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        &mut self.0[i]
    }
}

macro_rules! elementwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for &Array {
            type Output = Array;
            fn $method(self, rhs: &Array) -> Array {
                Array(&self.0 $op &rhs.0)
            }
        }
    };
}

elementwise!(Add, add, +);
elementwise!(Sub, sub, -);

impl Mul<Real> for &Array {
    type Output = Array;
    fn mul(self, rhs: Real) -> Array {
        self.scale(rhs)
    }
}

impl Neg for &Array {
    type Output = Array;
    fn neg(self) -> Array {
        self.scale(-1.0)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn slots() {
        let mut a = Array::zeros(6);
        a.set_segment(2, &Array::from_slice(&[1.0, 2.0, 3.0]));
        assert_eq!(a.as_slice(), &[0.0, 0.0, 1.0, 2.0, 3.0, 0.0]);
        assert_eq!(a.segment(3, 2).as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn mirrored_concatenation() {
        let half = Array::from_slice(&[1.0, 2.0]);
        let mid = Array::from_slice(&[3.0]);
        let full = Array::concat(&[&half, &mid, &half.reversed()]);
        assert_eq!(full.as_slice(), &[1.0, 2.0, 3.0, 2.0, 1.0]);
        assert_eq!(full.to_string(), "[1, 2, 3, 2, 1]");
    }

    #[test]
    fn norms() {
        let a = Array::from_slice(&[3.0, -4.0]);
        assert_abs_diff_eq!(a.norm(), 5.0, epsilon = 1e-14);
        assert_eq!(a.max_abs(), 4.0);
        assert_eq!(Array::zeros(0).max_abs(), 0.0);
    }

    #[test]
    fn arithmetic() {
        let p = Array::from_slice(&[1.0, 2.0, 3.0]);
        let q = Array::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!((&p + &q).as_slice(), &[5.0, 7.0, 9.0]);
        assert_eq!((&q - &p).as_slice(), &[3.0, 3.0, 3.0]);
        assert_eq!((&p * 2.0).as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!((-&p)[2], -3.0);
        assert_abs_diff_eq!(p.dot(&q), 32.0, epsilon = 1e-14);
    }

    #[test]
    fn exact_zero() {
        assert!(Array::zeros(3).is_zero());
        assert!(!Array::from_slice(&[0.0, 1e-300]).is_zero());
    }
}
