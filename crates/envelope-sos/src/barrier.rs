//! Composite barrier tree handed to the interior-point solver.
//!
//! The tree has three node kinds:
//!
//! - [`Barrier::Product`]: independent cone factors on consecutive
//!   coordinate blocks;
//! - [`Barrier::Sum`]: a direct sum of sub-cones that all act on the *same*
//!   coordinate block;
//! - [`Barrier::Sos`]: the elementary SOS cone of univariate polynomials of
//!   degree `2d` on an interval, optionally weighted by a fixed multiplier.
//!
//! Only the shape is modelled here. Membership tests, gradients and Hessians
//! of the primitives belong to the solver.

use std::fmt;

use envelope_core::{errors::Result, Error};
use envelope_math::Array;

use crate::domain::Domain;

/// The elementary SOS cone of a single coordinate block.
#[derive(Debug, Clone, PartialEq)]
pub struct SosPrimitive {
    degree: usize,
    domain: Domain,
    weight: Option<Array>,
}

impl SosPrimitive {
    /// Plain SOS cone of degree `degree` on `domain`.
    pub fn new(degree: usize, domain: Domain) -> Self {
        Self {
            degree,
            domain,
            weight: None,
        }
    }

    /// SOS cone whose certificate is multiplied by the polynomial `weight`
    /// (monomial coefficients).
    pub fn weighted(degree: usize, domain: Domain, weight: Array) -> Self {
        Self {
            degree,
            domain,
            weight: Some(weight),
        }
    }

    /// Certificate degree `d`.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Interval the cone certifies nonnegativity on.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Multiplier polynomial, if weighted.
    pub fn weight(&self) -> Option<&Array> {
        self.weight.as_ref()
    }

    /// Coordinate dimension `2d + 1`.
    pub fn dim(&self) -> usize {
        2 * self.degree + 1
    }
}

/// A node of the barrier tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Barrier {
    /// Cartesian product of factors over consecutive blocks.
    Product(Vec<Barrier>),
    /// Direct sum of cones sharing one block of dimension `dim`.
    Sum {
        /// Block dimension shared by every term.
        dim: usize,
        /// Summed cones.
        terms: Vec<Barrier>,
    },
    /// Elementary SOS cone.
    Sos(SosPrimitive),
}

impl Barrier {
    /// An empty product.
    pub fn product() -> Self {
        Self::Product(Vec::new())
    }

    /// An empty sum over a block of dimension `dim`.
    pub fn sum(dim: usize) -> Self {
        Self::Sum {
            dim,
            terms: Vec::new(),
        }
    }

    /// Add `child` to this node.
    ///
    /// # Errors
    /// - a `DimensionMismatch` when a sum term does not act on the sum's block;
    /// - a precondition error when combining into an SOS leaf.
    pub fn combine(&mut self, child: Barrier) -> Result<()> {
        match self {
            Self::Product(factors) => {
                factors.push(child);
                Ok(())
            }
            Self::Sum { dim, terms } => {
                if child.dim() != *dim {
                    return Err(Error::DimensionMismatch {
                        expected: *dim,
                        actual: child.dim(),
                    });
                }
                terms.push(child);
                Ok(())
            }
            Self::Sos(_) => Err(Error::Precondition(
                "an SOS primitive is a leaf and cannot be combined".into(),
            )),
        }
    }

    /// Number of coordinates this barrier acts on.
    pub fn dim(&self) -> usize {
        match self {
            Self::Product(factors) => factors.iter().map(Barrier::dim).sum(),
            Self::Sum { dim, .. } => *dim,
            Self::Sos(p) => p.dim(),
        }
    }

    /// Children of an inner node (empty for a leaf).
    pub fn children(&self) -> &[Barrier] {
        match self {
            Self::Product(factors) => factors.as_slice(),
            Self::Sum { terms, .. } => terms.as_slice(),
            Self::Sos(_) => &[],
        }
    }

    /// All SOS leaves in depth-first order.
    pub fn primitives(&self) -> Vec<&SosPrimitive> {
        let mut out = Vec::new();
        self.collect_primitives(&mut out);
        out
    }

    fn collect_primitives<'a>(&'a self, out: &mut Vec<&'a SosPrimitive>) {
        match self {
            Self::Sos(p) => out.push(p),
            _ => self
                .children()
                .iter()
                .for_each(|c| c.collect_primitives(out)),
        }
    }

    /// Start offset of every factor of a product; `[0]` for other nodes.
    pub fn block_offsets(&self) -> Vec<usize> {
        match self {
            Self::Product(factors) => factors
                .iter()
                .scan(0, |offset, f| {
                    let start = *offset;
                    *offset += f.dim();
                    Some(start)
                })
                .collect(),
            _ => vec![0],
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Self::Product(factors) => {
                writeln!(f, "{pad}Product (dim {})", self.dim())?;
                factors.iter().try_for_each(|c| c.fmt_indented(f, depth + 1))
            }
            Self::Sum { dim, terms } => {
                writeln!(f, "{pad}Sum (dim {dim})")?;
                terms.iter().try_for_each(|c| c.fmt_indented(f, depth + 1))
            }
            Self::Sos(p) => match p.weight() {
                Some(w) => writeln!(f, "{pad}SOS (degree {}, weight {w})", p.degree()),
                None => writeln!(f, "{pad}SOS (degree {})", p.degree()),
            },
        }
    }
}

impl From<SosPrimitive> for Barrier {
    fn from(p: SosPrimitive) -> Self {
        Self::Sos(p)
    }
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sos(d: usize) -> Barrier {
        SosPrimitive::new(d, Domain::reference()).into()
    }

    #[test]
    fn product_dimension_is_sum_of_factors() {
        let mut p = Barrier::product();
        p.combine(sos(2)).unwrap();
        let mut s = Barrier::sum(5);
        s.combine(sos(2)).unwrap();
        s.combine(
            SosPrimitive::weighted(2, Domain::reference(), Array::from_slice(&[1.0, 0.0, -1.0]))
                .into(),
        )
        .unwrap();
        p.combine(s).unwrap();
        assert_eq!(p.dim(), 10);
        assert_eq!(p.block_offsets(), vec![0, 5]);
        assert_eq!(p.primitives().len(), 3);
        assert_eq!(p.primitives()[2].weight().unwrap()[2], -1.0);
    }

    #[test]
    fn sum_rejects_mismatched_term() {
        let mut s = Barrier::sum(5);
        assert_eq!(
            s.combine(sos(3)),
            Err(Error::DimensionMismatch {
                expected: 5,
                actual: 7
            })
        );
        assert!(s.children().is_empty());
    }

    #[test]
    fn leaf_cannot_be_combined() {
        let mut leaf = sos(1);
        assert!(matches!(leaf.combine(sos(1)), Err(Error::Precondition(_))));
    }

    #[test]
    fn display_shows_tree() {
        let mut p = Barrier::product();
        p.combine(sos(1)).unwrap();
        let text = p.to_string();
        assert!(text.starts_with("Product (dim 3)"));
        assert!(text.contains("  SOS (degree 1)"));
    }
}
