use std::ops::Neg;
use std::ops::Not;

use crate::containers::DenseId;

/// An integer variable, identified by its index in the [`crate::Solver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId {
    pub(crate) id: u32,
}

impl DomainId {
    pub(crate) fn new(id: u32) -> Self {
        DomainId { id }
    }

    /// The term `scale * self`, for use in linear constraints.
    pub fn scaled(self, scale: i64) -> LinearTerm {
        LinearTerm {
            scale,
            domain: self,
        }
    }
}

impl DenseId for DomainId {
    fn position(self) -> usize {
        self.id as usize
    }

    fn at_position(position: usize) -> Self {
        DomainId::new(position as u32)
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// A Boolean view on a 0-1 integer variable: a positive literal is true when its domain is
/// assigned 1, a negative literal when its domain is assigned 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    domain: DomainId,
    positive: bool,
}

impl Literal {
    pub(crate) fn new(domain: DomainId) -> Self {
        Literal {
            domain,
            positive: true,
        }
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// The value the underlying domain takes when this literal is true.
    pub(crate) fn true_value(&self) -> i32 {
        if self.positive {
            1
        } else {
            0
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            domain: self.domain,
            positive: !self.positive,
        }
    }
}

/// The term `scale * domain` of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearTerm {
    pub scale: i64,
    pub domain: DomainId,
}

impl From<DomainId> for LinearTerm {
    fn from(domain: DomainId) -> Self {
        domain.scaled(1)
    }
}

impl Neg for LinearTerm {
    type Output = LinearTerm;

    fn neg(self) -> Self::Output {
        LinearTerm {
            scale: -self.scale,
            domain: self.domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_negation_is_identity() {
        let literal = Literal::new(DomainId::new(3));

        assert_eq!(literal, !!literal);
        assert_eq!(0, (!literal).true_value());
        assert_eq!(1, literal.true_value());
    }

    #[test]
    fn negated_term_flips_scale() {
        let term = DomainId::new(0).scaled(4);

        assert_eq!(-4, (-term).scale);
    }
}
