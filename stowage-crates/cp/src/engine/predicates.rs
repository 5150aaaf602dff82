use std::fmt::Display;

use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateType {
    LowerBound,
    UpperBound,
    Equal,
    NotEqual,
}

/// An atomic constraint `[domain op value]`. Search decisions are predicates; refuting a decision
/// posts its negation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub domain: DomainId,
    pub predicate_type: PredicateType,
    pub value: i32,
}

impl Predicate {
    /// `[domain >= value]`
    pub fn lower_bound(domain: DomainId, value: i32) -> Self {
        Predicate {
            domain,
            predicate_type: PredicateType::LowerBound,
            value,
        }
    }

    /// `[domain <= value]`
    pub fn upper_bound(domain: DomainId, value: i32) -> Self {
        Predicate {
            domain,
            predicate_type: PredicateType::UpperBound,
            value,
        }
    }

    /// `[domain == value]`
    pub fn equal(domain: DomainId, value: i32) -> Self {
        Predicate {
            domain,
            predicate_type: PredicateType::Equal,
            value,
        }
    }

    /// `[domain != value]`
    pub fn not_equal(domain: DomainId, value: i32) -> Self {
        Predicate {
            domain,
            predicate_type: PredicateType::NotEqual,
            value,
        }
    }

    /// The predicate which is true exactly when `literal` is true.
    pub fn from_literal(literal: Literal) -> Self {
        Predicate::equal(literal.domain(), literal.true_value())
    }

    pub fn negate(self) -> Self {
        match self.predicate_type {
            PredicateType::LowerBound => Predicate::upper_bound(self.domain, self.value - 1),
            PredicateType::UpperBound => Predicate::lower_bound(self.domain, self.value + 1),
            PredicateType::Equal => Predicate::not_equal(self.domain, self.value),
            PredicateType::NotEqual => Predicate::equal(self.domain, self.value),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self.predicate_type {
            PredicateType::LowerBound => ">=",
            PredicateType::UpperBound => "<=",
            PredicateType::Equal => "==",
            PredicateType::NotEqual => "!=",
        };

        write!(f, "[{} {operator} {}]", self.domain, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negating_bounds_shifts_value() {
        let domain = DomainId::new(0);

        assert_eq!(
            Predicate::upper_bound(domain, 4),
            Predicate::lower_bound(domain, 5).negate()
        );
        assert_eq!(
            Predicate::lower_bound(domain, 5),
            Predicate::upper_bound(domain, 4).negate()
        );
    }

    #[test]
    fn negation_is_an_involution() {
        let predicate = Predicate::equal(DomainId::new(2), 9);

        assert_eq!(predicate, predicate.negate().negate());
    }

    #[test]
    fn display_shows_operator() {
        let predicate = Predicate::not_equal(DomainId::new(1), 3);

        assert_eq!("[x1 != 3]", predicate.to_string());
    }
}
