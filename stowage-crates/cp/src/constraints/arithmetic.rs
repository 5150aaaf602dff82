use super::Constraint;
use crate::engine::variables::DomainId;
use crate::engine::variables::LinearTerm;
use crate::propagators::LinearLessOrEqualPropagator;
use crate::propagators::MinimumPropagator;
use crate::propagators::NotEqualPropagator;
use crate::propagators::TimesPropagator;

/// Creates the [`Constraint`] `\sum terms <= rhs`.
pub fn less_than_or_equals(terms: impl Into<Box<[LinearTerm]>>, rhs: i64) -> impl Constraint {
    LinearLessOrEqualPropagator::new(terms.into(), rhs)
}

/// Creates the [`Constraint`] `\sum terms < rhs`.
pub fn less_than(terms: impl Into<Box<[LinearTerm]>>, rhs: i64) -> impl Constraint {
    less_than_or_equals(terms, rhs - 1)
}

/// Creates the [`Constraint`] `\sum terms >= rhs`.
pub fn greater_than_or_equals(terms: impl Into<Box<[LinearTerm]>>, rhs: i64) -> impl Constraint {
    let negated = terms
        .into()
        .iter()
        .map(|&term| -term)
        .collect::<Box<[_]>>();
    less_than_or_equals(negated, -rhs)
}

/// Creates the [`Constraint`] `\sum terms > rhs`.
pub fn greater_than(terms: impl Into<Box<[LinearTerm]>>, rhs: i64) -> impl Constraint {
    greater_than_or_equals(terms, rhs + 1)
}

/// Creates the [`Constraint`] `\sum terms = rhs`.
pub fn equals(terms: impl Into<Box<[LinearTerm]>>, rhs: i64) -> impl Constraint {
    let terms: Box<[LinearTerm]> = terms.into();
    let negated = terms.iter().map(|&term| -term).collect::<Box<[_]>>();

    vec![
        LinearLessOrEqualPropagator::new(terms, rhs),
        LinearLessOrEqualPropagator::new(negated, -rhs),
    ]
}

/// Creates the [`Constraint`] `a != b`.
pub fn not_equals(a: DomainId, b: DomainId) -> impl Constraint {
    NotEqualPropagator::new(a, b)
}

/// Creates the [`Constraint`] `a * b = c` over non-negative `a` and `b`.
pub fn times(a: DomainId, b: DomainId, c: DomainId) -> impl Constraint {
    TimesPropagator::new(a, b, c)
}

/// Creates the [`Constraint`] `rhs = min(array)`.
pub fn minimum(array: impl Into<Box<[DomainId]>>, rhs: DomainId) -> impl Constraint {
    MinimumPropagator::new(array.into(), rhs)
}
