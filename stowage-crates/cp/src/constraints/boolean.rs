use itertools::Itertools;

use super::Constraint;
use crate::engine::variables::Literal;
use crate::propagators::ClausePropagator;

/// Creates the [`Constraint`] that at least one of the `literals` is true.
pub fn clause(literals: impl Into<Box<[Literal]>>) -> impl Constraint {
    ClausePropagator::new(literals.into())
}

/// Creates the [`Constraint`] that at most one of the `literals` is true, as pairwise clauses.
pub fn at_most_one(literals: impl Into<Vec<Literal>>) -> impl Constraint {
    literals
        .into()
        .into_iter()
        .tuple_combinations()
        .map(|(a, b)| ClausePropagator::new(vec![!a, !b].into()))
        .collect::<Vec<_>>()
}

/// Creates the [`Constraint`] that exactly one of the `literals` is true.
pub fn exactly_one(literals: impl Into<Vec<Literal>>) -> impl Constraint {
    let literals = literals.into();

    let mut clauses = literals
        .iter()
        .copied()
        .tuple_combinations()
        .map(|(a, b)| ClausePropagator::new(vec![!a, !b].into()))
        .collect::<Vec<_>>();
    clauses.push(ClausePropagator::new(literals.into()));

    clauses
}
