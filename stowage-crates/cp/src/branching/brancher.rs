use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// A trait for defining a branching strategy.
///
/// The returned decision must shrink the domain of an unfixed variable. Returning [`None`] signals
/// that every variable under consideration is fixed; the solver then reports a solution, so a
/// brancher must cover all variables of the model.
pub trait Brancher {
    /// Returns the next decision, or [`None`] if all variables under consideration are fixed.
    fn next_decision(&mut self, context: &mut SelectionContext<'_>) -> Option<Predicate>;
}
