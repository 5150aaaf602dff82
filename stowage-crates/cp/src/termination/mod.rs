//! Conditions under which a packing search gives up before it has found a packing or proven that
//! none exists. The solver then reports [`crate::results::SatisfactionResult::Unknown`].

mod combinator;
mod decision_budget;
mod indefinite;
mod interrupt;
mod time_budget;

pub use combinator::Combinator;
pub use decision_budget::DecisionBudget;
pub use indefinite::Indefinite;
pub use interrupt::Interrupt;
pub use time_budget::TimeBudget;

/// Polled by the solver before every decision.
pub trait TerminationCondition {
    fn should_stop(&mut self) -> bool;

    /// Called after each branching decision.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(condition) => condition.should_stop(),
            None => false,
        }
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made()
        }
    }
}
