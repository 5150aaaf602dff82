use crate::branching::SelectionContext;
use crate::branching::ValueSelector;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// [`ValueSelector`] which chooses to assign the lower bound of the domain.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMin;

impl ValueSelector for InDomainMin {
    fn select_value(
        &mut self,
        context: &SelectionContext<'_>,
        decision_variable: DomainId,
    ) -> Predicate {
        Predicate::upper_bound(decision_variable, context.lower_bound(decision_variable))
    }
}
