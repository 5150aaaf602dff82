use crate::branching::SelectionContext;
use crate::branching::ValueSelector;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// [`ValueSelector`] which chooses to assign the upper bound of the domain.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMax;

impl ValueSelector for InDomainMax {
    fn select_value(
        &mut self,
        context: &SelectionContext<'_>,
        decision_variable: DomainId,
    ) -> Predicate {
        Predicate::lower_bound(decision_variable, context.upper_bound(decision_variable))
    }
}
