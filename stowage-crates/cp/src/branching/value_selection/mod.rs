mod in_domain_max;
mod in_domain_min;

pub use in_domain_max::InDomainMax;
pub use in_domain_min::InDomainMin;

use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// Selects the decision to make for an unfixed variable.
pub trait ValueSelector {
    fn select_value(
        &mut self,
        context: &SelectionContext<'_>,
        decision_variable: DomainId,
    ) -> Predicate;
}
