mod first_fail;
mod input_order;

pub use first_fail::FirstFail;
pub use input_order::InputOrder;

use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// Selects the next variable to branch on, or [`None`] if all its variables are fixed.
pub trait VariableSelector {
    fn select_variable(&mut self, context: &SelectionContext<'_>) -> Option<DomainId>;
}
