use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::branching::ValueSelector;
use crate::branching::VariableSelector;
use crate::engine::predicates::Predicate;

/// A [`Brancher`] which first selects a variable with its [`VariableSelector`] and then a value for
/// it with its [`ValueSelector`].
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<VariableSelect, ValueSelect> {
    variable_selector: VariableSelect,
    value_selector: ValueSelect,
}

impl<VariableSelect, ValueSelect> IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
        }
    }
}

impl<VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    fn next_decision(&mut self, context: &mut SelectionContext<'_>) -> Option<Predicate> {
        self.variable_selector
            .select_variable(context)
            .map(|variable| self.value_selector.select_value(context, variable))
    }
}
