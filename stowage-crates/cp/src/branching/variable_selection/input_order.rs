use log::warn;

use crate::branching::SelectionContext;
use crate::branching::VariableSelector;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the first variable which is not fixed given the order in
/// the provided list.
#[derive(Debug)]
pub struct InputOrder {
    variables: Vec<DomainId>,
}

impl InputOrder {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for InputOrder {
    fn select_variable(&mut self, context: &SelectionContext<'_>) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|&&variable| !context.is_integer_fixed(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assignments;

    #[test]
    fn first_unfixed_variable_is_selected() {
        let mut assignments = Assignments::default();
        let fixed = assignments.grow(3, 3);
        let free = assignments.grow(0, 4);
        let mut selector = InputOrder::new(&[fixed, free]);

        let context = SelectionContext::new(&assignments);

        assert_eq!(Some(free), selector.select_variable(&context));
    }

    #[test]
    fn nothing_is_selected_when_all_are_fixed() {
        let mut assignments = Assignments::default();
        let fixed = assignments.grow(1, 1);
        let mut selector = InputOrder::new(&[fixed]);

        let context = SelectionContext::new(&assignments);

        assert_eq!(None, selector.select_variable(&context));
    }

    #[test]
    fn variables_unfixed_by_backtracking_are_selected_again() {
        let mut assignments = Assignments::default();
        let first = assignments.grow(0, 1);
        let second = assignments.grow(0, 1);
        let mut selector = InputOrder::new(&[first, second]);

        assignments.increase_decision_level();
        assignments.make_assignment(first, 0).unwrap();
        assert_eq!(
            Some(second),
            selector.select_variable(&SelectionContext::new(&assignments))
        );

        assignments.synchronise(0);
        assert_eq!(
            Some(first),
            selector.select_variable(&SelectionContext::new(&assignments))
        );
    }
}
