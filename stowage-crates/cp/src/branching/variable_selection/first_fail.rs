use log::warn;

use crate::branching::SelectionContext;
use crate::branching::VariableSelector;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the unfixed variable with the smallest domain, breaking
/// ties by the order of the provided list.
#[derive(Debug)]
pub struct FirstFail {
    variables: Vec<DomainId>,
}

impl FirstFail {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }
        FirstFail {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for FirstFail {
    fn select_variable(&mut self, context: &SelectionContext<'_>) -> Option<DomainId> {
        self.variables
            .iter()
            .filter(|&&variable| !context.is_integer_fixed(variable))
            .min_by_key(|&&variable| context.get_size_of_domain(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assignments;

    #[test]
    fn smallest_domain_is_selected() {
        let mut assignments = Assignments::default();
        let wide = assignments.grow(0, 10);
        let narrow = assignments.grow(0, 2);
        let also_narrow = assignments.grow(5, 7);
        let mut selector = FirstFail::new(&[wide, narrow, also_narrow]);

        let context = SelectionContext::new(&assignments);

        assert_eq!(Some(narrow), selector.select_variable(&context));
    }
}
