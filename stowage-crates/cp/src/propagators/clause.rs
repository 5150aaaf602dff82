use crate::engine::propagation::EmptyDomain;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// Propagator for the disjunction of its literals: at least one literal is true.
#[derive(Clone, Debug)]
pub(crate) struct ClausePropagator {
    literals: Box<[Literal]>,
}

impl ClausePropagator {
    pub(crate) fn new(literals: Box<[Literal]>) -> Self {
        ClausePropagator { literals }
    }
}

impl Propagator for ClausePropagator {
    fn name(&self) -> &str {
        "Clause"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        self.literals.iter().map(|literal| literal.domain()).collect()
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        self.literals
            .iter()
            .all(|&literal| context.is_literal_false(literal))
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        let mut unassigned = None;

        for &literal in self.literals.iter() {
            if context.is_literal_true(literal) {
                return Ok(());
            }
            if context.is_literal_false(literal) {
                continue;
            }
            if unassigned.is_some() {
                // Two unassigned literals, nothing to propagate.
                return Ok(());
            }
            unassigned = Some(literal);
        }

        match unassigned {
            Some(literal) => context.assign_literal(literal, true),
            None => Err(EmptyDomain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assignments;
    use crate::propagators::test_helper::propagate_to_fixpoint;

    #[test]
    fn last_unassigned_literal_is_set() {
        let mut assignments = Assignments::default();
        let a = Literal::new(assignments.grow(0, 0));
        let b = Literal::new(assignments.grow(0, 1));

        propagate_to_fixpoint(&ClausePropagator::new(vec![a, !b].into()), &mut assignments)
            .unwrap();

        assert_eq!(0, assignments.upper_bound(b.domain()));
    }

    #[test]
    fn all_false_is_a_conflict() {
        let mut assignments = Assignments::default();
        let a = Literal::new(assignments.grow(0, 0));
        let b = Literal::new(assignments.grow(1, 1));

        let propagator = ClausePropagator::new(vec![a, !b].into());

        assert!(propagator.detect_inconsistency(PropagationContext::new(&assignments)));
        assert_eq!(
            Err(EmptyDomain),
            propagate_to_fixpoint(&propagator, &mut assignments)
        );
    }

    #[test]
    fn empty_clause_is_a_conflict() {
        let mut assignments = Assignments::default();

        let propagator = ClausePropagator::new(vec![].into());

        assert_eq!(
            Err(EmptyDomain),
            propagate_to_fixpoint(&propagator, &mut assignments)
        );
    }
}
