use itertools::Itertools;

use crate::engine::propagation::EmptyDomain;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;

/// Forward-checking propagator for `all_different(array)`: values of fixed variables are removed
/// from the others, and a pigeonhole check fails when too many variables share too few values.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentPropagator {
    array: Box<[DomainId]>,
}

impl AllDifferentPropagator {
    pub(crate) fn new(array: Box<[DomainId]>) -> Self {
        AllDifferentPropagator { array }
    }

    fn violates_pigeonhole(&self, context: PropagationContext<'_>) -> bool {
        let Some(lowest) = self.array.iter().map(|&x| context.lower_bound(x)).min() else {
            return false;
        };
        let highest = self
            .array
            .iter()
            .map(|&x| context.upper_bound(x))
            .max()
            .unwrap_or(lowest);

        (highest as i64 - lowest as i64 + 1) < self.array.len() as i64
    }
}

impl Propagator for AllDifferentPropagator {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        self.array.to_vec()
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        self.violates_pigeonhole(context)
            || !self
                .array
                .iter()
                .filter(|&&x| context.is_fixed(x))
                .map(|&x| context.lower_bound(x))
                .all_unique()
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        if self.violates_pigeonhole(context.as_readonly()) {
            return Err(EmptyDomain);
        }

        for (index, &x) in self.array.iter().enumerate() {
            if !context.is_fixed(x) {
                continue;
            }

            let value = context.lower_bound(x);
            for (other_index, &y) in self.array.iter().enumerate() {
                if other_index != index {
                    context.remove(y, value)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assignments;
    use crate::propagators::test_helper::propagate_to_fixpoint;

    #[test]
    fn fixed_values_are_removed_from_others() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(1, 1);
        let y = assignments.grow(1, 2);
        let z = assignments.grow(1, 3);

        propagate_to_fixpoint(
            &AllDifferentPropagator::new(vec![x, y, z].into()),
            &mut assignments,
        )
        .unwrap();

        assert_eq!(2, assignments.lower_bound(y));
        assert!(assignments.is_fixed(z));
        assert_eq!(3, assignments.lower_bound(z));
    }

    #[test]
    fn too_few_values_conflict() {
        let mut assignments = Assignments::default();
        let variables = (0..3).map(|_| assignments.grow(1, 2)).collect::<Vec<_>>();

        let propagator = AllDifferentPropagator::new(variables.into());

        assert!(propagator.detect_inconsistency(PropagationContext::new(&assignments)));
        assert_eq!(
            Err(EmptyDomain),
            propagate_to_fixpoint(&propagator, &mut assignments)
        );
    }
}
