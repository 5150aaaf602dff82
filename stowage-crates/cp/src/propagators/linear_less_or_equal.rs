use crate::engine::propagation::EmptyDomain;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;
use crate::engine::variables::LinearTerm;

/// Propagator for the constraint `\sum scale_i * x_i <= rhs`.
///
/// Arithmetic is done in `i64`, so areas and volumes of realistic containers do not overflow.
#[derive(Clone, Debug)]
pub(crate) struct LinearLessOrEqualPropagator {
    terms: Box<[LinearTerm]>,
    rhs: i64,
}

impl LinearLessOrEqualPropagator {
    pub(crate) fn new(terms: Box<[LinearTerm]>, rhs: i64) -> Self {
        LinearLessOrEqualPropagator { terms, rhs }
    }

    fn minimum_contribution(term: &LinearTerm, context: PropagationContext<'_>) -> i64 {
        if term.scale >= 0 {
            term.scale * context.lower_bound(term.domain) as i64
        } else {
            term.scale * context.upper_bound(term.domain) as i64
        }
    }

    fn lower_bound_left_hand_side(&self, context: PropagationContext<'_>) -> i64 {
        self.terms
            .iter()
            .map(|term| Self::minimum_contribution(term, context))
            .sum()
    }
}

impl Propagator for LinearLessOrEqualPropagator {
    fn name(&self) -> &str {
        "LinearLeq"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        self.terms.iter().map(|term| term.domain).collect()
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        self.lower_bound_left_hand_side(context) > self.rhs
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        let lower_bound_left_hand_side = self.lower_bound_left_hand_side(context.as_readonly());
        if lower_bound_left_hand_side > self.rhs {
            return Err(EmptyDomain);
        }

        // Tightening a term never changes its own minimum contribution, so the lower bound of the
        // left-hand side stays valid for the whole pass.
        for term in self.terms.iter() {
            let slack = self.rhs
                - (lower_bound_left_hand_side
                    - Self::minimum_contribution(term, context.as_readonly()));

            if term.scale > 0 {
                context.set_upper_bound(term.domain, slack.div_euclid(term.scale))?;
            } else if term.scale < 0 {
                context.set_lower_bound(term.domain, -slack.div_euclid(-term.scale))?;
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
    fn upper_bounds_are_tightened() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(1, 5);
        let y = assignments.grow(0, 10);

        // x + 2y <= 7
        let propagator =
            LinearLessOrEqualPropagator::new(vec![x.scaled(1), y.scaled(2)].into(), 7);
        propagate_to_fixpoint(&propagator, &mut assignments).unwrap();

        assert_eq!(5, assignments.upper_bound(x));
        assert_eq!(3, assignments.upper_bound(y));
    }

    #[test]
    fn negative_scales_tighten_lower_bounds() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);
        let y = assignments.grow(0, 4);

        // y - x <= -7, i.e. x >= y + 7
        let propagator =
            LinearLessOrEqualPropagator::new(vec![y.scaled(1), x.scaled(-1)].into(), -7);
        propagate_to_fixpoint(&propagator, &mut assignments).unwrap();

        assert_eq!(7, assignments.lower_bound(x));
        assert_eq!(3, assignments.upper_bound(y));
    }

    #[test]
    fn negative_slack_rounds_towards_feasibility() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(-10, 10);

        // 3x <= -4 gives x <= -2
        let propagator = LinearLessOrEqualPropagator::new(vec![x.scaled(3)].into(), -4);
        propagate_to_fixpoint(&propagator, &mut assignments).unwrap();

        assert_eq!(-2, assignments.upper_bound(x));
    }

    #[test]
    fn violated_constraint_is_detected() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(4, 5);
        let y = assignments.grow(4, 5);

        let propagator = LinearLessOrEqualPropagator::new(vec![x.into(), y.into()].into(), 7);

        assert!(propagator.detect_inconsistency(PropagationContext::new(&assignments)));
        assert_eq!(
            Err(EmptyDomain),
            propagate_to_fixpoint(&propagator, &mut assignments)
        );
    }
}
