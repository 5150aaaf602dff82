use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;

/// Bounds propagator for `rhs = min(array)`.
#[derive(Clone, Debug)]
pub(crate) struct MinimumPropagator {
    array: Box<[DomainId]>,
    rhs: DomainId,
}

impl MinimumPropagator {
    pub(crate) fn new(array: Box<[DomainId]>, rhs: DomainId) -> Self {
        MinimumPropagator { array, rhs }
    }
}

impl Propagator for MinimumPropagator {
    fn name(&self) -> &str {
        "Minimum"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        self.array
            .iter()
            .copied()
            .chain(std::iter::once(self.rhs))
            .collect()
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        let min_lower_bound = self.array.iter().map(|&x| context.lower_bound(x)).min();
        let min_upper_bound = self.array.iter().map(|&x| context.upper_bound(x)).min();

        match (min_lower_bound, min_upper_bound) {
            (Some(lower), Some(upper)) => {
                lower > context.upper_bound(self.rhs) || upper < context.lower_bound(self.rhs)
            }
            _ => true,
        }
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        let min_lower_bound = self
            .array
            .iter()
            .map(|&x| context.lower_bound(x) as i64)
            .min()
            .unwrap_or(i64::MAX);
        let min_upper_bound = self
            .array
            .iter()
            .map(|&x| context.upper_bound(x) as i64)
            .min()
            .unwrap_or(i64::MIN);

        context.set_lower_bound(self.rhs, min_lower_bound)?;
        context.set_upper_bound(self.rhs, min_upper_bound)?;

        let rhs_lower_bound = context.lower_bound(self.rhs) as i64;
        for &x in self.array.iter() {
            context.set_lower_bound(x, rhs_lower_bound)?;
        }

        // If a single element can still take a value at most the upper bound of the minimum, that
        // element has to be the minimum.
        let rhs_upper_bound = context.upper_bound(self.rhs);
        let mut candidates = self
            .array
            .iter()
            .filter(|&&x| context.lower_bound(x) <= rhs_upper_bound);
        if let (Some(&only), None) = (candidates.next(), candidates.next()) {
            context.set_upper_bound(only, rhs_upper_bound as i64)?;
        }

        Ok(())
    }
}
