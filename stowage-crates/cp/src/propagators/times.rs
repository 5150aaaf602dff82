use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;

/// Bounds propagator for `a * b = c` where `a` and `b` have non-negative domains.
#[derive(Clone, Debug)]
pub(crate) struct TimesPropagator {
    a: DomainId,
    b: DomainId,
    c: DomainId,
}

impl TimesPropagator {
    pub(crate) fn new(a: DomainId, b: DomainId, c: DomainId) -> Self {
        TimesPropagator { a, b, c }
    }

    /// Bounds a factor given the other factor and the product.
    fn propagate_factor(
        context: &mut PropagationContextMut<'_>,
        factor: DomainId,
        other: DomainId,
        product: DomainId,
    ) -> PropagationStatusCP {
        let other_lower = context.lower_bound(other) as i64;
        let other_upper = context.upper_bound(other) as i64;
        let product_lower = context.lower_bound(product) as i64;
        let product_upper = context.upper_bound(product) as i64;

        if other_upper > 0 && product_lower > 0 {
            // ceil(product_lower / other_upper) for positive operands
            let bound = (product_lower + other_upper - 1) / other_upper;
            context.set_lower_bound(factor, bound)?;
        }
        if other_lower > 0 {
            context.set_upper_bound(factor, product_upper.div_euclid(other_lower))?;
        }

        Ok(())
    }
}

impl Propagator for TimesPropagator {
    fn name(&self) -> &str {
        "Times"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        vec![self.a, self.b, self.c]
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        let lowest = context.lower_bound(self.a) as i64 * context.lower_bound(self.b) as i64;
        let highest = context.upper_bound(self.a) as i64 * context.upper_bound(self.b) as i64;

        lowest > context.upper_bound(self.c) as i64 || highest < context.lower_bound(self.c) as i64
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        let lowest = context.lower_bound(self.a) as i64 * context.lower_bound(self.b) as i64;
        let highest = context.upper_bound(self.a) as i64 * context.upper_bound(self.b) as i64;
        context.set_lower_bound(self.c, lowest)?;
        context.set_upper_bound(self.c, highest)?;

        Self::propagate_factor(context, self.a, self.b, self.c)?;
        Self::propagate_factor(context, self.b, self.a, self.c)
    }
}
