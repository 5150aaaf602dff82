use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;

/// Propagator for `a != b`; removes the value of a fixed side from the other side.
#[derive(Clone, Debug)]
pub(crate) struct NotEqualPropagator {
    a: DomainId,
    b: DomainId,
}

impl NotEqualPropagator {
    pub(crate) fn new(a: DomainId, b: DomainId) -> Self {
        NotEqualPropagator { a, b }
    }
}

impl Propagator for NotEqualPropagator {
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        vec![self.a, self.b]
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        context.is_fixed(self.a)
            && context.is_fixed(self.b)
            && context.lower_bound(self.a) == context.lower_bound(self.b)
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        if context.is_fixed(self.a) {
            context.remove(self.b, context.lower_bound(self.a))?;
        }
        if context.is_fixed(self.b) {
            context.remove(self.a, context.lower_bound(self.b))?;
        }

        Ok(())
    }
}
