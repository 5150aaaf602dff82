use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// Half-reification of a propagator: `reification_literal -> constraint`.
///
/// The wrapped propagator runs only once the literal is true. While the literal is unassigned, an
/// inconsistency detected by the wrapped propagator falsifies the literal.
#[derive(Debug)]
pub(crate) struct ReifiedPropagator {
    propagator: Box<dyn Propagator>,
    reification_literal: Literal,
    name: String,
}

impl ReifiedPropagator {
    pub(crate) fn new(propagator: Box<dyn Propagator>, reification_literal: Literal) -> Self {
        let name = format!("Reified({})", propagator.name());

        ReifiedPropagator {
            propagator,
            reification_literal,
            name,
        }
    }
}

impl Propagator for ReifiedPropagator {
    fn name(&self) -> &str {
        &self.name
    }

    fn watched_domains(&self) -> Vec<DomainId> {
        let mut domains = self.propagator.watched_domains();
        domains.push(self.reification_literal.domain());
        domains
    }

    fn detect_inconsistency(&self, context: PropagationContext<'_>) -> bool {
        context.is_literal_true(self.reification_literal)
            && self.propagator.detect_inconsistency(context)
    }

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP {
        if context.is_literal_true(self.reification_literal) {
            return self.propagator.propagate(context);
        }

        if !context.is_literal_false(self.reification_literal)
            && self.propagator.detect_inconsistency(context.as_readonly())
        {
            context.assign_literal(self.reification_literal, false)?;
        }

        Ok(())
    }
}
