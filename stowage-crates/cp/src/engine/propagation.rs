use std::collections::VecDeque;
use std::fmt::Debug;

use crate::containers::DenseId;
use crate::engine::Assignments;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// Raised when a domain would become empty; the current partial assignment is inconsistent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

pub type PropagationStatusCP = Result<(), EmptyDomain>;

/// A propagator removes values from the domains of its variables which cannot be part of a
/// solution of its constraint.
///
/// Propagators are stateless: every call to [`Propagator::propagate`] works from the current
/// domains only, which means no state needs to be restored on backtracking. When all variables of
/// the propagator are fixed, [`Propagator::propagate`] must fail if the constraint is violated.
pub trait Propagator: Debug {
    /// The name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// The domains whose changes should trigger this propagator.
    fn watched_domains(&self) -> Vec<DomainId>;

    fn propagate(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatusCP;

    /// Returns `true` if the constraint can no longer be satisfied given the current domains.
    ///
    /// Used to propagate the reification literal of a half-reified constraint. The default
    /// implementation never detects an inconsistency, which is sound but weak.
    fn detect_inconsistency(&self, _context: PropagationContext<'_>) -> bool {
        false
    }
}

/// Read-only access to the domains.
#[derive(Clone, Copy, Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        PropagationContext { assignments }
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.upper_bound(domain)
    }

    pub fn is_fixed(&self, domain: DomainId) -> bool {
        self.assignments.is_fixed(domain)
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments.contains(domain, value)
    }

    pub fn is_literal_true(&self, literal: Literal) -> bool {
        self.is_fixed(literal.domain()) && self.lower_bound(literal.domain()) == literal.true_value()
    }

    pub fn is_literal_false(&self, literal: Literal) -> bool {
        self.is_literal_true(!literal)
    }
}

/// Read and write access to the domains.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    assignments: &'a mut Assignments,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments) -> Self {
        PropagationContextMut { assignments }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext::new(self.assignments)
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.upper_bound(domain)
    }

    pub fn is_fixed(&self, domain: DomainId) -> bool {
        self.assignments.is_fixed(domain)
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments.contains(domain, value)
    }

    pub fn is_literal_true(&self, literal: Literal) -> bool {
        self.as_readonly().is_literal_true(literal)
    }

    pub fn is_literal_false(&self, literal: Literal) -> bool {
        self.as_readonly().is_literal_false(literal)
    }

    pub fn set_lower_bound(&mut self, domain: DomainId, bound: i64) -> PropagationStatusCP {
        if bound > self.upper_bound(domain) as i64 {
            return Err(EmptyDomain);
        }
        if bound <= self.lower_bound(domain) as i64 {
            return Ok(());
        }

        self.assignments.tighten_lower_bound(domain, bound as i32)
    }

    pub fn set_upper_bound(&mut self, domain: DomainId, bound: i64) -> PropagationStatusCP {
        if bound < self.lower_bound(domain) as i64 {
            return Err(EmptyDomain);
        }
        if bound >= self.upper_bound(domain) as i64 {
            return Ok(());
        }

        self.assignments.tighten_upper_bound(domain, bound as i32)
    }

    pub fn remove(&mut self, domain: DomainId, value: i32) -> PropagationStatusCP {
        self.assignments.remove_value_from_domain(domain, value)
    }

    pub fn assign_literal(&mut self, literal: Literal, value: bool) -> PropagationStatusCP {
        let target = if value { literal } else { !literal };
        self.assignments
            .make_assignment(target.domain(), target.true_value())
    }
}

/// Identifies a propagator in the [`crate::Solver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PropagatorId(pub(crate) u32);

impl DenseId for PropagatorId {
    fn position(self) -> usize {
        self.0 as usize
    }

    fn at_position(position: usize) -> Self {
        PropagatorId(position as u32)
    }
}

/// A first-in first-out queue of propagators which holds each propagator at most once.
#[derive(Debug, Default)]
pub(crate) struct PropagatorQueue {
    queue: VecDeque<PropagatorId>,
    is_enqueued: Vec<bool>,
}

impl PropagatorQueue {
    pub(crate) fn enqueue(&mut self, propagator: PropagatorId) {
        let index = propagator.position();
        if index >= self.is_enqueued.len() {
            self.is_enqueued.resize(index + 1, false);
        }

        if !self.is_enqueued[index] {
            self.is_enqueued[index] = true;
            self.queue.push_back(propagator);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator = self.queue.pop_front()?;
        self.is_enqueued[propagator.position()] = false;
        Some(propagator)
    }

    pub(crate) fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}
