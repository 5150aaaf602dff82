use crate::basic_types::Trail;
use crate::containers::IdVec;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateType;
use crate::engine::propagation::EmptyDomain;
use crate::engine::variables::DomainId;
use crate::stowage_assert_moderate;
use crate::stowage_assert_simple;

/// The trailed domains of all integer variables.
///
/// The bounds of a domain are always values of the domain; values removed strictly inside the
/// bounds are kept in a lazily allocated mask.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    domains: IdVec<DomainId, IntegerDomain>,
    trail: Trail<DomainChange>,
    /// Domains which changed since the last call to [`Assignments::drain_modified_domains`].
    modified: Vec<DomainId>,
}

#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    initial_lower_bound: i32,
    initial_upper_bound: i32,
    removed: Option<Box<[bool]>>,
}

impl IntegerDomain {
    fn is_removed(&self, value: i32) -> bool {
        self.removed
            .as_ref()
            .is_some_and(|removed| removed[(value - self.initial_lower_bound) as usize])
    }

    fn set_removed(&mut self, value: i32, is_removed: bool) {
        let size = (self.initial_upper_bound - self.initial_lower_bound + 1) as usize;
        let removed = self
            .removed
            .get_or_insert_with(|| vec![false; size].into_boxed_slice());
        removed[(value - self.initial_lower_bound) as usize] = is_removed;
    }
}

#[derive(Clone, Copy, Debug)]
enum DomainChange {
    LowerBound { domain: DomainId, old_bound: i32 },
    UpperBound { domain: DomainId, old_bound: i32 },
    Removal { domain: DomainId, value: i32 },
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        stowage_assert_simple!(
            lower_bound <= upper_bound,
            "domain [{lower_bound}, {upper_bound}] is empty"
        );

        self.domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
            removed: None,
        })
    }

    /// Creates a domain containing exactly the given (non-empty) values.
    pub(crate) fn grow_sparse(&mut self, values: &[i32]) -> DomainId {
        let lower_bound = *values.iter().min().expect("sparse domains are non-empty");
        let upper_bound = *values.iter().max().expect("sparse domains are non-empty");

        let mut domain = IntegerDomain {
            lower_bound,
            upper_bound,
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
            removed: Some(vec![true; (upper_bound - lower_bound + 1) as usize].into_boxed_slice()),
        };
        for &value in values {
            domain.set_removed(value, false);
        }

        self.domains.push(domain)
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.ids()
    }

    pub(crate) fn lower_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].lower_bound
    }

    pub(crate) fn upper_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].upper_bound
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        self.lower_bound(domain) == self.upper_bound(domain)
    }

    /// The number of values between the bounds, holes included.
    pub(crate) fn bounds_width(&self, domain: DomainId) -> i64 {
        self.upper_bound(domain) as i64 - self.lower_bound(domain) as i64 + 1
    }

    pub(crate) fn contains(&self, domain: DomainId, value: i32) -> bool {
        let integer_domain = &self.domains[domain];
        integer_domain.lower_bound <= value
            && value <= integer_domain.upper_bound
            && !integer_domain.is_removed(value)
    }

    /// Iterates over the values in the domain in increasing order.
    pub(crate) fn values(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        (self.lower_bound(domain)..=self.upper_bound(domain))
            .filter(move |&value| self.contains(domain, value))
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.trail.level()
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.trail.open_level()
    }

    pub(crate) fn drain_modified_domains(&mut self) -> Vec<DomainId> {
        std::mem::take(&mut self.modified)
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        new_lower_bound: i32,
    ) -> Result<(), EmptyDomain> {
        let integer_domain = &self.domains[domain];
        if new_lower_bound <= integer_domain.lower_bound {
            return Ok(());
        }

        let mut bound = new_lower_bound;
        while bound <= integer_domain.upper_bound && integer_domain.is_removed(bound) {
            bound += 1;
        }
        if bound > integer_domain.upper_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainChange::LowerBound {
            domain,
            old_bound: integer_domain.lower_bound,
        });
        self.domains[domain].lower_bound = bound;
        self.modified.push(domain);

        Ok(())
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        new_upper_bound: i32,
    ) -> Result<(), EmptyDomain> {
        let integer_domain = &self.domains[domain];
        if new_upper_bound >= integer_domain.upper_bound {
            return Ok(());
        }

        let mut bound = new_upper_bound;
        while bound >= integer_domain.lower_bound && integer_domain.is_removed(bound) {
            bound -= 1;
        }
        if bound < integer_domain.lower_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainChange::UpperBound {
            domain,
            old_bound: integer_domain.upper_bound,
        });
        self.domains[domain].upper_bound = bound;
        self.modified.push(domain);

        Ok(())
    }

    pub(crate) fn remove_value_from_domain(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        if !self.contains(domain, value) {
            return Ok(());
        }

        if value == self.lower_bound(domain) {
            return self.tighten_lower_bound(domain, value + 1);
        }
        if value == self.upper_bound(domain) {
            return self.tighten_upper_bound(domain, value - 1);
        }

        self.domains[domain].set_removed(value, true);
        self.trail.push(DomainChange::Removal { domain, value });
        self.modified.push(domain);

        Ok(())
    }

    pub(crate) fn make_assignment(&mut self, domain: DomainId, value: i32) -> Result<(), EmptyDomain> {
        if !self.contains(domain, value) {
            return Err(EmptyDomain);
        }

        self.tighten_lower_bound(domain, value)?;
        self.tighten_upper_bound(domain, value)
    }

    pub(crate) fn post_predicate(&mut self, predicate: Predicate) -> Result<(), EmptyDomain> {
        match predicate.predicate_type {
            PredicateType::LowerBound => self.tighten_lower_bound(predicate.domain, predicate.value),
            PredicateType::UpperBound => self.tighten_upper_bound(predicate.domain, predicate.value),
            PredicateType::Equal => self.make_assignment(predicate.domain, predicate.value),
            PredicateType::NotEqual => {
                self.remove_value_from_domain(predicate.domain, predicate.value)
            }
        }
    }

    /// Undoes every change made after `new_decision_level` was entered.
    pub(crate) fn synchronise(&mut self, new_decision_level: usize) {
        for change in self.trail.synchronise(new_decision_level) {
            match change {
                DomainChange::LowerBound { domain, old_bound } => {
                    self.domains[domain].lower_bound = old_bound
                }
                DomainChange::UpperBound { domain, old_bound } => {
                    self.domains[domain].upper_bound = old_bound
                }
                DomainChange::Removal { domain, value } => {
                    self.domains[domain].set_removed(value, false)
                }
            }
        }
        self.modified.clear();

        stowage_assert_moderate!(self
            .domains
            .iter()
            .all(|domain| domain.lower_bound <= domain.upper_bound));
    }

    /// The current values of all domains, assuming every domain is fixed.
    pub(crate) fn fixed_values(&self) -> Vec<i32> {
        self.domains
            .iter()
            .map(|domain| {
                stowage_assert_simple!(domain.lower_bound == domain.upper_bound);
                domain.lower_bound
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bound_skips_removed_values() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow(0, 10);

        assignments.remove_value_from_domain(domain, 3).unwrap();
        assignments.remove_value_from_domain(domain, 4).unwrap();
        assignments.tighten_lower_bound(domain, 3).unwrap();

        assert_eq!(5, assignments.lower_bound(domain));
    }

    #[test]
    fn sparse_domain_contains_only_given_values() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow_sparse(&[2, 7, 5]);

        assert_eq!(vec![2, 5, 7], assignments.values(domain).collect::<Vec<_>>());
        assert!(!assignments.contains(domain, 3));
    }

    #[test]
    fn emptying_domain_is_reported_and_leaves_it_untouched() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow_sparse(&[1, 4]);

        let result = assignments.tighten_lower_bound(domain, 5);

        assert_eq!(Err(EmptyDomain), result);
        assert_eq!(1, assignments.lower_bound(domain));
        assert_eq!(4, assignments.upper_bound(domain));
    }

    #[test]
    fn synchronise_restores_bounds_and_holes() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow(0, 5);

        assignments.increase_decision_level();
        assignments.tighten_upper_bound(domain, 3).unwrap();
        assignments.remove_value_from_domain(domain, 2).unwrap();
        assignments.synchronise(0);

        assert_eq!(5, assignments.upper_bound(domain));
        assert!(assignments.contains(domain, 2));
        assert!(assignments.drain_modified_domains().is_empty());
    }

    #[test]
    fn removing_a_bound_moves_the_bound() {
        let mut assignments = Assignments::default();
        let domain = assignments.grow(0, 2);

        assignments.remove_value_from_domain(domain, 0).unwrap();
        assignments.remove_value_from_domain(domain, 2).unwrap();

        assert!(assignments.is_fixed(domain));
        assert_eq!(1, assignments.lower_bound(domain));
        assert_eq!(Err(EmptyDomain), assignments.remove_value_from_domain(domain, 1));
    }
}
