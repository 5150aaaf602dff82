use crate::engine::Assignments;
use crate::engine::variables::DomainId;

/// Read-only view of the domains offered to branchers.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        SelectionContext { assignments }
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.upper_bound(domain)
    }

    pub fn is_integer_fixed(&self, domain: DomainId) -> bool {
        self.assignments.is_fixed(domain)
    }

    /// Upper bound minus lower bound plus one.
    pub fn get_size_of_domain(&self, domain: DomainId) -> i64 {
        self.assignments.bounds_width(domain)
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments.contains(domain, value)
    }
}
