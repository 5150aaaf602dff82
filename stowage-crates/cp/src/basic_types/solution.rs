use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// A complete assignment of every variable created in a [`crate::Solver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    values: Vec<i32>,
}

impl Solution {
    pub(crate) fn new(values: Vec<i32>) -> Self {
        Solution { values }
    }

    pub fn get_integer_value(&self, domain: DomainId) -> i32 {
        self.values[domain.id as usize]
    }

    pub fn get_literal_value(&self, literal: Literal) -> bool {
        let value = self.get_integer_value(literal.domain()) == 1;
        if literal.is_positive() {
            value
        } else {
            !value
        }
    }

    pub fn num_domains(&self) -> usize {
        self.values.len()
    }
}

/// The result of a call to [`crate::Solver::satisfy`].
#[derive(Debug)]
pub enum SatisfactionResult {
    /// A solution was found.
    Satisfiable(Solution),
    /// The model was proven to have no solution.
    Unsatisfiable,
    /// The termination condition triggered before a conclusion was reached.
    Unknown,
}
