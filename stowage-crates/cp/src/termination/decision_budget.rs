use super::TerminationCondition;

/// Stops the search after a fixed number of branching decisions. Unlike a [`super::TimeBudget`]
/// this gives the same outcome on every run, so tests use it to cut a search short.
#[derive(Clone, Copy, Debug)]
pub struct DecisionBudget {
    remaining: u64,
}

impl DecisionBudget {
    pub fn new(max_decisions: u64) -> DecisionBudget {
        DecisionBudget {
            remaining: max_decisions,
        }
    }
}

impl TerminationCondition for DecisionBudget {
    fn should_stop(&mut self) -> bool {
        self.remaining == 0
    }

    fn decision_has_been_made(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_used_up_by_decisions() {
        let mut budget = DecisionBudget::new(2);

        budget.decision_has_been_made();
        assert!(!budget.should_stop());
        budget.decision_has_been_made();
        assert!(budget.should_stop());
        budget.decision_has_been_made();
        assert!(budget.should_stop());
    }
}
