use std::fmt::Display;
use std::time::Duration;
use std::time::Instant;

use log::debug;
use thiserror::Error;

use crate::basic_types::SatisfactionResult;
use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::branching::IndependentVariableValueBrancher;
use crate::branching::InDomainMin;
use crate::branching::InputOrder;
use crate::branching::SelectionContext;
use crate::constraints::Constraint;
use crate::constraints::ConstraintPoster;
use crate::containers::IdVec;
use crate::engine::Assignments;
use crate::engine::WatchListManager;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::PropagationStatusCP;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorQueue;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::stowage_assert_simple;
use crate::termination::TerminationCondition;

/// Errors related to adding constraints to the [`Solver`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Error which indicates that adding a propagator led to infeasibility at the root.
    #[error("Adding the propagator failed because it is infeasible at the root")]
    InfeasiblePropagator,
    /// Error which indicates that a constraint was attempted to be added while the [`Solver`] was
    /// in an infeasible state.
    #[error("Adding constraint failed because the solver is in an infeasible state")]
    InfeasibleState,
}

/// Counters of a single solver instance.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverStatistics {
    pub num_decisions: u64,
    pub num_conflicts: u64,
    pub num_propagations: u64,
    pub time_spent_in_search: Duration,
}

impl Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "decisions={} conflicts={} propagations={} searchTime={:.3}s",
            self.num_decisions,
            self.num_conflicts,
            self.num_propagations,
            self.time_spent_in_search.as_secs_f64()
        )
    }
}

/// The brancher returned by [`Solver::default_brancher`].
pub type DefaultBrancher = IndependentVariableValueBrancher<InputOrder, InDomainMin>;

/// The main interaction point: variables and constraints are added to the solver, after which
/// [`Solver::satisfy`] searches for a solution.
///
/// Constraints are propagated as soon as they are posted, so the root is always at its fixpoint.
/// Search is a depth-first search with chronological backtracking: when the subtree below a
/// decision is exhausted, the negation of the decision is posted one level up.
#[derive(Debug, Default)]
pub struct Solver {
    assignments: Assignments,
    propagators: IdVec<PropagatorId, Box<dyn Propagator>>,
    watch_lists: WatchListManager,
    propagator_queue: PropagatorQueue,
    decisions: Vec<Predicate>,
    is_infeasible: bool,
    statistics: SolverStatistics,
}

/// Functions to create variables.
impl Solver {
    /// Create a new integer variable with the domain `[lower_bound, upper_bound]`. An empty range
    /// puts the solver in an infeasible state.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        if lower_bound > upper_bound {
            self.is_infeasible = true;
            return self.assignments.grow(lower_bound, lower_bound);
        }

        self.assignments.grow(lower_bound, upper_bound)
    }

    /// Create a new integer variable whose domain consists of exactly the given values. An empty
    /// set of values puts the solver in an infeasible state.
    pub fn new_sparse_integer(&mut self, values: impl Into<Vec<i32>>) -> DomainId {
        let values = values.into();
        if values.is_empty() {
            self.is_infeasible = true;
            return self.assignments.grow(0, 0);
        }

        self.assignments.grow_sparse(&values)
    }

    /// Create a new Boolean variable.
    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.assignments.grow(0, 1))
    }
}

/// Functions for adding constraints.
impl Solver {
    /// Add a constraint to the solver. The returned [`ConstraintPoster`] decides whether the
    /// constraint is posted as is or only when a literal holds.
    ///
    /// # Example
    /// ```rust
    /// # use stowage_cp::Solver;
    /// # use stowage_cp::constraints;
    /// let mut solver = Solver::default();
    /// let x = solver.new_bounded_integer(0, 10);
    /// let enforce = solver.new_literal();
    ///
    /// // enforce -> x <= 3
    /// solver
    ///     .add_constraint(constraints::less_than_or_equals(vec![x.into()], 3))
    ///     .implied_by(enforce)
    ///     .expect("consistent at the root");
    /// ```
    pub fn add_constraint<C: Constraint>(&mut self, constraint: C) -> ConstraintPoster<'_, C> {
        ConstraintPoster::new(self, constraint)
    }

    pub(crate) fn add_propagator(
        &mut self,
        propagator: Box<dyn Propagator>,
    ) -> Result<(), ConstraintOperationError> {
        if self.is_infeasible {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        stowage_assert_simple!(
            self.assignments.get_decision_level() == 0,
            "propagators can only be added at the root"
        );

        let propagator_id = self.propagators.push(propagator);
        for domain in self.propagators[propagator_id].watched_domains() {
            self.watch_lists.watch(domain, propagator_id);
        }

        self.propagator_queue.enqueue(propagator_id);
        if self.propagate().is_err() {
            self.is_infeasible = true;
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }

        Ok(())
    }
}

/// Functions for solving.
impl Solver {
    /// A brancher which fixes every variable in creation order to its lower bound.
    pub fn default_brancher(&self) -> DefaultBrancher {
        IndependentVariableValueBrancher::new(
            InputOrder::new(&self.all_domains()),
            InDomainMin,
        )
    }

    /// Search for a solution.
    ///
    /// The brancher must keep making decisions until every variable is fixed. After the call, the
    /// solver is back at the root and can be queried or solved again.
    pub fn satisfy<B: Brancher, T: TerminationCondition>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
    ) -> SatisfactionResult {
        let started_at = Instant::now();
        let result = self.search(brancher, termination);

        self.restore_root();
        self.statistics.time_spent_in_search += started_at.elapsed();

        result
    }

    fn search<B: Brancher, T: TerminationCondition>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
    ) -> SatisfactionResult {
        if self.is_infeasible {
            return SatisfactionResult::Unsatisfiable;
        }

        let mut is_conflicting = self.propagate().is_err();
        loop {
            if is_conflicting {
                let Some(decision) = self.decisions.pop() else {
                    self.is_infeasible = true;
                    return SatisfactionResult::Unsatisfiable;
                };

                self.assignments.synchronise(self.decisions.len());
                is_conflicting = self.post_and_propagate(decision.negate()).is_err();
                continue;
            }

            if termination.should_stop() {
                return SatisfactionResult::Unknown;
            }

            let mut context = SelectionContext::new(&self.assignments);
            let Some(decision) = brancher.next_decision(&mut context) else {
                return SatisfactionResult::Satisfiable(Solution::new(
                    self.assignments.fixed_values(),
                ));
            };

            termination.decision_has_been_made();
            self.statistics.num_decisions += 1;

            self.assignments.increase_decision_level();
            self.decisions.push(decision);
            is_conflicting = self.post_and_propagate(decision).is_err();
        }
    }

    fn post_and_propagate(&mut self, predicate: Predicate) -> PropagationStatusCP {
        self.assignments.post_predicate(predicate)?;
        self.propagate()
    }

    /// Run the enqueued propagators, and the watchers of every changed domain, until fixpoint.
    fn propagate(&mut self) -> PropagationStatusCP {
        loop {
            for domain in self.assignments.drain_modified_domains() {
                for &propagator in self.watch_lists.get_watchers(domain) {
                    self.propagator_queue.enqueue(propagator);
                }
            }

            let Some(propagator_id) = self.propagator_queue.pop() else {
                return Ok(());
            };

            self.statistics.num_propagations += 1;
            let mut context = PropagationContextMut::new(&mut self.assignments);
            if let Err(empty_domain) = self.propagators[propagator_id].propagate(&mut context) {
                self.statistics.num_conflicts += 1;
                self.propagator_queue.clear();
                let _ = self.assignments.drain_modified_domains();
                return Err(empty_domain);
            }
        }
    }

    fn restore_root(&mut self) {
        if self.assignments.get_decision_level() > 0 {
            self.assignments.synchronise(0);
        }
        self.decisions.clear();
        self.propagator_queue.clear();
    }
}

/// Functions for retrieving information about the solver.
impl Solver {
    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.upper_bound(domain)
    }

    /// Every variable created so far, in creation order.
    pub fn all_domains(&self) -> Vec<DomainId> {
        self.assignments.get_domains().collect()
    }

    pub fn num_domains(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// Whether the solver has proven that no solution exists.
    pub fn is_infeasible(&self) -> bool {
        self.is_infeasible
    }

    pub fn statistics(&self) -> SolverStatistics {
        self.statistics
    }

    pub fn log_statistics(&self) {
        debug!(
            "{} propagators, {} domains, {}",
            self.propagators.len(),
            self.assignments.num_domains(),
            self.statistics
        );
    }
}
