mod assignments;
mod constraint_satisfaction_solver;
pub(crate) mod predicates;
pub(crate) mod propagation;
pub(crate) mod variables;
mod watch_list;

pub(crate) use assignments::Assignments;
pub use constraint_satisfaction_solver::ConstraintOperationError;
pub use constraint_satisfaction_solver::Solver;
pub use constraint_satisfaction_solver::SolverStatistics;
pub(crate) use watch_list::WatchListManager;
