//! # Stowage CP
//! A small finite-domain constraint programming engine. It provides the modelling primitives the
//! packing oracle needs: integer variables with interval or sparse domains, Boolean literals,
//! linear, clausal, multiplication, minimum and all-different constraints, half-reification, and a
//! depth-first satisfaction search which can be interrupted through a [`TerminationCondition`].
//!
//! # Example
//! ```rust
//! # use stowage_cp::Solver;
//! # use stowage_cp::results::SatisfactionResult;
//! # use stowage_cp::termination::Indefinite;
//! # use stowage_cp::constraints;
//! let mut solver = Solver::default();
//!
//! let x = solver.new_bounded_integer(0, 5);
//! let y = solver.new_bounded_integer(0, 5);
//!
//! // x + y == 7 and x != y
//! solver
//!     .add_constraint(constraints::equals(vec![x.into(), y.into()], 7))
//!     .post()
//!     .expect("the root is consistent");
//! solver
//!     .add_constraint(constraints::not_equals(x, y))
//!     .post()
//!     .expect("the root is consistent");
//!
//! let mut brancher = solver.default_brancher();
//! let mut termination = Indefinite;
//!
//! match solver.satisfy(&mut brancher, &mut termination) {
//!     SatisfactionResult::Satisfiable(solution) => {
//!         let x_value = solution.get_integer_value(x);
//!         let y_value = solution.get_integer_value(y);
//!         assert_eq!(x_value + y_value, 7);
//!         assert_ne!(x_value, y_value);
//!     }
//!     _ => panic!("the model has a solution"),
//! }
//! ```
pub mod asserts;

pub(crate) mod basic_types;
pub mod branching;
pub mod constraints;
pub(crate) mod containers;
pub(crate) mod engine;
pub(crate) mod propagators;
pub mod termination;

pub use engine::ConstraintOperationError;
pub use engine::Solver;

pub mod variables {
    //! The variables which can be created through the [`crate::Solver`].
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::LinearTerm;
    pub use crate::engine::variables::Literal;
}

pub mod predicates {
    //! Atomic constraints over a single variable, used as search decisions.
    pub use crate::engine::predicates::Predicate;
    pub use crate::engine::predicates::PredicateType;
}

pub mod propagation {
    //! The interface between the engine and its propagators.
    pub use crate::engine::propagation::EmptyDomain;
    pub use crate::engine::propagation::PropagationContext;
    pub use crate::engine::propagation::PropagationContextMut;
    pub use crate::engine::propagation::PropagationStatusCP;
    pub use crate::engine::propagation::Propagator;
}

pub mod results {
    //! The outcomes of a call to [`crate::Solver::satisfy`].
    pub use crate::basic_types::SatisfactionResult;
    pub use crate::basic_types::Solution;
}

pub mod statistics {
    //! Counters gathered during search.
    pub use crate::engine::SolverStatistics;
}
