//! # Stowage solver
//! Connects the loading oracle of [`stowage_loading`] to a branch-and-cut routing search. The
//! routing search itself is external; this crate answers its questions about loading:
//! - [`preprocessing`] removes arcs which cannot be loaded before the search starts.
//! - [`subtours`] decomposes integer solutions into their cycles.
//! - [`callback`] checks those cycles and adds lazy constraints for the ones which cannot be
//!   loaded, through a [`callback::LazyConstraintSink`].
//! - [`cuts`] contains the inequalities and the lifting procedures which strengthen them.
//! - [`instance`] reads instances for the `stowage` binary.
//!
//! # Example
//! ```rust
//! # use stowage_loading::ContainerLoadingParams;
//! # use stowage_loading::LoadingChecker;
//! # use stowage_loading::ProblemVariant;
//! # use stowage_solver::BranchAndCutParams;
//! # use stowage_solver::instance::parse_instance;
//! # use stowage_solver::preprocessing::determine_infeasible_paths;
//! let instance = parse_instance(
//!     "vehicle 4 4 4 100
//!      node 0 0
//!      node 1 60
//!      item 2 2 2 60 0 0
//!      node 2 60
//!      item 2 2 2 60 0 0",
//! )
//! .expect("a valid instance");
//!
//! let params = ContainerLoadingParams::new(ProblemVariant::Weight).expect("a valid variant");
//! let mut checker = LoadingChecker::new(params);
//!
//! let paths = determine_infeasible_paths(
//!     &mut checker,
//!     &instance.nodes,
//!     &instance.container,
//!     &BranchAndCutParams::default(),
//! )
//! .expect("no packing model is needed");
//!
//! assert_eq!(vec![(1, 2), (2, 1)], paths.arcs);
//! assert_eq!(0, checker.number_of_solver_calls());
//! ```
pub mod callback;
pub mod cuts;
mod error;
pub mod instance;
mod parameters;
pub mod preprocessing;
pub mod subtours;

pub use error::RoutingError;
pub use parameters::BranchAndCutParams;
