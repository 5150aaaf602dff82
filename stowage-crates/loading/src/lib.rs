//! # Stowage loading
//! Decides whether the items of a candidate vehicle route can be packed into the cargo container
//! of a vehicle, and remembers every answer it has given.
//!
//! The crate is organised bottom-up:
//! - [`basic_types`] contains the geometric primitives ([`Cuboid`], [`Container`], [`Group`]) and
//!   the [`LoadingFlag`]s from which constraint masks are composed.
//! - [`placement_points`] reduces the coordinates at which an item has to be considered.
//! - [`packing_model`] builds and solves the single-container constraint model.
//! - [`bin_packing`] bounds the number of vehicles needed by a set of customers.
//! - [`LoadingChecker`] sits on top and is the only entry point used by the routing search.
//!
//! # Example
//! ```rust
//! # use stowage_loading::Container;
//! # use stowage_loading::ContainerLoadingParams;
//! # use stowage_loading::Cuboid;
//! # use stowage_loading::Fragility;
//! # use stowage_loading::LoadingChecker;
//! # use stowage_loading::LoadingStatus;
//! # use stowage_loading::PackingType;
//! # use stowage_loading::ProblemVariant;
//! let mut params =
//!     ContainerLoadingParams::new(ProblemVariant::LoadingOnly).expect("a valid variant");
//! params.cp_solver.threads = 1;
//! let mut checker = LoadingChecker::new(params);
//!
//! let container = Container::new(4, 4, 4, 100.0);
//! let items = vec![
//!     Cuboid::new(0, 2, 2, 2, 10.0, Fragility::None, true),
//!     Cuboid::new(1, 2, 2, 2, 10.0, Fragility::None, true),
//! ];
//! let stops = vec![1];
//! let set = checker.make_bitset(2, &stops);
//!
//! let status = checker
//!     .constraint_programming_solver(
//!         PackingType::Complete,
//!         &container,
//!         &set,
//!         &stops,
//!         &items,
//!         true,
//!         f64::MAX,
//!     )
//!     .expect("the oracle does not fail");
//! assert_eq!(status, LoadingStatus::FeasOpt);
//! ```
pub mod basic_types;
pub mod bin_packing;
mod error;
mod loading_checker;
pub mod packing_model;
mod parameters;
pub mod placement_points;

pub use basic_types::*;
pub use error::LoadingError;
pub use loading_checker::LoadingChecker;
pub use loading_checker::NoHeuristic;
pub use loading_checker::PackingHeuristic;
pub use parameters::*;

/// Sets of customer ids, indexed by the internal node id.
pub use fixedbitset::FixedBitSet as NodeSet;
