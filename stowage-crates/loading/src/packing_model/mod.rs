//! The single-container packing model.
//!
//! Every item gets start and end coordinates per axis, an orientation, and pairwise relation
//! literals which state on which side of another item it lies. Depending on the [`LoadingMask`],
//! the model is extended with fragility, minimal supported area, and LIFO constraints; without a
//! given unloading sequence the model also decides the order in which the customers are served.
//!
//! The start coordinates are restricted to the placement points of the item (see
//! [`crate::placement_points`]).
//!
//! # Example
//! ```rust
//! # use stowage_loading::Container;
//! # use stowage_loading::CpSolverParams;
//! # use stowage_loading::Cuboid;
//! # use stowage_loading::Fragility;
//! # use stowage_loading::LoadingMask;
//! # use stowage_loading::LoadingStatus;
//! # use stowage_loading::packing_model::ContainerLoadingCp;
//! let params = CpSolverParams {
//!     threads: 1,
//!     ..Default::default()
//! };
//! let container = Container::new(3, 2, 2, 100.0);
//! let items = vec![
//!     Cuboid::new(0, 2, 2, 2, 1.0, Fragility::None, false),
//!     Cuboid::new(1, 2, 2, 2, 1.0, Fragility::None, false),
//! ];
//!
//! let mut model = ContainerLoadingCp::new(
//!     &params,
//!     &container,
//!     &items,
//!     1,
//!     LoadingMask::no_support(),
//!     0.0,
//!     f64::MAX,
//! );
//! assert_eq!(LoadingStatus::Infeasible, model.solve().unwrap());
//! ```
mod builder;
mod portfolio;
mod variables;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::debug;
use stowage_cp::Solver;

use self::builder::PackingInstance;
use self::builder::build_model;
use self::portfolio::PortfolioSettings;
use self::portfolio::WorkerOutcome;
use self::portfolio::solve_portfolio;
use crate::basic_types::Container;
use crate::basic_types::Cuboid;
use crate::basic_types::LoadingMask;
use crate::basic_types::LoadingStatus;
use crate::basic_types::Rotation;
use crate::error::LoadingError;
use crate::parameters::CpSolverParams;
use crate::parameters::MeetInTheMiddleTarget;
use crate::placement_points::generate_placement_patterns;
use crate::placement_points::select_minimal_feasible_pattern_type;

/// Where and how an item is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rotation: Rotation,
}

/// A feasible packing; the placements are in the order of the items passed to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackingSolution {
    pub placements: Vec<Placement>,
    /// The customers (by `group_id`) in the unloading order chosen by the model, if the model
    /// decided the sequence.
    pub sequence: Option<Vec<usize>>,
}

/// One packing question: can `items` be placed in `container` under `mask`?
#[derive(Debug)]
pub struct ContainerLoadingCp<'a> {
    params: &'a CpSolverParams,
    container: &'a Container,
    items: &'a [Cuboid],
    number_of_customers: usize,
    mask: LoadingMask,
    support_area: f64,
    max_runtime: f64,
    target: MeetInTheMiddleTarget,
    interrupt: Option<Arc<AtomicBool>>,

    solution: Option<PackingSolution>,
}

impl<'a> ContainerLoadingCp<'a> {
    pub fn new(
        params: &'a CpSolverParams,
        container: &'a Container,
        items: &'a [Cuboid],
        number_of_customers: usize,
        mask: LoadingMask,
        support_area: f64,
        max_runtime: f64,
    ) -> ContainerLoadingCp<'a> {
        ContainerLoadingCp {
            params,
            container,
            items,
            number_of_customers,
            mask,
            support_area,
            max_runtime,
            target: MeetInTheMiddleTarget::default(),
            interrupt: None,
            solution: None,
        }
    }

    pub fn with_meet_in_the_middle_target(mut self, target: MeetInTheMiddleTarget) -> Self {
        self.target = target;
        self
    }

    /// Raising the flag stops the search, which then reports [`LoadingStatus::Unknown`].
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Solves the model. [`LoadingStatus::FeasOpt`] means a packing was found,
    /// [`LoadingStatus::Infeasible`] that none exists and [`LoadingStatus::Unknown`] that the
    /// time limit was reached first.
    pub fn solve(&mut self) -> Result<LoadingStatus, LoadingError> {
        self.solution = None;

        if self.items.is_empty() {
            self.solution = Some(PackingSolution {
                placements: Vec::new(),
                sequence: None,
            });
            return Ok(LoadingStatus::FeasOpt);
        }

        let selection = select_minimal_feasible_pattern_type(self.mask)?;
        let patterns =
            generate_placement_patterns(self.container, self.items, selection, self.target)?;

        let instance = PackingInstance {
            container: self.container,
            items: self.items,
            number_of_customers: self.number_of_customers,
            mask: self.mask,
            support_area: self.support_area,
            patterns: &patterns,
        };

        if self.params.presolve {
            let mut root = Solver::default();
            if build_model(&mut root, &instance).is_err() {
                debug!("packing of {} items is infeasible at the root", self.items.len());
                return Ok(LoadingStatus::Infeasible);
            }
            debug!(
                "packing model with {} variables and {} propagators (mask {})",
                root.num_domains(),
                root.num_propagators(),
                self.mask
            );
        }

        let settings = PortfolioSettings {
            threads: self.params.threads.max(1),
            seed: self.params.seed,
            log_statistics: self.params.log_flag,
            max_runtime: self.max_runtime,
            interrupt: self.interrupt.clone(),
        };

        match solve_portfolio(&instance, &settings) {
            WorkerOutcome::Satisfiable(solution) => {
                self.solution = Some(solution);
                Ok(LoadingStatus::FeasOpt)
            }
            WorkerOutcome::Unsatisfiable => Ok(LoadingStatus::Infeasible),
            WorkerOutcome::Unknown => Ok(LoadingStatus::Unknown),
        }
    }

    /// The packing found by the last call to [`ContainerLoadingCp::solve`].
    pub fn solution(&self) -> Option<&PackingSolution> {
        self.solution.as_ref()
    }

    /// Writes the packing found by the last solve into `items`, which must be the items the model
    /// was created with. Returns whether a packing was available.
    pub fn extract_packing(&self, items: &mut [Cuboid]) -> bool {
        let Some(solution) = &self.solution else {
            return false;
        };

        for (item, placement) in items.iter_mut().zip(solution.placements.iter()) {
            item.x = placement.x;
            item.y = placement.y;
            item.z = placement.z;
            item.rotation = placement.rotation;
        }

        true
    }

    /// The unloading sequence chosen by the last solve, if the model decided it.
    pub fn extract_sequence(&self) -> Option<&[usize]> {
        self.solution
            .as_ref()
            .and_then(|solution| solution.sequence.as_deref())
    }
}
