//! The [`LoadingChecker`] answers every loading question of the routing search and remembers the
//! answers.
//!
//! Answers are stored per [`LoadingMask`]. Masks which contain [`LoadingFlag::Sequence`] depend on
//! the order in which the customers are unloaded, so they are keyed by the stop sequence; all other
//! masks only depend on which customers are in the container and are keyed by the node set.
//! Without [`LoadingFlag::Support`], known answers generalise: a superset of an infeasible set is
//! infeasible and a subset of a feasible set is feasible.
mod cache;
mod heuristic;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use fixedbitset::FixedBitSet;
use fnv::FnvHashMap;
use fnv::FnvHashSet;
use log::debug;
use log::trace;

use self::cache::FeasibilityCache;
pub use self::heuristic::NoHeuristic;
pub use self::heuristic::PackingHeuristic;
use crate::basic_types::Container;
use crate::basic_types::Cuboid;
use crate::basic_types::Group;
use crate::basic_types::LoadingFlag;
use crate::basic_types::LoadingMask;
use crate::basic_types::LoadingStatus;
use crate::basic_types::PackingType;
use crate::bin_packing::BinPacking1D;
use crate::error::LoadingError;
use crate::packing_model::ContainerLoadingCp;
use crate::parameters::ContainerLoadingParams;

/// Calls with less time than this are not attempted.
const MIN_RUNTIME: f64 = 1e-5;

#[derive(Debug)]
pub struct LoadingChecker {
    pub params: ContainerLoadingParams,

    caches: FnvHashMap<LoadingMask, FeasibilityCache>,
    /// Every route which was found feasible under the configured mask, in discovery order.
    complete_feasible_routes: Vec<Vec<usize>>,
    heuristic_infeasible_sequences: FnvHashSet<Vec<usize>>,
    two_opt_checked: FnvHashSet<Vec<usize>>,
    infeasible_combinations: Vec<FixedBitSet>,

    bin_packing: Option<BinPacking1D>,
    heuristic: Box<dyn PackingHeuristic>,
    interrupt: Option<Arc<AtomicBool>>,

    number_of_solver_calls: usize,
}

impl LoadingChecker {
    pub fn new(params: ContainerLoadingParams) -> LoadingChecker {
        LoadingChecker {
            params,
            caches: FnvHashMap::default(),
            complete_feasible_routes: Vec::new(),
            heuristic_infeasible_sequences: FnvHashSet::default(),
            two_opt_checked: FnvHashSet::default(),
            infeasible_combinations: Vec::new(),
            bin_packing: None,
            heuristic: Box::new(NoHeuristic),
            interrupt: None,
            number_of_solver_calls: 0,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Box<dyn PackingHeuristic>) -> LoadingChecker {
        self.heuristic = heuristic;
        self
    }

    /// Every packing model solved by this checker stops when `interrupt` is raised.
    pub fn set_interrupt(&mut self, interrupt: Arc<AtomicBool>) {
        self.interrupt = Some(interrupt);
    }

    /// Installs the bin packing model used by [`LoadingChecker::determine_min_vehicles`]; `nodes`
    /// includes the depot.
    pub fn set_bin_packing_model(&mut self, nodes: &[Group], containers: Vec<Container>) {
        self.bin_packing = Some(BinPacking1D::new(nodes, containers));
    }

    /// The minimal number of containers for all customers, if a bin packing model is installed.
    pub fn solve_bin_packing_approximation(&mut self) -> Option<usize> {
        self.bin_packing.as_mut().map(BinPacking1D::solve)
    }

    fn global_mask(&self) -> LoadingMask {
        self.params.loading_problem.loading_flags
    }

    /// Collects the items of the customers in `node_ids`, in route order. The group id of an item
    /// is the unloading position of its customer: the last customer of the route is unloaded first
    /// and gets group id 0, unless the route is `reversed`.
    pub fn select_items(&self, node_ids: &[usize], nodes: &[Group], reversed: bool) -> Vec<Cuboid> {
        let number_of_stops = node_ids.len();
        let mut selected = Vec::with_capacity(number_of_stops * 3);

        for (position, &node_id) in node_ids.iter().enumerate() {
            let group_id = if reversed {
                position
            } else {
                number_of_stops - 1 - position
            };

            selected.extend(nodes[node_id].items.iter().map(|item| Cuboid {
                group_id,
                ..item.clone()
            }));
        }

        selected
    }

    /// A cheap check which consults the known routes and the [`PackingHeuristic`].
    pub fn packing_heuristic(
        &mut self,
        packing_type: PackingType,
        container: &Container,
        stop_ids: &[usize],
        items: &[Cuboid],
    ) -> Result<LoadingStatus, LoadingError> {
        if self.heuristic_infeasible_sequences.contains(stop_ids) {
            return Ok(LoadingStatus::Infeasible);
        }

        if self.route_is_in_feas_sequences(stop_ids) {
            return Ok(LoadingStatus::FeasOpt);
        }

        let mask = packing_type.build_mask(self.global_mask())?;
        let status = self.heuristic.pack(container, items, mask);
        match status {
            LoadingStatus::FeasOpt if mask == self.global_mask() => {
                self.add_feasible_route(stop_ids);
            }
            LoadingStatus::Infeasible => self.add_infeasible_sequence_heuristic(stop_ids),
            _ => {}
        }

        Ok(status)
    }

    /// Decides whether `items` fit into `container` under the mask of `packing_type`, answering
    /// from the caches where possible.
    ///
    /// `set` holds the customers of `stop_ids`; it is the cache key of masks without
    /// [`LoadingFlag::Sequence`]. An exact call either returns a definitive status or
    /// [`LoadingError::ExactCallUndecided`]. A call with less than 1e-5 seconds returns
    /// [`LoadingStatus::Invalid`] and does not touch the caches.
    #[allow(clippy::too_many_arguments, reason = "mirrors the packing question")]
    pub fn constraint_programming_solver(
        &mut self,
        packing_type: PackingType,
        container: &Container,
        set: &FixedBitSet,
        stop_ids: &[usize],
        items: &[Cuboid],
        is_exact: bool,
        max_runtime: f64,
    ) -> Result<LoadingStatus, LoadingError> {
        if max_runtime < MIN_RUNTIME {
            return Ok(LoadingStatus::Invalid);
        }

        let mask = packing_type.build_mask(self.global_mask())?;

        if let Some(status) = self.precheck(stop_ids, set, mask, is_exact) {
            return Ok(status);
        }

        self.number_of_solver_calls += 1;
        let mut model = self.packing_model(container, items, stop_ids.len(), mask, max_runtime);
        let status = model.solve()?;

        match status {
            LoadingStatus::Invalid => return Err(LoadingError::InvalidOracleStatus),
            LoadingStatus::Unknown if is_exact => {
                debug!(
                    "exact packing call for {stop_ids:?} (mask {mask}) ended without an answer"
                );
                return Err(LoadingError::ExactCallUndecided);
            }
            _ => {}
        }

        self.add_status(stop_ids, set, mask, status)?;

        Ok(status)
    }

    /// Solves the packing question without consulting or updating the caches and writes the
    /// packing into `items` if one is found.
    pub fn constraint_programming_solver_get_packing(
        &mut self,
        packing_type: PackingType,
        container: &Container,
        stop_ids: &[usize],
        items: &mut [Cuboid],
        max_runtime: f64,
    ) -> Result<LoadingStatus, LoadingError> {
        if max_runtime < MIN_RUNTIME {
            return Ok(LoadingStatus::Invalid);
        }

        let mask = packing_type.build_mask(self.global_mask())?;

        self.number_of_solver_calls += 1;
        let snapshot = items.to_vec();
        let mut model = self.packing_model(container, &snapshot, stop_ids.len(), mask, max_runtime);
        let status = model.solve()?;

        if status == LoadingStatus::Invalid {
            return Err(LoadingError::InvalidOracleStatus);
        }
        if status == LoadingStatus::FeasOpt && !model.extract_packing(items) {
            return Err(LoadingError::InvalidOracleStatus);
        }

        Ok(status)
    }

    /// The heuristic under the complete mask, followed by a bounded packing model.
    pub fn heuristic_complete_check(
        &mut self,
        container: &Container,
        set: &FixedBitSet,
        stop_ids: &[usize],
        items: &[Cuboid],
        max_runtime: f64,
    ) -> Result<LoadingStatus, LoadingError> {
        let heuristic_status =
            self.packing_heuristic(PackingType::Complete, container, stop_ids, items)?;
        if heuristic_status == LoadingStatus::FeasOpt {
            return Ok(LoadingStatus::FeasOpt);
        }

        self.constraint_programming_solver(
            PackingType::Complete,
            container,
            set,
            stop_ids,
            items,
            false,
            max_runtime,
        )
    }

    fn packing_model<'a>(
        &'a self,
        container: &'a Container,
        items: &'a [Cuboid],
        number_of_customers: usize,
        mask: LoadingMask,
        max_runtime: f64,
    ) -> ContainerLoadingCp<'a> {
        let model = ContainerLoadingCp::new(
            &self.params.cp_solver,
            container,
            items,
            number_of_customers,
            mask,
            self.params.loading_problem.support_area,
            max_runtime,
        )
        .with_meet_in_the_middle_target(self.params.meet_in_the_middle_target);

        match &self.interrupt {
            Some(interrupt) => model.with_interrupt(Arc::clone(interrupt)),
            None => model,
        }
    }

    fn precheck(
        &mut self,
        sequence: &[usize],
        set: &FixedBitSet,
        mask: LoadingMask,
        is_exact: bool,
    ) -> Option<LoadingStatus> {
        let cache = self.caches.get(&mask)?;

        if mask.contains(LoadingFlag::Sequence) {
            return cache.sequence_status(sequence, is_exact);
        }

        let status = cache.set_status(set, mask.contains(LoadingFlag::Support), is_exact)?;
        if status == LoadingStatus::FeasOpt
            && mask == self.global_mask()
            && !cache.feasible_sequences.contains(sequence)
        {
            self.add_feasible_route(sequence);
        }

        Some(status)
    }

    fn add_status(
        &mut self,
        sequence: &[usize],
        set: &FixedBitSet,
        mask: LoadingMask,
        status: LoadingStatus,
    ) -> Result<(), LoadingError> {
        if status == LoadingStatus::Invalid {
            return Err(LoadingError::InvalidStatusInCache(status));
        }

        if status == LoadingStatus::FeasOpt && mask == self.global_mask() {
            self.add_feasible_route(sequence);
            if !mask.contains(LoadingFlag::Lifo) {
                self.caches
                    .entry(mask)
                    .or_default()
                    .insert_set(set, LoadingStatus::FeasOpt);
            }
            return Ok(());
        }

        trace!("storing {status} for {sequence:?} under mask {mask}");
        let cache = self.caches.entry(mask).or_default();
        if mask.contains(LoadingFlag::Sequence) {
            cache.insert_sequence(sequence, status);
        } else {
            cache.insert_set(set, status);
        }

        Ok(())
    }

    fn add_feasible_route(&mut self, route: &[usize]) {
        let mask = self.global_mask();
        let cache = self.caches.entry(mask).or_default();
        cache.insert_sequence(route, LoadingStatus::FeasOpt);
        if !self.complete_feasible_routes.iter().any(|known| known == route) {
            self.complete_feasible_routes.push(route.to_vec());
        }
    }

    /// A lower bound on the number of vehicles needed by the customers in `nodes`, whose total
    /// demand is `weight` and `volume`.
    ///
    /// The capacity bound `r = ceil(max(weight / limit, volume / volume))` is returned directly
    /// when lifting is disabled, `r` is one, or the bound has more than `lifting_threshold` slack;
    /// otherwise the bin packing model is re-solved for `nodes`.
    pub fn determine_min_vehicles(
        &mut self,
        enable_lifting: bool,
        lifting_threshold: f64,
        container: &Container,
        nodes: &FixedBitSet,
        weight: f64,
        volume: f64,
    ) -> usize {
        let weight_ratio = if container.weight_limit > 1.0 {
            weight / container.weight_limit
        } else {
            0.0
        };
        let volume_ratio = if container.volume() > 1.0 {
            volume / container.volume()
        } else {
            0.0
        };

        let z = weight_ratio.max(volume_ratio);
        let r = z.ceil();

        if !enable_lifting || r == 1.0 || r - z > lifting_threshold {
            return r as usize;
        }

        match self.bin_packing.as_mut() {
            Some(model) => model.resolve(nodes),
            None => {
                debug!("no bin packing model for vehicle lifting");
                r as usize
            }
        }
    }

    /// Whether `customers` contains a combination of customers which cannot share a vehicle.
    pub fn customer_combination_infeasible(&self, customers: &FixedBitSet) -> bool {
        self.infeasible_combinations
            .iter()
            .any(|combination| combination.is_subset(customers))
    }

    pub fn add_infeasible_combination(&mut self, customers: FixedBitSet) {
        self.infeasible_combinations.push(customers);
    }

    pub fn size_infeasible_combinations(&self) -> usize {
        self.infeasible_combinations.len()
    }

    pub fn feasible_routes(&self) -> &[Vec<usize>] {
        &self.complete_feasible_routes
    }

    pub fn number_of_feasible_routes(&self) -> usize {
        self.complete_feasible_routes.len()
    }

    /// Registers a route which was found feasible without a packing model.
    pub fn add_feasible_sequence_from_outside(&mut self, route: &[usize]) {
        self.add_feasible_route(route);
    }

    pub fn route_is_in_feas_sequences(&self, route: &[usize]) -> bool {
        self.caches
            .get(&self.global_mask())
            .is_some_and(|cache| cache.feasible_sequences.contains(route))
    }

    pub fn add_two_opt_checked(&mut self, sequence: &[usize]) {
        let _ = self.two_opt_checked.insert(sequence.to_vec());
    }

    pub fn is_two_opt_checked(&self, sequence: &[usize]) -> bool {
        self.two_opt_checked.contains(sequence)
    }

    pub fn add_infeasible_sequence_heuristic(&mut self, sequence: &[usize]) {
        let _ = self.heuristic_infeasible_sequences.insert(sequence.to_vec());
    }

    /// The set of nodes visited by `sequence`, with room for `size` nodes.
    pub fn make_bitset(&self, size: usize, sequence: &[usize]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(size);
        for &node in sequence {
            if node >= set.len() {
                set.grow(node + 1);
            }
            set.insert(node);
        }
        set
    }

    /// The number of packing models which were solved.
    pub fn number_of_solver_calls(&self) -> usize {
        self.number_of_solver_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Fragility;
    use crate::parameters::ProblemVariant;

    fn checker(variant: ProblemVariant) -> LoadingChecker {
        let mut params = ContainerLoadingParams::new(variant).unwrap();
        params.cp_solver.threads = 1;
        LoadingChecker::new(params)
    }

    fn customer(id: usize, sizes: &[i32]) -> Group {
        let items = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| Cuboid::new(index, size, size, size, 1.0, Fragility::None, true))
            .collect();
        Group::new(id, id, items)
    }

    #[test]
    fn group_ids_count_down_along_the_route() {
        let checker = checker(ProblemVariant::AllConstraints);
        let nodes = vec![Group::empty(0), customer(1, &[1, 2]), customer(2, &[3])];

        let forward = checker.select_items(&[1, 2], &nodes, false);
        let backward = checker.select_items(&[1, 2], &nodes, true);

        assert_eq!(
            vec![1, 1, 0],
            forward.iter().map(|item| item.group_id).collect::<Vec<_>>()
        );
        assert_eq!(
            vec![0, 0, 1],
            backward.iter().map(|item| item.group_id).collect::<Vec<_>>()
        );
        assert_eq!(3, forward[2].dx);
    }

    #[test]
    fn bitset_contains_the_sequence() {
        let checker = checker(ProblemVariant::AllConstraints);

        let set = checker.make_bitset(5, &[4, 1]);

        assert_eq!(vec![1, 4], set.ones().collect::<Vec<_>>());
        assert_eq!(5, set.len());
    }

    #[test]
    fn combinations_are_matched_by_inclusion() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        checker.add_infeasible_combination(checker.make_bitset(6, &[2, 3]));

        assert!(checker.customer_combination_infeasible(&checker.make_bitset(6, &[1, 2, 3])));
        assert!(!checker.customer_combination_infeasible(&checker.make_bitset(6, &[2, 4])));
        assert_eq!(1, checker.size_infeasible_combinations());
    }

    #[test]
    fn short_runtime_is_not_attempted() {
        let mut checker = checker(ProblemVariant::LoadingOnly);
        let container = Container::new(1, 1, 1, 10.0);
        let items = vec![Cuboid::new(0, 2, 2, 2, 1.0, Fragility::None, false)];
        let set = checker.make_bitset(2, &[1]);

        let status = checker
            .constraint_programming_solver(
                PackingType::Complete,
                &container,
                &set,
                &[1],
                &items,
                true,
                1e-6,
            )
            .unwrap();

        assert_eq!(LoadingStatus::Invalid, status);
        assert_eq!(0, checker.number_of_solver_calls());
        assert!(checker.caches.is_empty());
    }

    #[test]
    fn known_sets_generalise_without_support() {
        let mut checker = checker(ProblemVariant::LoadingOnly);
        let mask = LoadingMask::loading_only();
        let container = Container::new(1, 1, 1, 10.0);
        let infeasible = checker.make_bitset(5, &[1, 2]);
        checker
            .add_status(&[1, 2], &infeasible, mask, LoadingStatus::Infeasible)
            .unwrap();

        let superset = checker.make_bitset(5, &[1, 2, 3]);
        let status = checker
            .constraint_programming_solver(
                PackingType::Complete,
                &container,
                &superset,
                &[3, 2, 1],
                &[],
                true,
                f64::MAX,
            )
            .unwrap();

        assert_eq!(LoadingStatus::Infeasible, status);
        assert_eq!(0, checker.number_of_solver_calls());
    }

    #[test]
    fn feasible_answers_under_the_configured_mask_are_routes() {
        let mut checker = checker(ProblemVariant::LoadingOnly);
        let set = checker.make_bitset(4, &[1, 3]);

        checker
            .add_status(&[3, 1], &set, LoadingMask::loading_only(), LoadingStatus::FeasOpt)
            .unwrap();

        assert!(checker.route_is_in_feas_sequences(&[3, 1]));
        assert!(!checker.route_is_in_feas_sequences(&[1, 3]));
        assert_eq!(1, checker.number_of_feasible_routes());

        // A permutation is answered from the set cache and becomes a route as well.
        let status = checker.precheck(&[1, 3], &set, LoadingMask::loading_only(), true);
        assert_eq!(Some(LoadingStatus::FeasOpt), status);
        assert_eq!(2, checker.number_of_feasible_routes());
    }

    #[test]
    fn invalid_statuses_are_not_cached() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        let set = checker.make_bitset(2, &[1]);

        assert_eq!(
            Err(LoadingError::InvalidStatusInCache(LoadingStatus::Invalid)),
            checker.add_status(&[1], &set, LoadingMask::complete(), LoadingStatus::Invalid)
        );
    }

    #[test]
    fn missing_heuristic_gives_no_answer() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        let container = Container::new(2, 2, 2, 10.0);

        let status = checker
            .packing_heuristic(PackingType::Complete, &container, &[1], &[])
            .unwrap();
        assert_eq!(LoadingStatus::Invalid, status);

        checker.add_infeasible_sequence_heuristic(&[1]);
        let status = checker
            .packing_heuristic(PackingType::Complete, &container, &[1], &[])
            .unwrap();
        assert_eq!(LoadingStatus::Infeasible, status);
    }

    #[test]
    fn two_opt_checks_are_remembered_per_sequence() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        checker.add_two_opt_checked(&[1, 2, 3]);

        assert!(checker.is_two_opt_checked(&[1, 2, 3]));
        assert!(!checker.is_two_opt_checked(&[3, 2, 1]));
    }

    #[test]
    fn min_vehicles_uses_the_capacity_bound_when_it_has_slack() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        let container = Container::new(10, 10, 10, 100.0);
        let nodes = checker.make_bitset(3, &[1, 2]);

        assert_eq!(
            2,
            checker.determine_min_vehicles(true, 0.5, &container, &nodes, 120.0, 10.0)
        );
        assert_eq!(
            1,
            checker.determine_min_vehicles(true, 0.5, &container, &nodes, 90.0, 10.0)
        );
        assert_eq!(
            2,
            checker.determine_min_vehicles(false, 0.5, &container, &nodes, 190.0, 10.0)
        );
    }

    #[test]
    fn min_vehicles_is_lifted_by_bin_packing() {
        let mut checker = checker(ProblemVariant::AllConstraints);
        let container = Container::new(10, 10, 10, 100.0);
        let heavy = |id: usize| {
            Group::new(
                id,
                id,
                vec![Cuboid::new(0, 1, 1, 1, 60.0, Fragility::None, true)],
            )
        };
        let nodes = vec![Group::empty(0), heavy(1), heavy(2), heavy(3)];
        checker.set_bin_packing_model(&nodes, vec![container.clone(); 3]);
        let selected = checker.make_bitset(4, &[1, 2, 3]);

        // 180 / 100 rounds up to 2, but no two customers fit together.
        assert_eq!(
            3,
            checker.determine_min_vehicles(true, 0.5, &container, &selected, 180.0, 3.0)
        );
        assert_eq!(Some(3), checker.solve_bin_packing_approximation());
    }
}
