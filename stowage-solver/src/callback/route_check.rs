use std::time::Instant;

use log::debug;
use log::warn;
use stowage_loading::CallType;
use stowage_loading::Container;
use stowage_loading::Cuboid;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::LoadingStatus;
use stowage_loading::PackingType;

use super::CallbackElement;
use super::CallbackStrategy;
use super::CallbackTracker;
use super::LazyConstraintSink;
use crate::cuts::Cut;
use crate::cuts::CutType;
use crate::cuts::LazyConstraintsGenerator;
use crate::error::RoutingError;
use crate::parameters::BranchAndCutParams;
use crate::subtours::Subtour;
use crate::subtours::find_integer_subtours;

/// Checks the subtours of integer solutions and adds cuts for those which violate the capacity
/// bound or cannot be loaded.
#[derive(Debug)]
pub struct RouteCallback<'a> {
    strategy: CallbackStrategy,
    nodes: &'a [Group],
    container: &'a Container,
    params: BranchAndCutParams,
    checker: &'a mut LoadingChecker,
    tracker: CallbackTracker,
    started_at: Instant,
    /// Whether a cut was added for the solution which is currently checked.
    cut_added: bool,
    aborted: bool,
}

impl<'a> RouteCallback<'a> {
    /// The time limit of `params` is counted from the construction of the callback.
    pub fn new(
        strategy: CallbackStrategy,
        nodes: &'a [Group],
        container: &'a Container,
        params: BranchAndCutParams,
        checker: &'a mut LoadingChecker,
    ) -> RouteCallback<'a> {
        RouteCallback {
            strategy,
            nodes,
            container,
            params,
            checker,
            tracker: CallbackTracker::default(),
            started_at: Instant::now(),
            cut_added: false,
            aborted: false,
        }
    }

    pub fn tracker(&self) -> &CallbackTracker {
        &self.tracker
    }

    /// Whether the last check was stopped because a packing call had no time left.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Decomposes the integer solution `x_values` into subtours and checks them.
    pub fn check_solution(
        &mut self,
        x_values: &[Vec<f64>],
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<bool, RoutingError> {
        let subtours = find_integer_subtours(x_values, self.nodes);
        self.check_routes(x_values, &subtours, sink)
    }

    /// Checks every subtour of the solution `x_values` and returns whether all of them are routes
    /// which can be loaded, i.e. whether no cut was added to `sink`.
    pub fn check_routes(
        &mut self,
        x_values: &[Vec<f64>],
        subtours: &[Subtour],
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<bool, RoutingError> {
        self.cut_added = false;
        self.aborted = false;
        self.tracker.increment_element(CallbackElement::IntegerRoutes);

        let generator = LazyConstraintsGenerator::new(self.nodes, x_values);

        for subtour in subtours {
            if subtour.sequence.len() == 1 {
                self.tracker.increment_element(CallbackElement::SingleCustomer);
                continue;
            }

            self.tracker.increment_element(CallbackElement::MinNumVehicles);
            let min_vehicles = self.checker.determine_min_vehicles(
                self.params.enable_min_vehicle_lifting,
                self.params.min_vehicle_lifting_threshold,
                self.container,
                &subtour.nodes,
                subtour.weight,
                subtour.volume,
            );

            if self.strategy == CallbackStrategy::OneDimensional {
                if subtour.connected_to_depot && min_vehicles < 2 {
                    self.checker
                        .add_feasible_sequence_from_outside(&subtour.sequence);
                    continue;
                }

                let cut =
                    generator.create_constraint(CutType::SEC, &subtour.sequence, min_vehicles.max(1))?;
                self.add_cut(sink, cut);
                continue;
            }

            if !subtour.connected_to_depot {
                self.tracker.increment_element(CallbackElement::Disconnected);
                let cut =
                    generator.create_constraint(CutType::SEC, &subtour.sequence, min_vehicles.max(1))?;
                self.add_cut(sink, cut);
                continue;
            }

            self.tracker.increment_element(CallbackElement::Connected);

            if min_vehicles > 1 {
                self.tracker.increment_element(CallbackElement::MinVehApproxInf);
                let cut = generator.create_constraint(CutType::SEC, &subtour.sequence, min_vehicles)?;
                self.add_cut(sink, cut);
                continue;
            }

            self.tracker.increment_element(CallbackElement::SingleVehicle);
            let status = self.check_single_vehicle_subtour(&generator, subtour, sink)?;

            if status == LoadingStatus::Invalid {
                warn!(
                    "route {:?} could not be checked in the remaining time",
                    subtour.sequence
                );
                self.aborted = true;
                return Ok(false);
            }
        }

        Ok(!self.cut_added)
    }

    /// Prints the counters of all checks so far.
    pub fn log_statistics(&self) {
        self.tracker.log();
    }

    fn check_single_vehicle_subtour(
        &mut self,
        generator: &LazyConstraintsGenerator<'_>,
        subtour: &Subtour,
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<LoadingStatus, RoutingError> {
        let sequence = &subtour.sequence;

        if self.params.activate_memory_management {
            if self.checker.route_is_in_feas_sequences(sequence) {
                self.tracker.increment_element(CallbackElement::RoutePrechecked);
                return Ok(LoadingStatus::FeasOpt);
            }
            self.tracker
                .increment_element(CallbackElement::RoutePrecheckedNot);

            if self.checker.customer_combination_infeasible(&subtour.nodes) {
                self.tracker.increment_element(CallbackElement::CustCombiInf);
                let cut = generator.create_constraint(CutType::SEC, sequence, 2)?;
                self.add_cut(sink, cut);
                return Ok(LoadingStatus::Infeasible);
            }
            self.tracker.increment_element(CallbackElement::CustCombiInfNot);
        }

        let items = self.checker.select_items(sequence, self.nodes, false);

        if self.params.activate_heuristic {
            let status = self.checker.packing_heuristic(
                PackingType::Complete,
                self.container,
                sequence,
                &items,
            )?;
            if status == LoadingStatus::FeasOpt {
                self.tracker.increment_element(CallbackElement::HeuristicFeas);
                return Ok(LoadingStatus::FeasOpt);
            }
            self.tracker.increment_element(CallbackElement::HeuristicInf);
        }

        match self.strategy {
            CallbackStrategy::AllSimple => self.check_route_simple(generator, subtour, &items, sink),
            CallbackStrategy::All | CallbackStrategy::NoSupport => {
                self.check_route_with_lifting(generator, subtour, &items, sink)
            }
            CallbackStrategy::NoLifo | CallbackStrategy::LoadingOnly => {
                self.check_route_without_lifo(generator, subtour, &items, sink)
            }
            CallbackStrategy::OneDimensional => Ok(LoadingStatus::FeasOpt),
        }
    }

    fn check_route_simple(
        &mut self,
        generator: &LazyConstraintsGenerator<'_>,
        subtour: &Subtour,
        items: &[Cuboid],
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<LoadingStatus, RoutingError> {
        let status = self.checker.constraint_programming_solver(
            PackingType::Complete,
            self.container,
            &subtour.nodes,
            &subtour.sequence,
            items,
            true,
            f64::MAX,
        )?;

        match status {
            LoadingStatus::FeasOpt => {
                self.tracker.increment_element(CallbackElement::ExactFeas);
            }
            LoadingStatus::Infeasible => {
                self.tracker.increment_element(CallbackElement::ExactInf);
                self.tracker
                    .increment_element(CallbackElement::InfeasibleTailPathInequality);
                let cut = generator.create_constraint(
                    CutType::InfeasibleTailPath,
                    &subtour.sequence,
                    0,
                )?;
                self.add_cut(sink, cut);
            }
            _ => {
                self.tracker.increment_element(CallbackElement::ExactInvalid);
                return Ok(LoadingStatus::Invalid);
            }
        }

        Ok(status)
    }

    fn check_route_with_lifting(
        &mut self,
        generator: &LazyConstraintsGenerator<'_>,
        subtour: &Subtour,
        items: &[Cuboid],
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<LoadingStatus, RoutingError> {
        let sequence = &subtour.sequence;

        let max_runtime = self.max_runtime(CallType::ExactLimit);
        let mut status = self.checker.constraint_programming_solver(
            PackingType::Complete,
            self.container,
            &subtour.nodes,
            sequence,
            items,
            CallType::ExactLimit.is_exact(),
            max_runtime,
        )?;

        match status {
            LoadingStatus::FeasOpt => {
                self.tracker.increment_element(CallbackElement::ExactLimitFeas);
                return Ok(LoadingStatus::FeasOpt);
            }
            LoadingStatus::Infeasible => {
                self.tracker.increment_element(CallbackElement::ExactLimitInf);
            }
            LoadingStatus::Unknown => {
                self.tracker.increment_element(CallbackElement::ExactLimitUnk);
            }
            LoadingStatus::Invalid => return Ok(LoadingStatus::Invalid),
        }

        if let Some(cuts) = generator.two_path_inequality_lifting(
            self.checker,
            sequence,
            &subtour.nodes,
            self.container,
            items,
        )? {
            self.tracker
                .increment_element(CallbackElement::TwoPathInequality);
            self.add_cuts(sink, cuts);
            return Ok(LoadingStatus::Infeasible);
        }
        self.tracker
            .increment_element(CallbackElement::TwoPathInequalityNot);

        if self.strategy == CallbackStrategy::All {
            if let Some(cuts) =
                generator.regular_path_lifting(self.checker, sequence, self.container, items)?
            {
                self.tracker
                    .increment_element(CallbackElement::RegularPathInequality);
                self.add_cuts(sink, cuts);
                return Ok(LoadingStatus::Infeasible);
            }
            self.tracker
                .increment_element(CallbackElement::RegularPathInequalityNot);
        }

        if status == LoadingStatus::Unknown {
            let max_runtime = self.max_runtime(CallType::Exact);
            status = self.checker.constraint_programming_solver(
                PackingType::Complete,
                self.container,
                &subtour.nodes,
                sequence,
                items,
                CallType::Exact.is_exact(),
                max_runtime,
            )?;

            match status {
                LoadingStatus::FeasOpt => {
                    self.tracker.increment_element(CallbackElement::ExactFeas);
                    return Ok(LoadingStatus::FeasOpt);
                }
                LoadingStatus::Infeasible => {
                    self.tracker.increment_element(CallbackElement::ExactInf);
                }
                _ => {
                    self.tracker.increment_element(CallbackElement::ExactInvalid);
                    return Ok(LoadingStatus::Invalid);
                }
            }
        }

        if self.strategy == CallbackStrategy::All {
            self.tracker
                .increment_element(CallbackElement::TailPathInequality);
            let cut = generator.create_constraint(CutType::TailTournament, sequence, 0)?;
            self.add_cut(sink, cut);
        } else {
            let cuts = generator.create_regular_path_cuts(self.checker, sequence, self.container)?;
            self.add_cuts(sink, cuts);
        }

        self.check_reverse_path(generator, subtour, sink)?;

        Ok(LoadingStatus::Infeasible)
    }

    /// A route which cannot be loaded is often not loadable in reverse either; if so, both
    /// directions are cut off at once.
    fn check_reverse_path(
        &mut self,
        generator: &LazyConstraintsGenerator<'_>,
        subtour: &Subtour,
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<(), RoutingError> {
        self.tracker.increment_element(CallbackElement::ReverseSequence);

        let reversed = subtour.sequence.iter().rev().copied().collect::<Vec<_>>();
        if self.checker.route_is_in_feas_sequences(&reversed) {
            return Ok(());
        }

        let items = self.checker.select_items(&reversed, self.nodes, false);

        if self.params.activate_heuristic {
            let status = self.checker.packing_heuristic(
                PackingType::Complete,
                self.container,
                &reversed,
                &items,
            )?;
            if status == LoadingStatus::FeasOpt {
                self.tracker.increment_element(CallbackElement::RevHeurFeas);
                return Ok(());
            }
        }

        let max_runtime = self.max_runtime(CallType::ReversePath);
        let status = self.checker.constraint_programming_solver(
            PackingType::Complete,
            self.container,
            &subtour.nodes,
            &reversed,
            &items,
            CallType::ReversePath.is_exact(),
            max_runtime,
        )?;

        match status {
            LoadingStatus::FeasOpt => {
                self.tracker.increment_element(CallbackElement::RevExactFeas);
            }
            LoadingStatus::Infeasible => {
                self.tracker.increment_element(CallbackElement::RevExactInf);
                let (undirected, reverse) = if self.strategy == CallbackStrategy::All {
                    (CutType::UndirectedTailPath, CutType::TailTournament)
                } else {
                    (CutType::UndirectedPath, CutType::RegularPath)
                };
                let cut = generator.create_constraint(undirected, &subtour.sequence, 0)?;
                self.add_cut(sink, cut);
                let cut = generator.create_constraint(reverse, &reversed, 0)?;
                self.add_cut(sink, cut);
            }
            _ => {}
        }

        Ok(())
    }

    fn check_route_without_lifo(
        &mut self,
        generator: &LazyConstraintsGenerator<'_>,
        subtour: &Subtour,
        items: &[Cuboid],
        sink: &mut dyn LazyConstraintSink,
    ) -> Result<LoadingStatus, RoutingError> {
        let sequence = &subtour.sequence;

        // Once the solution is rejected anyway, further routes only get a bounded check.
        let call_type = if self.cut_added {
            CallType::ExactLimit
        } else {
            CallType::Exact
        };

        let max_runtime = self.max_runtime(call_type);
        let status = self.checker.constraint_programming_solver(
            PackingType::Complete,
            self.container,
            &subtour.nodes,
            sequence,
            items,
            call_type.is_exact(),
            max_runtime,
        )?;

        match (status, call_type) {
            (LoadingStatus::FeasOpt, CallType::Exact) => {
                self.tracker.increment_element(CallbackElement::ExactFeas);
                return Ok(LoadingStatus::FeasOpt);
            }
            (LoadingStatus::FeasOpt, _) => {
                self.tracker.increment_element(CallbackElement::ExactLimitFeas);
                return Ok(LoadingStatus::FeasOpt);
            }
            (LoadingStatus::Infeasible, _) => {
                self.tracker.increment_element(CallbackElement::ExactInf);
            }
            (LoadingStatus::Unknown, CallType::ExactLimit) => {
                self.tracker.increment_element(CallbackElement::ExactLimitUnk);
                return Ok(LoadingStatus::Unknown);
            }
            _ => {
                self.tracker.increment_element(CallbackElement::ExactInvalid);
                return Ok(LoadingStatus::Invalid);
            }
        }

        if self.strategy == CallbackStrategy::LoadingOnly {
            let cuts =
                generator.create_two_path_cuts(self.checker, sequence, &subtour.nodes, self.container)?;
            self.tracker
                .increment_element(CallbackElement::TwoPathInequality);
            self.add_cuts(sink, cuts);
            return Ok(LoadingStatus::Infeasible);
        }

        match generator.two_path_inequality_lifting(
            self.checker,
            sequence,
            &subtour.nodes,
            self.container,
            items,
        )? {
            Some(cuts) => {
                self.tracker
                    .increment_element(CallbackElement::TwoPathInequality);
                self.add_cuts(sink, cuts);
            }
            None => {
                self.tracker
                    .increment_element(CallbackElement::TwoPathInequalityNot);
                self.tracker
                    .increment_element(CallbackElement::TailPathInequality);
                let cut = generator.create_constraint(CutType::TwoPathTail, sequence, 0)?;
                self.add_cut(sink, cut);
            }
        }

        Ok(LoadingStatus::Infeasible)
    }

    /// The runtime of a packing call, capped by the time left for the routing search.
    fn max_runtime(&self, call_type: CallType) -> f64 {
        let residual = self
            .params
            .time_limit
            .saturating_sub(self.started_at.elapsed())
            .as_secs_f64();
        self.checker
            .params
            .determine_max_runtime(call_type, residual)
    }

    fn add_cuts(&mut self, sink: &mut dyn LazyConstraintSink, cuts: Vec<Cut>) {
        for cut in cuts {
            self.add_cut(sink, cut);
        }
    }

    fn add_cut(&mut self, sink: &mut dyn LazyConstraintSink, cut: Cut) {
        debug!(
            "adding {:?} cut over {} arcs with rhs {}",
            cut.cut_type,
            cut.arcs.len(),
            cut.rhs
        );
        self.tracker.record_cut(&cut);
        sink.add_lazy_constraint(cut);
        self.cut_added = true;
    }
}
