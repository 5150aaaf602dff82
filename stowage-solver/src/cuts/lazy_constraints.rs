use fixedbitset::FixedBitSet;
use log::debug;
use stowage_loading::CallType;
use stowage_loading::Container;
use stowage_loading::Cuboid;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::LoadingStatus;
use stowage_loading::PackingType;

use super::Cut;
use super::CutType;
use crate::error::RoutingError;

/// Turns routes which cannot be loaded into cuts.
///
/// Before a route is cut off, the generator tries to find a smaller part of it which is already
/// infeasible ("lifting"); a cut on that part also excludes every other route which contains it.
#[derive(Clone, Copy, Debug)]
pub struct LazyConstraintsGenerator<'a> {
    nodes: &'a [Group],
    x_values: &'a [Vec<f64>],
}

impl<'a> LazyConstraintsGenerator<'a> {
    /// `x_values[i][j]` is the value of arc `(i, j)` in the solution being separated.
    pub fn new(nodes: &'a [Group], x_values: &'a [Vec<f64>]) -> LazyConstraintsGenerator<'a> {
        LazyConstraintsGenerator { nodes, x_values }
    }

    fn x(&self, tail: usize, head: usize) -> f64 {
        self.x_values
            .get(tail)
            .and_then(|row| row.get(head))
            .copied()
            .unwrap_or(0.0)
    }

    /// Cuts based on the customer set of `sequence`, if the route is infeasible even when the
    /// customers may be unloaded in any order.
    pub fn two_path_inequality_lifting(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        set: &FixedBitSet,
        container: &Container,
        items: &[Cuboid],
    ) -> Result<Option<Vec<Cut>>, RoutingError> {
        let max_runtime = checker
            .params
            .determine_max_runtime(CallType::TwoPath, f64::MAX);
        let status = checker.constraint_programming_solver(
            PackingType::LifoNoSequence,
            container,
            set,
            sequence,
            items,
            CallType::TwoPath.is_exact(),
            max_runtime,
        )?;

        if status != LoadingStatus::Infeasible {
            return Ok(None);
        }

        self.create_two_path_cuts(checker, sequence, set, container)
            .map(Some)
    }

    /// Cuts based on the order of `sequence`, if the route is infeasible without support.
    pub fn regular_path_lifting(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        container: &Container,
        items: &[Cuboid],
    ) -> Result<Option<Vec<Cut>>, RoutingError> {
        let max_runtime = checker
            .params
            .determine_max_runtime(CallType::RegularPath, f64::MAX);
        let set = checker.make_bitset(self.nodes.len(), sequence);
        let status = checker.constraint_programming_solver(
            PackingType::NoSupport,
            container,
            &set,
            sequence,
            items,
            CallType::RegularPath.is_exact(),
            max_runtime,
        )?;

        if status != LoadingStatus::Infeasible {
            return Ok(None);
        }

        self.create_regular_path_cuts(checker, sequence, container)
            .map(Some)
    }

    /// Removes customers in order of increasing volume as long as the rest stays infeasible and
    /// returns the smallest infeasible rest, or `None` if no customer could be removed. `set` is
    /// updated to the returned customers.
    pub fn determine_minimal_infeasible_subset(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        set: &mut FixedBitSet,
        container: &Container,
    ) -> Result<Option<Vec<usize>>, RoutingError> {
        let mut sorted = sequence.to_vec();
        sorted.sort_by(|&a, &b| {
            self.nodes[a]
                .total_volume
                .total_cmp(&self.nodes[b].total_volume)
                .then(a.cmp(&b))
        });

        let mut removed = 0;
        while removed < sorted.len() {
            let subset = &sorted[removed + 1..];

            if checker.route_is_in_feas_sequences(subset) {
                break;
            }

            let items = checker.select_items(subset, self.nodes, false);
            let heuristic_status =
                checker.packing_heuristic(PackingType::Complete, container, subset, &items)?;
            if heuristic_status == LoadingStatus::FeasOpt {
                break;
            }

            let node = sorted[removed];
            set_membership(set, node, false);

            let max_runtime = checker
                .params
                .determine_max_runtime(CallType::MinInfSet, f64::MAX);
            let status = checker.constraint_programming_solver(
                PackingType::LifoNoSequence,
                container,
                set,
                subset,
                &items,
                CallType::MinInfSet.is_exact(),
                max_runtime,
            )?;

            if status == LoadingStatus::Infeasible {
                removed += 1;
                continue;
            }

            set_membership(set, node, true);
            break;
        }

        if removed == 0 {
            return Ok(None);
        }

        Ok(Some(sorted[removed..].to_vec()))
    }

    /// Removes customers from the front (or the back) of `sequence` as long as the rest stays
    /// infeasible and returns the shortest infeasible rest, or `None` if no customer could be
    /// removed.
    pub fn determine_minimal_infeasible_sub_path(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        container: &Container,
        from_front: bool,
    ) -> Result<Option<Vec<usize>>, RoutingError> {
        let mut removed = 0;
        while removed < sequence.len() {
            let path = sub_path(sequence, removed + 1, from_front);

            if checker.route_is_in_feas_sequences(path) {
                break;
            }

            let items = checker.select_items(path, self.nodes, false);
            let heuristic_status =
                checker.packing_heuristic(PackingType::Complete, container, path, &items)?;
            if heuristic_status == LoadingStatus::FeasOpt {
                break;
            }

            let max_runtime = checker
                .params
                .determine_max_runtime(CallType::MinInfPath, f64::MAX);
            let set = checker.make_bitset(self.nodes.len(), path);
            let status = checker.constraint_programming_solver(
                PackingType::NoSupport,
                container,
                &set,
                path,
                &items,
                CallType::MinInfPath.is_exact(),
                max_runtime,
            )?;

            if status != LoadingStatus::Infeasible {
                break;
            }

            removed += 1;
        }

        if removed == 0 {
            return Ok(None);
        }

        Ok(Some(sub_path(sequence, removed, from_front).to_vec()))
    }

    /// A two-path cut on `sequence`, and one on its minimal infeasible subset if there is one. The
    /// customers of the smallest infeasible set are registered as an infeasible combination.
    pub fn create_two_path_cuts(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        set: &FixedBitSet,
        container: &Container,
    ) -> Result<Vec<Cut>, RoutingError> {
        let mut reduced_set = set.clone();

        let mut cuts = vec![self.create_constraint(CutType::TwoPath, sequence, 2)?];

        if let Some(subset) =
            self.determine_minimal_infeasible_subset(checker, sequence, &mut reduced_set, container)?
        {
            debug!("reduced infeasible set {sequence:?} to {subset:?}");
            cuts.push(self.create_constraint(CutType::TwoPathMIS, &subset, 2)?);
        }

        checker.add_infeasible_combination(reduced_set);

        Ok(cuts)
    }

    /// Tournament cuts on the minimal infeasible sub paths of `sequence`, or on `sequence` itself
    /// if it has none.
    pub fn create_regular_path_cuts(
        &self,
        checker: &mut LoadingChecker,
        sequence: &[usize],
        container: &Container,
    ) -> Result<Vec<Cut>, RoutingError> {
        let mut cuts = Vec::with_capacity(3);

        let from_front =
            self.determine_minimal_infeasible_sub_path(checker, sequence, container, true)?;
        if let Some(path) = &from_front {
            cuts.push(self.create_constraint(CutType::RegularPathFront, path, 0)?);
        }

        let from_back =
            self.determine_minimal_infeasible_sub_path(checker, sequence, container, false)?;
        if let Some(path) = &from_back {
            if from_front.as_ref() != Some(path) {
                cuts.push(self.create_constraint(CutType::RegularPathBack, path, 0)?);
            }
        }

        if from_front.is_none() && from_back.is_none() {
            cuts.push(self.create_constraint(CutType::RegularPath, sequence, 0)?);
        }

        Ok(cuts)
    }

    /// The cut of type `cut_type` on `sequence`. `min_vehicles` is only used by the subtour
    /// elimination families.
    pub fn create_constraint(
        &self,
        cut_type: CutType,
        sequence: &[usize],
        min_vehicles: usize,
    ) -> Result<Cut, RoutingError> {
        match cut_type {
            CutType::SEC | CutType::TwoPath | CutType::TwoPathMIS => {
                if min_vehicles == 0 {
                    return Err(RoutingError::ZeroMinVehicles);
                }
                Ok(self.subtour_elimination(cut_type, sequence, min_vehicles))
            }
            CutType::TwoPathTail => Ok(self.two_path_tail(cut_type, sequence)),
            CutType::RegularPath | CutType::RegularPathFront | CutType::RegularPathBack => {
                Ok(self.tournament(cut_type, sequence))
            }
            CutType::TailTournament => Ok(self.tail_tournament(cut_type, sequence)),
            CutType::UndirectedPath => Ok(self.undirected_path(cut_type, sequence)),
            CutType::UndirectedTailPath => Ok(self.undirected_tail_path(cut_type, sequence)),
            CutType::InfeasibleTailPath => Ok(self.infeasible_tail_path(cut_type, sequence)),
            other => Err(RoutingError::UnknownCutType(other)),
        }
    }

    /// At most `|S| - k` arcs inside `S`, in either direction.
    fn subtour_elimination(&self, cut_type: CutType, sequence: &[usize], min_vehicles: usize) -> Cut {
        let mut cut = Cut::new(cut_type);
        self.add_arcs_inside(&mut cut, sequence);
        cut.rhs = -(sequence.len() as f64 - min_vehicles as f64);
        cut
    }

    fn two_path_tail(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        self.add_arcs_inside(&mut cut, sequence);

        for customer in (1..self.nodes.len()).filter(|customer| !sequence.contains(customer)) {
            for &node in sequence {
                cut.add_arc(1.0, customer, node, self.x(customer, node));
                cut.add_arc(1.0, node, customer, self.x(node, customer));
            }
        }

        cut.rhs = -(sequence.len() as f64 - 2.0);
        cut
    }

    /// At most `|S| - 2` forward arcs of the sequence.
    fn tournament(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        self.add_forward_arcs(&mut cut, sequence);
        cut.rhs = -(sequence.len() as f64 - 2.0);
        cut
    }

    fn tail_tournament(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        self.add_forward_arcs(&mut cut, sequence);
        for &node in sequence {
            cut.add_arc(-0.5, node, 0, self.x(node, 0));
        }
        cut.rhs = -(sequence.len() as f64 - 1.0);
        cut
    }

    fn undirected_path(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        for pair in sequence.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            cut.add_arc(-1.0, i, j, self.x(i, j));
            cut.add_arc(-1.0, j, i, self.x(j, i));
        }
        cut.rhs = -(sequence.len() as f64 - 2.0);
        cut
    }

    /// The route was just found in the solution, so its arcs are evaluated as used.
    fn undirected_tail_path(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        for pair in sequence.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            cut.add_arc(-1.0, i, j, 1.0);
            cut.add_arc(-1.0, j, i, 0.0);
        }
        for &node in sequence {
            cut.add_arc(-0.5, node, 0, 0.0);
        }
        cut.rhs = -(sequence.len() as f64 - 1.0);
        cut
    }

    fn infeasible_tail_path(&self, cut_type: CutType, sequence: &[usize]) -> Cut {
        let mut cut = Cut::new(cut_type);
        for pair in sequence.windows(2) {
            cut.add_arc(-1.0, pair[0], pair[1], 1.0);
        }
        if let Some(&last) = sequence.last() {
            cut.add_arc(-1.0, last, 0, 1.0);
        }
        cut.rhs = -(sequence.len() as f64 - 1.0);
        cut.calc_violation();
        cut
    }

    fn add_arcs_inside(&self, cut: &mut Cut, sequence: &[usize]) {
        for (position, &i) in sequence.iter().enumerate() {
            for &j in &sequence[position + 1..] {
                cut.add_arc(-1.0, i, j, self.x(i, j));
                cut.add_arc(-1.0, j, i, self.x(j, i));
            }
        }
    }

    fn add_forward_arcs(&self, cut: &mut Cut, sequence: &[usize]) {
        for (position, &i) in sequence.iter().enumerate() {
            for &j in &sequence[position + 1..] {
                cut.add_arc(-1.0, i, j, self.x(i, j));
            }
        }
    }
}

/// `sequence` without its first (or last) `removed` customers.
fn sub_path(sequence: &[usize], removed: usize, from_front: bool) -> &[usize] {
    if from_front {
        &sequence[removed..]
    } else {
        &sequence[..sequence.len() - removed]
    }
}

fn set_membership(set: &mut FixedBitSet, node: usize, member: bool) {
    if node >= set.len() {
        set.grow(node + 1);
    }
    set.set(node, member);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator_fixture() -> (Vec<Group>, Vec<Vec<f64>>) {
        let nodes = (0..5).map(Group::empty).collect::<Vec<_>>();
        let mut x_values = vec![vec![0.0; 5]; 5];
        x_values[0][1] = 1.0;
        x_values[1][2] = 1.0;
        x_values[2][3] = 1.0;
        x_values[3][0] = 1.0;
        (nodes, x_values)
    }

    #[test]
    fn subtour_elimination_counts_arcs_in_both_directions() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let cut = generator.create_constraint(CutType::SEC, &[1, 2, 3], 1).unwrap();

        assert_eq!(6, cut.arcs.len());
        assert_eq!(-2.0, cut.rhs);
        assert_eq!(-2.0, cut.lhs_value);
        assert_eq!(-1.0, cut.coefficient(3, 1));
    }

    #[test]
    fn subtour_elimination_needs_a_vehicle() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        assert_eq!(
            Err(RoutingError::ZeroMinVehicles),
            generator.create_constraint(CutType::TwoPath, &[1, 2], 0)
        );
    }

    #[test]
    fn tournament_only_uses_forward_arcs() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let cut = generator.create_constraint(CutType::RegularPath, &[1, 2, 3], 0).unwrap();

        assert_eq!(3, cut.arcs.len());
        assert_eq!(-1.0, cut.coefficient(1, 3));
        assert_eq!(0.0, cut.coefficient(3, 1));
        assert_eq!(-1.0, cut.rhs);
        assert_eq!(-2.0, cut.lhs_value);
    }

    #[test]
    fn tail_tournament_includes_the_depot_arcs() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let cut = generator
            .create_constraint(CutType::TailTournament, &[1, 2, 3], 0)
            .unwrap();

        assert_eq!(6, cut.arcs.len());
        assert_eq!(-0.5, cut.coefficient(3, 0));
        assert_eq!(-2.0, cut.rhs);
        assert_eq!(-2.5, cut.lhs_value);
    }

    #[test]
    fn two_path_tail_rewards_arcs_leaving_the_set() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let cut = generator.create_constraint(CutType::TwoPathTail, &[1, 2], 0).unwrap();

        // One pair inside, and both directions to customers 3 and 4 from both members.
        assert_eq!(2 + 8, cut.arcs.len());
        assert_eq!(1.0, cut.coefficient(2, 3));
        assert_eq!(1.0, cut.coefficient(4, 1));
        assert_eq!(0.0, cut.coefficient(0, 1));
        assert_eq!(0.0, cut.rhs);
        assert_eq!(0.0, cut.lhs_value);
    }

    #[test]
    fn undirected_paths_only_use_consecutive_arcs() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let path = generator
            .create_constraint(CutType::UndirectedPath, &[1, 2, 3], 0)
            .unwrap();
        let tail_path = generator
            .create_constraint(CutType::UndirectedTailPath, &[1, 2, 3], 0)
            .unwrap();

        assert_eq!(4, path.arcs.len());
        assert_eq!(0.0, path.coefficient(1, 3));
        assert_eq!(-1.0, path.rhs);

        assert_eq!(7, tail_path.arcs.len());
        assert_eq!(-2.0, tail_path.lhs_value);
        assert_eq!(-2.0, tail_path.rhs);
    }

    #[test]
    fn infeasible_tail_path_is_violated_by_the_route() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        let cut = generator
            .create_constraint(CutType::InfeasibleTailPath, &[1, 2, 3], 0)
            .unwrap();

        assert_eq!(3, cut.arcs.len());
        assert_eq!(-1.0, cut.coefficient(3, 0));
        assert_eq!(-3.0, cut.lhs_value);
        assert_eq!(-2.0, cut.rhs);
        assert_eq!(1.0, cut.violation);
    }

    #[test]
    fn separation_families_cannot_be_created_from_a_route() {
        let (nodes, x_values) = generator_fixture();
        let generator = LazyConstraintsGenerator::new(&nodes, &x_values);

        assert_eq!(
            Err(RoutingError::UnknownCutType(CutType::RCC)),
            generator.create_constraint(CutType::RCC, &[1, 2], 2)
        );
    }
}
