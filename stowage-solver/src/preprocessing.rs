//! Finds arcs and short paths which cannot be part of any route before the routing search starts.
use fixedbitset::FixedBitSet;
use log::debug;
use log::info;
use stowage_loading::Container;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::LoadingStatus;
use stowage_loading::PackingType;

use crate::error::RoutingError;
use crate::parameters::BranchAndCutParams;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfeasiblePaths {
    /// `(i, j)` such that no route visits `j` directly after `i`.
    pub arcs: Vec<(usize, usize)>,
    /// `(i, j)` such that a route may visit `j` directly after `i` only if it continues after
    /// `j`; the path cannot be loaded as the end of a route.
    pub tail_paths: Vec<(usize, usize)>,
}

/// Checks every pair of customers in both directions.
///
/// A pair which exceeds the weight limit or the volume of the container is registered as an
/// infeasible combination without solving a packing model. Otherwise, with three-dimensional
/// loading, each direction is solved without support (an infeasible answer makes the arc
/// infeasible) and then with all constraints (an infeasible answer makes it a tail path).
///
/// Before the first packing model of a pair is solved, each of its customers is checked on its
/// own; a customer which does not fit into an empty container makes the instance infeasible.
pub fn determine_infeasible_paths(
    checker: &mut LoadingChecker,
    nodes: &[Group],
    container: &Container,
    params: &BranchAndCutParams,
) -> Result<InfeasiblePaths, RoutingError> {
    let mut paths = InfeasiblePaths::default();
    let mut checked_customers = FixedBitSet::with_capacity(nodes.len());
    let three_dimensional = checker
        .params
        .loading_problem
        .enable_three_dimensional_loading;

    for i in 1..nodes.len() {
        for j in i + 1..nodes.len() {
            let weight = nodes[i].total_weight + nodes[j].total_weight;
            let volume = nodes[i].total_volume + nodes[j].total_volume;

            if weight > container.weight_limit || volume > container.volume() {
                checker.add_infeasible_combination(checker.make_bitset(nodes.len(), &[i, j]));
                paths.arcs.push((i, j));
                paths.arcs.push((j, i));
                continue;
            }

            if !three_dimensional {
                continue;
            }

            for customer in [i, j] {
                if !checked_customers.contains(customer) {
                    check_single_customer(checker, nodes, container, customer)?;
                    checked_customers.insert(customer);
                }
            }

            let forward = check_path(checker, nodes, container, params, &mut paths, i, j)?;
            let backward = check_path(checker, nodes, container, params, &mut paths, j, i)?;

            if !forward && !backward {
                checker.add_infeasible_combination(checker.make_bitset(nodes.len(), &[i, j]));
            }
        }
    }

    info!(
        "{} infeasible arcs, {} infeasible tail paths, {} infeasible customer combinations",
        paths.arcs.len(),
        paths.tail_paths.len(),
        checker.size_infeasible_combinations()
    );

    Ok(paths)
}

/// Promotes a tail path `(i, j)` to an infeasible arc if no third customer can follow `j`.
pub fn determine_extended_infeasible_paths(
    checker: &mut LoadingChecker,
    nodes: &[Group],
    container: &Container,
    params: &BranchAndCutParams,
    paths: &mut InfeasiblePaths,
) -> Result<(), RoutingError> {
    if !checker
        .params
        .loading_problem
        .enable_three_dimensional_loading
    {
        return Ok(());
    }

    let mut promoted = Vec::new();

    for &(i, j) in &paths.tail_paths {
        let mut extendable = false;

        for k in (1..nodes.len()).filter(|&k| k != i && k != j) {
            let weight = nodes[i].total_weight + nodes[j].total_weight + nodes[k].total_weight;
            let volume = nodes[i].total_volume + nodes[j].total_volume + nodes[k].total_volume;
            if weight > container.weight_limit || volume > container.volume() {
                continue;
            }

            let path = [i, j, k];
            let items = checker.select_items(&path, nodes, false);

            let mut status = LoadingStatus::Infeasible;
            if params.activate_heuristic {
                status =
                    checker.packing_heuristic(PackingType::Complete, container, &path, &items)?;
            }

            if status != LoadingStatus::FeasOpt {
                let set = checker.make_bitset(nodes.len(), &path);
                status = checker.constraint_programming_solver(
                    PackingType::NoSupport,
                    container,
                    &set,
                    &path,
                    &items,
                    true,
                    f64::MAX,
                )?;
                if status == LoadingStatus::Infeasible {
                    continue;
                }
            }

            extendable = true;
            break;
        }

        if !extendable {
            promoted.push((i, j));
        }
    }

    for arc in &promoted {
        paths.tail_paths.retain(|tail_path| tail_path != arc);
    }
    paths.arcs.extend(promoted.iter().copied());

    info!(
        "{} tail paths cannot be extended and are infeasible arcs",
        promoted.len()
    );

    Ok(())
}

fn check_single_customer(
    checker: &mut LoadingChecker,
    nodes: &[Group],
    container: &Container,
    customer: usize,
) -> Result<(), RoutingError> {
    let path = [customer];
    let items = checker.select_items(&path, nodes, false);
    let set = checker.make_bitset(nodes.len(), &path);

    let status = checker.constraint_programming_solver(
        PackingType::LifoNoSequence,
        container,
        &set,
        &path,
        &items,
        true,
        f64::MAX,
    )?;

    if status == LoadingStatus::Infeasible {
        return Err(RoutingError::InfeasibleCustomer(nodes[customer].external_id));
    }

    Ok(())
}

/// Whether the customers can be visited in the order `front`, `back` by some route; records
/// infeasible arcs and tail paths in `paths`.
fn check_path(
    checker: &mut LoadingChecker,
    nodes: &[Group],
    container: &Container,
    params: &BranchAndCutParams,
    paths: &mut InfeasiblePaths,
    front: usize,
    back: usize,
) -> Result<bool, RoutingError> {
    let path = [front, back];
    let items = checker.select_items(&path, nodes, false);

    if params.activate_heuristic
        && checker.packing_heuristic(PackingType::Complete, container, &path, &items)?
            == LoadingStatus::FeasOpt
    {
        return Ok(true);
    }

    let set = checker.make_bitset(nodes.len(), &path);

    let status = checker.constraint_programming_solver(
        PackingType::NoSupport,
        container,
        &set,
        &path,
        &items,
        true,
        f64::MAX,
    )?;
    if status == LoadingStatus::Infeasible {
        debug!("arc ({front}, {back}) cannot be loaded");
        paths.arcs.push((front, back));
        return Ok(false);
    }

    let status = checker.constraint_programming_solver(
        PackingType::Complete,
        container,
        &set,
        &path,
        &items,
        true,
        f64::MAX,
    )?;
    if status == LoadingStatus::Infeasible {
        debug!("path ({front}, {back}) cannot end a route");
        paths.tail_paths.push((front, back));
    }

    Ok(true)
}
