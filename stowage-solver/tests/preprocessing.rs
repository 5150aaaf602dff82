#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use stowage_loading::Container;
use stowage_loading::ContainerLoadingParams;
use stowage_loading::Cuboid;
use stowage_loading::Fragility;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::ProblemVariant;
use stowage_solver::BranchAndCutParams;
use stowage_solver::RoutingError;
use stowage_solver::preprocessing::determine_extended_infeasible_paths;
use stowage_solver::preprocessing::determine_infeasible_paths;

fn checker(variant: ProblemVariant) -> LoadingChecker {
    let mut params = ContainerLoadingParams::new(variant).expect("valid variant");
    params.cp_solver.threads = 1;
    LoadingChecker::new(params)
}

/// The depot followed by one customer per `(dx, dy, dz, weight)`.
fn nodes(items: &[(i32, i32, i32, f64)]) -> Vec<Group> {
    let mut nodes = vec![Group::empty(0)];
    nodes.extend(items.iter().enumerate().map(|(index, &(dx, dy, dz, weight))| {
        Group::new(
            index + 1,
            index + 1,
            vec![Cuboid::new(index, dx, dy, dz, weight, Fragility::None, false)],
        )
    }));
    nodes
}

#[test]
fn heavy_pairs_are_registered_by_weight_alone() {
    let mut checker = checker(ProblemVariant::Weight);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(&[(1, 1, 1, 60.0), (1, 1, 1, 60.0), (1, 1, 1, 30.0)]);

    let paths =
        determine_infeasible_paths(&mut checker, &nodes, &container, &BranchAndCutParams::default())
            .unwrap();

    assert_eq!(vec![(1, 2), (2, 1)], paths.arcs);
    assert!(paths.tail_paths.is_empty());
    assert_eq!(1, checker.size_infeasible_combinations());
    assert_eq!(0, checker.number_of_solver_calls());

    let mut pair = checker.make_bitset(nodes.len(), &[1, 2]);
    assert!(checker.customer_combination_infeasible(&pair));
    pair.set(2, false);
    pair.insert(3);
    assert!(!checker.customer_combination_infeasible(&pair));
}

#[test]
fn overweight_pairs_need_no_packing_model_with_three_dimensional_loading() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(&[(1, 1, 1, 60.0), (1, 1, 1, 60.0), (1, 1, 1, 60.0)]);

    let paths =
        determine_infeasible_paths(&mut checker, &nodes, &container, &BranchAndCutParams::default())
            .unwrap();

    assert_eq!(6, paths.arcs.len());
    assert_eq!(3, checker.size_infeasible_combinations());
    assert_eq!(0, checker.number_of_solver_calls());
}

#[test]
fn pairs_which_do_not_fit_geometrically_become_infeasible_arcs() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    // The volume suffices, but two 2x2 footprints do not fit next to each other on a 3x3 floor.
    let container = Container::new(3, 3, 1, 100.0);
    let nodes = nodes(&[(2, 2, 1, 10.0), (2, 2, 1, 10.0)]);

    let paths =
        determine_infeasible_paths(&mut checker, &nodes, &container, &BranchAndCutParams::default())
            .unwrap();

    assert_eq!(vec![(1, 2), (2, 1)], paths.arcs);
    assert!(paths.tail_paths.is_empty());
    assert_eq!(1, checker.size_infeasible_combinations());
    // One model per customer, and one for the pair which both directions share.
    assert_eq!(3, checker.number_of_solver_calls());
}

#[test]
fn loadable_pairs_are_not_restricted() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 2, 2, 100.0);
    let nodes = nodes(&[(2, 2, 2, 10.0), (2, 2, 2, 10.0)]);
    let params = BranchAndCutParams::default();

    let mut paths = determine_infeasible_paths(&mut checker, &nodes, &container, &params).unwrap();
    determine_extended_infeasible_paths(&mut checker, &nodes, &container, &params, &mut paths)
        .unwrap();

    assert!(paths.arcs.is_empty());
    assert!(paths.tail_paths.is_empty());
    assert_eq!(0, checker.size_infeasible_combinations());
    assert_eq!(3, checker.number_of_solver_calls());
}

#[test]
fn a_customer_which_does_not_fit_makes_the_instance_infeasible() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(2, 2, 2, 100.0);
    let nodes = nodes(&[(3, 1, 1, 10.0), (1, 1, 1, 10.0)]);

    let result =
        determine_infeasible_paths(&mut checker, &nodes, &container, &BranchAndCutParams::default());

    assert_eq!(Err(RoutingError::InfeasibleCustomer(1)), result);
}
