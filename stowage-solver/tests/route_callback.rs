#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use stowage_loading::Container;
use stowage_loading::ContainerLoadingParams;
use stowage_loading::Cuboid;
use stowage_loading::Fragility;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::ProblemVariant;
use stowage_solver::BranchAndCutParams;
use stowage_solver::callback::CallbackElement;
use stowage_solver::callback::RouteCallback;
use stowage_solver::callback::create_route_callback;
use stowage_solver::cuts::Cut;
use stowage_solver::cuts::CutType;

fn checker(variant: ProblemVariant) -> LoadingChecker {
    let mut params = ContainerLoadingParams::new(variant).expect("valid variant");
    params.cp_solver.threads = 1;
    LoadingChecker::new(params)
}

fn item(dx: i32, dy: i32, dz: i32, weight: f64, fragility: Fragility) -> Cuboid {
    Cuboid::new(0, dx, dy, dz, weight, fragility, false)
}

/// The depot followed by one customer per item.
fn nodes(items: Vec<Cuboid>) -> Vec<Group> {
    let mut nodes = vec![Group::empty(0)];
    nodes.extend(
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Group::new(index + 1, index + 1, vec![item])),
    );
    nodes
}

fn solution(size: usize, arcs: &[(usize, usize)]) -> Vec<Vec<f64>> {
    let mut x_values = vec![vec![0.0; size]; size];
    for &(tail, head) in arcs {
        x_values[tail][head] = 1.0;
    }
    x_values
}

/// Checks the single route `0 -> 1 -> 2 -> 0` and returns whether it was accepted, together with
/// the cuts which were added.
fn check_route(
    variant: ProblemVariant,
    params: BranchAndCutParams,
    checker: &mut LoadingChecker,
    container: &Container,
    nodes: &[Group],
) -> (bool, Vec<Cut>) {
    let strategy = create_route_callback(variant, &params).unwrap();
    let x_values = solution(nodes.len(), &[(0, 1), (1, 2), (2, 0)]);
    let mut cuts = Vec::new();

    let mut callback = RouteCallback::new(strategy, nodes, container, params, checker);
    let feasible = callback.check_solution(&x_values, &mut cuts).unwrap();

    (feasible, cuts)
}

#[test]
fn capacity_only_routes_are_registered_without_a_packing_model() {
    let mut checker = checker(ProblemVariant::Weight);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(vec![
        item(1, 1, 1, 30.0, Fragility::None),
        item(1, 1, 1, 30.0, Fragility::None),
    ]);

    let (feasible, cuts) = check_route(
        ProblemVariant::Weight,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );

    assert!(feasible);
    assert!(cuts.is_empty());
    assert!(checker.route_is_in_feas_sequences(&[1, 2]));
    assert_eq!(0, checker.number_of_solver_calls());
}

#[test]
fn overweight_routes_are_cut_by_the_vehicle_bound() {
    let mut checker = checker(ProblemVariant::Weight);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(vec![
        item(1, 1, 1, 60.0, Fragility::None),
        item(1, 1, 1, 60.0, Fragility::None),
    ]);

    let (feasible, cuts) = check_route(
        ProblemVariant::Weight,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );

    assert!(!feasible);
    assert_eq!(1, cuts.len());
    assert_eq!(CutType::SEC, cuts[0].cut_type);
    // Two vehicles are needed, so no arc may connect the customers.
    assert_eq!(0.0, cuts[0].rhs);
}

#[test]
fn disconnected_subtours_are_cut_without_a_packing_model() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(vec![
        item(1, 1, 1, 10.0, Fragility::None),
        item(1, 1, 1, 10.0, Fragility::None),
        item(1, 1, 1, 10.0, Fragility::None),
    ]);
    let params = BranchAndCutParams::default();
    let strategy = create_route_callback(ProblemVariant::LoadingOnly, &params).unwrap();
    let x_values = solution(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
    let mut cuts = Vec::new();

    let mut callback = RouteCallback::new(strategy, &nodes, &container, params, &mut checker);
    let feasible = callback.check_solution(&x_values, &mut cuts).unwrap();

    assert!(!feasible);
    assert_eq!(1, callback.tracker().element_count(CallbackElement::Disconnected));
    assert_eq!(1, callback.tracker().element_count(CallbackElement::SingleCustomer));
    assert_eq!(1, cuts.len());
    assert_eq!(CutType::SEC, cuts[0].cut_type);
    assert_eq!(-1.0, cuts[0].rhs);
    assert_eq!(-2.0, cuts[0].lhs_value);
    assert_eq!(0, checker.number_of_solver_calls());
}

#[test]
fn infeasible_routes_are_remembered_as_customer_combinations() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(3, 3, 1, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 1, 10.0, Fragility::None),
        item(2, 2, 1, 10.0, Fragility::None),
    ]);

    let (feasible, cuts) = check_route(
        ProblemVariant::LoadingOnly,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );

    assert!(!feasible);
    assert_eq!(1, cuts.len());
    assert_eq!(CutType::TwoPath, cuts[0].cut_type);
    assert_eq!(1, checker.size_infeasible_combinations());
    // The route, and the second customer on its own after the first one was removed.
    assert_eq!(2, checker.number_of_solver_calls());

    let (feasible, cuts) = check_route(
        ProblemVariant::LoadingOnly,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );

    assert!(!feasible);
    assert_eq!(CutType::SEC, cuts[0].cut_type);
    assert_eq!(2, checker.number_of_solver_calls());
}

#[test]
fn feasible_routes_are_answered_from_memory() {
    let mut checker = checker(ProblemVariant::NoLifo);
    let container = Container::new(2, 2, 4, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, 10.0, Fragility::None),
        item(2, 2, 2, 10.0, Fragility::None),
    ]);

    let (feasible, cuts) = check_route(
        ProblemVariant::NoLifo,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );
    assert!(feasible);
    assert!(cuts.is_empty());
    assert_eq!(1, checker.number_of_solver_calls());

    let (feasible, _) = check_route(
        ProblemVariant::NoLifo,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );
    assert!(feasible);
    assert_eq!(1, checker.number_of_solver_calls());
}

#[test]
fn unsupported_stacking_without_lifo_gets_a_tail_cut() {
    let mut checker = checker(ProblemVariant::NoLifo);
    let container = Container::new(2, 2, 4, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, 10.0, Fragility::Fragile),
        item(1, 2, 2, 10.0, Fragility::None),
    ]);

    let (feasible, cuts) = check_route(
        ProblemVariant::NoLifo,
        BranchAndCutParams::default(),
        &mut checker,
        &container,
        &nodes,
    );

    // Without support and fragility the items stack, so only the route itself is cut off.
    assert!(!feasible);
    assert_eq!(1, cuts.len());
    assert_eq!(CutType::TwoPathTail, cuts[0].cut_type);
}

#[test]
fn simple_version_cuts_off_the_route_as_a_tail_path() {
    let mut checker = checker(ProblemVariant::AllConstraints);
    let container = Container::new(2, 2, 4, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, 10.0, Fragility::Fragile),
        item(1, 2, 2, 10.0, Fragility::None),
    ]);
    let params = BranchAndCutParams {
        simple_version: true,
        ..Default::default()
    };

    let (feasible, cuts) = check_route(
        ProblemVariant::AllConstraints,
        params,
        &mut checker,
        &container,
        &nodes,
    );

    assert!(!feasible);
    assert_eq!(1, cuts.len());
    assert_eq!(CutType::InfeasibleTailPath, cuts[0].cut_type);
    assert_eq!(1.0, cuts[0].violation);
    assert_eq!(1, checker.number_of_solver_calls());
}

#[test]
fn installed_bin_packing_model_lifts_the_vehicle_bound() {
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(vec![
        item(1, 1, 1, 60.0, Fragility::None),
        item(1, 1, 1, 60.0, Fragility::None),
        item(1, 1, 1, 60.0, Fragility::None),
    ]);
    let x_values = solution(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);

    let sec_rhs = |install_model: bool| {
        let mut checker = checker(ProblemVariant::Weight);
        if install_model {
            checker.set_bin_packing_model(&nodes, vec![container.clone(); 3]);
        }
        let params = BranchAndCutParams::default();
        let strategy = create_route_callback(ProblemVariant::Weight, &params).unwrap();
        let mut cuts = Vec::new();

        let mut callback = RouteCallback::new(strategy, &nodes, &container, params, &mut checker);
        assert!(!callback.check_solution(&x_values, &mut cuts).unwrap());

        assert_eq!(1, cuts.len());
        assert_eq!(CutType::SEC, cuts[0].cut_type);
        cuts[0].rhs
    };

    // 180 / 100 only asks for two vehicles, but no two customers share one.
    assert_eq!(-1.0, sec_rhs(false));
    assert_eq!(0.0, sec_rhs(true));
}
