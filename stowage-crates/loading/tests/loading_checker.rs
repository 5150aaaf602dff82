#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use stowage_loading::Container;
use stowage_loading::ContainerLoadingParams;
use stowage_loading::Cuboid;
use stowage_loading::Fragility;
use stowage_loading::Group;
use stowage_loading::LoadingChecker;
use stowage_loading::LoadingError;
use stowage_loading::LoadingStatus;
use stowage_loading::PackingType;
use stowage_loading::ProblemVariant;

fn checker(variant: ProblemVariant) -> LoadingChecker {
    let mut params = ContainerLoadingParams::new(variant).expect("valid variant");
    params.cp_solver.threads = 1;
    LoadingChecker::new(params)
}

fn item(dx: i32, dy: i32, dz: i32, fragility: Fragility) -> Cuboid {
    Cuboid::new(0, dx, dy, dz, 10.0, fragility, false)
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

fn check(
    checker: &mut LoadingChecker,
    container: &Container,
    nodes: &[Group],
    route: &[usize],
    is_exact: bool,
) -> Result<LoadingStatus, LoadingError> {
    let items = checker.select_items(route, nodes, false);
    let set = checker.make_bitset(nodes.len(), route);
    checker.constraint_programming_solver(
        PackingType::Complete,
        container,
        &set,
        route,
        &items,
        is_exact,
        f64::MAX,
    )
}

#[test]
fn two_cubes_fit_next_to_each_other() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 4, 4, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);

    let status = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();

    assert_eq!(LoadingStatus::FeasOpt, status);
    assert_eq!(1, checker.number_of_feasible_routes());
}

#[test]
fn equal_footprints_stack_with_full_support() {
    let mut checker = checker(ProblemVariant::NoLifo);
    let container = Container::new(2, 2, 4, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);

    let status = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();

    assert_eq!(LoadingStatus::FeasOpt, status);
}

#[test]
fn half_supported_item_cannot_be_stacked() {
    let mut checker = checker(ProblemVariant::NoLifo);
    let container = Container::new(2, 2, 4, 100.0);
    // The narrow item may not rest on the fragile one, and the fragile one is only half
    // supported on top of the narrow one.
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::Fragile),
        item(1, 2, 2, Fragility::None),
    ]);

    let status = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();

    assert_eq!(LoadingStatus::Infeasible, status);
}

#[test]
fn supersets_of_infeasible_sets_are_answered_from_the_cache() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(2, 2, 2, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
        item(1, 1, 1, Fragility::None),
    ]);

    let pair = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();
    assert_eq!(LoadingStatus::Infeasible, pair);
    assert_eq!(1, checker.number_of_solver_calls());

    let triple = check(&mut checker, &container, &nodes, &[3, 2, 1], true).unwrap();
    assert_eq!(LoadingStatus::Infeasible, triple);
    assert_eq!(1, checker.number_of_solver_calls());
}

#[test]
fn subsets_of_feasible_sets_are_answered_from_the_cache() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 2, 2, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);

    let pair = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, pair);

    let single = check(&mut checker, &container, &nodes, &[2], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, single);

    let reversed = check(&mut checker, &container, &nodes, &[2, 1], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, reversed);

    assert_eq!(1, checker.number_of_solver_calls());
    assert!(checker.route_is_in_feas_sequences(&[2, 1]));
}

#[test]
fn sequence_masks_distinguish_permutations() {
    let mut checker = checker(ProblemVariant::NoSupport);
    let container = Container::new(4, 2, 2, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);

    let forward = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, forward);
    assert_eq!(1, checker.number_of_solver_calls());

    // The same customers in a different order are a different question.
    let backward = check(&mut checker, &container, &nodes, &[2, 1], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, backward);
    assert_eq!(2, checker.number_of_solver_calls());

    let repeated = check(&mut checker, &container, &nodes, &[1, 2], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, repeated);
    assert_eq!(2, checker.number_of_solver_calls());
}

#[test]
fn exact_calls_never_report_unknown() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let interrupt = Arc::new(AtomicBool::new(true));
    checker.set_interrupt(Arc::clone(&interrupt));
    let container = Container::new(4, 4, 2, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);

    let bounded = check(&mut checker, &container, &nodes, &[1, 2, 3], false).unwrap();
    assert_eq!(LoadingStatus::Unknown, bounded);

    let exact = check(&mut checker, &container, &nodes, &[1, 2, 3], true);
    assert_eq!(Err(LoadingError::ExactCallUndecided), exact);

    // An unknown answer is only reused by bounded calls.
    let calls = checker.number_of_solver_calls();
    let bounded = check(&mut checker, &container, &nodes, &[1, 2, 3], false).unwrap();
    assert_eq!(LoadingStatus::Unknown, bounded);
    assert_eq!(calls, checker.number_of_solver_calls());

    interrupt.store(false, Ordering::Relaxed);
    let exact = check(&mut checker, &container, &nodes, &[1, 2, 3], true).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, exact);

    // Once decided, the answer replaces the unknown one for every kind of call.
    let calls = checker.number_of_solver_calls();
    let bounded = check(&mut checker, &container, &nodes, &[1, 2, 3], false).unwrap();
    assert_eq!(LoadingStatus::FeasOpt, bounded);
    assert_eq!(calls, checker.number_of_solver_calls());
}

#[test]
fn packing_is_written_back_without_caching() {
    let mut checker = checker(ProblemVariant::LoadingOnly);
    let container = Container::new(4, 2, 2, 100.0);
    let nodes = nodes(vec![
        item(2, 2, 2, Fragility::None),
        item(2, 2, 2, Fragility::None),
    ]);
    let mut items = checker.select_items(&[1, 2], &nodes, false);

    let status = checker
        .constraint_programming_solver_get_packing(
            PackingType::Complete,
            &container,
            &[1, 2],
            &mut items,
            f64::MAX,
        )
        .unwrap();

    assert_eq!(LoadingStatus::FeasOpt, status);
    let mut xs = items.iter().map(|item| item.x).collect::<Vec<_>>();
    xs.sort_unstable();
    assert_eq!(vec![0, 2], xs);
    assert_eq!(0, checker.number_of_feasible_routes());
}
