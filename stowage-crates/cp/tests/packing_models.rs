#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use stowage_cp::Solver;
use stowage_cp::branching::FirstFail;
use stowage_cp::branching::InDomainMin;
use stowage_cp::branching::IndependentVariableValueBrancher;
use stowage_cp::constraints;
use stowage_cp::results::SatisfactionResult;
use stowage_cp::termination::Indefinite;
use stowage_cp::termination::Interrupt;
use stowage_cp::variables::DomainId;
use stowage_cp::variables::Literal;

/// Two boxes of the given lengths on a line of length `capacity`, which must not overlap.
fn two_boxes_on_a_line(
    solver: &mut Solver,
    lengths: [i32; 2],
    capacity: i32,
) -> ([DomainId; 2], [Literal; 2]) {
    let starts = lengths.map(|length| solver.new_bounded_integer(0, capacity - length));
    let first_before_second = solver.new_literal();
    let second_before_first = solver.new_literal();

    solver
        .add_constraint(constraints::less_than_or_equals(
            vec![starts[0].into(), starts[1].scaled(-1)],
            -i64::from(lengths[0]),
        ))
        .implied_by(first_before_second)
        .unwrap();
    solver
        .add_constraint(constraints::less_than_or_equals(
            vec![starts[1].into(), starts[0].scaled(-1)],
            -i64::from(lengths[1]),
        ))
        .implied_by(second_before_first)
        .unwrap();
    solver
        .add_constraint(constraints::clause(vec![
            first_before_second,
            second_before_first,
        ]))
        .post()
        .unwrap();

    (starts, [first_before_second, second_before_first])
}

#[test]
fn boxes_which_fit_are_placed_disjointly() {
    let mut solver = Solver::default();
    let (starts, _) = two_boxes_on_a_line(&mut solver, [3, 2], 5);

    let mut brancher = solver.default_brancher();
    match solver.satisfy(&mut brancher, &mut Indefinite) {
        SatisfactionResult::Satisfiable(solution) => {
            let first = solution.get_integer_value(starts[0]);
            let second = solution.get_integer_value(starts[1]);
            assert!(first + 3 <= second || second + 2 <= first);
        }
        other => panic!("expected a placement, got {other:?}"),
    }
}

#[test]
fn boxes_which_are_too_long_are_infeasible() {
    let mut solver = Solver::default();
    let _ = two_boxes_on_a_line(&mut solver, [3, 3], 5);

    let mut brancher = IndependentVariableValueBrancher::new(
        FirstFail::new(&solver.all_domains()),
        InDomainMin,
    );

    assert!(matches!(
        solver.satisfy(&mut brancher, &mut Indefinite),
        SatisfactionResult::Unsatisfiable
    ));
}

#[test]
fn area_of_overlap_follows_the_product() {
    let mut solver = Solver::default();
    let width = solver.new_bounded_integer(0, 4);
    let height = solver.new_bounded_integer(0, 4);
    let area = solver.new_bounded_integer(0, 16);

    solver
        .add_constraint(constraints::times(width, height, area))
        .post()
        .unwrap();
    solver
        .add_constraint(constraints::greater_than_or_equals(vec![area.into()], 12))
        .post()
        .unwrap();

    assert_eq!(3, solver.lower_bound(width));
    assert_eq!(3, solver.lower_bound(height));
}

#[test]
fn raised_interrupt_stops_search() {
    let mut solver = Solver::default();
    let variables = (0..6)
        .map(|_| solver.new_bounded_integer(0, 5))
        .collect::<Vec<_>>();
    solver
        .add_constraint(constraints::all_different(variables))
        .post()
        .unwrap();

    let flag = Arc::new(AtomicBool::new(false));
    let mut interrupt = Interrupt::new(Arc::clone(&flag));
    interrupt.raise();

    let mut brancher = solver.default_brancher();
    let result = solver.satisfy(&mut brancher, &mut interrupt);

    assert!(matches!(result, SatisfactionResult::Unknown));
}
