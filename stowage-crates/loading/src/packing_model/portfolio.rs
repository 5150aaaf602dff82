use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use itertools::Itertools;
use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use stowage_cp::Solver;
use stowage_cp::branching::InDomainMin;
use stowage_cp::branching::IndependentVariableValueBrancher;
use stowage_cp::branching::InputOrder;
use stowage_cp::results::SatisfactionResult;
use stowage_cp::results::Solution;
use stowage_cp::termination::Combinator;
use stowage_cp::termination::Interrupt;
use stowage_cp::termination::TerminationCondition;
use stowage_cp::termination::TimeBudget;
use stowage_cp::variables::DomainId;

use super::PackingSolution;
use super::Placement;
use super::builder::PackingInstance;
use super::builder::build_model;
use super::variables::PackingVariables;
use crate::basic_types::Axis;
use crate::basic_types::Rotation;

/// The outcome of a single search worker.
#[derive(Debug)]
pub(crate) enum WorkerOutcome {
    Satisfiable(PackingSolution),
    Unsatisfiable,
    Unknown,
}

impl WorkerOutcome {
    fn is_definitive(&self) -> bool {
        !matches!(self, WorkerOutcome::Unknown)
    }
}

/// Settings shared by all workers of one portfolio run.
#[derive(Clone, Debug)]
pub(crate) struct PortfolioSettings {
    pub(crate) threads: usize,
    pub(crate) seed: u64,
    pub(crate) log_statistics: bool,
    pub(crate) max_runtime: f64,
    /// Raised from outside to abort the whole run.
    pub(crate) interrupt: Option<Arc<AtomicBool>>,
}

/// Runs `threads` diversified searches on independent copies of the model. Worker 0 branches on the
/// items in their given order; every other worker shuffles the order with its own seed. The first
/// worker which reaches a conclusion stops all others.
pub(crate) fn solve_portfolio(
    instance: &PackingInstance<'_>,
    settings: &PortfolioSettings,
) -> WorkerOutcome {
    let time_budget = Duration::try_from_secs_f64(settings.max_runtime)
        .ok()
        .map(TimeBudget::starting_now);
    let finished = Interrupt::default();

    if settings.threads <= 1 {
        let mut termination = termination_for(time_budget, &finished, settings);
        return run_worker(instance, settings, 0, &mut termination);
    }

    thread::scope(|scope| {
        let (sender, receiver) = mpsc::channel();

        for worker in 0..settings.threads {
            let sender = sender.clone();
            let finished = finished.clone();

            let _ = scope.spawn(move || {
                let mut termination = termination_for(time_budget, &finished, settings);
                let outcome = run_worker(instance, settings, worker, &mut termination);
                if outcome.is_definitive() {
                    finished.raise();
                }
                let _ = sender.send((worker, outcome));
            });
        }
        drop(sender);

        let mut result = WorkerOutcome::Unknown;
        for (worker, outcome) in receiver {
            if !result.is_definitive() && outcome.is_definitive() {
                debug!("packing portfolio decided by worker {worker}");
                result = outcome;
            }
        }
        result
    })
}

fn termination_for(
    time_budget: Option<TimeBudget>,
    finished: &Interrupt,
    settings: &PortfolioSettings,
) -> impl TerminationCondition {
    Combinator::new(
        Combinator::new(time_budget, finished.clone()),
        settings.interrupt.clone().map(Interrupt::new),
    )
}

fn run_worker(
    instance: &PackingInstance<'_>,
    settings: &PortfolioSettings,
    worker: usize,
    termination: &mut impl TerminationCondition,
) -> WorkerOutcome {
    let mut solver = Solver::default();
    let Ok(variables) = build_model(&mut solver, instance) else {
        return WorkerOutcome::Unsatisfiable;
    };

    let order = decision_order(&solver, &variables, worker, settings.seed);
    let mut brancher = IndependentVariableValueBrancher::new(InputOrder::new(&order), InDomainMin);

    let result = solver.satisfy(&mut brancher, termination);
    if settings.log_statistics {
        solver.log_statistics();
    }

    match result {
        SatisfactionResult::Satisfiable(solution) => {
            WorkerOutcome::Satisfiable(extract_solution(&solution, &variables))
        }
        SatisfactionResult::Unsatisfiable => WorkerOutcome::Unsatisfiable,
        SatisfactionResult::Unknown => WorkerOutcome::Unknown,
    }
}

/// Items are placed one after another: orientation first, then the start coordinates. The
/// customer positions follow, and all remaining variables are fixed in creation order.
fn decision_order(
    solver: &Solver,
    variables: &PackingVariables,
    worker: usize,
    seed: u64,
) -> Vec<DomainId> {
    let mut item_order = (0..variables.items.len()).collect::<Vec<_>>();
    if worker > 0 {
        let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(worker as u64));
        item_order.shuffle(&mut rng);
    }

    let mut order = Vec::with_capacity(solver.num_domains());
    for index in item_order {
        let item = &variables.items[index];
        order.push(item.rotated.domain());
        order.extend(Axis::ALL.map(|axis| item.start(axis)));
    }
    order.extend(variables.customer_positions.iter().copied());
    order.extend(solver.all_domains());

    order
}

fn extract_solution(solution: &Solution, variables: &PackingVariables) -> PackingSolution {
    let placements = variables
        .items
        .iter()
        .map(|item| Placement {
            x: solution.get_integer_value(item.start(Axis::X)),
            y: solution.get_integer_value(item.start(Axis::Y)),
            z: solution.get_integer_value(item.start(Axis::Z)),
            rotation: if solution.get_literal_value(item.rotated) {
                Rotation::Yaw
            } else {
                Rotation::None
            },
        })
        .collect();

    let sequence = (!variables.customer_positions.is_empty()).then(|| {
        variables
            .customer_positions
            .iter()
            .enumerate()
            .sorted_by_key(|&(_, &position)| solution.get_integer_value(position))
            .map(|(customer, _)| customer)
            .collect()
    });

    PackingSolution {
        placements,
        sequence,
    }
}
