//! The one-dimensional relaxation of the loading problem as a mixed integer program.
//!
//! Variable `x[i][k]` assigns customer `i` to container `k` and `u[k]` opens container `k`:
//!
//! ```text
//! min  Σ_k u[k]
//! s.t. Σ_k x[i][k]          = b[i]           for every customer i
//!      Σ_i weight[i] x[i][k] <= limit[k] u[k]  for every container k
//!      Σ_i volume[i] x[i][k] <= volume[k] u[k] for every container k
//!      u[k]                  >= u[k + 1]
//! ```
//!
//! The right-hand side `b[i]` is one when customer `i` has to be served and zero otherwise, so a
//! re-solve for a subset of the customers only changes `b`. The optimum is a lower bound on the
//! number of vehicles which serve the selected customers.
use fixedbitset::FixedBitSet;
use good_lp::Expression;
use good_lp::ProblemVariables;
use good_lp::ResolutionError;
use good_lp::Solution;
use good_lp::SolverModel;
use good_lp::Variable;
use good_lp::constraint;
use good_lp::default_solver;
use good_lp::variable;
use log::debug;
use log::warn;

use crate::basic_types::Container;
use crate::basic_types::Group;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Demand {
    weight: f64,
    volume: f64,
}

/// Minimises the number of containers needed by a set of customers.
#[derive(Clone, Debug)]
pub struct BinPacking1D {
    /// The demand of customer `i` is stored at `i - 1`; the depot has none.
    demands: Vec<Demand>,
    containers: Vec<Container>,
    /// The right-hand side `b[i]` of the assignment constraint of every customer.
    assignment_rhs: Vec<f64>,
}

impl BinPacking1D {
    /// `nodes` includes the depot at index 0. Every customer is selected initially.
    pub fn new(nodes: &[Group], containers: Vec<Container>) -> BinPacking1D {
        let demands = nodes
            .iter()
            .skip(1)
            .map(|node| Demand {
                weight: node.total_weight,
                volume: node.total_volume,
            })
            .collect::<Vec<_>>();
        let assignment_rhs = vec![1.0; demands.len()];

        BinPacking1D {
            demands,
            containers,
            assignment_rhs,
        }
    }

    /// The number of containers needed by all customers.
    pub fn solve(&mut self) -> usize {
        self.assignment_rhs.iter_mut().for_each(|rhs| *rhs = 1.0);
        self.optimise()
    }

    /// The number of containers needed by the customers in `nodes`, where bit `i + 1` of `nodes`
    /// selects the customer with demand index `i`.
    pub fn resolve(&mut self, nodes: &FixedBitSet) -> usize {
        for (group, rhs) in self.assignment_rhs.iter_mut().enumerate() {
            *rhs = if nodes.contains(group + 1) { 1.0 } else { 0.0 };
        }
        self.optimise()
    }

    fn optimise(&self) -> usize {
        let number_of_selected = self
            .assignment_rhs
            .iter()
            .filter(|&&rhs| rhs > 0.5)
            .count();
        if number_of_selected == 0 {
            return 0;
        }
        if self.containers.is_empty() {
            warn!("bin packing without containers");
            return 0;
        }

        // Opened containers form a prefix of the fleet, and no more containers than customers are
        // ever opened.
        let containers = &self.containers[..self.containers.len().min(number_of_selected)];

        let mut variables = ProblemVariables::new();
        let assigned: Vec<Vec<Variable>> = self
            .demands
            .iter()
            .map(|_| {
                containers
                    .iter()
                    .map(|_| variables.add(variable().binary()))
                    .collect()
            })
            .collect();
        let used: Vec<Variable> = containers
            .iter()
            .map(|_| variables.add(variable().binary()))
            .collect();

        let objective = sum(used.iter().map(|&u| Expression::from(u)));
        let mut model = variables.minimise(objective).using(default_solver);

        for (row, &rhs) in assigned.iter().zip(&self.assignment_rhs) {
            let served = sum(row.iter().map(|&x| Expression::from(x)));
            model = model.with(constraint!(served == rhs));
        }

        for (k, container) in containers.iter().enumerate() {
            let weight = sum(
                self.demands
                    .iter()
                    .zip(&assigned)
                    .map(|(demand, row)| demand.weight * row[k]),
            );
            let volume = sum(
                self.demands
                    .iter()
                    .zip(&assigned)
                    .map(|(demand, row)| demand.volume * row[k]),
            );
            model = model.with(constraint!(weight <= container.weight_limit * used[k]));
            model = model.with(constraint!(volume <= container.volume() * used[k]));
        }

        for pair in used.windows(2) {
            model = model.with(constraint!(pair[0] >= pair[1]));
        }

        debug!(
            "bin packing of {number_of_selected} customers into at most {} containers",
            containers.len()
        );

        match model.solve() {
            Ok(solution) => used
                .iter()
                .map(|&u| solution.value(u))
                .sum::<f64>()
                .round() as usize,
            Err(ResolutionError::Infeasible) => {
                warn!(
                    "customers cannot be served by the {} containers of the fleet",
                    self.containers.len()
                );
                self.containers.len()
            }
            Err(error) => {
                let bound = self.capacity_bound();
                warn!("bin packing failed ({error}), returning the capacity bound {bound}");
                bound
            }
        }
    }

    /// The number of the largest containers needed to hold the total selected weight and volume.
    fn capacity_bound(&self) -> usize {
        let (weight, volume) = self
            .demands
            .iter()
            .zip(&self.assignment_rhs)
            .filter(|(_, rhs)| **rhs > 0.5)
            .fold((0.0, 0.0), |(weight, volume), (demand, _)| {
                (weight + demand.weight, volume + demand.volume)
            });
        let largest_weight = self
            .containers
            .iter()
            .map(|container| container.weight_limit)
            .fold(0.0, f64::max);
        let largest_volume = self
            .containers
            .iter()
            .map(Container::volume)
            .fold(0.0, f64::max);

        let ratio = |total: f64, capacity: f64| {
            if capacity > 0.0 {
                (total / capacity).ceil() as usize
            } else {
                0
            }
        };

        ratio(weight, largest_weight)
            .max(ratio(volume, largest_volume))
            .max(1)
    }
}

fn sum(terms: impl Iterator<Item = Expression>) -> Expression {
    terms.fold(Expression::from(0.0), |total, term| total + term)
}
