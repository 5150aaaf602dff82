use fnv::FnvHashMap;
use stowage_cp::ConstraintOperationError;
use stowage_cp::Solver;
use stowage_cp::constraints;
use stowage_cp::variables::DomainId;
use stowage_cp::variables::LinearTerm;
use stowage_cp::variables::Literal;

use super::variables::Direction;
use super::variables::ItemVariables;
use super::variables::PackingVariables;
use crate::basic_types::Axis;
use crate::basic_types::Container;
use crate::basic_types::Cuboid;
use crate::basic_types::HomogeneityKey;
use crate::basic_types::LoadingFlag;
use crate::basic_types::LoadingMask;
use crate::placement_points::ItemPlacementPatterns;

/// Everything a worker needs to build its own copy of the model.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PackingInstance<'a> {
    pub(crate) container: &'a Container,
    pub(crate) items: &'a [Cuboid],
    pub(crate) number_of_customers: usize,
    pub(crate) mask: LoadingMask,
    pub(crate) support_area: f64,
    pub(crate) patterns: &'a FnvHashMap<HomogeneityKey, ItemPlacementPatterns>,
}

/// Pairwise literals which are indexed by `i * n + j`.
struct PairLiterals {
    literals: Vec<Option<Literal>>,
    number_of_items: usize,
}

impl PairLiterals {
    fn new(number_of_items: usize) -> PairLiterals {
        PairLiterals {
            literals: vec![None; number_of_items * number_of_items],
            number_of_items,
        }
    }

    fn insert(&mut self, i: usize, j: usize, literal: Literal) {
        self.literals[i * self.number_of_items + j] = Some(literal);
    }

    fn get(&self, i: usize, j: usize) -> Option<Literal> {
        self.literals[i * self.number_of_items + j]
    }

    /// For relations which do not depend on the order of the pair.
    fn get_symmetric(&self, i: usize, j: usize) -> Option<Literal> {
        if i < j { self.get(i, j) } else { self.get(j, i) }
    }
}

/// Builds the packing model for the instance into `solver`.
///
/// An error means that the model is infeasible at the root.
pub(crate) fn build_model(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
) -> Result<PackingVariables, ConstraintOperationError> {
    let enable_support = instance.mask.contains(LoadingFlag::Support);
    let enable_fragility = instance.mask.contains(LoadingFlag::Fragility);
    let enable_lifo = instance.mask.contains(LoadingFlag::Lifo);
    let enable_sequence = instance.mask.contains(LoadingFlag::Sequence);

    let n = instance.items.len();
    let mut variables = PackingVariables::new(n);

    for item in instance.items {
        let item_variables = create_item_variables(solver, instance, item, enable_support)?;
        variables.items.push(item_variables);
    }
    if solver.is_infeasible() {
        return Err(ConstraintOperationError::InfeasibleState);
    }

    add_no_overlap(solver, &mut variables)?;

    if enable_support || enable_fragility {
        let overlaps = add_xy_overlap(solver, &variables)?;
        let supports = add_support_relations(solver, instance, &variables, &overlaps, enable_fragility)?;

        if enable_support {
            add_support_area(solver, instance, &variables, &overlaps, &supports, enable_fragility)?;
        }
    }

    if enable_lifo {
        if enable_sequence {
            add_lifo_with_sequence(solver, instance, &variables)?;
        } else {
            add_lifo_without_sequence(solver, instance, &mut variables)?;
        }
    }

    Ok(variables)
}

fn create_item_variables(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
    item: &Cuboid,
    enable_support: bool,
) -> Result<ItemVariables, ConstraintOperationError> {
    let container = instance.container;
    let patterns = &instance.patterns[&item.homogeneity_key()];

    let start = Axis::ALL.map(|axis| solver.new_sparse_integer(patterns.axis(axis).to_vec()));
    let end = Axis::ALL.map(|axis| {
        solver.new_bounded_integer(
            item.minimum_rotatable_dimension(axis),
            container.dimension(axis),
        )
    });
    let size = Axis::ALL.map(|axis| {
        let minimum = item.minimum_rotatable_dimension(axis);
        let maximum = item.maximum_rotatable_dimension(axis);
        if minimum == maximum {
            solver.new_bounded_integer(minimum, minimum)
        } else {
            solver.new_sparse_integer(vec![minimum, maximum])
        }
    });

    if solver.is_infeasible() {
        return Err(ConstraintOperationError::InfeasibleState);
    }

    for index in 0..3 {
        solver
            .add_constraint(constraints::equals(
                vec![start[index].into(), size[index].into(), end[index].scaled(-1)],
                0,
            ))
            .post()?;
    }

    let rotated = solver.new_literal();
    let [length, width, _] = size;
    solver
        .add_constraint(constraints::equals(vec![length.into()], i64::from(item.dx)))
        .implied_by(!rotated)?;
    solver
        .add_constraint(constraints::equals(vec![width.into()], i64::from(item.dy)))
        .implied_by(!rotated)?;
    solver
        .add_constraint(constraints::equals(vec![length.into()], i64::from(item.dy)))
        .implied_by(rotated)?;
    solver
        .add_constraint(constraints::equals(vec![width.into()], i64::from(item.dx)))
        .implied_by(rotated)?;
    if !item.enable_horizontal_rotation {
        solver.add_constraint(constraints::clause(vec![!rotated])).post()?;
    }

    let start_z = start[2];
    let on_floor = if enable_support {
        let on_floor = solver.new_literal();
        solver
            .add_constraint(constraints::less_than_or_equals(vec![start_z.into()], 0))
            .implied_by(on_floor)?;
        solver
            .add_constraint(constraints::greater_than(vec![start_z.into()], 0))
            .implied_by(!on_floor)?;
        if item.require_floor_placement {
            solver.add_constraint(constraints::clause(vec![on_floor])).post()?;
        }
        Some(on_floor)
    } else {
        if item.require_floor_placement {
            solver
                .add_constraint(constraints::less_than_or_equals(vec![start_z.into()], 0))
                .post()?;
        }
        None
    };

    Ok(ItemVariables {
        start,
        end,
        size,
        rotated,
        on_floor,
    })
}

/// `a - b`
fn difference(a: DomainId, b: DomainId) -> Vec<LinearTerm> {
    vec![a.into(), b.scaled(-1)]
}

/// Every pair of items is separated along at least one axis.
fn add_no_overlap(
    solver: &mut Solver,
    variables: &mut PackingVariables,
) -> Result<(), ConstraintOperationError> {
    let n = variables.items.len();

    for i in 0..n {
        for j in i + 1..n {
            let literals = Direction::ALL.map(|_| solver.new_literal());
            variables.set_relations(i, j, literals);

            let item_i = variables.items[i];
            let item_j = variables.items[j];
            for axis in Axis::ALL {
                let (beyond, before) = Direction::along(axis);
                let beyond = variables.relation(i, j, beyond);
                let before = variables.relation(i, j, before);

                solver
                    .add_constraint(constraints::less_than_or_equals(
                        difference(item_j.end(axis), item_i.start(axis)),
                        0,
                    ))
                    .implied_by(beyond)?;
                solver
                    .add_constraint(constraints::less_than(
                        difference(item_i.start(axis), item_j.end(axis)),
                        0,
                    ))
                    .implied_by(!beyond)?;

                solver
                    .add_constraint(constraints::less_than_or_equals(
                        difference(item_i.end(axis), item_j.start(axis)),
                        0,
                    ))
                    .implied_by(before)?;
                solver
                    .add_constraint(constraints::less_than(
                        difference(item_j.start(axis), item_i.end(axis)),
                        0,
                    ))
                    .implied_by(!before)?;
            }

            solver
                .add_constraint(constraints::clause(literals.to_vec()))
                .post()?;
        }
    }

    Ok(())
}

/// The literal of a pair `i < j` is true iff the footprints of the items intersect.
fn add_xy_overlap(
    solver: &mut Solver,
    variables: &PackingVariables,
) -> Result<PairLiterals, ConstraintOperationError> {
    let n = variables.items.len();
    let mut overlaps = PairLiterals::new(n);

    for i in 0..n {
        for j in i + 1..n {
            let overlap = solver.new_literal();
            overlaps.insert(i, j, overlap);

            let horizontal = [
                Direction::Left,
                Direction::Right,
                Direction::Behind,
                Direction::InFront,
            ]
            .map(|direction| variables.relation(i, j, direction));

            let mut clause = vec![overlap];
            clause.extend(horizontal);
            solver.add_constraint(constraints::clause(clause)).post()?;

            for separated in horizontal {
                solver
                    .add_constraint(constraints::clause(vec![!separated, !overlap]))
                    .post()?;
            }
        }
    }

    Ok(overlaps)
}

/// The literal of a pair `(i, j)` is true iff `j` directly supports `i`: the top of `j` touches
/// the bottom of `i` and the footprints intersect.
fn add_support_relations(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
    variables: &PackingVariables,
    overlaps: &PairLiterals,
    enable_fragility: bool,
) -> Result<PairLiterals, ConstraintOperationError> {
    let n = variables.items.len();
    let mut supports = PairLiterals::new(n);

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }

            let support = solver.new_literal();
            let adjacent = solver.new_literal();
            supports.insert(i, j, support);

            let overlap = overlaps
                .get_symmetric(i, j)
                .expect("overlap literals exist for every pair");
            let end_z_j = variables.items[j].end(Axis::Z);
            let start_z_i = variables.items[i].start(Axis::Z);

            solver
                .add_constraint(constraints::equals(difference(end_z_j, start_z_i), 0))
                .implied_by(adjacent)?;
            solver
                .add_constraint(constraints::not_equals(end_z_j, start_z_i))
                .implied_by(!adjacent)?;

            solver
                .add_constraint(constraints::clause(vec![adjacent, !support]))
                .post()?;
            solver
                .add_constraint(constraints::clause(vec![support, !adjacent, !overlap]))
                .post()?;
            solver
                .add_constraint(constraints::clause(vec![overlap, !support]))
                .post()?;

            if enable_fragility && instance.items[j].is_fragile() && !instance.items[i].is_fragile()
            {
                solver
                    .add_constraint(constraints::clause(vec![!support]))
                    .post()?;
            }
        }
    }

    Ok(supports)
}

/// Every item which is not on the floor must rest on supporting items which together cover at
/// least the required share of its base area.
fn add_support_area(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
    variables: &PackingVariables,
    overlaps: &PairLiterals,
    supports: &PairLiterals,
    enable_fragility: bool,
) -> Result<(), ConstraintOperationError> {
    let n = variables.items.len();
    let container = instance.container;
    let items = instance.items;

    let mut overlap_areas: Vec<Option<DomainId>> = vec![None; n * n];
    for i in 0..n {
        for j in i + 1..n {
            if items[i].dz + items[j].dz > container.dz {
                continue;
            }

            let overlap = overlaps
                .get_symmetric(i, j)
                .expect("overlap literals exist for every pair");
            let extents = [Axis::X, Axis::Y].map(|axis| {
                add_axis_overlap(solver, variables, i, j, axis, container.dimension(axis), overlap)
            });
            let [x_overlap, y_overlap] = extents;
            let (x_overlap, y_overlap) = (x_overlap?, y_overlap?);

            let largest_area = items[i].area().max(items[j].area());
            let area = solver.new_bounded_integer(0, saturating_i32(largest_area));
            solver
                .add_constraint(constraints::times(x_overlap, y_overlap, area))
                .post()?;

            overlap_areas[i * n + j] = Some(area);
        }
    }

    for i in 0..n {
        let Some(on_floor) = variables.items[i].on_floor else {
            continue;
        };

        let mut usable_areas = Vec::new();
        for j in 0..n {
            if i == j {
                continue;
            }
            if enable_fragility && items[j].is_fragile() && !items[i].is_fragile() {
                continue;
            }
            let Some(area) = overlap_areas[i.min(j) * n + i.max(j)] else {
                continue;
            };

            let support = supports.get(i, j).expect("support literals exist for every pair");
            let usable = solver.new_bounded_integer(
                0,
                saturating_i32(items[i].area().min(items[j].area())),
            );
            solver
                .add_constraint(constraints::times(area, support.domain(), usable))
                .post()?;
            solver
                .add_constraint(constraints::equals(vec![usable.into()], 0))
                .implied_by(!support)?;

            usable_areas.push(usable);
        }

        let supported_area = solver.new_bounded_integer(0, saturating_i32(items[i].area()));
        let mut sum = vec![supported_area.into()];
        sum.extend(usable_areas.iter().map(|usable| usable.scaled(-1)));
        solver
            .add_constraint(constraints::equals(sum, 0))
            .implied_by(!on_floor)?;

        let required = (instance.support_area * items[i].area() as f64).ceil() as i64;
        solver
            .add_constraint(constraints::greater_than_or_equals(
                vec![supported_area.into()],
                required,
            ))
            .implied_by(!on_floor)?;
    }

    Ok(())
}

/// The length of the intersection of two items along a horizontal axis, zero if their footprints
/// do not intersect.
fn add_axis_overlap(
    solver: &mut Solver,
    variables: &PackingVariables,
    i: usize,
    j: usize,
    axis: Axis,
    dimension: i32,
    overlap: Literal,
) -> Result<DomainId, ConstraintOperationError> {
    let item_i = variables.items[i];
    let item_j = variables.items[j];

    let difference_ij = solver.new_bounded_integer(0, dimension);
    let difference_ji = solver.new_bounded_integer(0, dimension);
    solver
        .add_constraint(constraints::equals(
            vec![
                difference_ij.into(),
                item_i.end(axis).scaled(-1),
                item_j.start(axis).into(),
            ],
            0,
        ))
        .implied_by(overlap)?;
    solver
        .add_constraint(constraints::equals(
            vec![
                difference_ji.into(),
                item_j.end(axis).scaled(-1),
                item_i.start(axis).into(),
            ],
            0,
        ))
        .implied_by(overlap)?;

    let extent = solver.new_bounded_integer(0, dimension);
    solver
        .add_constraint(constraints::minimum(
            vec![
                difference_ij,
                difference_ji,
                item_i.size(axis),
                item_j.size(axis),
            ],
            extent,
        ))
        .post()?;
    solver
        .add_constraint(constraints::equals(vec![extent.into()], 0))
        .implied_by(!overlap)?;

    Ok(extent)
}

/// An item of a customer which is visited later may not block the path of an earlier customer's
/// items towards the door at `x = dx`.
fn lifo_clause(variables: &PackingVariables, i: usize, j: usize) -> Vec<Literal> {
    [
        Direction::Behind,
        Direction::Below,
        Direction::Left,
        Direction::Right,
    ]
    .map(|direction| variables.relation(i, j, direction))
    .to_vec()
}

fn add_lifo_with_sequence(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
    variables: &PackingVariables,
) -> Result<(), ConstraintOperationError> {
    let items = instance.items;

    for i in 0..items.len() {
        for j in 0..items.len() {
            if i != j && items[i].group_id < items[j].group_id {
                solver
                    .add_constraint(constraints::clause(lifo_clause(variables, i, j)))
                    .post()?;
            }
        }
    }

    Ok(())
}

/// The unloading sequence is part of the decision: every customer gets a distinct position, and
/// the LIFO clauses are only enforced for the order of positions which is chosen.
fn add_lifo_without_sequence(
    solver: &mut Solver,
    instance: &PackingInstance<'_>,
    variables: &mut PackingVariables,
) -> Result<(), ConstraintOperationError> {
    let items = instance.items;
    let number_of_customers = items
        .iter()
        .map(|item| item.group_id + 1)
        .max()
        .unwrap_or(0)
        .max(instance.number_of_customers);

    let positions = (0..number_of_customers)
        .map(|_| solver.new_bounded_integer(1, number_of_customers as i32))
        .collect::<Vec<_>>();
    solver
        .add_constraint(constraints::all_different(positions.clone()))
        .post()?;

    let mut successions = PairLiterals::new(number_of_customers);
    for first in 0..number_of_customers {
        for second in first + 1..number_of_customers {
            let succeeds = solver.new_literal();
            successions.insert(first, second, succeeds);

            solver
                .add_constraint(constraints::greater_than(
                    difference(positions[first], positions[second]),
                    0,
                ))
                .implied_by(succeeds)?;
            solver
                .add_constraint(constraints::less_than(
                    difference(positions[first], positions[second]),
                    0,
                ))
                .implied_by(!succeeds)?;
        }
    }

    for i in 0..items.len() {
        for j in 0..items.len() {
            let customer_i = items[i].group_id;
            let customer_j = items[j].group_id;
            if i == j || customer_i == customer_j {
                continue;
            }

            // The clause only applies if the customer of i is visited after the customer of j.
            let relaxation = if customer_i < customer_j {
                !successions
                    .get(customer_i, customer_j)
                    .expect("succession literals exist for every pair")
            } else {
                successions
                    .get(customer_j, customer_i)
                    .expect("succession literals exist for every pair")
            };

            let mut clause = lifo_clause(variables, i, j);
            clause.push(relaxation);
            solver.add_constraint(constraints::clause(clause)).post()?;
        }
    }

    variables.customer_positions = positions;

    Ok(())
}

fn saturating_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
