use stowage_cp::variables::DomainId;
use stowage_cp::variables::Literal;

use crate::basic_types::Axis;

/// The relative position of one item with respect to another, one pair of directions per axis.
/// For an item `i` and an item `j`, [`Direction::Right`] means that `i` lies completely on the
/// larger side of `j` along y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Right,
    Left,
    InFront,
    Behind,
    Above,
    Below,
}

impl Direction {
    pub(crate) const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::Left,
        Direction::InFront,
        Direction::Behind,
        Direction::Above,
        Direction::Below,
    ];

    /// The two directions along an axis: `i` beyond `j`, and `j` beyond `i`.
    pub(crate) fn along(axis: Axis) -> (Direction, Direction) {
        match axis {
            Axis::X => (Direction::InFront, Direction::Behind),
            Axis::Y => (Direction::Right, Direction::Left),
            Axis::Z => (Direction::Above, Direction::Below),
        }
    }

    /// The direction of `j` with respect to `i` if `i` has this direction with respect to `j`.
    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::InFront => Direction::Behind,
            Direction::Behind => Direction::InFront,
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The variables describing a single item.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ItemVariables {
    pub(crate) start: [DomainId; 3],
    pub(crate) end: [DomainId; 3],
    /// Length, width and height as placed.
    pub(crate) size: [DomainId; 3],
    pub(crate) rotated: Literal,
    pub(crate) on_floor: Option<Literal>,
}

impl ItemVariables {
    pub(crate) fn start(&self, axis: Axis) -> DomainId {
        self.start[axis_index(axis)]
    }

    pub(crate) fn end(&self, axis: Axis) -> DomainId {
        self.end[axis_index(axis)]
    }

    pub(crate) fn size(&self, axis: Axis) -> DomainId {
        self.size[axis_index(axis)]
    }
}

/// All decision and auxiliary variables of a packing model which are needed after it was built.
#[derive(Debug, Default)]
pub(crate) struct PackingVariables {
    pub(crate) items: Vec<ItemVariables>,
    /// Relation literals of every pair `i < j`, indexed by `i * n + j`.
    relations: Vec<Option<[Literal; 6]>>,
    number_of_items: usize,
    /// The position of every customer in the chosen unloading sequence, when the sequence is a
    /// decision of the model.
    pub(crate) customer_positions: Vec<DomainId>,
}

impl PackingVariables {
    pub(crate) fn new(number_of_items: usize) -> PackingVariables {
        PackingVariables {
            items: Vec::with_capacity(number_of_items),
            relations: vec![None; number_of_items * number_of_items],
            number_of_items,
            customer_positions: Vec::new(),
        }
    }

    pub(crate) fn set_relations(&mut self, i: usize, j: usize, literals: [Literal; 6]) {
        debug_assert!(i < j);
        self.relations[i * self.number_of_items + j] = Some(literals);
    }

    /// The literal which is true iff item `i` lies in `direction` of item `j`.
    pub(crate) fn relation(&self, i: usize, j: usize, direction: Direction) -> Literal {
        let (first, second, direction) = if i < j {
            (i, j, direction)
        } else {
            (j, i, direction.opposite())
        };

        self.relations[first * self.number_of_items + second]
            .expect("relations exist for every pair of items")[direction.index()]
    }
}

pub(crate) fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions_pair_up() {
        for direction in Direction::ALL {
            assert_eq!(direction, direction.opposite().opposite());
        }

        let (first, second) = Direction::along(Axis::X);
        assert_eq!(second, first.opposite());
    }
}
