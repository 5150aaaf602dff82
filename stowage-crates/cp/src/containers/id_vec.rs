use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// Identifiers which are handed out consecutively from zero, such as domains and propagators.
pub(crate) trait DenseId: Clone + Copy {
    fn position(self) -> usize;

    fn at_position(position: usize) -> Self;
}

impl DenseId for usize {
    fn position(self) -> usize {
        self
    }

    fn at_position(position: usize) -> Self {
        position
    }
}

/// Per-identifier storage. Indexing with an `Id` of the wrong kind does not compile, so the data
/// of a domain cannot be looked up with a propagator id.
#[derive(Debug)]
pub(crate) struct IdVec<Id, T> {
    slots: Vec<T>,
    id: PhantomData<Id>,
}

impl<Id, T> Default for IdVec<Id, T> {
    fn default() -> Self {
        IdVec {
            slots: Vec::new(),
            id: PhantomData,
        }
    }
}

impl<Id: DenseId, T> IdVec<Id, T> {
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` under the next free id.
    pub(crate) fn push(&mut self, value: T) -> Id {
        let id = Id::at_position(self.slots.len());
        self.slots.push(value);
        id
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = Id> {
        (0..self.slots.len()).map(Id::at_position)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'_ T> {
        self.slots.iter()
    }
}

impl<Id: DenseId, T: Clone> IdVec<Id, T> {
    /// Grows the storage up to and including `id`; new slots hold `filler`.
    pub(crate) fn grow_to(&mut self, id: Id, filler: T) {
        let needed = id.position() + 1;
        if self.slots.len() < needed {
            self.slots.resize(needed, filler);
        }
    }
}

impl<Id: DenseId, T> Index<Id> for IdVec<Id, T> {
    type Output = T;

    fn index(&self, id: Id) -> &T {
        &self.slots[id.position()]
    }
}

impl<Id: DenseId, T> IndexMut<Id> for IdVec<Id, T> {
    fn index_mut(&mut self, id: Id) -> &mut T {
        &mut self.slots[id.position()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_handed_out_in_push_order() {
        let mut propagators: IdVec<usize, &str> = IdVec::default();

        let linear = propagators.push("linear");
        let clause = propagators.push("clause");

        assert_eq!((0, 1), (linear, clause));
        assert_eq!("clause", propagators[clause]);
        assert_eq!(vec![0, 1], propagators.ids().collect::<Vec<_>>());
    }

    #[test]
    fn growing_fills_the_gap() {
        let mut watchers: IdVec<usize, u32> = IdVec::default();

        watchers.grow_to(3, 7);
        watchers[3] = 1;
        watchers.grow_to(1, 0);

        assert_eq!(vec![7, 7, 7, 1], watchers.iter().copied().collect::<Vec<_>>());
        assert_eq!(4, watchers.len());
    }
}
