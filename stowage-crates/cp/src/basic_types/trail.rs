use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::stowage_assert_simple;

/// The changes made to the domains, grouped by the decision level at which they were made.
///
/// Level 0 is the root. Going back to a level removes every change of the levels above it; the
/// removed changes are handed out newest first so that each one can be undone in turn.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    changes: Vec<T>,
    /// `level_starts[l]` is the number of changes made before level `l + 1` was opened.
    level_starts: Vec<usize>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            changes: Vec::new(),
            level_starts: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn level(&self) -> usize {
        self.level_starts.len()
    }

    pub(crate) fn open_level(&mut self) {
        self.level_starts.push(self.changes.len());
    }

    pub(crate) fn push(&mut self, change: T) {
        self.changes.push(change);
    }

    /// Returns to `level`, which must be below the current one.
    pub(crate) fn synchronise(&mut self, level: usize) -> Rev<Drain<'_, T>> {
        stowage_assert_simple!(level < self.level());

        let kept = self.level_starts[level];
        self.level_starts.truncate(level);
        self.changes.drain(kept..).rev()
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.changes
    }
}
