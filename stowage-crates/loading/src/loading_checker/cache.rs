use fixedbitset::FixedBitSet;
use fnv::FnvHashSet;

use crate::basic_types::LoadingStatus;

/// The answers known for one loading mask.
///
/// Masks with [`crate::LoadingFlag::Sequence`] are keyed by ordered stop sequences, all other
/// masks by unordered node sets. A key is in at most one of the three partitions; an unknown key
/// may be promoted to feasible or infeasible, but never the other way around.
#[derive(Clone, Debug, Default)]
pub(crate) struct FeasibilityCache {
    pub(crate) feasible_sequences: FnvHashSet<Vec<usize>>,
    infeasible_sequences: FnvHashSet<Vec<usize>>,
    unknown_sequences: FnvHashSet<Vec<usize>>,

    feasible_sets: Vec<FixedBitSet>,
    infeasible_sets: Vec<FixedBitSet>,
    unknown_sets: Vec<FixedBitSet>,
}

impl FeasibilityCache {
    pub(crate) fn sequence_status(&self, sequence: &[usize], is_exact: bool) -> Option<LoadingStatus> {
        if self.infeasible_sequences.contains(sequence) {
            Some(LoadingStatus::Infeasible)
        } else if self.feasible_sequences.contains(sequence) {
            Some(LoadingStatus::FeasOpt)
        } else if !is_exact && self.unknown_sequences.contains(sequence) {
            Some(LoadingStatus::Unknown)
        } else {
            None
        }
    }

    /// Without support, infeasibility is inherited by supersets and feasibility by subsets. With
    /// support, an added or removed item may change the support of the others, so only equal sets
    /// are matched.
    pub(crate) fn set_status(
        &self,
        set: &FixedBitSet,
        enable_support: bool,
        is_exact: bool,
    ) -> Option<LoadingStatus> {
        let is_infeasible = if enable_support {
            self.infeasible_sets.iter().any(|stored| same_members(stored, set))
        } else {
            self.infeasible_sets.iter().any(|stored| stored.is_subset(set))
        };
        if is_infeasible {
            return Some(LoadingStatus::Infeasible);
        }

        let is_feasible = if enable_support {
            self.feasible_sets.iter().any(|stored| same_members(stored, set))
        } else {
            self.feasible_sets.iter().any(|stored| set.is_subset(stored))
        };
        if is_feasible {
            return Some(LoadingStatus::FeasOpt);
        }

        if !is_exact && self.unknown_sets.iter().any(|stored| same_members(stored, set)) {
            return Some(LoadingStatus::Unknown);
        }

        None
    }

    pub(crate) fn insert_sequence(&mut self, sequence: &[usize], status: LoadingStatus) {
        match status {
            LoadingStatus::FeasOpt => {
                let _ = self.unknown_sequences.remove(sequence);
                let _ = self.feasible_sequences.insert(sequence.to_vec());
            }
            LoadingStatus::Infeasible => {
                let _ = self.unknown_sequences.remove(sequence);
                let _ = self.infeasible_sequences.insert(sequence.to_vec());
            }
            LoadingStatus::Unknown => {
                let _ = self.unknown_sequences.insert(sequence.to_vec());
            }
            LoadingStatus::Invalid => unreachable!("invalid statuses are rejected before caching"),
        }
    }

    pub(crate) fn insert_set(&mut self, set: &FixedBitSet, status: LoadingStatus) {
        match status {
            LoadingStatus::FeasOpt => {
                self.unknown_sets.retain(|stored| !same_members(stored, set));
                self.feasible_sets.push(set.clone());
            }
            LoadingStatus::Infeasible => {
                self.unknown_sets.retain(|stored| !same_members(stored, set));
                self.infeasible_sets.push(set.clone());
            }
            LoadingStatus::Unknown => {
                if !self.unknown_sets.iter().any(|stored| same_members(stored, set)) {
                    self.unknown_sets.push(set.clone());
                }
            }
            LoadingStatus::Invalid => unreachable!("invalid statuses are rejected before caching"),
        }
    }
}

/// Set equality independent of the capacity of the bitsets.
fn same_members(a: &FixedBitSet, b: &FixedBitSet) -> bool {
    a.is_subset(b) && b.is_subset(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(members: &[usize]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(8);
        for &member in members {
            set.insert(member);
        }
        set
    }

    #[test]
    fn supersets_of_infeasible_sets_are_infeasible_without_support() {
        let mut cache = FeasibilityCache::default();
        cache.insert_set(&set(&[1, 2]), LoadingStatus::Infeasible);

        assert_eq!(
            Some(LoadingStatus::Infeasible),
            cache.set_status(&set(&[1, 2, 3]), false, true)
        );
        assert_eq!(None, cache.set_status(&set(&[1, 2, 3]), true, true));
        assert_eq!(None, cache.set_status(&set(&[1]), false, true));
    }

    #[test]
    fn subsets_of_feasible_sets_are_feasible_without_support() {
        let mut cache = FeasibilityCache::default();
        cache.insert_set(&set(&[1, 2, 3]), LoadingStatus::FeasOpt);

        assert_eq!(
            Some(LoadingStatus::FeasOpt),
            cache.set_status(&set(&[2, 3]), false, true)
        );
        assert_eq!(None, cache.set_status(&set(&[2, 3]), true, true));
        assert_eq!(
            Some(LoadingStatus::FeasOpt),
            cache.set_status(&set(&[1, 2, 3]), true, true)
        );
    }

    #[test]
    fn unknown_is_only_reported_to_non_exact_calls() {
        let mut cache = FeasibilityCache::default();
        cache.insert_sequence(&[3, 1], LoadingStatus::Unknown);

        assert_eq!(Some(LoadingStatus::Unknown), cache.sequence_status(&[3, 1], false));
        assert_eq!(None, cache.sequence_status(&[3, 1], true));
        assert_eq!(None, cache.sequence_status(&[1, 3], false));
    }

    #[test]
    fn promotion_removes_unknown_entries() {
        let mut cache = FeasibilityCache::default();
        cache.insert_set(&set(&[4]), LoadingStatus::Unknown);
        cache.insert_set(&set(&[4]), LoadingStatus::Infeasible);
        cache.insert_sequence(&[4, 5], LoadingStatus::Unknown);
        cache.insert_sequence(&[4, 5], LoadingStatus::FeasOpt);

        assert!(cache.unknown_sets.is_empty());
        assert!(cache.unknown_sequences.is_empty());
        assert_eq!(
            Some(LoadingStatus::Infeasible),
            cache.set_status(&set(&[4]), true, false)
        );
    }

    #[test]
    fn set_equality_ignores_capacity() {
        let mut small = FixedBitSet::with_capacity(3);
        small.insert(2);
        let mut large = FixedBitSet::with_capacity(30);
        large.insert(2);

        assert!(same_members(&small, &large));
    }
}
