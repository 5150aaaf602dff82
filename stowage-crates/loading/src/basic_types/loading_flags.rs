use std::fmt::Display;
use std::ops::BitAnd;

use enumset::EnumSet;
use enumset::EnumSetType;
use enumset::enum_set;

use crate::LoadingError;

/// A single loading constraint which can be switched on or off.
#[derive(Debug, EnumSetType, Hash)]
pub enum LoadingFlag {
    NoOverlap,
    Fragility,
    Support,
    Lifo,
    /// The unloading sequence is given; without it the model chooses the sequence itself.
    Sequence,
}

/// A combination of [`LoadingFlag`]s.
///
/// Masks requested by the routing side are always intersected with the globally configured mask
/// (see [`PackingType::build_mask`]). Whether [`LoadingFlag::Sequence`] is part of a mask decides the
/// shape of the cache keys: ordered stop sequences with it, unordered node sets without it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LoadingMask(EnumSet<LoadingFlag>);

impl LoadingMask {
    pub fn complete() -> LoadingMask {
        LoadingMask(EnumSet::all())
    }

    pub fn no_fragility() -> LoadingMask {
        LoadingMask(enum_set!(
            LoadingFlag::NoOverlap | LoadingFlag::Support | LoadingFlag::Lifo | LoadingFlag::Sequence
        ))
    }

    pub fn no_lifo() -> LoadingMask {
        LoadingMask(enum_set!(
            LoadingFlag::NoOverlap | LoadingFlag::Fragility | LoadingFlag::Support
        ))
    }

    pub fn no_support() -> LoadingMask {
        LoadingMask(enum_set!(
            LoadingFlag::NoOverlap | LoadingFlag::Fragility | LoadingFlag::Lifo | LoadingFlag::Sequence
        ))
    }

    pub fn lifo_no_sequence() -> LoadingMask {
        LoadingMask(enum_set!(LoadingFlag::NoOverlap | LoadingFlag::Lifo))
    }

    pub fn lifo_sequence() -> LoadingMask {
        LoadingMask(enum_set!(
            LoadingFlag::NoOverlap | LoadingFlag::Lifo | LoadingFlag::Sequence
        ))
    }

    pub fn fragility_only() -> LoadingMask {
        LoadingMask(enum_set!(LoadingFlag::NoOverlap | LoadingFlag::Fragility))
    }

    pub fn loading_only() -> LoadingMask {
        LoadingMask(enum_set!(LoadingFlag::NoOverlap))
    }

    pub fn empty() -> LoadingMask {
        LoadingMask(EnumSet::empty())
    }

    pub fn contains(&self, flag: LoadingFlag) -> bool {
        self.0.contains(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn flags(&self) -> impl Iterator<Item = LoadingFlag> {
        self.0.iter()
    }
}

impl BitAnd for LoadingMask {
    type Output = LoadingMask;

    fn bitand(self, rhs: LoadingMask) -> LoadingMask {
        LoadingMask(self.0 & rhs.0)
    }
}

impl From<EnumSet<LoadingFlag>> for LoadingMask {
    fn from(flags: EnumSet<LoadingFlag>) -> LoadingMask {
        LoadingMask(flags)
    }
}

impl Display for LoadingMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "{{}}");
        }

        let names = self
            .flags()
            .map(|flag| format!("{flag:?}"))
            .collect::<Vec<_>>();
        write!(f, "{}", names.join("|"))
    }
}

/// The constraint subset a caller asks the oracle to check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackingType {
    None,
    /// All configured loading constraints.
    Complete,
    /// All configured loading constraints without a given sequence.
    CompleteNoSequence,
    NoLifo,
    NoSupport,
    NoFragility,
    NoSupportNoSequence,
    /// Only LIFO without a given sequence; support and fragility are disabled.
    LifoNoSequence,
    NoSupportNoLifo,
    NoSupportNoFragility,
    /// Only non-overlap of items.
    LoadingOnly,
}

impl PackingType {
    /// The mask which is effectively checked: the named mask of the packing type intersected with
    /// the globally configured `loading_flags`.
    pub fn build_mask(self, loading_flags: LoadingMask) -> Result<LoadingMask, LoadingError> {
        match self {
            PackingType::Complete => Ok(LoadingMask::complete() & loading_flags),
            PackingType::NoSupport => Ok(LoadingMask::no_support() & loading_flags),
            PackingType::LifoNoSequence => Ok(LoadingMask::lifo_no_sequence() & loading_flags),
            other => Err(LoadingError::UnsupportedPackingType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_masks_are_nested_as_expected() {
        assert_eq!(
            LoadingMask::lifo_no_sequence(),
            LoadingMask::no_support() & LoadingMask::no_fragility() & LoadingMask::lifo_sequence()
                & LoadingMask::lifo_no_sequence()
        );
        assert!(LoadingMask::complete().contains(LoadingFlag::Sequence));
        assert!(!LoadingMask::no_lifo().contains(LoadingFlag::Sequence));
        assert!(!LoadingMask::no_support().contains(LoadingFlag::Support));
    }

    #[test]
    fn mask_is_intersected_with_global_flags() {
        let global = LoadingMask::no_lifo();

        assert_eq!(
            LoadingMask::no_lifo(),
            PackingType::Complete.build_mask(global).unwrap()
        );
        assert_eq!(
            LoadingMask::fragility_only(),
            PackingType::NoSupport.build_mask(global).unwrap()
        );
        assert_eq!(
            LoadingMask::loading_only(),
            PackingType::LifoNoSequence.build_mask(global).unwrap()
        );
    }

    #[test]
    fn unsupported_packing_types_are_rejected() {
        assert_eq!(
            Err(LoadingError::UnsupportedPackingType(PackingType::NoLifo)),
            PackingType::NoLifo.build_mask(LoadingMask::complete())
        );
    }

    #[test]
    fn mask_display_lists_flags() {
        assert_eq!("NoOverlap|Lifo", LoadingMask::lifo_no_sequence().to_string());
        assert_eq!("{}", LoadingMask::empty().to_string());
    }
}
