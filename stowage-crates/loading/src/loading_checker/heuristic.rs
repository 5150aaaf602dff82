use std::fmt::Debug;

use crate::basic_types::Container;
use crate::basic_types::Cuboid;
use crate::basic_types::LoadingMask;
use crate::basic_types::LoadingStatus;

/// A fast packing procedure which is tried before the exact packing model.
///
/// A heuristic can only prove feasibility: [`LoadingStatus::FeasOpt`] means a packing was found.
/// [`LoadingStatus::Infeasible`] means the heuristic failed, after which the sequence is not handed
/// to the heuristic again. [`LoadingStatus::Invalid`] means no heuristic answer is available.
pub trait PackingHeuristic: Debug {
    fn pack(
        &mut self,
        container: &Container,
        items: &[Cuboid],
        mask: LoadingMask,
    ) -> LoadingStatus;
}

/// The default heuristic, which never answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHeuristic;

impl PackingHeuristic for NoHeuristic {
    fn pack(
        &mut self,
        _container: &Container,
        _items: &[Cuboid],
        _mask: LoadingMask,
    ) -> LoadingStatus {
        LoadingStatus::Invalid
    }
}
