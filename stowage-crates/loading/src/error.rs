use thiserror::Error;

use crate::basic_types::LoadingMask;
use crate::basic_types::LoadingStatus;
use crate::basic_types::PackingType;
use crate::placement_points::PlacementPattern;

/// Errors which indicate a programming or configuration mistake, or a broken oracle contract.
/// They are never the outcome of a legitimate packing question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadingError {
    #[error("packing type {0:?} is not supported by the mask builder")]
    UnsupportedPackingType(PackingType),
    #[error("no placement pattern is available for loading mask {0}")]
    UnsupportedLoadingMask(LoadingMask),
    #[error("placement pattern {0:?} cannot be generated")]
    UnsupportedPlacementPattern(PlacementPattern),
    #[error("the packing oracle returned an invalid status")]
    InvalidOracleStatus,
    #[error("an exact packing call ended without a definitive answer")]
    ExactCallUndecided,
    #[error("status {0} cannot be stored in the feasibility cache")]
    InvalidStatusInCache(LoadingStatus),
    #[error("'{0}' is not a valid problem variant")]
    UnknownProblemVariant(String),
}
