use stowage_loading::LoadingError;
use stowage_loading::ProblemVariant;
use thiserror::Error;

use crate::cuts::CutType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error(transparent)]
    Loading(#[from] LoadingError),
    #[error("cut type {0:?} cannot be created from a route")]
    UnknownCutType(CutType),
    #[error("a subtour elimination constraint needs at least one vehicle")]
    ZeroMinVehicles,
    #[error("the simple route check is only available for AllConstraints, not {0}")]
    SimpleVersionUnsupported(ProblemVariant),
    #[error("customer {0} cannot be loaded into an empty container")]
    InfeasibleCustomer(usize),
}
