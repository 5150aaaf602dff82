use stowage_loading::LoadingError;
use stowage_solver::RoutingError;
use stowage_solver::instance::InstanceError;
use thiserror::Error;

pub(crate) type StowageResult<T> = Result<T, StowageError>;

#[derive(Error, Debug)]
pub(crate) enum StowageError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The instance file was invalid, more details: {0}")]
    InvalidInstance(#[from] InstanceError),
    #[error("Invalid loading configuration, more details: {0}")]
    Loading(#[from] LoadingError),
    #[error("Failed to check the route, more details: {0}")]
    Routing(#[from] RoutingError),
    #[error("The route visits customer {0}, which is not part of the instance.")]
    UnknownCustomer(usize),
    #[error("The route visits the depot or customer {0} more than once.")]
    RepeatedStop(usize),
}
