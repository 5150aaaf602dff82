//! Checks the routes of integer routing solutions for loading feasibility and adds lazy
//! constraints for the routes which cannot be loaded.
//!
//! How a route is checked depends on the [`ProblemVariant`]; [`create_route_callback`] selects the
//! [`CallbackStrategy`] and [`RouteCallback`] runs it.
mod route_check;
mod tracker;

pub use route_check::RouteCallback;
use stowage_loading::LoadingError;
use stowage_loading::ProblemVariant;
pub use tracker::CallbackElement;
pub use tracker::CallbackTracker;

use crate::cuts::Cut;
use crate::error::RoutingError;
use crate::parameters::BranchAndCutParams;

/// Receives the lazy constraints found while checking a solution, e.g. the model of the routing
/// search.
pub trait LazyConstraintSink {
    fn add_lazy_constraint(&mut self, cut: Cut);
}

impl LazyConstraintSink for Vec<Cut> {
    fn add_lazy_constraint(&mut self, cut: Cut) {
        self.push(cut);
    }
}

/// The ways in which a route is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackStrategy {
    /// Only the capacity bound; no packing model is solved.
    OneDimensional,
    /// A single exact check of the complete route, without lifting.
    AllSimple,
    /// Lifting on the unordered customers, then on sub paths, then the reversed route.
    All,
    /// Lifting on the unordered customers, then tournament cuts and the reversed route.
    NoSupport,
    NoLifo,
    LoadingOnly,
}

pub fn create_route_callback(
    variant: ProblemVariant,
    params: &BranchAndCutParams,
) -> Result<CallbackStrategy, RoutingError> {
    if params.simple_version {
        return match variant {
            ProblemVariant::AllConstraints => Ok(CallbackStrategy::AllSimple),
            other => Err(RoutingError::SimpleVersionUnsupported(other)),
        };
    }

    match variant {
        ProblemVariant::Volume
        | ProblemVariant::Weight
        | ProblemVariant::VolumeWeightApproximation => Ok(CallbackStrategy::OneDimensional),
        ProblemVariant::LoadingOnly => Ok(CallbackStrategy::LoadingOnly),
        ProblemVariant::NoLifo => Ok(CallbackStrategy::NoLifo),
        ProblemVariant::NoSupport => Ok(CallbackStrategy::NoSupport),
        ProblemVariant::NoFragility | ProblemVariant::AllConstraints => Ok(CallbackStrategy::All),
        ProblemVariant::None => Err(RoutingError::Loading(
            LoadingError::UnknownProblemVariant(variant.name().to_owned()),
        )),
    }
}
