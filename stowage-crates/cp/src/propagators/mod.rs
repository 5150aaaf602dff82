//! The propagators behind the constraints of [`crate::constraints`].

mod all_different;
mod clause;
mod linear_less_or_equal;
mod minimum;
mod not_equal;
mod reified;
mod times;

pub(crate) use all_different::AllDifferentPropagator;
pub(crate) use clause::ClausePropagator;
pub(crate) use linear_less_or_equal::LinearLessOrEqualPropagator;
pub(crate) use minimum::MinimumPropagator;
pub(crate) use not_equal::NotEqualPropagator;
pub(crate) use reified::ReifiedPropagator;
pub(crate) use times::TimesPropagator;
