//! Constraints which can be added to the [`Solver`] through [`Solver::add_constraint`].
//!
//! Every constraint can either be posted unconditionally with [`ConstraintPoster::post`] or be
//! half-reified with [`ConstraintPoster::implied_by`], in which case it is only enforced when the
//! given literal is true.
//!
//! # Example
//! ```rust
//! # use stowage_cp::Solver;
//! # use stowage_cp::constraints;
//! let mut solver = Solver::default();
//! let start = solver.new_sparse_integer(vec![0, 2, 4]);
//! let end = solver.new_bounded_integer(0, 6);
//! let placed_left = solver.new_literal();
//!
//! // end == start + 2
//! solver
//!     .add_constraint(constraints::equals(vec![end.into(), start.scaled(-1)], 2))
//!     .post()
//!     .expect("consistent at the root");
//!
//! // placed_left -> end <= 4
//! solver
//!     .add_constraint(constraints::less_than_or_equals(vec![end.into()], 4))
//!     .implied_by(placed_left)
//!     .expect("consistent at the root");
//! ```

mod arithmetic;
mod boolean;

pub use arithmetic::*;
pub use boolean::*;

use crate::engine::ConstraintOperationError;
use crate::engine::Solver;
use crate::engine::propagation::Propagator;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::propagators::AllDifferentPropagator;
use crate::propagators::ReifiedPropagator;

/// A constraint which can be posted to the [`Solver`].
pub trait Constraint {
    /// Add the constraint to the solver.
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError>;

    /// Add the half-reified version of the constraint: `reification_literal -> constraint`.
    fn implied_by(
        self,
        solver: &mut Solver,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError>;
}

impl<ConcretePropagator> Constraint for ConcretePropagator
where
    ConcretePropagator: Propagator + 'static,
{
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        solver.add_propagator(Box::new(self))
    }

    fn implied_by(
        self,
        solver: &mut Solver,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        solver.add_propagator(Box::new(ReifiedPropagator::new(
            Box::new(self),
            reification_literal,
        )))
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        self.into_iter()
            .try_for_each(|constraint| constraint.post(solver))
    }

    fn implied_by(
        self,
        solver: &mut Solver,
        reification_literal: Literal,
    ) -> Result<(), ConstraintOperationError> {
        self.into_iter()
            .try_for_each(|constraint| constraint.implied_by(solver, reification_literal))
    }
}

/// Returned by [`Solver::add_constraint`]; decides how the constraint is added.
#[derive(Debug)]
pub struct ConstraintPoster<'solver, C> {
    solver: &'solver mut Solver,
    constraint: C,
}

impl<'solver, C: Constraint> ConstraintPoster<'solver, C> {
    pub(crate) fn new(solver: &'solver mut Solver, constraint: C) -> Self {
        ConstraintPoster { solver, constraint }
    }

    /// Add the constraint to the solver.
    pub fn post(self) -> Result<(), ConstraintOperationError> {
        self.constraint.post(self.solver)
    }

    /// Add `reification_literal -> constraint` to the solver.
    pub fn implied_by(self, reification_literal: Literal) -> Result<(), ConstraintOperationError> {
        self.constraint
            .implied_by(self.solver, reification_literal)
    }
}

/// Creates the [`Constraint`] that enforces that all the given `variables` are distinct.
pub fn all_different(variables: impl Into<Box<[DomainId]>>) -> impl Constraint {
    AllDifferentPropagator::new(variables.into())
}
