//! Branching determines how the search space is explored. A [`Brancher`] proposes the next
//! decision as a [`crate::predicates::Predicate`]; the most common brancher combines a
//! [`VariableSelector`] with a [`ValueSelector`] into an [`IndependentVariableValueBrancher`].
//!
//! # Example
//! ```rust
//! # use stowage_cp::Solver;
//! # use stowage_cp::branching::FirstFail;
//! # use stowage_cp::branching::InDomainMax;
//! # use stowage_cp::branching::IndependentVariableValueBrancher;
//! # use stowage_cp::results::SatisfactionResult;
//! # use stowage_cp::termination::Indefinite;
//! let mut solver = Solver::default();
//! let variables = vec![solver.new_bounded_integer(0, 10), solver.new_bounded_integer(3, 4)];
//!
//! let mut brancher = IndependentVariableValueBrancher::new(FirstFail::new(&variables), InDomainMax);
//! let result = solver.satisfy(&mut brancher, &mut Indefinite);
//!
//! if let SatisfactionResult::Satisfiable(solution) = result {
//!     assert_eq!(10, solution.get_integer_value(variables[0]));
//!     assert_eq!(4, solution.get_integer_value(variables[1]));
//! }
//! ```

mod brancher;
mod independent_variable_value_brancher;
mod selection_context;
mod value_selection;
mod variable_selection;

pub use brancher::Brancher;
pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
pub use selection_context::SelectionContext;
pub use value_selection::InDomainMax;
pub use value_selection::InDomainMin;
pub use value_selection::ValueSelector;
pub use variable_selection::FirstFail;
pub use variable_selection::InputOrder;
pub use variable_selection::VariableSelector;
