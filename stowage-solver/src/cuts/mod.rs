//! Linear inequalities over the arc variables `x[i][j]` of the routing model, which exclude routes
//! that cannot be loaded.
//!
//! Every [`Cut`] reads `Σ coefficient · x[tail][head] ≥ rhs`.
mod lazy_constraints;

use enum_map::Enum;
pub use lazy_constraints::LazyConstraintsGenerator;

#[derive(Debug, Clone, Copy, Enum, Hash, PartialEq, Eq)]
#[allow(
    clippy::upper_case_acronyms,
    reason = "the families are known by these names in the literature"
)]
pub enum CutType {
    // Families which are found by separating fractional solutions.
    RCC,
    RCI,
    RCO,
    MST,
    FC,
    SC,
    GLM,
    CAT,
    DKplus,
    DKminus,

    // Families which are derived from a route that cannot be loaded.
    SEC,
    TwoPath,
    TwoPathMIS,
    TwoPathTail,
    RegularPath,
    RegularPathFront,
    RegularPathBack,
    TailTournament,
    UndirectedPath,
    UndirectedTailPath,
    InfeasibleTailPath,
}

/// A term `coefficient · x[tail][head]` of a cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutingArc {
    pub coefficient: f64,
    pub tail: usize,
    pub head: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    pub arcs: Vec<RoutingArc>,
    /// The left-hand side evaluated at the arc values given to [`Cut::add_arc`].
    pub lhs_value: f64,
    pub rhs: f64,
    pub violation: f64,
    pub cut_type: CutType,
}

impl Cut {
    pub fn new(cut_type: CutType) -> Cut {
        Cut {
            arcs: Vec::new(),
            lhs_value: 0.0,
            rhs: 0.0,
            violation: 0.0,
            cut_type,
        }
    }

    pub fn add_arc(&mut self, coefficient: f64, tail: usize, head: usize, x_value: f64) {
        self.arcs.push(RoutingArc {
            coefficient,
            tail,
            head,
        });
        self.lhs_value += coefficient * x_value;
    }

    pub fn calc_violation(&mut self) {
        self.violation = self.rhs - self.lhs_value;
    }

    pub fn coefficient(&self, tail: usize, head: usize) -> f64 {
        self.arcs
            .iter()
            .filter(|arc| arc.tail == tail && arc.head == head)
            .map(|arc| arc.coefficient)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcs_accumulate_the_left_hand_side() {
        let mut cut = Cut::new(CutType::SEC);
        cut.add_arc(-1.0, 1, 2, 1.0);
        cut.add_arc(-1.0, 2, 1, 0.5);
        cut.rhs = -1.0;
        cut.calc_violation();

        assert_eq!(-1.5, cut.lhs_value);
        assert_eq!(0.5, cut.violation);
        assert_eq!(-1.0, cut.coefficient(2, 1));
        assert_eq!(0.0, cut.coefficient(1, 3));
    }
}
