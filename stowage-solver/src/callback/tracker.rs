use enum_map::Enum;
use enum_map::EnumMap;
use log::info;

use crate::cuts::Cut;
use crate::cuts::CutType;

/// The outcomes of the individual steps of a route check.
#[derive(Debug, Clone, Copy, Enum, PartialEq, Eq)]
pub enum CallbackElement {
    IntegerRoutes,
    SingleCustomer,
    MinNumVehicles,
    Disconnected,
    Connected,
    SingleVehicle,
    MinVehApproxInf,
    RoutePrechecked,
    RoutePrecheckedNot,
    CustCombiInf,
    CustCombiInfNot,
    HeuristicFeas,
    HeuristicInf,
    ExactLimitFeas,
    ExactLimitInf,
    ExactLimitUnk,
    TwoPathInequality,
    TwoPathInequalityNot,
    RegularPathInequality,
    RegularPathInequalityNot,
    TailPathInequality,
    ExactFeas,
    ExactInf,
    ExactInvalid,
    ReverseSequence,
    RevHeurFeas,
    RevExactFeas,
    RevExactInf,
    InfeasibleTailPathInequality,
}

/// Counts how often each step of the route check was reached and how many cuts of each type
/// were added.
#[derive(Debug, Default, Clone)]
pub struct CallbackTracker {
    elements: EnumMap<CallbackElement, usize>,
    cuts: EnumMap<CutType, usize>,
}

impl CallbackTracker {
    pub fn increment_element(&mut self, element: CallbackElement) {
        self.elements[element] += 1;
    }

    pub fn record_cut(&mut self, cut: &Cut) {
        self.cuts[cut.cut_type] += 1;
    }

    pub fn element_count(&self, element: CallbackElement) -> usize {
        self.elements[element]
    }

    pub fn cut_count(&self, cut_type: CutType) -> usize {
        self.cuts[cut_type]
    }

    pub fn total_cuts(&self) -> usize {
        self.cuts.values().sum()
    }

    /// Logs every non-zero counter.
    pub fn log(&self) {
        for (element, &count) in self.elements.iter().filter(|(_, count)| **count > 0) {
            info!("{element:?}={count}");
        }
        for (cut_type, &count) in self.cuts.iter().filter(|(_, count)| **count > 0) {
            info!("{cut_type:?}Cuts={count}");
        }
    }
}
