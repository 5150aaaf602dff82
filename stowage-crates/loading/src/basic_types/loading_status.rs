use std::fmt::Display;

/// The answer of the loading oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingStatus {
    /// No answer could be given because a contract was violated, e.g. the time budget was empty
    /// or no heuristic is available.
    #[default]
    Invalid,
    /// A feasible packing exists.
    FeasOpt,
    /// No feasible packing exists.
    Infeasible,
    /// The budget ran out before the question was decided.
    Unknown,
}

impl LoadingStatus {
    /// Whether the status is a proven answer which can be relied upon.
    pub fn is_definitive(self) -> bool {
        matches!(self, LoadingStatus::FeasOpt | LoadingStatus::Infeasible)
    }
}

impl Display for LoadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadingStatus::Invalid => write!(f, "INVALID"),
            LoadingStatus::FeasOpt => write!(f, "FEASIBLE"),
            LoadingStatus::Infeasible => write!(f, "INFEASIBLE"),
            LoadingStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
