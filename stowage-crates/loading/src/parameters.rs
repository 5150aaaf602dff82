use std::fmt::Display;
use std::str::FromStr;

use crate::LoadingError;
use crate::basic_types::LoadingMask;

/// The problem variants which differ in the loading constraints that are enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemVariant {
    None,
    AllConstraints,
    NoFragility,
    NoSupport,
    NoLifo,
    LoadingOnly,
    /// Only the weight and volume capacity of a vehicle is checked.
    VolumeWeightApproximation,
    Volume,
    Weight,
}

impl ProblemVariant {
    pub const ALL: [ProblemVariant; 8] = [
        ProblemVariant::AllConstraints,
        ProblemVariant::NoFragility,
        ProblemVariant::NoSupport,
        ProblemVariant::NoLifo,
        ProblemVariant::LoadingOnly,
        ProblemVariant::VolumeWeightApproximation,
        ProblemVariant::Volume,
        ProblemVariant::Weight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProblemVariant::None => "None",
            ProblemVariant::AllConstraints => "AllConstraints",
            ProblemVariant::NoFragility => "NoFragility",
            ProblemVariant::NoSupport => "NoSupport",
            ProblemVariant::NoLifo => "NoLifo",
            ProblemVariant::LoadingOnly => "LoadingOnly",
            ProblemVariant::VolumeWeightApproximation => "VolumeWeightApproximation",
            ProblemVariant::Volume => "Volume",
            ProblemVariant::Weight => "Weight",
        }
    }
}

impl Display for ProblemVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProblemVariant {
    type Err = LoadingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemVariant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LoadingError::UnknownProblemVariant(s.to_owned()))
    }
}

/// The loading constraints of a problem variant.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadingProblemParams {
    pub variant: ProblemVariant,
    pub enable_three_dimensional_loading: bool,
    /// The fraction of its footprint an item not on the floor has to rest on.
    pub support_area: f64,
    pub enable_support: bool,
    pub enable_lifo: bool,
    pub enable_fragility: bool,
    pub loading_flags: LoadingMask,
}

impl LoadingProblemParams {
    pub fn new(variant: ProblemVariant) -> Result<LoadingProblemParams, LoadingError> {
        let three_dimensional = |support_area: f64,
                                 support: bool,
                                 lifo: bool,
                                 fragility: bool,
                                 loading_flags: LoadingMask| {
            LoadingProblemParams {
                variant,
                enable_three_dimensional_loading: true,
                support_area,
                enable_support: support,
                enable_lifo: lifo,
                enable_fragility: fragility,
                loading_flags,
            }
        };

        let params = match variant {
            ProblemVariant::None => {
                return Err(LoadingError::UnknownProblemVariant(
                    variant.name().to_owned(),
                ));
            }
            ProblemVariant::AllConstraints => {
                three_dimensional(0.75, true, true, true, LoadingMask::complete())
            }
            ProblemVariant::NoFragility => {
                three_dimensional(0.75, true, true, false, LoadingMask::no_fragility())
            }
            ProblemVariant::NoSupport => {
                three_dimensional(0.0, false, true, true, LoadingMask::no_support())
            }
            ProblemVariant::NoLifo => {
                three_dimensional(0.75, true, false, true, LoadingMask::no_lifo())
            }
            ProblemVariant::LoadingOnly => {
                three_dimensional(0.0, false, false, false, LoadingMask::loading_only())
            }
            ProblemVariant::VolumeWeightApproximation
            | ProblemVariant::Volume
            | ProblemVariant::Weight => LoadingProblemParams {
                variant,
                enable_three_dimensional_loading: false,
                support_area: 0.0,
                enable_support: false,
                enable_lifo: false,
                enable_fragility: false,
                loading_flags: LoadingMask::empty(),
            },
        };

        Ok(params)
    }
}

/// Options of the packing constraint model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpSolverParams {
    /// The number of portfolio workers; each builds its own model with a different search order.
    pub threads: usize,
    pub seed: u64,
    /// Log the outcome and statistics of every solve at debug level.
    pub log_flag: bool,
    /// Propagate the root model once before any worker starts searching.
    pub presolve: bool,
}

impl Default for CpSolverParams {
    fn default() -> Self {
        CpSolverParams {
            threads: 8,
            seed: 0,
            log_flag: true,
            presolve: true,
        }
    }
}

/// What the threshold of the meet-in-the-middle patterns minimises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeetInTheMiddleTarget {
    /// The sum over the items of their individual number of placement points.
    IndividualPlacementPoints,
    /// The size of the union of the placement points of all items.
    #[default]
    PlacementPointUnion,
}

/// The reasons for which the loading oracle is consulted; each has its own time budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallType {
    Exact,
    ExactLimit,
    Heuristic,
    TwoPath,
    MinInfSet,
    RegularPath,
    MinInfPath,
    ReversePath,
}

impl CallType {
    /// The maximum runtime in seconds of a single oracle call.
    pub fn time_limit(self) -> f64 {
        match self {
            CallType::Exact => f64::MAX,
            CallType::ExactLimit => 1.0,
            CallType::Heuristic => 0.0,
            CallType::TwoPath => 4.0,
            CallType::MinInfSet
            | CallType::RegularPath
            | CallType::MinInfPath
            | CallType::ReversePath => 1.0,
        }
    }

    /// Only an exact call must produce a definitive answer.
    pub fn is_exact(self) -> bool {
        self == CallType::Exact
    }
}

/// The complete configuration of a [`crate::LoadingChecker`].
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerLoadingParams {
    pub cp_solver: CpSolverParams,
    pub loading_problem: LoadingProblemParams,
    pub meet_in_the_middle_target: MeetInTheMiddleTarget,
}

impl ContainerLoadingParams {
    pub fn new(variant: ProblemVariant) -> Result<ContainerLoadingParams, LoadingError> {
        Ok(ContainerLoadingParams {
            cp_solver: CpSolverParams::default(),
            loading_problem: LoadingProblemParams::new(variant)?,
            meet_in_the_middle_target: MeetInTheMiddleTarget::default(),
        })
    }

    /// The runtime of a call of the given type, capped by the time which is left overall.
    pub fn determine_max_runtime(&self, call_type: CallType, residual_time: f64) -> f64 {
        call_type.time_limit().min(residual_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::LoadingFlag;

    #[test]
    fn variants_parse_case_insensitively() {
        assert_eq!(
            Ok(ProblemVariant::NoSupport),
            "nosupport".parse::<ProblemVariant>()
        );
        assert_eq!(
            Ok(ProblemVariant::AllConstraints),
            "AllConstraints".parse::<ProblemVariant>()
        );
        assert!("None".parse::<ProblemVariant>().is_err());
        assert!("Fragile".parse::<ProblemVariant>().is_err());
    }

    #[test]
    fn variant_table_is_followed() {
        let no_lifo = LoadingProblemParams::new(ProblemVariant::NoLifo).unwrap();
        assert!(no_lifo.enable_three_dimensional_loading);
        assert_eq!(0.75, no_lifo.support_area);
        assert!(!no_lifo.loading_flags.contains(LoadingFlag::Lifo));

        let no_support = LoadingProblemParams::new(ProblemVariant::NoSupport).unwrap();
        assert_eq!(0.0, no_support.support_area);
        assert!(no_support.enable_lifo);

        let weight = LoadingProblemParams::new(ProblemVariant::Weight).unwrap();
        assert!(!weight.enable_three_dimensional_loading);
        assert!(weight.loading_flags.is_empty());
    }

    #[test]
    fn none_variant_is_a_configuration_error() {
        assert!(LoadingProblemParams::new(ProblemVariant::None).is_err());
    }

    #[test]
    fn runtime_is_capped_by_residual_time() {
        let params = ContainerLoadingParams::new(ProblemVariant::AllConstraints).unwrap();

        assert_eq!(4.0, params.determine_max_runtime(CallType::TwoPath, f64::MAX));
        assert_eq!(2.5, params.determine_max_runtime(CallType::Exact, 2.5));
        assert_eq!(0.0, params.determine_max_runtime(CallType::Heuristic, 10.0));
        assert!(CallType::Exact.is_exact());
        assert!(!CallType::ExactLimit.is_exact());
    }
}
