use std::time::Duration;

/// Settings of the routing search which influence how loading answers are turned into cuts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchAndCutParams {
    /// Re-solve the bin packing relaxation when the capacity bound is nearly tight.
    pub enable_min_vehicle_lifting: bool,
    /// The largest slack of the capacity bound for which lifting is attempted.
    pub min_vehicle_lifting_threshold: f64,
    /// Answer routes from the feasible routes and infeasible combinations seen so far.
    pub activate_memory_management: bool,
    /// Try the packing heuristic before the packing model.
    pub activate_heuristic: bool,
    /// Check complete routes exactly and cut them off individually, without lifting.
    pub simple_version: bool,
    /// The time limit of the whole routing search; exact checks never run past it.
    pub time_limit: Duration,
}

impl Default for BranchAndCutParams {
    fn default() -> Self {
        BranchAndCutParams {
            enable_min_vehicle_lifting: true,
            min_vehicle_lifting_threshold: 0.5,
            activate_memory_management: true,
            activate_heuristic: true,
            simple_version: false,
            time_limit: Duration::from_secs(12 * 3600),
        }
    }
}
