//! Placement points are the coordinates at which the packing model lets an item start. Restricting
//! the start coordinates to a small set of points shrinks the model without losing solutions, as
//! long as the chosen pattern type is valid for the constraints which are active.
//!
//! Patterns are generated per [`Axis`] and per item; items which share a [`HomogeneityKey`]
//! share their patterns.
mod meet_in_the_middle;
mod regular_normal_patterns;
mod unit_discretization;

use fixedbitset::FixedBitSet;
use fnv::FnvHashMap;
use log::debug;

pub use self::regular_normal_patterns::determine_regular_normal_patterns;
use crate::basic_types::Axis;
use crate::basic_types::Container;
use crate::basic_types::Cuboid;
use crate::basic_types::HomogeneityKey;
use crate::basic_types::LoadingMask;
use crate::error::LoadingError;
use crate::parameters::MeetInTheMiddleTarget;

/// The kinds of placement points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlacementPattern {
    #[default]
    None,
    /// Every integer coordinate.
    UnitDiscretization,
    NormalPatterns,
    ReducedRasterPoints,
    /// Subset sums of the extents of the other items.
    RegularNormalPatterns,
    /// Reduced meet-in-the-middle patterns.
    MeetInTheMiddle,
}

/// The pattern type per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSelection {
    pub x: PlacementPattern,
    pub y: PlacementPattern,
    pub z: PlacementPattern,
}

impl PatternSelection {
    fn new(x: PlacementPattern, y: PlacementPattern, z: PlacementPattern) -> PatternSelection {
        PatternSelection { x, y, z }
    }

    pub fn axis(&self, axis: Axis) -> PlacementPattern {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// The start coordinates of one class of items, sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPlacementPatterns {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    pub z: Vec<i32>,
}

impl ItemPlacementPatterns {
    pub fn axis(&self, axis: Axis) -> &[i32] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// The cheapest pattern type per axis which is still valid under the given mask.
///
/// With support active, items may have to be shifted to positions that are not a combination of
/// other items in the horizontal plane, so the horizontal axes fall back to unit discretisation.
pub fn select_minimal_feasible_pattern_type(
    mask: LoadingMask,
) -> Result<PatternSelection, LoadingError> {
    use PlacementPattern::MeetInTheMiddle;
    use PlacementPattern::RegularNormalPatterns;
    use PlacementPattern::UnitDiscretization;

    if [
        LoadingMask::complete(),
        LoadingMask::no_fragility(),
        LoadingMask::no_lifo(),
    ]
    .contains(&mask)
    {
        Ok(PatternSelection::new(
            UnitDiscretization,
            UnitDiscretization,
            RegularNormalPatterns,
        ))
    } else if [LoadingMask::no_support(), LoadingMask::fragility_only()].contains(&mask) {
        Ok(PatternSelection::new(
            RegularNormalPatterns,
            RegularNormalPatterns,
            UnitDiscretization,
        ))
    } else if [LoadingMask::lifo_no_sequence(), LoadingMask::lifo_sequence()].contains(&mask) {
        Ok(PatternSelection::new(
            RegularNormalPatterns,
            RegularNormalPatterns,
            RegularNormalPatterns,
        ))
    } else if mask == LoadingMask::loading_only() {
        Ok(PatternSelection::new(
            MeetInTheMiddle,
            MeetInTheMiddle,
            MeetInTheMiddle,
        ))
    } else {
        Err(LoadingError::UnsupportedLoadingMask(mask))
    }
}

/// The placement points of every class of items in `items`. The first item of a class determines
/// the points of the whole class.
pub fn generate_placement_patterns(
    container: &Container,
    items: &[Cuboid],
    selection: PatternSelection,
    target: MeetInTheMiddleTarget,
) -> Result<FnvHashMap<HomogeneityKey, ItemPlacementPatterns>, LoadingError> {
    let x = generate_axis_patterns(container, items, Axis::X, selection.x, target)?;
    let y = generate_axis_patterns(container, items, Axis::Y, selection.y, target)?;
    let z = generate_axis_patterns(container, items, Axis::Z, selection.z, target)?;

    let mut patterns = FnvHashMap::default();
    for (index, item) in items.iter().enumerate() {
        let _ = patterns
            .entry(item.homogeneity_key())
            .or_insert_with(|| ItemPlacementPatterns {
                x: convert_placement_bitset_to_vector(&x[index]),
                y: convert_placement_bitset_to_vector(&y[index]),
                z: convert_placement_bitset_to_vector(&z[index]),
            });
    }

    debug!(
        "generated placement points for {} item classes ({:?})",
        patterns.len(),
        selection
    );

    Ok(patterns)
}

fn generate_axis_patterns(
    container: &Container,
    items: &[Cuboid],
    axis: Axis,
    pattern: PlacementPattern,
    target: MeetInTheMiddleTarget,
) -> Result<Vec<FixedBitSet>, LoadingError> {
    let dimension = container.dimension(axis);

    match pattern {
        PlacementPattern::UnitDiscretization => Ok(
            unit_discretization::generate_unit_discretization(dimension, items, axis),
        ),
        PlacementPattern::RegularNormalPatterns => Ok(
            regular_normal_patterns::generate_regular_normal_patterns(dimension, items, axis),
        ),
        PlacementPattern::MeetInTheMiddle => Ok(
            meet_in_the_middle::generate_meet_in_the_middle_patterns(dimension, items, axis, target),
        ),
        PlacementPattern::None
        | PlacementPattern::NormalPatterns
        | PlacementPattern::ReducedRasterPoints => {
            Err(LoadingError::UnsupportedPlacementPattern(pattern))
        }
    }
}

/// The indices of the set bits, ascending.
pub fn convert_placement_bitset_to_vector(patterns: &FixedBitSet) -> Vec<i32> {
    patterns.ones().map(|p| p as i32).collect()
}

/// The inverse of [`convert_placement_bitset_to_vector`] for a container of the given dimension.
pub fn convert_placement_vector_to_bitset(points: &[i32], container_dimension: i32) -> FixedBitSet {
    let mut patterns = FixedBitSet::with_capacity(container_dimension.max(0) as usize + 1);
    for &p in points {
        if (0..=container_dimension).contains(&p) {
            patterns.insert(p as usize);
        }
    }
    patterns
}

/// The coordinates at which an item ends if it starts at one of the `patterns`; when rotation is
/// allowed and changes the extent, both extents are considered.
pub fn determine_end_points(
    patterns: &[i32],
    dimension: i32,
    rotated_dimension: i32,
    enable_rotation: bool,
) -> Vec<i32> {
    let mut end_points = Vec::with_capacity(2 * patterns.len());
    for &p in patterns {
        end_points.push(p + dimension);
        if enable_rotation && dimension != rotated_dimension {
            end_points.push(p + rotated_dimension);
        }
    }
    end_points
}
