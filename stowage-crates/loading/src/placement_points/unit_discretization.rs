use fixedbitset::FixedBitSet;

use crate::basic_types::Axis;
use crate::basic_types::Cuboid;

/// Every integer coordinate at which the item still fits along the axis.
pub(crate) fn generate_unit_discretization(
    container_dimension: i32,
    items: &[Cuboid],
    axis: Axis,
) -> Vec<FixedBitSet> {
    items
        .iter()
        .map(|item| {
            let mut patterns = FixedBitSet::with_capacity(container_dimension.max(0) as usize + 1);
            let last = container_dimension - item.minimum_rotatable_dimension(axis);
            if last >= 0 {
                patterns.insert_range(0..last as usize + 1);
            }
            patterns
        })
        .collect()
}
