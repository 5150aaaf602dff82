use fixedbitset::FixedBitSet;

use crate::basic_types::Axis;
use crate::basic_types::Cuboid;

/// The regular normal patterns along `axis`: every coordinate in `[0, container_dimension]` which
/// can be written as a sum of extents of `items`, each item used at most once.
///
/// The returned set has room for `actual_container_dimension + 1` coordinates so that sets computed
/// for different effective lengths can be combined. A negative `container_dimension` yields the
/// empty set.
pub fn determine_regular_normal_patterns(
    axis: Axis,
    container_dimension: i32,
    actual_container_dimension: i32,
    items: &[&Cuboid],
) -> FixedBitSet {
    let capacity = actual_container_dimension.max(container_dimension).max(0) as usize + 1;
    let mut patterns = FixedBitSet::with_capacity(capacity);

    if container_dimension < 0 {
        return patterns;
    }

    patterns.insert(0);
    if container_dimension == 0 {
        return patterns;
    }

    for item in items {
        let (first, second) = extents(item, axis);
        let minimum = item.minimum_rotatable_dimension(axis);

        for p in (0..=container_dimension - minimum).rev() {
            if !patterns.contains(p as usize) {
                continue;
            }

            if p + first <= container_dimension {
                patterns.insert((p + first) as usize);
            }

            if let Some(second) = second {
                if p + second <= container_dimension {
                    patterns.insert((p + second) as usize);
                }
            }
        }
    }

    patterns
}

/// For every item, the regular normal patterns formed by all other items, restricted to the
/// positions at which the item itself still fits.
pub(crate) fn generate_regular_normal_patterns(
    container_dimension: i32,
    items: &[Cuboid],
    axis: Axis,
) -> Vec<FixedBitSet> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let others = others(items, index);
            determine_regular_normal_patterns(
                axis,
                container_dimension - item.minimum_rotatable_dimension(axis),
                container_dimension,
                &others,
            )
        })
        .collect()
}

/// Every item except the one at `index`.
pub(crate) fn others(items: &[Cuboid], index: usize) -> Vec<&Cuboid> {
    items
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != index)
        .map(|(_, item)| item)
        .collect()
}

/// The extents an item contributes along an axis: the primary one and, if the item may be rotated
/// horizontally, the one it has after rotation.
fn extents(item: &Cuboid, axis: Axis) -> (i32, Option<i32>) {
    let rotated = |extent: i32| item.enable_horizontal_rotation.then_some(extent);

    match axis {
        Axis::X => (item.dx, rotated(item.dy)),
        Axis::Y => (item.dy, rotated(item.dx)),
        Axis::Z => (item.dz, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Fragility;

    fn item(dx: i32, dy: i32, rotation: bool) -> Cuboid {
        Cuboid::new(0, dx, dy, 1, 1.0, Fragility::None, rotation)
    }

    #[test]
    fn negative_dimension_has_no_patterns() {
        let items = [item(2, 2, false)];
        let refs = items.iter().collect::<Vec<_>>();

        let patterns = determine_regular_normal_patterns(Axis::X, -1, 5, &refs);

        assert_eq!(0, patterns.count_ones(..));
        assert_eq!(6, patterns.len());
    }

    #[test]
    fn zero_dimension_only_has_the_origin() {
        let items = [item(2, 2, false)];
        let refs = items.iter().collect::<Vec<_>>();

        let patterns = determine_regular_normal_patterns(Axis::X, 0, 5, &refs);

        assert_eq!(vec![0], patterns.ones().collect::<Vec<_>>());
    }

    #[test]
    fn patterns_are_subset_sums_of_extents() {
        let items = [item(2, 4, false), item(3, 4, false)];
        let refs = items.iter().collect::<Vec<_>>();

        let patterns = determine_regular_normal_patterns(Axis::X, 6, 6, &refs);

        assert_eq!(vec![0, 2, 3, 5], patterns.ones().collect::<Vec<_>>());
    }

    #[test]
    fn rotation_adds_the_other_extent() {
        let items = [item(2, 3, true)];
        let refs = items.iter().collect::<Vec<_>>();

        let patterns = determine_regular_normal_patterns(Axis::X, 6, 6, &refs);

        assert_eq!(vec![0, 2, 3], patterns.ones().collect::<Vec<_>>());
    }

    #[test]
    fn each_item_is_used_at_most_once() {
        let items = [item(2, 2, false)];
        let refs = items.iter().collect::<Vec<_>>();

        let patterns = determine_regular_normal_patterns(Axis::Y, 10, 10, &refs);

        assert_eq!(vec![0, 2], patterns.ones().collect::<Vec<_>>());
    }

    #[test]
    fn item_patterns_exclude_the_item_itself() {
        let items = vec![item(2, 2, false), item(3, 3, false)];

        let patterns = generate_regular_normal_patterns(6, &items, Axis::X);

        assert_eq!(vec![0, 3], patterns[0].ones().collect::<Vec<_>>());
        assert_eq!(vec![0, 2], patterns[1].ones().collect::<Vec<_>>());
    }
}
