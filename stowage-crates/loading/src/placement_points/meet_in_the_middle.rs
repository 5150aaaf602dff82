//! Meet-in-the-middle patterns (Côté and Iori, 2018). Items are placed left of a threshold `t` at
//! their regular normal patterns and right of it at the mirrored patterns; the threshold is chosen
//! to minimise the number of resulting points. The reduced variant additionally drops the
//! smallest item from one side and removes dominated points.
use fixedbitset::FixedBitSet;
use log::trace;

use super::regular_normal_patterns::determine_regular_normal_patterns;
use super::regular_normal_patterns::others;
use crate::basic_types::Axis;
use crate::basic_types::Cuboid;
use crate::parameters::MeetInTheMiddleTarget;

/// The reduced meet-in-the-middle patterns of every item for the threshold that minimises the
/// chosen target.
pub(crate) fn generate_meet_in_the_middle_patterns(
    container_dimension: i32,
    items: &[Cuboid],
    axis: Axis,
    target: MeetInTheMiddleTarget,
) -> Vec<FixedBitSet> {
    let threshold = determine_minimal_threshold(container_dimension, items, axis, target);
    trace!("meet-in-the-middle threshold along {axis} is {threshold}");

    determine_reduced_meet_in_the_middle_patterns(container_dimension, items, axis, threshold)
}

/// The threshold `t` in `[1, container_dimension]` for which the number of points left of `t`
/// plus the number of mirrored points at or right of `t` is smallest. Ties keep the smallest `t`.
pub(crate) fn determine_minimal_threshold(
    container_dimension: i32,
    items: &[Cuboid],
    axis: Axis,
    target: MeetInTheMiddleTarget,
) -> i32 {
    if container_dimension < 1 {
        return 1;
    }

    let size = container_dimension as usize + 1;
    let mut left = vec![0_i64; size];
    let mut right = vec![0_i64; size];

    for (index, item) in items.iter().enumerate() {
        let last = container_dimension - item.minimum_rotatable_dimension(axis);
        let patterns =
            determine_regular_normal_patterns(axis, last, container_dimension, &others(items, index));

        for p in patterns.ones() {
            let mirrored = (last - p as i32) as usize;
            match target {
                MeetInTheMiddleTarget::IndividualPlacementPoints => {
                    left[p] += 1;
                    right[mirrored] += 1;
                }
                MeetInTheMiddleTarget::PlacementPointUnion => {
                    left[p] = 1;
                    right[mirrored] = 1;
                }
            }
        }
    }

    for p in 1..size {
        left[p] += left[p - 1];
        right[size - 1 - p] += right[size - p];
    }

    let mut threshold = 1;
    let mut minimum = left[0] + right[1];
    for p in 2..size {
        let count = left[p - 1] + right[p];
        if count < minimum {
            minimum = count;
            threshold = p as i32;
        }
    }

    threshold
}

/// Builds the reduced patterns for a fixed threshold.
pub(crate) fn determine_reduced_meet_in_the_middle_patterns(
    container_dimension: i32,
    items: &[Cuboid],
    axis: Axis,
    threshold: i32,
) -> Vec<FixedBitSet> {
    if items.is_empty() {
        return Vec::new();
    }

    let size = container_dimension.max(0) as usize + 1;
    let minimum_dimensions = items
        .iter()
        .map(|item| item.minimum_rotatable_dimension(axis))
        .collect::<Vec<_>>();

    let (minimal_item_index, &minimal_dimension) = minimum_dimensions
        .iter()
        .enumerate()
        .min_by_key(|&(_, dimension)| *dimension)
        .expect("items is not empty");
    let separator = (container_dimension - minimal_dimension + 1).div_euclid(2);

    let mut left_patterns = Vec::with_capacity(items.len());
    let mut right_patterns = Vec::with_capacity(items.len());
    let mut combined = Vec::with_capacity(items.len());

    for (index, &minimum) in minimum_dimensions.iter().enumerate() {
        let filtered = others(items, index);
        let doubly_filtered = items
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index && other != minimal_item_index)
            .map(|(_, item)| item)
            .collect::<Vec<_>>();

        let (first, second) = if threshold <= separator {
            (&filtered, &doubly_filtered)
        } else {
            (&doubly_filtered, &filtered)
        };

        let last = container_dimension - minimum;
        let left = determine_regular_normal_patterns(
            axis,
            (threshold - 1).min(last),
            container_dimension,
            second,
        );
        let right_prime =
            determine_regular_normal_patterns(axis, last - threshold, container_dimension, first);

        let mut right = FixedBitSet::with_capacity(size);
        for p in right_prime.ones() {
            right.insert((last - p as i32) as usize);
        }

        combined.push(&left | &right);
        left_patterns.push(left);
        right_patterns.push(right);
    }

    let mut modified_dimensions = minimum_dimensions
        .iter()
        .map(|&minimum| vec![minimum; size])
        .collect::<Vec<_>>();

    enlarge_left_items(
        container_dimension,
        &minimum_dimensions,
        &left_patterns,
        &combined,
        &mut modified_dimensions,
    );
    shift_right_items(
        &minimum_dimensions,
        &mut right_patterns,
        &combined,
        &mut modified_dimensions,
    );

    left_patterns
        .iter()
        .zip(right_patterns.iter())
        .zip(modified_dimensions.iter())
        .map(|((left, right), widths)| {
            let mut patterns = left | right;
            remove_dominated_points(&mut patterns, widths);
            patterns
        })
        .collect()
}

/// An item placed left of the threshold at `p` can be enlarged up to the next position at which
/// any other item may start.
fn enlarge_left_items(
    container_dimension: i32,
    minimum_dimensions: &[i32],
    left_patterns: &[FixedBitSet],
    combined: &[FixedBitSet],
    modified_dimensions: &mut [Vec<i32>],
) {
    for (k, left) in left_patterns.iter().enumerate() {
        if left.is_clear() {
            continue;
        }

        let end = positions_end(left, minimum_dimensions[k]);
        for p in left.ones().take_while(|&p| p < end) {
            let reach = p as i32 + modified_dimensions[k][p];

            let mut next_start = container_dimension;
            for (i, patterns) in combined.iter().enumerate() {
                if i == k {
                    continue;
                }

                let other_end = positions_end(patterns, minimum_dimensions[i]);
                if let Some(s) = patterns
                    .ones()
                    .take_while(|&s| s < other_end)
                    .find(|&s| s as i32 >= reach)
                {
                    next_start = next_start.min(s as i32);
                }
            }

            let q = container_dimension.min(next_start);
            if q > p as i32 {
                modified_dimensions[k][p] = q - p as i32;
            }
        }
    }
}

/// An item placed right of the threshold at `p` can be moved to the left, up to the last position
/// at which another item ends, by enlarging it accordingly.
fn shift_right_items(
    minimum_dimensions: &[i32],
    right_patterns: &mut [FixedBitSet],
    combined: &[FixedBitSet],
    modified_dimensions: &mut [Vec<i32>],
) {
    for k in 0..right_patterns.len() {
        if right_patterns[k].is_clear() {
            continue;
        }

        let end = positions_end(&right_patterns[k], minimum_dimensions[k]);
        let positions = right_patterns[k]
            .ones()
            .take_while(|&p| p < end)
            .collect::<Vec<_>>();

        for p in positions {
            let mut previous_end = 0;
            for (i, patterns) in combined.iter().enumerate() {
                if i == k {
                    continue;
                }

                let other_end = positions_end(patterns, minimum_dimensions[i]);
                for s in patterns.ones().take_while(|&s| s < other_end) {
                    let reach = s as i32 + modified_dimensions[i][s];
                    if reach > p as i32 {
                        break;
                    }
                    previous_end = previous_end.max(reach);
                }
            }

            let q = previous_end.max(0);
            if q < p as i32 {
                right_patterns[k].insert(q as usize);
                right_patterns[k].set(p, false);
                modified_dimensions[k][q as usize] = p as i32 + minimum_dimensions[k] - q;
            }
        }
    }
}

/// A point `p` is dominated if some later point `s` produces an item which ends no later than the
/// item placed at `p`.
fn remove_dominated_points(patterns: &mut FixedBitSet, widths: &[i32]) {
    let points = patterns.ones().collect::<Vec<_>>();

    for (index, &p) in points.iter().enumerate() {
        let reach = p as i32 + widths[p];
        if points[index + 1..]
            .iter()
            .any(|&s| s as i32 + widths[s] <= reach)
        {
            patterns.set(p, false);
        }
    }
}

/// One past the last index at which an item of the given extent can start.
fn positions_end(patterns: &FixedBitSet, minimum_dimension: i32) -> usize {
    patterns.len().saturating_sub(minimum_dimension.max(0) as usize)
}
