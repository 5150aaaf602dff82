use fixedbitset::FixedBitSet;
use stowage_loading::Group;

/// A cycle of an integer routing solution.
#[derive(Clone, Debug, PartialEq)]
pub struct Subtour {
    /// The customers in visiting order, without the depot.
    pub sequence: Vec<usize>,
    pub nodes: FixedBitSet,
    pub weight: f64,
    pub volume: f64,
    /// Whether the cycle starts and ends at the depot, i.e. is a route.
    pub connected_to_depot: bool,
}

/// Decomposes the integer solution `x_values` into its cycles.
///
/// One cycle is started at the depot for every arc leaving it; the remaining customers form
/// cycles which do not visit the depot. The result is ordered with the disconnected cycles
/// first, and shorter cycles before longer ones.
pub fn find_integer_subtours(x_values: &[Vec<f64>], nodes: &[Group]) -> Vec<Subtour> {
    let number_of_nodes = nodes.len();
    let is_used = |tail: usize, head: usize| {
        x_values
            .get(tail)
            .and_then(|row| row.get(head))
            .is_some_and(|&value| value > 0.5)
    };

    let vehicles = (1..number_of_nodes).filter(|&head| is_used(0, head)).count();

    let mut visited = FixedBitSet::with_capacity(number_of_nodes);
    let mut number_visited = 0;
    let mut subtours: Vec<Subtour> = Vec::new();

    while number_visited < number_of_nodes.saturating_sub(1) {
        let mut subtour = Subtour {
            sequence: Vec::new(),
            nodes: FixedBitSet::with_capacity(number_of_nodes),
            weight: 0.0,
            volume: 0.0,
            connected_to_depot: false,
        };

        let start = if subtours.len() < vehicles {
            subtour.connected_to_depot = true;
            0
        } else {
            let Some(first_unvisited) = (1..number_of_nodes).find(|&node| !visited[node]) else {
                break;
            };
            visit(&mut subtour, &mut visited, &nodes[first_unvisited]);
            number_visited += 1;
            first_unvisited
        };

        let mut previous = start;
        loop {
            let next = (0..number_of_nodes)
                .find(|&node| is_used(previous, node) && (node == start || !visited[node]));

            match next {
                Some(node) if node != start => {
                    visit(&mut subtour, &mut visited, &nodes[node]);
                    number_visited += 1;
                    previous = node;
                }
                _ => break,
            }
        }

        subtours.push(subtour);
    }

    subtours.sort_by_key(|subtour| (subtour.connected_to_depot, subtour.sequence.len()));
    subtours
}

fn visit(subtour: &mut Subtour, visited: &mut FixedBitSet, node: &Group) {
    subtour.sequence.push(node.intern_id);
    subtour.nodes.insert(node.intern_id);
    subtour.weight += node.total_weight;
    subtour.volume += node.total_volume;
    visited.insert(node.intern_id);
}
