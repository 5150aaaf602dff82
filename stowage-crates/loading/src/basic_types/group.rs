use super::Cuboid;

/// A customer stop together with the items it demands. Node 0 is the depot and demands nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub intern_id: usize,
    pub external_id: usize,
    pub total_weight: f64,
    pub total_volume: f64,
    pub total_area: f64,
    pub items: Vec<Cuboid>,
}

impl Group {
    /// Creates a group whose totals are derived from its items.
    pub fn new(intern_id: usize, external_id: usize, items: Vec<Cuboid>) -> Group {
        let total_weight = items.iter().map(|item| item.weight).sum();
        let total_volume = items.iter().map(|item| item.volume() as f64).sum();
        let total_area = items.iter().map(|item| item.area() as f64).sum();

        Group {
            intern_id,
            external_id,
            total_weight,
            total_volume,
            total_area,
            items,
        }
    }

    /// A group without items, e.g. the depot.
    pub fn empty(intern_id: usize) -> Group {
        Group::new(intern_id, intern_id, vec![])
    }
}
