//! A line-based instance format.
//!
//! ```text
//! vehicle <dx> <dy> <dz> <weight limit>
//! node <id> <weight>
//! item <dx> <dy> <dz> <weight> <fragile: 0|1> <rotate: 0|1>
//! ```
//!
//! The items of a node follow its `node` line. The first node is the depot. Empty lines and lines
//! starting with `#` are ignored.
use std::str::FromStr;
use std::str::SplitWhitespace;

use fnv::FnvHashSet;
use stowage_loading::Container;
use stowage_loading::Cuboid;
use stowage_loading::Fragility;
use stowage_loading::Group;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub container: Container,
    /// Indexed by internal id; node 0 is the depot.
    pub nodes: Vec<Group>,
}

impl Instance {
    /// The internal id of the node with the given external id.
    pub fn intern_id(&self, external_id: usize) -> Option<usize> {
        self.nodes
            .iter()
            .find(|node| node.external_id == external_id)
            .map(|node| node.intern_id)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("line {line}: expected {expected}")]
    MissingToken { line: usize, expected: &'static str },
    #[error("line {line}: '{token}' is not a valid {expected}")]
    InvalidToken {
        line: usize,
        token: String,
        expected: &'static str,
    },
    #[error("line {line}: unknown keyword '{keyword}'")]
    UnknownKeyword { line: usize, keyword: String },
    #[error("line {0}: the vehicle is defined more than once")]
    DuplicateVehicle(usize),
    #[error("line {0}: node {1} is defined more than once")]
    DuplicateNode(usize, usize),
    #[error("line {0}: item without a node")]
    ItemWithoutNode(usize),
    #[error("the instance defines no vehicle")]
    MissingVehicle,
    #[error("the instance defines no depot")]
    MissingDepot,
}

impl FromStr for Instance {
    type Err = InstanceError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        parse_instance(source)
    }
}

pub fn parse_instance(source: &str) -> Result<Instance, InstanceError> {
    let mut container = None;
    let mut nodes: Vec<Group> = Vec::new();
    let mut declared_weights = Vec::new();
    let mut external_ids = FnvHashSet::default();
    let mut next_item_id = 0;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = Tokens {
            line: line_number,
            inner: line.split_whitespace(),
        };
        let keyword = tokens.next_token("a keyword")?;

        match keyword {
            "vehicle" => {
                if container.is_some() {
                    return Err(InstanceError::DuplicateVehicle(line_number));
                }
                container = Some(Container::new(
                    tokens.parse("a length")?,
                    tokens.parse("a width")?,
                    tokens.parse("a height")?,
                    tokens.parse("a weight limit")?,
                ));
            }
            "node" => {
                let external_id: usize = tokens.parse("a node id")?;
                let weight: f64 = tokens.parse("a weight")?;
                if !external_ids.insert(external_id) {
                    return Err(InstanceError::DuplicateNode(line_number, external_id));
                }
                nodes.push(Group::new(nodes.len(), external_id, vec![]));
                declared_weights.push(weight);
            }
            "item" => {
                let dx = tokens.parse("a length")?;
                let dy = tokens.parse("a width")?;
                let dz = tokens.parse("a height")?;
                let weight = tokens.parse("a weight")?;
                let fragility = if tokens.parse_flag("a fragility flag")? {
                    Fragility::Fragile
                } else {
                    Fragility::None
                };
                let enable_rotation = tokens.parse_flag("a rotation flag")?;

                let Some(node) = nodes.last_mut() else {
                    return Err(InstanceError::ItemWithoutNode(line_number));
                };
                node.items.push(Cuboid::new(
                    next_item_id,
                    dx,
                    dy,
                    dz,
                    weight,
                    fragility,
                    enable_rotation,
                ));
                next_item_id += 1;
            }
            other => {
                return Err(InstanceError::UnknownKeyword {
                    line: line_number,
                    keyword: other.to_owned(),
                });
            }
        }
    }

    let container = container.ok_or(InstanceError::MissingVehicle)?;
    if nodes.is_empty() {
        return Err(InstanceError::MissingDepot);
    }

    // The totals are derived from the items, except for the weight, which is the declared demand.
    let nodes = nodes
        .into_iter()
        .zip(declared_weights)
        .map(|(node, weight)| Group {
            total_weight: weight,
            ..Group::new(node.intern_id, node.external_id, node.items)
        })
        .collect();

    Ok(Instance { container, nodes })
}

struct Tokens<'a> {
    line: usize,
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next_token(&mut self, expected: &'static str) -> Result<&'a str, InstanceError> {
        self.inner.next().ok_or(InstanceError::MissingToken {
            line: self.line,
            expected,
        })
    }

    fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, InstanceError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| InstanceError::InvalidToken {
            line: self.line,
            token: token.to_owned(),
            expected,
        })
    }

    fn parse_flag(&mut self, expected: &'static str) -> Result<bool, InstanceError> {
        let token = self.next_token(expected)?;
        match token {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(InstanceError::InvalidToken {
                line: self.line,
                token: token.to_owned(),
                expected,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
# two customers
vehicle 4 2 2 100

node 0 0
node 7 20
item 2 2 2 10 0 1
item 1 1 1 10 1 0
node 9 5
item 2 2 2 5 0 0
";

    #[test]
    fn nodes_are_numbered_in_order() {
        let instance = parse_instance(SMALL).unwrap();

        assert_eq!(Container::new(4, 2, 2, 100.0), instance.container);
        assert_eq!(3, instance.nodes.len());
        assert_eq!(Some(1), instance.intern_id(7));
        assert_eq!(Some(2), instance.intern_id(9));
        assert_eq!(None, instance.intern_id(3));

        let customer = &instance.nodes[1];
        assert_eq!(2, customer.items.len());
        assert_eq!(20.0, customer.total_weight);
        assert_eq!(9.0, customer.total_volume);
        assert_eq!(Fragility::Fragile, customer.items[1].fragility);
        assert!(customer.items[0].enable_horizontal_rotation);
        assert_eq!(2, instance.nodes[2].items[0].id);
    }

    #[test]
    fn items_need_a_node() {
        let error = parse_instance("vehicle 1 1 1 1\nitem 1 1 1 1 0 0\n").unwrap_err();

        assert_eq!(InstanceError::ItemWithoutNode(2), error);
    }

    #[test]
    fn malformed_numbers_are_reported_with_their_line() {
        let error = parse_instance("vehicle 1 x 1 1\n").unwrap_err();

        assert_eq!(
            InstanceError::InvalidToken {
                line: 1,
                token: "x".to_owned(),
                expected: "a width",
            },
            error
        );
    }

    #[test]
    fn duplicate_nodes_are_rejected() {
        let error = parse_instance("vehicle 1 1 1 1\nnode 0 0\nnode 0 0\n").unwrap_err();

        assert_eq!(InstanceError::DuplicateNode(3, 0), error);
    }

    #[test]
    fn missing_parts_are_rejected() {
        assert_eq!(
            Err(InstanceError::MissingVehicle),
            parse_instance("node 0 0\n")
        );
        assert_eq!(
            Err(InstanceError::MissingDepot),
            parse_instance("vehicle 1 1 1 1\n")
        );
    }
}
