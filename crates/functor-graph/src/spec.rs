//! Parse-and-validate boundary between raw model output and the graph.
//!
//! The language model returns loosely typed JSON. [`WorldSpec::from_value`]
//! turns it into typed World Objects and Morphisms, or a [`SpecError`]
//! naming the first offending entry, before anything touches a store.

use functor_types::{Morphism, WorldObject};
use serde::Deserialize;
use serde_json::Value;

use crate::error::SpecError;

/// A validated world specification, ready to populate a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSpec {
    /// Concepts, in the order the model listed them.
    pub nodes: Vec<WorldObject>,
    /// Laws, in the order the model listed them.
    pub edges: Vec<Morphism>,
}

impl WorldSpec {
    /// Validate a `{nodes, edges}` JSON object.
    ///
    /// Missing or `null` lists are treated as empty. Node entries need
    /// string `id`, `label` and `description`; `type` defaults to `concept`
    /// and `meta` to an empty map. Edge entries need string `source`,
    /// `target`, `label` and `rule`.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        let object = value.as_object().ok_or(SpecError::NotAnObject)?;

        let nodes = entries(object.get("nodes"), "nodes")?
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_node(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let edges = entries(object.get("edges"), "edges")?
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Morphism::deserialize(entry).map_err(|e| SpecError::InvalidEdge {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nodes, edges })
    }
}

/// Borrow the array stored under `field`, treating absence as empty.
fn entries<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a [Value], SpecError> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(SpecError::NotAnArray { field }),
    }
}

fn parse_node(index: usize, entry: &Value) -> Result<WorldObject, SpecError> {
    let node = WorldObject::deserialize(entry).map_err(|e| SpecError::InvalidNode {
        index,
        reason: e.to_string(),
    })?;
    if node.id.trim().is_empty() {
        return Err(SpecError::BlankNodeId { index });
    }
    Ok(node)
}
