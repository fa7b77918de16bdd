//! World population from a structured specification.
//!
//! A rebuild is always a full replace: the store is cleared first, then the
//! specification is validated, then every node and every edge is inserted.
//! A specification that fails validation leaves the store empty, exactly as
//! after [`GraphStore::clear`].

use serde_json::Value;
use tracing::{info, warn};

use crate::error::GraphError;
use crate::spec::WorldSpec;
use crate::store::GraphStore;

/// Clear `store` and repopulate it from a raw `{nodes, edges}` value.
///
/// Returns the resulting node count, bare nodes created by dangling edges
/// included.
pub fn rebuild(store: &mut GraphStore, spec: &Value) -> Result<usize, GraphError> {
    store.clear();
    let spec = WorldSpec::from_value(spec)?;
    Ok(populate(store, spec))
}

/// Insert every node, then every edge, of an already validated spec.
pub fn populate(store: &mut GraphStore, spec: WorldSpec) -> usize {
    let declared = spec.nodes.len();

    for node in spec.nodes {
        store.add_node(node);
    }
    for edge in spec.edges {
        if !store.contains(&edge.source) || !store.contains(&edge.target) {
            warn!(
                from = %edge.source,
                to = %edge.target,
                label = %edge.label,
                "morphism references an undeclared concept"
            );
        }
        store.add_morphism(edge);
    }

    let node_count = store.node_count();
    info!(
        declared_nodes = declared,
        node_count,
        edge_count = store.edge_count(),
        "world graph populated"
    );
    node_count
}
