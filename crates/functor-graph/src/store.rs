//! The world graph: World Objects as nodes, Morphisms as directed multi-edges.
//!
//! [`GraphStore`] keeps node ids in first-insertion order, which is the
//! order entity resolution scans them in. An outbound adjacency map indexes
//! morphisms per source id: `BTreeMap<String, Vec<usize>>` into the edge
//! list, so several laws between the same pair of nodes coexist.
//!
//! Endpoints of a morphism are not checked against the node set. An edge
//! naming an unknown id registers that id as a *bare* node: it has no
//! World Object data, counts as a node, and exports with the `unknown`
//! group.

use std::collections::BTreeMap;

use functor_types::{GraphExport, Morphism, UNKNOWN_GROUP, VisEdge, VisNode, WorldObject};

/// In-memory graph holding one world's concepts and laws.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Node ids in first-insertion order.
    order: Vec<String>,
    /// Node data keyed by id. `None` marks a bare node.
    nodes: BTreeMap<String, Option<WorldObject>>,
    /// All morphisms in creation order.
    morphisms: Vec<Morphism>,
    /// Outbound adjacency: node id -> indices into `morphisms`.
    outbound: BTreeMap<String, Vec<usize>>,
}

impl GraphStore {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            order: Vec::new(),
            nodes: BTreeMap::new(),
            morphisms: Vec::new(),
            outbound: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Insert a World Object, replacing the data of any node with the same id.
    ///
    /// A replaced node keeps its original position in iteration order.
    pub fn add_node(&mut self, object: WorldObject) {
        let id = object.id.clone();
        self.register(&id);
        self.nodes.insert(id, Some(object));
    }

    /// Append a morphism from `source` to `target`.
    ///
    /// Unknown endpoints are registered as bare nodes, source first.
    pub fn add_morphism(&mut self, morphism: Morphism) {
        self.register(&morphism.source);
        self.register(&morphism.target);

        let index = self.morphisms.len();
        self.outbound
            .entry(morphism.source.clone())
            .or_default()
            .push(index);
        self.morphisms.push(morphism);
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        self.order.clear();
        self.nodes.clear();
        self.morphisms.clear();
        self.outbound.clear();
    }

    /// Add `id` as a bare node if it is not known yet.
    fn register(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            self.order.push(id.to_owned());
            self.nodes.insert(id.to_owned(), None);
        }
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Whether a node with this id exists (with or without data).
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The World Object stored under `id`, if any. Bare nodes return `None`.
    pub fn node(&self, id: &str) -> Option<&WorldObject> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    /// Node ids in first-insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of nodes, bare nodes included.
    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of stored morphisms.
    pub const fn edge_count(&self) -> usize {
        self.morphisms.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Outgoing morphisms of `id` in creation order.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Morphism> {
        self.outbound
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.morphisms.get(index))
    }

    /// Render the laws leaving `id`, one `- {label}: {rule} (-> {target})`
    /// line per morphism.
    ///
    /// Returns an empty string for unknown ids and for nodes without
    /// outgoing edges. Incoming edges are never included.
    pub fn outgoing_context(&self, id: &str) -> String {
        if !self.contains(id) {
            return String::new();
        }
        self.outgoing(id)
            .map(|m| format!("- {}: {} (-> {})", m.label, m.rule, m.target))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Flatten the graph into vis-network node and edge lists.
    ///
    /// Nodes come out in insertion order. Edges are grouped by source in
    /// node order and keep creation order within one source; duplicates
    /// are preserved.
    pub fn export_for_visualization(&self) -> GraphExport {
        let nodes = self
            .order
            .iter()
            .map(|id| match self.node(id) {
                Some(object) => VisNode {
                    id: id.clone(),
                    label: object.label.clone(),
                    title: Some(object.description.clone()),
                    group: object.kind.clone(),
                },
                None => VisNode {
                    id: id.clone(),
                    label: id.clone(),
                    title: None,
                    group: String::from(UNKNOWN_GROUP),
                },
            })
            .collect();

        let edges = self
            .order
            .iter()
            .flat_map(|id| self.outgoing(id))
            .map(|m| VisEdge {
                from: m.source.clone(),
                to: m.target.clone(),
                label: m.label.clone(),
                title: m.rule.clone(),
            })
            .collect();

        GraphExport { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: &str) -> WorldObject {
        WorldObject::new(id, id.to_uppercase(), format!("about {id}"))
    }

    fn kingdom() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(object("king"));
        store.add_node(object("spire").with_kind("place"));
        store.add_morphism(Morphism::new("king", "spire", "rules_from", "The king speaks only from the spire"));
        store
    }

    #[test]
    fn unknown_node_has_empty_context() {
        let store = kingdom();
        assert_eq!(store.outgoing_context("dragon"), "");
        assert_eq!(GraphStore::new().outgoing_context("king"), "");
    }

    #[test]
    fn context_lists_outgoing_laws_only() {
        let store = kingdom();
        assert_eq!(
            store.outgoing_context("king"),
            "- rules_from: The king speaks only from the spire (-> spire)"
        );
        // The spire has an incoming edge but nothing outgoing.
        assert_eq!(store.outgoing_context("spire"), "");
    }

    #[test]
    fn multi_edges_are_kept_in_insertion_order() {
        let mut store = kingdom();
        store.add_morphism(Morphism::new("king", "spire", "fears", "The spire may fall"));

        assert_eq!(
            store.outgoing_context("king"),
            "- rules_from: The king speaks only from the spire (-> spire)\n\
             - fears: The spire may fall (-> spire)"
        );

        let export = store.export_for_visualization();
        assert_eq!(export.edges.len(), 2);
        assert_eq!(export.edges.first().map(|e| e.label.as_str()), Some("rules_from"));
        assert_eq!(export.edges.get(1).map(|e| e.label.as_str()), Some("fears"));
    }

    #[test]
    fn clear_empties_export_and_is_idempotent() {
        let mut store = kingdom();
        store.clear();
        assert_eq!(store.export_for_visualization(), GraphExport::default());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn readding_node_replaces_data_and_keeps_position() {
        let mut store = kingdom();
        store.add_node(WorldObject::new("king", "Mad King", "No longer sane"));

        let ids: Vec<&str> = store.node_ids().collect();
        assert_eq!(ids, vec!["king", "spire"]);
        assert_eq!(store.node("king").map(|o| o.label.as_str()), Some("Mad King"));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn dangling_edge_registers_bare_nodes() {
        let mut store = kingdom();
        store.add_morphism(Morphism::new("oracle", "king", "advises", "Whispers omens"));

        assert_eq!(store.node_count(), 3);
        assert!(store.contains("oracle"));
        assert!(store.node("oracle").is_none());

        let export = store.export_for_visualization();
        let oracle = export.nodes.iter().find(|n| n.id == "oracle");
        assert_eq!(
            oracle,
            Some(&VisNode {
                id: String::from("oracle"),
                label: String::from("oracle"),
                title: None,
                group: String::from("unknown"),
            })
        );
        assert_eq!(store.outgoing_context("oracle"), "- advises: Whispers omens (-> king)");
    }

    #[test]
    fn bare_node_gains_data_when_added_later() {
        let mut store = GraphStore::new();
        store.add_morphism(Morphism::new("a", "b", "link", "a links b"));
        store.add_node(object("b"));

        let export = store.export_for_visualization();
        assert_eq!(export.nodes.get(1).map(|n| n.group.as_str()), Some("concept"));
        assert_eq!(export.nodes.get(1).map(|n| n.label.as_str()), Some("B"));
    }

    #[test]
    fn export_describes_nodes() {
        let export = kingdom().export_for_visualization();
        let spire = export.nodes.get(1);
        assert_eq!(spire.map(|n| n.group.as_str()), Some("place"));
        assert_eq!(spire.and_then(|n| n.title.as_deref()), Some("about spire"));
        assert_eq!(
            export.edges.first(),
            Some(&VisEdge {
                from: String::from("king"),
                to: String::from("spire"),
                label: String::from("rules_from"),
                title: String::from("The king speaks only from the spire"),
            })
        );
    }

    #[test]
    fn export_groups_edges_by_source_in_node_order() {
        let mut store = GraphStore::new();
        store.add_node(object("a"));
        store.add_node(object("b"));
        store.add_morphism(Morphism::new("b", "a", "first", "created first"));
        store.add_morphism(Morphism::new("a", "b", "second", "created second"));

        let labels: Vec<String> = store
            .export_for_visualization()
            .edges
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["second", "first"]);
    }
}
