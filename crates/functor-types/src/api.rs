//! Response payloads shared between the engine, the HTTP API, and the
//! dashboard.
//!
//! The visualization shapes follow the vis-network conventions: nodes carry
//! `id`/`label`/`title`/`group`, edges carry `from`/`to`/`label`/`title`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SnapshotId;

/// Group assigned to nodes that exist only as an edge endpoint.
pub const UNKNOWN_GROUP: &str = "unknown";

/// One node of the visualization export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisNode {
    /// World Object id.
    pub id: String,
    /// Display label (falls back to the id for bare nodes).
    pub label: String,
    /// Tooltip text: the World Object description. Absent for bare nodes.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    /// Colouring group: the World Object type, or `unknown`.
    pub group: String,
}

/// One edge of the visualization export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisEdge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Relationship name.
    pub label: String,
    /// Tooltip text: the law the edge encodes.
    pub title: String,
}

/// Flat node and edge lists describing the whole current graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GraphExport {
    /// Nodes in insertion order.
    pub nodes: Vec<VisNode>,
    /// One entry per stored morphism, duplicates preserved.
    pub edges: Vec<VisEdge>,
}

/// Result of a successful world rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InitializeWorldResponse {
    /// Always `initialized`.
    pub status: String,
    /// Number of nodes in the rebuilt graph.
    pub nodes: usize,
}

impl InitializeWorldResponse {
    /// Build the response for a rebuild that produced `nodes` nodes.
    pub fn initialized(nodes: usize) -> Self {
        Self {
            status: String::from("initialized"),
            nodes,
        }
    }
}

/// Result of translating a text through the current world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TranslationResponse {
    /// The text as submitted.
    pub original_text: String,
    /// The text rewritten in the world's idiom.
    pub translated_text: String,
    /// One entry per mention that resolved to a concept with laws.
    pub applied_laws: Vec<String>,
}

/// Liveness and world summary served by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    /// Always `ok` while the server is answering.
    pub status: String,
    /// Whether rebuild and translate are available.
    pub engine_available: bool,
    /// Id of the snapshot currently served.
    pub snapshot_id: SnapshotId,
    /// When the current snapshot was built; absent before the first rebuild.
    #[ts(optional)]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
    /// Node count of the current snapshot.
    pub node_count: usize,
    /// Edge count of the current snapshot.
    pub edge_count: usize,
}
