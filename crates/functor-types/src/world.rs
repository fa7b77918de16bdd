//! Domain records of a world graph: concepts and the laws between them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Group tag assigned to a World Object when the source omits one.
pub const DEFAULT_OBJECT_TYPE: &str = "concept";

fn default_object_type() -> String {
    DEFAULT_OBJECT_TYPE.to_owned()
}

/// A concept node in the world graph.
///
/// `kind` is an open tag (`concept`, `place`, `person`, ...) and is
/// serialized as `type` to match the language model's output shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldObject {
    /// Unique key within one world.
    pub id: String,
    /// Display name.
    pub label: String,
    /// Free-text explanation, shown as a tooltip.
    pub description: String,
    /// Open classification tag.
    #[serde(rename = "type", default = "default_object_type")]
    pub kind: String,
    /// Arbitrary metadata, opaque to the graph.
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl WorldObject {
    /// Create a `concept` World Object with empty metadata.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            kind: default_object_type(),
            meta: BTreeMap::new(),
        }
    }

    /// Replace the classification tag.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// A directed, labeled law from one World Object to another.
///
/// Morphisms carry no identity of their own: several may connect the same
/// ordered pair and they are distinguished only by insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Morphism {
    /// Id of the World Object the law starts from.
    pub source: String,
    /// Id of the World Object the law points to.
    pub target: String,
    /// Short relationship name (`governs`, `causes`, ...).
    pub label: String,
    /// The transformation or law this relationship encodes.
    pub rule: String,
}

impl Morphism {
    /// Create a new morphism.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
            rule: rule.into(),
        }
    }
}
