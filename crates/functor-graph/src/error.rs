//! Error types for the `functor-graph` crate.
//!
//! [`SpecError`] covers contract violations found while validating a world
//! specification; [`GraphError`] is what graph-service operations return.

/// A world specification that cannot be turned into World Objects and
/// Morphisms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The top-level value is not a JSON object.
    #[error("world specification must be a JSON object")]
    NotAnObject,

    /// `nodes` or `edges` is present but not an array.
    #[error("world specification field `{field}` must be an array")]
    NotAnArray {
        /// The offending field name.
        field: &'static str,
    },

    /// A node entry is missing a required field or has the wrong shape.
    #[error("node #{index} is malformed: {reason}")]
    InvalidNode {
        /// Position of the entry in `nodes`.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A node entry has an empty or whitespace-only id.
    #[error("node #{index} has a blank id")]
    BlankNodeId {
        /// Position of the entry in `nodes`.
        index: usize,
    },

    /// An edge entry is missing a required field or has the wrong shape.
    #[error("edge #{index} is malformed: {reason}")]
    InvalidEdge {
        /// Position of the entry in `edges`.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Errors returned by world rebuilds.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The supplied specification failed validation.
    #[error("invalid world specification: {0}")]
    Spec(#[from] SpecError),

    /// The graph service has been shut down and accepts no more rebuilds.
    #[error("graph service is shut down")]
    ShutDown,
}
