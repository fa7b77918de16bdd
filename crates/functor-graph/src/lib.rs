//! World graph and context retrieval for the Functor Engine.
//!
//! This crate models a fictional world as a directed multigraph: World
//! Objects (concepts) as nodes, Morphisms (laws) as labeled edges. It
//! resolves free-text mentions onto nodes and assembles the laws that
//! apply to a text into a rule context for generation.
//!
//! # Modules
//!
//! - [`store`] -- [`GraphStore`], the in-memory graph with outgoing-law
//!   rendering and vis-network export.
//! - [`resolver`] -- Case-insensitive substring matching of mentions to ids.
//! - [`assembler`] -- Applied-law records and the accumulated rule context.
//! - [`spec`] -- [`WorldSpec`], the parse-and-validate boundary for model output.
//! - [`builder`] -- Full-replace population of a store from a specification.
//! - [`service`] -- [`GraphService`], atomic snapshot swapping for readers
//!   and rebuilds running concurrently.
//! - [`error`] -- Error types.

pub mod assembler;
pub mod builder;
pub mod error;
pub mod resolver;
pub mod service;
pub mod spec;
pub mod store;

// Re-export primary types at crate root.
pub use assembler::{AssembledContext, assemble_context};
pub use error::{GraphError, SpecError};
pub use resolver::resolve_mention;
pub use service::{GraphService, GraphSnapshot};
pub use spec::WorldSpec;
pub use store::GraphStore;
