//! Shared type definitions for the Functor Engine.
//!
//! This crate is the single source of truth for the data shapes used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers (graph snapshot identity)
//! - [`world`] -- World Objects and Morphisms
//! - [`api`] -- Visualization export and HTTP response payloads

pub mod api;
pub mod ids;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use api::{
    GraphExport, HealthResponse, InitializeWorldResponse, TranslationResponse, UNKNOWN_GROUP,
    VisEdge, VisNode,
};
pub use ids::SnapshotId;
pub use world::{DEFAULT_OBJECT_TYPE, Morphism, WorldObject};
