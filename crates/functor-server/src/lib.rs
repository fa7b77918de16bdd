//! HTTP API server for the Functor Engine.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **World endpoints**: `POST /world/initialize` rebuilds the world graph
//!   from a description, `GET /world/graph` returns it for visualization
//! - **Translation**: `POST /translate` rewrites text under the laws of the
//!   concepts it mentions
//! - **Dashboard** (`GET /`) with world controls and a vis-network graph
//! - **Health** (`GET /health`)
//!
//! # Architecture
//!
//! Handlers share an [`AppState`] holding the
//! [`GraphService`](functor_graph::GraphService) and an optional
//! [`FunctorEngine`](functor_engine::FunctorEngine). Graph reads work
//! against the snapshot current at request start and never wait on a
//! rebuild in progress.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
