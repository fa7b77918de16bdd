//! Shared application state for the Functor Engine API server.
//!
//! [`AppState`] carries the world graph service and, when a language
//! model credential is configured, the engine that drives it. Reading the
//! graph never needs the engine, so the server keeps serving the last
//! successful world even when rebuilds and translations are unavailable.

use std::sync::Arc;

use functor_engine::FunctorEngine;
use functor_graph::GraphService;

use crate::error::ApiError;

/// Shared state injected into every request handler.
pub struct AppState {
    /// Owner of the current world snapshot.
    pub graph: Arc<GraphService>,
    /// The model-backed engine, absent when unconfigured.
    pub engine: Option<Arc<FunctorEngine>>,
}

impl AppState {
    /// Create state from a graph service and an optional engine.
    pub const fn new(graph: Arc<GraphService>, engine: Option<Arc<FunctorEngine>>) -> Self {
        Self { graph, engine }
    }

    /// State with an empty world and no engine.
    pub fn without_engine() -> Self {
        Self::new(Arc::new(GraphService::create()), None)
    }

    /// The engine, or [`ApiError::EngineUnavailable`] when unconfigured.
    pub fn engine(&self) -> Result<&FunctorEngine, ApiError> {
        self.engine.as_deref().ok_or(ApiError::EngineUnavailable)
    }

    /// Whether rebuild and translate requests can be served.
    pub const fn engine_available(&self) -> bool {
        self.engine.is_some()
    }
}
