//! Axum router construction for the Functor Engine API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- dashboard page
/// - `GET /health` -- liveness and snapshot summary
/// - `GET /world/graph` -- current world for vis-network
/// - `POST /world/initialize` -- rebuild the world from a description
/// - `POST /translate` -- rewrite text under the world's laws
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/world/graph", get(handlers::get_graph))
        .route("/world/initialize", post(handlers::initialize_world))
        .route("/translate", post(handlers::translate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
