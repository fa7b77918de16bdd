//! HTTP handlers for the Functor Engine API.
//!
//! Reads (`/world/graph`, `/health`, the dashboard) are served straight
//! from the current graph snapshot. Rebuild and translate go through the
//! engine and fail with 503 when it is not configured.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{Html, IntoResponse};
use functor_types::{GraphExport, HealthResponse, InitializeWorldResponse, TranslationResponse};
use serde::Deserialize;
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Client script for the dashboard page.
const DASHBOARD_SCRIPT: &str = include_str!("../assets/dashboard.js");

/// Body of `POST /world/initialize`.
#[derive(Debug, Deserialize, Validate)]
pub struct InitializeWorldRequest {
    /// Natural-language description of the world.
    #[validate(custom(function = "non_blank"))]
    pub config_text: String,
}

/// Body of `POST /translate`.
#[derive(Debug, Deserialize, Validate)]
pub struct TranslateRequest {
    /// Text to rewrite.
    #[validate(custom(function = "non_blank"))]
    pub text: String,
    /// World selector. Only one world exists, so this is logged and ignored.
    #[serde(default = "default_world_id")]
    pub world_id: String,
}

fn default_world_id() -> String {
    String::from("default")
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// `POST /world/initialize` -- rebuild the world from a description.
pub async fn initialize_world(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InitializeWorldRequest>, JsonRejection>,
) -> Result<Json<InitializeWorldResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let engine = state.engine()?;

    let nodes = engine.initialize_world(&request.config_text).await?;
    Ok(Json(InitializeWorldResponse::initialized(nodes)))
}

/// `POST /translate` -- rewrite text under the current world's laws.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    let engine = state.engine()?;

    debug!(world_id = %request.world_id, text_len = request.text.len(), "translate requested");
    let response = engine.translate(&request.text).await?;
    Ok(Json(response))
}

/// `GET /world/graph` -- the current world in vis-network shape.
pub async fn get_graph(State(state): State<Arc<AppState>>) -> Json<GraphExport> {
    let snapshot = state.graph.read_snapshot().await;
    Json(snapshot.graph.export_for_visualization())
}

/// `GET /health` -- liveness plus a summary of the current snapshot.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.graph.read_snapshot().await;
    Json(HealthResponse {
        status: String::from("ok"),
        engine_available: state.engine_available(),
        snapshot_id: snapshot.id,
        built_at: snapshot.built_at,
        node_count: snapshot.graph.node_count(),
        edge_count: snapshot.graph.edge_count(),
    })
}

/// `GET /` -- dashboard with world controls and the graph rendered by
/// vis-network.
#[allow(clippy::too_many_lines)]
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.graph.read_snapshot().await;
    let snapshot_id = snapshot.id;
    let built_at = snapshot
        .built_at
        .map_or_else(|| String::from("never"), |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    let node_count = snapshot.graph.node_count();
    let edge_count = snapshot.graph.edge_count();
    let (engine_class, engine_label) = if state.engine_available() {
        ("status", "ONLINE")
    } else {
        ("status offline", "NOT CONFIGURED")
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Functor Engine</title>
    <script src="https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js"></script>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 1200px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        h2 {{ color: #c9d1d9; font-size: 1.1rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        .metric .small {{ font-size: 0.9rem; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        .offline {{ color: #f85149; }}
        .columns {{ display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }}
        textarea {{
            width: 100%;
            min-height: 8rem;
            background: #161b22;
            color: #c9d1d9;
            border: 1px solid #30363d;
            border-radius: 6px;
            font-family: inherit;
            padding: 0.5rem;
            box-sizing: border-box;
        }}
        button {{
            background: #238636;
            color: #fff;
            border: none;
            border-radius: 6px;
            padding: 0.5rem 1rem;
            margin-top: 0.5rem;
            cursor: pointer;
        }}
        pre {{ white-space: pre-wrap; color: #8b949e; }}
        blockquote {{ border-left: 3px solid #58a6ff; margin: 0.5rem 0; padding-left: 1rem; }}
        #graph {{ height: 520px; background: #161b22; border: 1px solid #30363d; border-radius: 6px; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Functor Engine</h1>
    <p class="subtitle">World translator</p>

    <p>Engine: <span class="{engine_class}">{engine_label}</span></p>

    <div>
        <div class="metric">
            <div class="label">Concepts</div>
            <div class="value">{node_count}</div>
        </div>
        <div class="metric">
            <div class="label">Laws</div>
            <div class="value">{edge_count}</div>
        </div>
        <div class="metric">
            <div class="label">Built</div>
            <div class="value small">{built_at}</div>
        </div>
        <div class="metric">
            <div class="label">Snapshot</div>
            <div class="value small">{snapshot_id}</div>
        </div>
    </div>

    <hr>

    <div class="columns">
        <div>
            <h2>1. World Initialization</h2>
            <form id="init-form">
                <textarea id="config-text" placeholder="In the Kingdom of Aethelgard, magic flows from the Crystal Spire..."></textarea>
                <button type="submit">Initialize World</button>
            </form>
            <pre id="init-result"></pre>

            <h2>2. Reality Input</h2>
            <form id="translate-form">
                <textarea id="input-text" placeholder="I went to the convenience store to buy some rice balls."></textarea>
                <button type="submit">Translate to World</button>
            </form>
            <blockquote id="translate-result"></blockquote>
            <pre id="applied-laws"></pre>
        </div>
        <div>
            <h2>3. World Visualization <button id="refresh" type="button">Refresh</button></h2>
            <p id="graph-empty" class="subtitle">No graph data available.</p>
            <div id="graph"></div>
        </div>
    </div>

    <script>
{DASHBOARD_SCRIPT}
    </script>
</body>
</html>"#
    ))
}
