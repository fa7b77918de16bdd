//! Graph service: owns the current world snapshot and swaps it atomically.
//!
//! Each rebuild populates a fresh [`GraphStore`] off to the side and then
//! replaces the `Arc<GraphSnapshot>` pointer. Readers clone the pointer at
//! request start and keep a consistent graph for the whole request, no
//! matter how many rebuilds land meanwhile. Rebuilds are serialized, so the
//! last one to finish wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use functor_types::SnapshotId;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::builder;
use crate::error::GraphError;
use crate::store::GraphStore;

/// An immutable world graph together with its identity.
#[derive(Debug)]
pub struct GraphSnapshot {
    /// Fresh for every swap.
    pub id: SnapshotId,
    /// When the rebuild completed. `None` for empty snapshots.
    pub built_at: Option<DateTime<Utc>>,
    /// The graph itself.
    pub graph: GraphStore,
}

impl GraphSnapshot {
    fn empty() -> Self {
        Self {
            id: SnapshotId::new(),
            built_at: None,
            graph: GraphStore::new(),
        }
    }

    fn built(graph: GraphStore) -> Self {
        Self {
            id: SnapshotId::new(),
            built_at: Some(Utc::now()),
            graph,
        }
    }
}

/// Owner of the current world graph.
///
/// Shared behind an [`Arc`] and injected into request handlers.
#[derive(Debug)]
pub struct GraphService {
    current: RwLock<Arc<GraphSnapshot>>,
    /// Serializes rebuilds, resets and shutdown.
    writer: Mutex<()>,
    shut_down: AtomicBool,
}

impl GraphService {
    /// Create a service holding an empty world.
    pub fn create() -> Self {
        Self {
            current: RwLock::new(Arc::new(GraphSnapshot::empty())),
            writer: Mutex::new(()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// The snapshot current at the time of the call.
    pub async fn read_snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the world with one built from a raw `{nodes, edges}` value.
    ///
    /// Returns the new node count. A specification that fails validation
    /// replaces the world with an empty graph and returns the error.
    ///
    /// # Errors
    ///
    /// [`GraphError::Spec`] for a malformed specification,
    /// [`GraphError::ShutDown`] after [`GraphService::shutdown`].
    pub async fn rebuild(&self, spec: &Value) -> Result<usize, GraphError> {
        let _writer = self.writer.lock().await;
        if self.is_shut_down() {
            return Err(GraphError::ShutDown);
        }

        let mut graph = GraphStore::new();
        match builder::rebuild(&mut graph, spec) {
            Ok(node_count) => {
                let snapshot = GraphSnapshot::built(graph);
                info!(snapshot_id = %snapshot.id, node_count, "world snapshot swapped in");
                self.swap(snapshot).await;
                Ok(node_count)
            }
            Err(e) => {
                warn!(error = %e, "world rebuild failed, serving an empty world");
                self.swap(GraphSnapshot::empty()).await;
                Err(e)
            }
        }
    }

    /// Replace the world with an empty graph.
    pub async fn reset(&self) {
        let _writer = self.writer.lock().await;
        self.swap(GraphSnapshot::empty()).await;
    }

    /// Empty the world and refuse every later rebuild.
    pub async fn shutdown(&self) {
        let _writer = self.writer.lock().await;
        self.shut_down.store(true, Ordering::Release);
        self.swap(GraphSnapshot::empty()).await;
        info!("graph service shut down");
    }

    /// Whether [`GraphService::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    async fn swap(&self, snapshot: GraphSnapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }
}

impl Default for GraphService {
    fn default() -> Self {
        Self::create()
    }
}
