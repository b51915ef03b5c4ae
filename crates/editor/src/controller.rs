#![forbid(unsafe_code)]

use crate::changes::{self, EdgeChange, NodeChange};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::locks::NodeLocks;
use crate::state::{Connected, GraphSnapshot, GraphState, Lifecycle};
use nb_bridge::{Bridge, BridgeError};
use nb_core::{Edge, EdgeId, Node, NodeId, Position, Selection, validate_label};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Owner of the in-memory graph.
///
/// Remote mutations go through the bridge first and touch local state only once the call
/// succeeded, so a failed call leaves the graph exactly as it was. Calls against the same
/// node are sequenced in issue order. Cloning yields another handle to the same graph.
#[derive(Clone)]
pub struct GraphController {
    inner: Arc<Inner>,
}

struct Inner {
    bridge: Arc<dyn Bridge>,
    config: EditorConfig,
    state: Mutex<GraphState>,
    locks: NodeLocks,
    rng: Mutex<StdRng>,
}

impl GraphController {
    pub fn new(bridge: Arc<dyn Bridge>, config: EditorConfig) -> Self {
        let rng = match config.placement_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            inner: Arc::new(Inner {
                bridge,
                config,
                state: Mutex::new(GraphState::default()),
                locks: NodeLocks::default(),
                rng: Mutex::new(rng),
            }),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.inner.config
    }

    pub fn is_ready(&self) -> bool {
        self.state().lifecycle == Lifecycle::Ready
    }

    /// Loads the stored nodes once per controller; edges and selection start empty.
    pub async fn initialize(&self) -> Result<usize, EditorError> {
        {
            let mut state = self.state();
            match state.lifecycle {
                Lifecycle::Fresh => state.lifecycle = Lifecycle::Loading,
                Lifecycle::Loading | Lifecycle::Ready => {
                    return Err(EditorError::AlreadyInitialized);
                }
            }
        }

        let loaded = self.remote("get-nodes", self.inner.bridge.get_nodes()).await;

        let mut state = self.state();
        match loaded {
            Ok(nodes) => {
                let count = nodes.len();
                state.load(nodes);
                info!(nodes = count, "graph loaded");
                Ok(count)
            }
            Err(err) => {
                state.lifecycle = Lifecycle::Fresh;
                Err(err)
            }
        }
    }

    pub async fn add_node(&self, label: &str) -> Result<Node, EditorError> {
        validate_label(label)?;
        let node = {
            let mut state = self.state();
            ensure_ready(&state)?;
            let id = state.allocate_node_id().ok_or(EditorError::IdsExhausted)?;
            Node::new(id, self.random_position(), label)?
        };

        let _turn = self.inner.locks.acquire(&node.id).await;
        self.remote("add-node", self.inner.bridge.add_node(&node))
            .await?;

        self.state().push_node(node.clone());
        debug!(id = %node.id, "node added");
        Ok(node)
    }

    /// Renames the selected node.
    pub async fn rename_node(&self, id: &NodeId, label: &str) -> Result<(), EditorError> {
        validate_label(label)?;
        ensure_selected(&self.state(), id)?;

        let _turn = self.inner.locks.acquire(id).await;
        ensure_selected(&self.state(), id)?;
        self.remote("rename-node", self.inner.bridge.rename_node(id, label))
            .await?;

        if let Some(node) = self.state().node_mut(id) {
            node.label = label.to_string();
        }
        Ok(())
    }

    /// Replaces the node's description; empty text clears it.
    pub async fn set_description(&self, id: &NodeId, text: &str) -> Result<(), EditorError> {
        ensure_node(&self.state(), id)?;

        let _turn = self.inner.locks.acquire(id).await;
        ensure_node(&self.state(), id)?;
        self.remote(
            "update-node-description",
            self.inner.bridge.update_node_description(id, text),
        )
        .await?;

        if let Some(node) = self.state().node_mut(id) {
            node.description = text.to_string();
        }
        Ok(())
    }

    /// Deletes the node and, locally, every edge touching it. Returns the removed edges.
    pub async fn delete_node(&self, id: &NodeId) -> Result<Vec<Edge>, EditorError> {
        ensure_node(&self.state(), id)?;

        let _turn = self.inner.locks.acquire(id).await;
        ensure_node(&self.state(), id)?;
        self.remote("delete-node", self.inner.bridge.delete_node(id))
            .await?;

        let removed = self.state().remove_node(id);
        debug!(id = %id, edges = removed.len(), "node deleted");
        Ok(removed)
    }

    /// Connects two existing nodes. Connecting an already connected ordered pair is a no-op.
    pub fn connect(&self, source: &NodeId, target: &NodeId) -> Result<Connected, EditorError> {
        let mut state = self.state();
        ensure_node(&state, source)?;
        ensure_node(&state, target)?;
        Ok(state.connect(source.clone(), target.clone()))
    }

    pub fn delete_edge(&self, id: &EdgeId) -> Result<Edge, EditorError> {
        let mut state = self.state();
        ensure_ready(&state)?;
        state
            .remove_edge(id)
            .ok_or_else(|| EditorError::UnknownEdge(id.clone()))
    }

    /// Applies renderer-side node updates. Never persisted.
    pub fn apply_node_changes(&self, changes: Vec<NodeChange>) -> usize {
        changes::apply_node_changes(&mut self.state(), changes)
    }

    /// Applies renderer-side edge updates and returns the ids of removed edges.
    pub fn apply_edge_changes(&self, changes: Vec<EdgeChange>) -> Vec<EdgeId> {
        changes::apply_edge_changes(&mut self.state(), changes)
    }

    pub fn select(&self, selection: Selection) -> Result<(), EditorError> {
        let mut state = self.state();
        match &selection {
            Selection::Node(id) => ensure_node(&state, id)?,
            Selection::Edge(id) => {
                if state.edge(id).is_none() {
                    return Err(EditorError::UnknownEdge(id.clone()));
                }
            }
        }
        state.set_selection(Some(selection));
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.state().set_selection(None);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.state().selection.clone()
    }

    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.state().node(id).cloned()
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.state()
            .nodes
            .iter()
            .map(|entry| entry.node.clone())
            .collect()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.state()
            .edges
            .iter()
            .map(|entry| entry.edge.clone())
            .collect()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.state().snapshot()
    }

    #[cfg(test)]
    pub(crate) fn pending_node_locks(&self) -> usize {
        self.inner.locks.len()
    }

    async fn remote<T>(
        &self,
        call: &'static str,
        future: impl Future<Output = Result<T, BridgeError>>,
    ) -> Result<T, EditorError> {
        let after = self.inner.config.call_timeout;
        match tokio::time::timeout(after, future).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(EditorError::Bridge(BridgeError::Timeout { call, after })),
        }
    }

    fn random_position(&self) -> Position {
        let placement = self.inner.config.placement;
        let mut rng = match self.inner.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let x = if placement.width > 0.0 {
            rng.gen_range(0.0..placement.width)
        } else {
            0.0
        };
        let y = if placement.height > 0.0 {
            rng.gen_range(0.0..placement.height)
        } else {
            0.0
        };
        Position::new(x, y)
    }

    fn state(&self) -> MutexGuard<'_, GraphState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn ensure_ready(state: &GraphState) -> Result<(), EditorError> {
    if state.lifecycle != Lifecycle::Ready {
        return Err(EditorError::NotInitialized);
    }
    Ok(())
}

fn ensure_node(state: &GraphState, id: &NodeId) -> Result<(), EditorError> {
    ensure_ready(state)?;
    if state.node(id).is_none() {
        return Err(EditorError::UnknownNode(id.clone()));
    }
    Ok(())
}

fn ensure_selected(state: &GraphState, id: &NodeId) -> Result<(), EditorError> {
    ensure_node(state, id)?;
    if state.selection.as_ref().and_then(Selection::node) != Some(id) {
        return Err(EditorError::NotSelected(id.clone()));
    }
    Ok(())
}
