#![forbid(unsafe_code)]

use nb_core::{Edge, EdgeId, Node, NodeId, Selection};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A node plus the view state the renderer keeps for it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeEntry {
    pub node: Node,
    pub selected: bool,
    pub dragging: bool,
    pub measured: Option<Size>,
}

impl NodeEntry {
    fn new(node: Node) -> Self {
        Self {
            node,
            selected: false,
            dragging: false,
            measured: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeEntry {
    pub edge: Edge,
    pub selected: bool,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<EdgeEntry>,
    pub selection: Option<Selection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connected {
    Created(Edge),
    /// The ordered pair was already connected; nothing changed.
    Existing(Edge),
}

impl Connected {
    pub fn edge(&self) -> &Edge {
        match self {
            Self::Created(edge) | Self::Existing(edge) => edge,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    #[default]
    Fresh,
    Loading,
    Ready,
}

#[derive(Debug, Default)]
pub(crate) struct GraphState {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) nodes: Vec<NodeEntry>,
    pub(crate) edges: Vec<EdgeEntry>,
    pub(crate) selection: Option<Selection>,
    /// `None` once the `n<k>` sequence has run past `u64::MAX`.
    next_seq: Option<u64>,
}

impl GraphState {
    pub(crate) fn load(&mut self, nodes: Vec<Node>) {
        self.next_seq = match nodes.iter().filter_map(|node| node.id.sequence_number()).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        self.nodes = nodes.into_iter().map(NodeEntry::new).collect();
        self.edges.clear();
        self.selection = None;
        self.lifecycle = Lifecycle::Ready;
    }

    pub(crate) fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|entry| &entry.node.id == id)
            .map(|entry| &entry.node)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.node_entry_mut(id).map(|entry| &mut entry.node)
    }

    pub(crate) fn node_entry_mut(&mut self, id: &NodeId) -> Option<&mut NodeEntry> {
        self.nodes.iter_mut().find(|entry| &entry.node.id == id)
    }

    pub(crate) fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|entry| &entry.edge.id == id)
            .map(|entry| &entry.edge)
    }

    /// Next `n<k>` id not used by any local node, or `None` when the sequence is used up.
    pub(crate) fn allocate_node_id(&mut self) -> Option<NodeId> {
        loop {
            let seq = self.next_seq?;
            self.next_seq = seq.checked_add(1);
            let Ok(id) = NodeId::try_new(format!("n{seq}")) else {
                continue;
            };
            if self.node(&id).is_none() {
                return Some(id);
            }
        }
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(NodeEntry::new(node));
    }

    /// Removes the node and every edge touching it. Returns the removed edges.
    pub(crate) fn remove_node(&mut self, id: &NodeId) -> Vec<Edge> {
        self.nodes.retain(|entry| &entry.node.id != id);

        let mut removed = Vec::new();
        self.edges.retain(|entry| {
            if entry.edge.touches(id) {
                removed.push(entry.edge.clone());
                false
            } else {
                true
            }
        });

        let selection_gone = match &self.selection {
            Some(Selection::Node(selected)) => selected == id,
            Some(Selection::Edge(selected)) => removed.iter().any(|edge| &edge.id == selected),
            None => false,
        };
        if selection_gone {
            self.selection = None;
        }
        removed
    }

    pub(crate) fn connect(&mut self, source: NodeId, target: NodeId) -> Connected {
        let edge = Edge::connect(source, target);
        if let Some(existing) = self.edge(&edge.id) {
            return Connected::Existing(existing.clone());
        }
        self.edges.push(EdgeEntry {
            edge: edge.clone(),
            selected: false,
        });
        Connected::Created(edge)
    }

    pub(crate) fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|entry| &entry.edge.id == id)?;
        let removed = self.edges.remove(index).edge;
        self.forget_edges(std::slice::from_ref(id));
        Some(removed)
    }

    /// Drops the selection if it pointed at one of `ids`.
    fn forget_edges(&mut self, ids: &[EdgeId]) {
        if let Some(Selection::Edge(selected)) = &self.selection {
            if ids.contains(selected) {
                self.selection = None;
            }
        }
    }

    /// Replaces the selection and mirrors it onto the per-element `selected` flags.
    pub(crate) fn set_selection(&mut self, selection: Option<Selection>) {
        for entry in &mut self.nodes {
            entry.selected = matches!(&selection, Some(Selection::Node(id)) if id == &entry.node.id);
        }
        for entry in &mut self.edges {
            entry.selected = matches!(&selection, Some(Selection::Edge(id)) if id == &entry.edge.id);
        }
        self.selection = selection;
    }

    pub(crate) fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            selection: self.selection.clone(),
        }
    }
}
