#![forbid(unsafe_code)]

//! Batched view updates reported by the renderer (drags, multi-select, measurement).
//!
//! These only ever touch local state; nothing here reaches the store.

use crate::state::{GraphState, Size};
use nb_core::{EdgeId, NodeId, Position, Selection};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    /// `position: None` marks the end of a drag without a final move.
    Position {
        id: NodeId,
        position: Option<Position>,
        #[serde(default)]
        dragging: bool,
    },
    Select {
        id: NodeId,
        selected: bool,
    },
    Dimensions {
        id: NodeId,
        dimensions: Size,
    },
}

impl NodeChange {
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Position { id, .. } | Self::Select { id, .. } | Self::Dimensions { id, .. } => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
}

/// Applies changes in order; changes for unknown nodes are skipped. Returns how many applied.
///
/// Selection changes go through the single graph selection, so at most one element is ever
/// flagged as selected.
pub(crate) fn apply_node_changes(state: &mut GraphState, changes: Vec<NodeChange>) -> usize {
    let mut applied = 0;
    for change in changes {
        match change {
            NodeChange::Position {
                id,
                position,
                dragging,
            } => {
                let Some(entry) = state.node_entry_mut(&id) else {
                    continue;
                };
                if let Some(position) = position {
                    entry.node.position = position;
                }
                entry.dragging = dragging;
            }
            NodeChange::Select { id, selected } => {
                if state.node(&id).is_none() {
                    continue;
                }
                select(state, Selection::Node(id), selected);
            }
            NodeChange::Dimensions { id, dimensions } => {
                let Some(entry) = state.node_entry_mut(&id) else {
                    continue;
                };
                entry.measured = Some(dimensions);
            }
        }
        applied += 1;
    }
    applied
}

/// Applies changes in order and returns the ids of removed edges.
pub(crate) fn apply_edge_changes(state: &mut GraphState, changes: Vec<EdgeChange>) -> Vec<EdgeId> {
    let mut removed = Vec::new();
    for change in changes {
        match change {
            EdgeChange::Select { id, selected } => {
                if state.edge(&id).is_some() {
                    select(state, Selection::Edge(id), selected);
                }
            }
            EdgeChange::Remove { id } => {
                if state.remove_edge(&id).is_some() {
                    removed.push(id);
                }
            }
        }
    }
    removed
}

fn select(state: &mut GraphState, target: Selection, selected: bool) {
    if selected {
        state.set_selection(Some(target));
    } else if state.selection.as_ref() == Some(&target) {
        state.set_selection(None);
    }
}
