#![forbid(unsafe_code)]

//! Gesture dispatch for the editor window.
//!
//! Each gesture maps to at most one controller call plus a detail panel toggle. Failures never
//! escape silently: every one of them is queued as an error [`Notice`] for the window to show.

use crate::changes::{EdgeChange, NodeChange};
use crate::controller::GraphController;
use crate::error::EditorError;
use crate::state::Connected;
use nb_bridge::BridgeError;
use nb_core::{EdgeId, NodeId, Selection};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum Gesture {
    NodeClick { id: NodeId },
    EdgeClick { id: EdgeId },
    PaneClick,
    SubmitAddNode { label: String },
    SubmitRename { label: String },
    /// Typing in the description field; only the panel draft changes.
    EditDescription { text: String },
    SubmitDescription { text: String },
    DeleteNode,
    DeleteEdge,
    Connect { source: NodeId, target: NodeId },
    NodesChanged { changes: Vec<NodeChange> },
    EdgesChanged { changes: Vec<EdgeChange> },
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Self::NodeClick { .. } => "node_click",
            Self::EdgeClick { .. } => "edge_click",
            Self::PaneClick => "pane_click",
            Self::SubmitAddNode { .. } => "submit_add_node",
            Self::SubmitRename { .. } => "submit_rename",
            Self::EditDescription { .. } => "edit_description",
            Self::SubmitDescription { .. } => "submit_description",
            Self::DeleteNode => "delete_node",
            Self::DeleteEdge => "delete_edge",
            Self::Connect { .. } => "connect",
            Self::NodesChanged { .. } => "nodes_changed",
            Self::EdgesChanged { .. } => "edges_changed",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum DetailPanel {
    #[default]
    Closed,
    Node {
        id: NodeId,
        description_draft: String,
    },
    Edge {
        id: EdgeId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short message for the window to show as a toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct View {
    panel: DetailPanel,
    notices: VecDeque<Notice>,
}

#[derive(Clone)]
pub struct InteractionRouter {
    controller: GraphController,
    view: Arc<Mutex<View>>,
}

impl InteractionRouter {
    pub fn new(controller: GraphController) -> Self {
        Self {
            controller,
            view: Arc::new(Mutex::new(View::default())),
        }
    }

    pub fn controller(&self) -> &GraphController {
        &self.controller
    }

    /// Loads the graph for a freshly opened window.
    pub async fn open(&self) -> Result<usize, EditorError> {
        let loaded = self.controller.initialize().await;
        if let Err(err) = &loaded {
            warn!(error = %err, "loading graph failed");
            self.view().notices.push_back(Notice::error(format!("Could not load graph: {err}")));
        }
        loaded
    }

    pub async fn dispatch(&self, gesture: Gesture) -> Result<(), EditorError> {
        let name = gesture.name();
        let result = self.route(gesture).await;
        let mut view = self.view();
        if let Err(err) = &result {
            warn!(gesture = name, error = %err, "gesture failed");
            view.notices.push_back(Notice::error(failure_message(err)));
        }
        self.reconcile_panel(&mut view);
        result
    }

    pub fn panel(&self) -> DetailPanel {
        self.view().panel.clone()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.view().notices.drain(..).collect()
    }

    async fn route(&self, gesture: Gesture) -> Result<(), EditorError> {
        match gesture {
            Gesture::NodeClick { id } => {
                self.controller.select(Selection::Node(id.clone()))?;
                let description_draft = self
                    .controller
                    .node(&id)
                    .map(|node| node.description)
                    .unwrap_or_default();
                self.view().panel = DetailPanel::Node {
                    id,
                    description_draft,
                };
            }
            Gesture::EdgeClick { id } => {
                self.controller.select(Selection::Edge(id.clone()))?;
                self.view().panel = DetailPanel::Edge { id };
            }
            Gesture::PaneClick => {
                self.controller.clear_selection();
                self.view().panel = DetailPanel::Closed;
            }
            Gesture::SubmitAddNode { label } => {
                self.controller.add_node(&label).await?;
            }
            Gesture::SubmitRename { label } => {
                let id = self.selected_node()?;
                self.controller.rename_node(&id, &label).await?;
            }
            Gesture::EditDescription { text } => {
                if let DetailPanel::Node {
                    description_draft, ..
                } = &mut self.view().panel
                {
                    *description_draft = text;
                }
            }
            Gesture::SubmitDescription { text } => {
                let id = self.selected_node()?;
                self.controller.set_description(&id, &text).await?;
                if let DetailPanel::Node {
                    id: open,
                    description_draft,
                } = &mut self.view().panel
                {
                    if *open == id {
                        *description_draft = text;
                    }
                }
            }
            Gesture::DeleteNode => {
                let id = self.selected_node()?;
                self.controller.delete_node(&id).await?;
            }
            Gesture::DeleteEdge => {
                let id = self
                    .controller
                    .selection()
                    .and_then(|selection| selection.edge().cloned())
                    .ok_or(EditorError::NoSelection)?;
                self.controller.delete_edge(&id)?;
            }
            Gesture::Connect { source, target } => {
                if let Connected::Existing(edge) = self.controller.connect(&source, &target)? {
                    self.view()
                        .notices
                        .push_back(Notice::info(format!("{} is already connected", edge.id)));
                }
            }
            Gesture::NodesChanged { changes } => {
                self.controller.apply_node_changes(changes);
            }
            Gesture::EdgesChanged { changes } => {
                self.controller.apply_edge_changes(changes);
            }
        }
        Ok(())
    }

    fn selected_node(&self) -> Result<NodeId, EditorError> {
        self.controller
            .selection()
            .and_then(|selection| selection.node().cloned())
            .ok_or(EditorError::NoSelection)
    }

    /// Closes the panel once the element it shows is gone or no longer selected.
    fn reconcile_panel(&self, view: &mut View) {
        let selection = self.controller.selection();
        let still_shown = match &view.panel {
            DetailPanel::Closed => true,
            DetailPanel::Node { id, .. } => selection.as_ref().and_then(Selection::node) == Some(id),
            DetailPanel::Edge { id } => selection.as_ref().and_then(Selection::edge) == Some(id),
        };
        if !still_shown {
            view.panel = DetailPanel::Closed;
        }
    }

    fn view(&self) -> MutexGuard<'_, View> {
        match self.view.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn failure_message(err: &EditorError) -> String {
    match err {
        // The backend may still apply a call the editor stopped waiting for.
        EditorError::Bridge(BridgeError::Timeout { .. }) => {
            format!("{err}; the change may still be saved, reopen the graph to resync")
        }
        _ => err.to_string(),
    }
}
