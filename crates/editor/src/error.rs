#![forbid(unsafe_code)]

use nb_bridge::BridgeError;
use nb_core::{EdgeId, LabelError, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("invalid label: {0}")]
    InvalidLabel(#[from] LabelError),
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),
    #[error("node {0} is not the current selection")]
    NotSelected(NodeId),
    #[error("nothing suitable is selected")]
    NoSelection,
    #[error("graph is already initialized")]
    AlreadyInitialized,
    #[error("graph is not initialized")]
    NotInitialized,
    #[error("no free node ids left")]
    IdsExhausted,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
