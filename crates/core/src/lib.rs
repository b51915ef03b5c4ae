#![forbid(unsafe_code)]

//! Domain types shared by the node store, the bridge and the editor.

pub mod ids;
pub mod model;

pub use ids::{EDGE_ID_SEPARATOR, EdgeId, EdgeIdError, NodeId, NodeIdError};
pub use model::{Edge, LabelError, Node, Position, Selection, validate_label};

#[cfg(test)]
mod tests;
