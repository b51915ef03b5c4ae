#![forbid(unsafe_code)]

//! In-memory graph state for one editor window and the gesture router in front of it.

mod changes;
mod config;
mod controller;
mod error;
mod locks;
mod router;
mod state;

pub use changes::{EdgeChange, NodeChange};
pub use config::{EditorConfig, Placement};
pub use controller::GraphController;
pub use error::EditorError;
pub use router::{DetailPanel, Gesture, InteractionRouter, Notice, NoticeLevel};
pub use state::{Connected, EdgeEntry, GraphSnapshot, NodeEntry, Size};

use std::path::Path;
use std::sync::Arc;

/// Builds a controller backed by the store at `storage_dir`, served from a local backend thread.
pub fn open_local(
    storage_dir: impl AsRef<Path>,
    config: EditorConfig,
) -> Result<GraphController, EditorError> {
    let bridge = nb_bridge::open_local(storage_dir)?.with_timeout(config.call_timeout);
    Ok(GraphController::new(Arc::new(bridge), config))
}

#[cfg(test)]
mod tests;
