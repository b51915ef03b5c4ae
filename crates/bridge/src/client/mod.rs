#![forbid(unsafe_code)]

//! Editor-side view of the bridge.

mod channel;
mod process;
mod remote;

pub use channel::ChannelTransport;
pub use process::ProcessTransport;
pub use remote::{DEFAULT_CALL_TIMEOUT, RemoteBridge};

use crate::protocol::{RemoteError, RemoteErrorCode};
use async_trait::async_trait;
use nb_core::{Node, NodeId};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("{call} timed out after {}ms", .after.as_millis())]
    Timeout { call: &'static str, after: Duration },
    #[error("bridge disconnected")]
    Disconnected,
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol: {0}")]
    Protocol(String),
}

impl BridgeError {
    pub fn remote_code(&self) -> Option<RemoteErrorCode> {
        match self {
            Self::Remote(err) => Some(err.code),
            _ => None,
        }
    }
}

/// The five remote calls exposed by the backend, one per store operation.
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn get_nodes(&self) -> Result<Vec<Node>, BridgeError>;

    async fn add_node(&self, node: &Node) -> Result<(), BridgeError>;

    async fn update_node_description(
        &self,
        id: &NodeId,
        description: &str,
    ) -> Result<(), BridgeError>;

    async fn rename_node(&self, id: &NodeId, label: &str) -> Result<(), BridgeError>;

    async fn delete_node(&self, id: &NodeId) -> Result<(), BridgeError>;
}

/// Moves encoded frames to the backend and back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request frame and resolves with the response frame carrying the same id.
    async fn roundtrip(&self, id: u64, frame: String) -> Result<String, BridgeError>;

    /// Forgets a call the client stopped waiting for.
    fn abandon(&self, _id: u64) {}
}
