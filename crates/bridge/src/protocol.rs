#![forbid(unsafe_code)]

//! Frames exchanged between the editor and the backend process.
//!
//! Each frame is one JSON document. Requests carry a caller-chosen `id` that the matching
//! response echoes back, so a transport may have several calls outstanding at once.

use nb_core::{Node, NodeId};
use nb_storage::StoreError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", content = "args", rename_all = "kebab-case")]
pub enum BridgeRequest {
    GetNodes,
    AddNode { node: Node },
    UpdateNodeDescription { id: NodeId, description: String },
    RenameNode { id: NodeId, label: String },
    DeleteNode { id: NodeId },
}

impl BridgeRequest {
    pub fn call_name(&self) -> &'static str {
        match self {
            Self::GetNodes => "get-nodes",
            Self::AddNode { .. } => "add-node",
            Self::UpdateNodeDescription { .. } => "update-node-description",
            Self::RenameNode { .. } => "rename-node",
            Self::DeleteNode { .. } => "delete-node",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BridgeReply {
    Nodes(Vec<Node>),
    Done,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    pub request: BridgeRequest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub id: u64,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { reply: BridgeReply },
    Err { error: RemoteError },
}

impl From<Result<BridgeReply, RemoteError>> for Outcome {
    fn from(value: Result<BridgeReply, RemoteError>) -> Self {
        match value {
            Ok(reply) => Self::Ok { reply },
            Err(error) => Self::Err { error },
        }
    }
}

impl Outcome {
    pub fn into_result(self) -> Result<BridgeReply, RemoteError> {
        match self {
            Self::Ok { reply } => Ok(reply),
            Self::Err { error } => Err(error),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorCode {
    Conflict,
    NotFound,
    Storage,
    InvalidInput,
}

impl RemoteErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// A store failure as seen on the far side of the bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {}", .code.as_str(), .message)]
pub struct RemoteError {
    pub code: RemoteErrorCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: RemoteErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorCode::InvalidInput, message)
    }
}

impl From<StoreError> for RemoteError {
    fn from(value: StoreError) -> Self {
        let code = match &value {
            StoreError::Conflict { .. } => RemoteErrorCode::Conflict,
            StoreError::UnknownId { .. } => RemoteErrorCode::NotFound,
            StoreError::InvalidInput(_) => RemoteErrorCode::InvalidInput,
            StoreError::Io(_) | StoreError::Sql(_) | StoreError::Corrupt(_) => {
                RemoteErrorCode::Storage
            }
        };
        Self::new(code, value.to_string())
    }
}
