#![forbid(unsafe_code)]

//! The five remote calls, one command each. Arguments and results cross unchanged.

use nb_bridge::{Backend, BridgeReply, BridgeRequest, RemoteError};
use nb_core::{Node, NodeId};
use std::sync::Mutex;
use tauri::State;

pub struct BackendState(pub Mutex<Backend>);

fn call(state: &State<'_, BackendState>, request: BridgeRequest) -> Result<BridgeReply, RemoteError> {
    let mut backend = state
        .0
        .lock()
        .map_err(|_| RemoteError::new(nb_bridge::RemoteErrorCode::Storage, "backend lock poisoned"))?;
    backend.handle(request)
}

fn done(reply: BridgeReply) -> Result<(), RemoteError> {
    match reply {
        BridgeReply::Done => Ok(()),
        BridgeReply::Nodes(_) => Err(RemoteError::invalid_input("unexpected node list")),
    }
}

#[tauri::command]
pub fn get_nodes(state: State<'_, BackendState>) -> Result<Vec<Node>, RemoteError> {
    match call(&state, BridgeRequest::GetNodes)? {
        BridgeReply::Nodes(nodes) => Ok(nodes),
        BridgeReply::Done => Err(RemoteError::invalid_input("expected a node list")),
    }
}

#[tauri::command]
pub fn add_node(state: State<'_, BackendState>, node: Node) -> Result<(), RemoteError> {
    done(call(&state, BridgeRequest::AddNode { node })?)
}

#[tauri::command]
pub fn update_node_description(
    state: State<'_, BackendState>,
    id: NodeId,
    description: String,
) -> Result<(), RemoteError> {
    done(call(
        &state,
        BridgeRequest::UpdateNodeDescription { id, description },
    )?)
}

#[tauri::command]
pub fn rename_node(
    state: State<'_, BackendState>,
    id: NodeId,
    label: String,
) -> Result<(), RemoteError> {
    done(call(&state, BridgeRequest::RenameNode { id, label })?)
}

#[tauri::command]
pub fn delete_node(state: State<'_, BackendState>, id: NodeId) -> Result<(), RemoteError> {
    done(call(&state, BridgeRequest::DeleteNode { id })?)
}
