#![forbid(unsafe_code)]

use crate::protocol::{
    BridgeReply, BridgeRequest, Outcome, RemoteError, RemoteErrorCode, RequestFrame, ResponseFrame,
};
use nb_storage::SqliteStore;
use serde_json::Value;
use tracing::{debug, warn};

/// Backend half of the bridge: one store call per request, nothing else.
#[derive(Debug)]
pub struct Backend {
    store: SqliteStore,
}

impl Backend {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn into_store(self) -> SqliteStore {
        self.store
    }

    pub fn handle(&mut self, request: BridgeRequest) -> Result<BridgeReply, RemoteError> {
        let call = request.call_name();
        let result = match request {
            BridgeRequest::GetNodes => self.store.list_nodes().map(BridgeReply::Nodes),
            BridgeRequest::AddNode { node } => {
                self.store.insert_node(&node).map(|()| BridgeReply::Done)
            }
            BridgeRequest::UpdateNodeDescription { id, description } => self
                .store
                .update_node_description(&id, &description)
                .map(|()| BridgeReply::Done),
            BridgeRequest::RenameNode { id, label } => {
                self.store.rename_node(&id, &label).map(|()| BridgeReply::Done)
            }
            BridgeRequest::DeleteNode { id } => {
                self.store.delete_node(&id).map(|()| BridgeReply::Done)
            }
        };

        match result {
            Ok(reply) => {
                debug!(call, "bridge call ok");
                Ok(reply)
            }
            Err(err) => {
                warn!(call, code = err.code(), error = %err, "bridge call failed");
                Err(RemoteError::from(err))
            }
        }
    }

    /// Decodes one request frame, dispatches it and encodes the response frame.
    pub fn handle_frame(&mut self, raw: &str) -> String {
        let frame = match serde_json::from_str::<RequestFrame>(raw) {
            Ok(frame) => frame,
            Err(err) => {
                let id = salvage_request_id(raw);
                warn!(id, error = %err, "malformed request frame");
                return encode_response(&ResponseFrame {
                    id,
                    outcome: Outcome::Err {
                        error: RemoteError::invalid_input(format!("malformed request: {err}")),
                    },
                });
            }
        };

        let outcome = Outcome::from(self.handle(frame.request));
        encode_response(&ResponseFrame {
            id: frame.id,
            outcome,
        })
    }
}

fn salvage_request_id(raw: &str) -> u64 {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| value.get("id").and_then(Value::as_u64))
        .unwrap_or(0)
}

pub(crate) fn encode_response(frame: &ResponseFrame) -> String {
    match serde_json::to_string(frame) {
        Ok(encoded) => encoded,
        Err(err) => {
            let fallback = ResponseFrame {
                id: frame.id,
                outcome: Outcome::Err {
                    error: RemoteError::new(
                        RemoteErrorCode::Storage,
                        format!("response encoding failed: {err}"),
                    ),
                },
            };
            serde_json::to_string(&fallback).unwrap_or_default()
        }
    }
}
