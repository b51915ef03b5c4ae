#![forbid(unsafe_code)]

use super::{Bridge, BridgeError, Transport};
use crate::protocol::{BridgeReply, BridgeRequest, RequestFrame, ResponseFrame};
use async_trait::async_trait;
use nb_core::{Node, NodeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Bridge`] over any [`Transport`]: exactly one frame per call, no batching, no caching,
/// no retry.
pub struct RemoteBridge<T> {
    transport: T,
    timeout: Duration,
    next_id: AtomicU64,
}

impl<T: Transport> RemoteBridge<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_CALL_TIMEOUT,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    async fn call(&self, request: BridgeRequest) -> Result<BridgeReply, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let call = request.call_name();
        let frame = serde_json::to_string(&RequestFrame { id, request })?;

        let raw = match tokio::time::timeout(self.timeout, self.transport.roundtrip(id, frame)).await
        {
            Ok(result) => result?,
            Err(_) => {
                self.transport.abandon(id);
                warn!(call, id, timeout_ms = self.timeout.as_millis() as u64, "bridge call timed out");
                return Err(BridgeError::Timeout {
                    call,
                    after: self.timeout,
                });
            }
        };

        let response: ResponseFrame = serde_json::from_str(&raw)?;
        if response.id != id {
            return Err(BridgeError::Protocol(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }
        Ok(response.outcome.into_result()?)
    }

    async fn call_done(&self, request: BridgeRequest) -> Result<(), BridgeError> {
        let call = request.call_name();
        match self.call(request).await? {
            BridgeReply::Done => Ok(()),
            BridgeReply::Nodes(_) => Err(BridgeError::Protocol(format!(
                "{call} answered with a node list"
            ))),
        }
    }
}

#[async_trait]
impl<T: Transport> Bridge for RemoteBridge<T> {
    async fn get_nodes(&self) -> Result<Vec<Node>, BridgeError> {
        match self.call(BridgeRequest::GetNodes).await? {
            BridgeReply::Nodes(nodes) => Ok(nodes),
            BridgeReply::Done => Err(BridgeError::Protocol(
                "get-nodes answered without nodes".to_string(),
            )),
        }
    }

    async fn add_node(&self, node: &Node) -> Result<(), BridgeError> {
        self.call_done(BridgeRequest::AddNode { node: node.clone() })
            .await
    }

    async fn update_node_description(
        &self,
        id: &NodeId,
        description: &str,
    ) -> Result<(), BridgeError> {
        self.call_done(BridgeRequest::UpdateNodeDescription {
            id: id.clone(),
            description: description.to_string(),
        })
        .await
    }

    async fn rename_node(&self, id: &NodeId, label: &str) -> Result<(), BridgeError> {
        self.call_done(BridgeRequest::RenameNode {
            id: id.clone(),
            label: label.to_string(),
        })
        .await
    }

    async fn delete_node(&self, id: &NodeId) -> Result<(), BridgeError> {
        self.call_done(BridgeRequest::DeleteNode { id: id.clone() })
            .await
    }
}
