#![forbid(unsafe_code)]

use super::{BridgeError, Transport};
use crate::backend::Backend;
use async_trait::async_trait;
use nb_storage::SqliteStore;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Job = (String, oneshot::Sender<String>);

/// Runs the backend on its own thread and exchanges encoded frames with it.
///
/// The backend thread owns the store exclusively, so writes are serialized in arrival order.
pub struct ChannelTransport {
    jobs: mpsc::UnboundedSender<Job>,
    worker: std::thread::JoinHandle<SqliteStore>,
}

impl ChannelTransport {
    pub fn spawn(backend: Backend) -> Result<Self, BridgeError> {
        let (jobs, mut inbox) = mpsc::unbounded_channel::<Job>();
        let worker = std::thread::Builder::new()
            .name("nb-backend".to_string())
            .spawn(move || {
                let mut backend = backend;
                while let Some((frame, reply)) = inbox.blocking_recv() {
                    let response = backend.handle_frame(&frame);
                    if reply.send(response).is_err() {
                        debug!("caller went away before the response");
                    }
                }
                backend.into_store()
            })?;
        info!("in-process backend started");
        Ok(Self { jobs, worker })
    }

    /// Stops the backend thread and hands the store back for an explicit close.
    pub fn shutdown(self) -> Result<SqliteStore, BridgeError> {
        drop(self.jobs);
        self.worker.join().map_err(|_| BridgeError::Disconnected)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn roundtrip(&self, _id: u64, frame: String) -> Result<String, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.jobs
            .send((frame, reply))
            .map_err(|_| BridgeError::Disconnected)?;
        response.await.map_err(|_| BridgeError::Disconnected)
    }
}
