#![forbid(unsafe_code)]

use super::{BridgeError, Transport};
use crate::config::STORAGE_DIR_ENV;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<String>>>>;

/// Talks to a spawned `nb_backend` over its stdin/stdout, one JSON frame per line.
pub struct ProcessTransport {
    stdin: tokio::sync::Mutex<ChildStdin>,
    child: tokio::sync::Mutex<Child>,
    pending: Pending,
    reader: JoinHandle<()>,
}

impl ProcessTransport {
    /// Spawns the backend executable. Must be called from within a tokio runtime.
    pub fn spawn(program: impl AsRef<OsStr>, storage_dir: &Path) -> Result<Self, BridgeError> {
        let mut child = Command::new(program)
            .env(STORAGE_DIR_ENV, storage_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Protocol("backend stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Protocol("backend stdout unavailable".to_string()))?;

        let pending: Pending = Arc::default();
        let reader = tokio::spawn(read_responses(stdout, pending.clone()));
        info!(pid = ?child.id(), "backend process started");

        Ok(Self {
            stdin: tokio::sync::Mutex::new(stdin),
            child: tokio::sync::Mutex::new(child),
            pending,
            reader,
        })
    }

    /// Closes the backend's stdin and waits for it to exit.
    pub async fn shutdown(self) -> Result<ExitStatus, BridgeError> {
        let Self {
            stdin,
            child,
            reader,
            ..
        } = self;
        drop(stdin);
        let mut child = child.into_inner();
        let status = child.wait().await?;
        if reader.await.is_err() {
            warn!("backend reader task ended abnormally");
        }
        info!(%status, "backend process exited");
        Ok(status)
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    async fn roundtrip(&self, id: u64, frame: String) -> Result<String, BridgeError> {
        let (reply, response) = oneshot::channel();
        lock_pending(&self.pending).insert(id, reply);

        let written = {
            let mut stdin = self.stdin.lock().await;
            write_frame(&mut stdin, &frame).await
        };
        if let Err(err) = written {
            lock_pending(&self.pending).remove(&id);
            return Err(BridgeError::Io(err));
        }

        response.await.map_err(|_| BridgeError::Disconnected)
    }

    fn abandon(&self, id: u64) {
        lock_pending(&self.pending).remove(&id);
    }
}

async fn write_frame(stdin: &mut ChildStdin, frame: &str) -> std::io::Result<()> {
    stdin.write_all(frame.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}

async fn read_responses(stdout: ChildStdout, pending: Pending) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "backend stdout read failed");
                break;
            }
        };
        let Some(id) = serde_json::from_str::<Value>(&line)
            .ok()
            .and_then(|value| value.get("id").and_then(Value::as_u64))
        else {
            warn!("dropping backend output without a frame id");
            continue;
        };
        match lock_pending(&pending).remove(&id) {
            Some(reply) => {
                let _ = reply.send(line);
            }
            None => debug!(id, "response for an abandoned call"),
        }
    }
    // Dropping the senders wakes every waiter with `Disconnected`.
    lock_pending(&pending).clear();
}

fn lock_pending(pending: &Pending) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<String>>> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
