#![forbid(unsafe_code)]

//! Remote-call boundary between the editor and the process that owns the node store.

mod backend;
pub mod client;
mod config;
pub mod protocol;
mod server;

pub use backend::Backend;
pub use client::{
    Bridge, BridgeError, ChannelTransport, DEFAULT_CALL_TIMEOUT, ProcessTransport, RemoteBridge,
    Transport,
};
pub use config::{BackendConfig, DEFAULT_STORAGE_DIR, STORAGE_DIR_ENV};
pub use protocol::{
    BridgeReply, BridgeRequest, Outcome, RemoteError, RemoteErrorCode, RequestFrame, ResponseFrame,
};
pub use server::{run_stdio, serve};

/// Opens the store at `storage_dir` and serves it from a backend thread in this process.
pub fn open_local(
    storage_dir: impl AsRef<std::path::Path>,
) -> Result<RemoteBridge<ChannelTransport>, BridgeError> {
    let store = nb_storage::SqliteStore::open(storage_dir)
        .map_err(|err| BridgeError::Remote(RemoteError::from(err)))?;
    let transport = ChannelTransport::spawn(Backend::new(store))?;
    Ok(RemoteBridge::new(transport))
}

#[cfg(test)]
mod tests;
