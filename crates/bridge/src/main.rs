#![forbid(unsafe_code)]

use nb_bridge::{Backend, BackendConfig, run_stdio};
use nb_storage::SqliteStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // stdout carries frames; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = BackendConfig::from_env();
    info!(storage_dir = %config.storage_dir.display(), "starting node backend");

    let store = SqliteStore::open(&config.storage_dir)?;
    let mut backend = Backend::new(store);
    run_stdio(&mut backend)?;
    backend.into_store().close()?;
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(error = %err, "node backend failed");
        std::process::exit(1);
    }
}
