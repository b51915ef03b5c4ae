#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod commands;

use nb_bridge::{Backend, BackendConfig};
use nb_storage::SqliteStore;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BackendConfig::from_env();
    let store = SqliteStore::open(&config.storage_dir).expect("open node store");

    tauri::Builder::default()
        .manage(commands::BackendState(Mutex::new(Backend::new(store))))
        .invoke_handler(tauri::generate_handler![
            commands::get_nodes,
            commands::add_node,
            commands::update_node_description,
            commands::rename_node,
            commands::delete_node,
        ])
        .run(tauri::generate_context!())
        .expect("tauri run");
}
