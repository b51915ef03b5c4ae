#![forbid(unsafe_code)]

//! SQLite persistence for editor nodes.
//!
//! One row per node in the `nodes` table. Edges and view state are never stored here.

mod store;

pub use store::{DB_FILE_NAME, SqliteStore, StoreError};
