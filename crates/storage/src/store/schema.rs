#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;

pub(super) fn install(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS nodes (
          id TEXT PRIMARY KEY,
          position_x REAL,
          position_y REAL,
          label TEXT,
          description TEXT
        );
        "#,
    )?;
    Ok(())
}
