#![forbid(unsafe_code)]

mod error;
mod schema;

pub use error::StoreError;

use nb_core::{Node, NodeId, Position, validate_label};
use rusqlite::{Connection, ErrorCode, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DB_FILE_NAME: &str = "nodeboard.db";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::install(&conn)?;

        info!(db = %db_path.display(), "node store opened");
        Ok(Self {
            conn,
            storage_dir: Some(storage_dir),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::install(&conn)?;
        Ok(Self {
            conn,
            storage_dir: None,
        })
    }

    /// `None` for in-memory stores.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    pub fn close(self) -> Result<(), StoreError> {
        let storage_dir = self.storage_dir;
        self.conn.close().map_err(|(_, err)| StoreError::Sql(err))?;
        if let Some(dir) = storage_dir {
            info!(dir = %dir.display(), "node store closed");
        }
        Ok(())
    }

    pub fn list_nodes(&self) -> Result<Vec<Node>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, position_x, position_y, label, description \
             FROM nodes \
             ORDER BY rowid ASC",
        )?;

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            let raw_id = row.get::<_, String>(0)?;
            let id = NodeId::try_new(raw_id.as_str())
                .map_err(|err| StoreError::Corrupt(format!("id {raw_id:?}: {}", err.message())))?;
            out.push(Node {
                id,
                position: Position::new(
                    row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
                    row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                ),
                label: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            });
        }

        Ok(out)
    }

    pub fn count_nodes(&self) -> Result<usize, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(1) FROM nodes", [], |row| row.get::<_, i64>(0))?;
        usize::try_from(count).map_err(|_| StoreError::Corrupt(format!("row count {count}")))
    }

    pub fn insert_node(&mut self, node: &Node) -> Result<(), StoreError> {
        validate_label(&node.label).map_err(|err| StoreError::InvalidInput(err.message()))?;

        let insert = self.conn.execute(
            "INSERT INTO nodes(id, position_x, position_y, label, description) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                node.id.as_str(),
                node.position.x,
                node.position.y,
                node.label,
                node.description,
            ],
        );

        if let Err(err) = insert {
            return Err(map_insert_conflict(err, &node.id));
        }

        debug!(id = %node.id, "node inserted");
        Ok(())
    }

    pub fn update_node_description(
        &mut self,
        id: &NodeId,
        description: &str,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE nodes SET description=?2 WHERE id=?1",
            params![id.as_str(), description],
        )?;
        ensure_matched(changed, id)
    }

    pub fn rename_node(&mut self, id: &NodeId, label: &str) -> Result<(), StoreError> {
        validate_label(label).map_err(|err| StoreError::InvalidInput(err.message()))?;

        let changed = self.conn.execute(
            "UPDATE nodes SET label=?2 WHERE id=?1",
            params![id.as_str(), label],
        )?;
        ensure_matched(changed, id)
    }

    pub fn delete_node(&mut self, id: &NodeId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM nodes WHERE id=?1", params![id.as_str()])?;
        ensure_matched(changed, id)?;
        debug!(id = %id, "node deleted");
        Ok(())
    }
}

// Updates and deletes report a missing row instead of silently succeeding.
fn ensure_matched(changed: usize, id: &NodeId) -> Result<(), StoreError> {
    if changed == 0 {
        return Err(StoreError::UnknownId {
            id: id.as_str().to_string(),
        });
    }
    Ok(())
}

fn map_insert_conflict(err: rusqlite::Error, id: &NodeId) -> StoreError {
    if is_constraint_violation(&err) {
        return StoreError::Conflict {
            id: id.as_str().to_string(),
        };
    }
    StoreError::Sql(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}
