#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("node already exists (id={id})")]
    Conflict { id: String },
    #[error("unknown node (id={id})")]
    UnknownId { id: String },
    #[error("corrupt node row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Conflict { .. } => "CONFLICT",
            Self::UnknownId { .. } => "UNKNOWN_ID",
            Self::Corrupt(_) => "CORRUPT",
        }
    }
}
