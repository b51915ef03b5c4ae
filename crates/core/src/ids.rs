#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NODE_ID_LEN: usize = 256;

/// Separator between the endpoints of an [`EdgeId`]. Never valid inside a [`NodeId`].
pub const EDGE_ID_SEPARATOR: char = '|';

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, NodeIdError> {
        let value = value.into();
        validate_node_id(&value)?;
        Ok(Self(value))
    }

    /// Numeric suffix of a sequence-style id (`n7` -> 7).
    pub fn sequence_number(&self) -> Option<u64> {
        self.0.strip_prefix('n')?.parse::<u64>().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeIdError {
    Empty,
    TooLong,
    ContainsPipe,
    ContainsControl,
}

impl NodeIdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "node id must not be empty",
            Self::TooLong => "node id is too long",
            Self::ContainsPipe => "node id must not contain '|'",
            Self::ContainsControl => "node id contains control characters",
        }
    }
}

impl fmt::Display for NodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for NodeIdError {}

fn validate_node_id(value: &str) -> Result<(), NodeIdError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NodeIdError::Empty);
    }
    if trimmed.len() > MAX_NODE_ID_LEN {
        return Err(NodeIdError::TooLong);
    }
    if trimmed.contains(EDGE_ID_SEPARATOR) {
        return Err(NodeIdError::ContainsPipe);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(NodeIdError::ContainsControl);
    }
    Ok(())
}

/// Identifier of a directed edge, derived from its ordered endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeId(String);

impl EdgeId {
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        Self(format!(
            "{}{EDGE_ID_SEPARATOR}{}",
            source.as_str(),
            target.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, EdgeIdError> {
        let value = value.into();
        let Some((source, target)) = value.split_once(EDGE_ID_SEPARATOR) else {
            return Err(EdgeIdError::MissingSeparator);
        };
        let source = NodeId::try_new(source).map_err(EdgeIdError::Endpoint)?;
        let target = NodeId::try_new(target).map_err(EdgeIdError::Endpoint)?;
        Ok(Self::between(&source, &target))
    }

    pub fn endpoints(&self) -> (&str, &str) {
        self.0
            .split_once(EDGE_ID_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EdgeId {
    type Error = EdgeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<EdgeId> for String {
    fn from(value: EdgeId) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeIdError {
    MissingSeparator,
    Endpoint(NodeIdError),
}

impl fmt::Display for EdgeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("edge id must be '<source>|<target>'"),
            Self::Endpoint(err) => write!(f, "edge endpoint: {}", err.message()),
        }
    }
}

impl std::error::Error for EdgeIdError {}
