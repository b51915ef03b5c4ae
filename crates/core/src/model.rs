#![forbid(unsafe_code)]

use crate::ids::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_LABEL_LEN: usize = 512;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A graph vertex as stored and rendered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl Node {
    pub fn new(id: NodeId, position: Position, label: impl Into<String>) -> Result<Self, LabelError> {
        let label = label.into();
        validate_label(&label)?;
        Ok(Self {
            id,
            position,
            label,
            description: String::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn connect(source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::between(&source, &target),
            source,
            target,
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// The single selected element of the editor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    Node(NodeId),
    Edge(EdgeId),
}

impl Selection {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Edge(_) => None,
        }
    }

    pub fn edge(&self) -> Option<&EdgeId> {
        match self {
            Self::Node(_) => None,
            Self::Edge(id) => Some(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelError {
    Empty,
    TooLong,
    ContainsControl,
}

impl LabelError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "label must not be empty",
            Self::TooLong => "label is too long",
            Self::ContainsControl => "label contains control characters",
        }
    }
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for LabelError {}

pub fn validate_label(value: &str) -> Result<(), LabelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LabelError::Empty);
    }
    if trimmed.len() > MAX_LABEL_LEN {
        return Err(LabelError::TooLong);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(LabelError::ContainsControl);
    }
    Ok(())
}
