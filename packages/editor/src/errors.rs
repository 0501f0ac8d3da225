//! Error types for the editor

use thiserror::Error;

/// Why a transaction step was rejected. A rejected step rejects the whole
/// transaction; the document keeps its previous snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("Invalid position {pos}: {reason}")]
    InvalidPosition { pos: usize, reason: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl StepError {
    pub fn invalid_position(pos: usize, reason: impl Into<String>) -> Self {
        Self::InvalidPosition {
            pos,
            reason: reason.into(),
        }
    }

    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure(message.into())
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] uibuilder_model::ParseError),

    #[error("Step error: {0}")]
    Step(#[from] StepError),
}

impl EditorError {
    /// The step error behind this failure, if any
    pub fn step(&self) -> Option<&StepError> {
        match self {
            EditorError::Step(err) => Some(err),
            EditorError::Parse(_) => None,
        }
    }
}
