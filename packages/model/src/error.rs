use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while reading an external document representation
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid structure at {path}: {message}")]
    InvalidStructure { path: String, message: String },

    #[error("Invalid markup at byte {pos}: {message}")]
    InvalidMarkup { pos: usize, message: String },
}

impl ParseError {
    pub fn invalid_structure(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_markup(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidMarkup {
            pos,
            message: message.into(),
        }
    }
}
