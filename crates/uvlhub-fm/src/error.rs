//! Error types for UVL parsing and rendering

use thiserror::Error;

/// Errors produced while reading or rendering a feature model.
#[derive(Debug, Error)]
pub enum UvlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("The document contains no feature tree")]
    EmptyModel,

    #[error("Constraint references unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl UvlError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        UvlError::Syntax {
            line,
            message: message.into(),
        }
    }
}
