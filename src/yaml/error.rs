//! Errors raised while reading or writing document nodes.

use crate::selector::SelectorError;
use thiserror::Error;

/// NodeError is returned by every [`StructuredNode`](super::StructuredNode)
/// accessor and mutator.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The path does not exist in the document.
    #[error("no field named '{path}'")]
    NoField { path: String },

    /// The path exists, or partly exists, but has an unexpected shape.
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("missing resource metadata: document has no apiVersion, kind or metadata")]
    MissingMetadata,

    #[error("invalid resource metadata: {message}")]
    InvalidMetadata { message: String },

    #[error("failed to set field {path}: {message}")]
    SetField { path: String, message: String },

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    pub fn no_field(path: impl Into<String>) -> Self {
        NodeError::NoField { path: path.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        NodeError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        NodeError::InvalidMetadata {
            message: message.into(),
        }
    }

    /// True for an absent field, which callers usually treat as "unset".
    pub fn is_no_field(&self) -> bool {
        matches!(self, NodeError::NoField { .. })
    }
}
