//! Patch errors.

use thiserror::Error;

/// PatchError reports a patch document that cannot be applied.
#[derive(Debug, Clone, Error)]
pub enum PatchError {
    #[error("{path}: unknown patch directive {directive:?}")]
    UnknownDirective { path: String, directive: String },

    #[error("{path}: patch is a {actual}, but the target is a mapping")]
    NotAMapping { path: String, actual: String },
}

impl PatchError {
    pub fn unknown_directive(path: impl Into<String>, directive: impl Into<String>) -> Self {
        PatchError::UnknownDirective {
            path: path.into(),
            directive: directive.into(),
        }
    }
}
