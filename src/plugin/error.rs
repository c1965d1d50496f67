//! Plugin errors.

use super::loader::LoaderError;
use super::validation::ValidationErrors;
use crate::resmap::ResMapError;
use crate::yaml::NodeError;
use thiserror::Error;

/// PluginError is returned by plugin configuration and execution.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The configuration blob is well-formed but unusable.
    #[error("invalid plugin config: {message}")]
    Config { message: String },

    #[error("invalid plugin config: {0}")]
    ConfigSyntax(#[from] serde_yaml::Error),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    ResMap(#[from] ResMapError),

    #[error(transparent)]
    Node(#[from] NodeError),
}

impl PluginError {
    pub fn config(message: impl Into<String>) -> Self {
        PluginError::Config {
            message: message.into(),
        }
    }
}
