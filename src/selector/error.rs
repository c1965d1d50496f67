//! Selector errors.

use thiserror::Error;

/// SelectorError reports a selector expression that cannot be parsed.
#[derive(Debug, Clone, Error)]
pub enum SelectorError {
    #[error("unable to parse selector {selector:?}: {message}")]
    Parse { selector: String, message: String },

    #[error("invalid {field} pattern {pattern:?}: {message}")]
    Regex {
        field: &'static str,
        pattern: String,
        message: String,
    },
}

impl SelectorError {
    pub fn parse(selector: impl Into<String>, message: impl Into<String>) -> Self {
        SelectorError::Parse {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
