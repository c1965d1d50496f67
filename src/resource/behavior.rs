//! Generator behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown behavior {0:?}: expected create, merge or replace")]
pub struct UnknownBehavior(pub String);

/// Behavior decides what happens when an incoming resource meets an
/// existing resource with the same id during absorption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// No preference; treated like `Create`.
    #[default]
    Unspecified,
    /// The resource must not exist yet.
    Create,
    /// The resource must exist; fields are merged into it.
    Merge,
    /// The resource must exist; it is replaced wholesale.
    Replace,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Unspecified => "unspecified",
            Behavior::Create => "create",
            Behavior::Merge => "merge",
            Behavior::Replace => "replace",
        }
    }

    /// True for the behaviors that require an existing resource.
    pub fn needs_existing(&self) -> bool {
        matches!(self, Behavior::Merge | Behavior::Replace)
    }
}

/// Case-insensitive. An empty name is `Unspecified`.
impl FromStr for Behavior {
    type Err = UnknownBehavior;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unspecified" => Ok(Behavior::Unspecified),
            "create" => Ok(Behavior::Create),
            "merge" => Ok(Behavior::Merge),
            "replace" => Ok(Behavior::Replace),
            _ => Err(UnknownBehavior(s.to_string())),
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
