//! Collection errors.

use crate::patch::PatchError;
use crate::resid::ResId;
use crate::resource::Behavior;
use crate::selector::SelectorError;
use crate::yaml::NodeError;
use thiserror::Error;

/// ResMapError is returned by the fallible [`ResMap`](super::ResMap)
/// operations.
#[derive(Debug, Error)]
pub enum ResMapError {
    /// A resource with the same current id is already present.
    #[error("may not add resource with an already registered id: {id}")]
    IdCollision { id: ResId },

    #[error("no resource matches id {id}")]
    NotFound { id: ResId },

    /// More than one resource matched where exactly one was required.
    #[error("{count} resources match id {id}; expected exactly one")]
    Ambiguous { id: ResId, count: usize },

    #[error("id {id}: behavior {behavior} not allowed, {reason}")]
    BehaviorMismatch {
        id: ResId,
        behavior: Behavior,
        reason: &'static str,
    },

    #[error("{message}")]
    NotEqual { message: String },

    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}

impl ResMapError {
    pub fn id_collision(id: &ResId) -> Self {
        ResMapError::IdCollision { id: id.clone() }
    }

    pub fn not_found(id: &ResId) -> Self {
        ResMapError::NotFound { id: id.clone() }
    }

    pub fn ambiguous(id: &ResId, count: usize) -> Self {
        ResMapError::Ambiguous {
            id: id.clone(),
            count,
        }
    }

    pub fn not_equal(message: impl Into<String>) -> Self {
        ResMapError::NotEqual {
            message: message.into(),
        }
    }

    /// Turns a zero-or-many match count into the matching error.
    pub(crate) fn for_count(id: &ResId, count: usize) -> Self {
        if count == 0 {
            ResMapError::not_found(id)
        } else {
            ResMapError::ambiguous(id, count)
        }
    }
}
