//! Selectors - label/annotation expressions and declarative resource selection.

mod error;
mod labels;
mod selector;

pub use error::*;
pub use labels::*;
pub use selector::*;
