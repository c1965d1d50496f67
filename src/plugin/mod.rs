//! Plugin module - the seam between the engine and generators/transformers.

mod error;
mod helpers;
mod loader;
mod patch_transformer;
mod validation;

pub use error::*;
pub use helpers::*;
pub use loader::*;
pub use patch_transformer::*;
pub use validation::*;
