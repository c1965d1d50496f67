//! Patch module - strategic merge patch, overlay merge and document comparison.

mod comparison;
mod error;
mod merge;


pub use comparison::*;
pub use error::*;
pub use merge::*;
