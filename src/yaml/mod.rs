//! YAML module - the document tree, field paths and the structured-node adapter.

mod error;
mod meta;
mod path;
mod structured;
mod tree;

pub use error::*;
pub use meta::*;
pub use path::*;
pub use structured::*;
pub use tree::*;
