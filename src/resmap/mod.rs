//! ResMap module - the identity-indexed resource collection.

mod error;
mod factory;
mod resmap;


pub use error::*;
pub use factory::*;
pub use resmap::*;
