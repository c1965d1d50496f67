//! Resource module - resources, their behaviors and build annotations.

mod annotations;
mod behavior;
mod factory;
mod resource;

pub use annotations::*;
pub use behavior::*;
pub use factory::*;
pub use resource::*;
