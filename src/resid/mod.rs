//! Resource identity - Gvk, ResId and cluster-scope classification.

mod gvk;
mod idset;
mod resid;

pub use gvk::*;
pub use idset::*;
pub use resid::*;
