//! Generic decoded values handed out by field lookups.

mod value;

pub use value::*;
