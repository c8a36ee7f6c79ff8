//! Patch module - RFC 6902 patch operations and their JSON wire form.

mod op;
mod set;

pub use op::*;
pub use set::*;
