//! Conflict module - Finds edits from two sides that cannot both be applied automatically.

mod conflict;
mod detector;


pub use conflict::*;
pub use detector::*;
