//! Apply module - Applies patch sets to documents and probes whether they would apply.

mod applier;
mod error;
mod probe;

pub use applier::{apply, apply_lenient, apply_strict, Applied, ApplyMode};
pub use error::*;
pub use probe::*;
