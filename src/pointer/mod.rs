//! Pointer module - RFC 6901 JSON Pointers for addressing nodes in a document.

mod pointer;
mod resolve;

pub use pointer::*;
pub use resolve::{resolve, resolve_or_ancestor};

pub(crate) use resolve::{step, step_mut, Step};
