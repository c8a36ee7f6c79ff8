//! Value module - In-memory representation of JSON documents.
//!
//! Documents are parsed from and serialized to standard JSON text.

mod value;

pub use value::*;
