//! Plain value types describing a graph before it is laid out.
//!
//! These mirror the input format read from disk (RON or JSON) and carry no
//! layout state. The layout crate turns a [`GraphDefinition`] into an
//! index-addressed graph it can mutate.

pub mod defs;
pub mod ser;

pub use defs::*;
pub use ser::{DefinitionError, Format};
