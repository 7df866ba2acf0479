//! `{{variable}}` templating
//!
//! Placeholder parsing and single-pass substitution against an
//! environment's key-value map.

pub mod engine;
pub mod parser;

pub use engine::{Resolution, VariableResolver};
pub use parser::{Placeholder, has_placeholders, parse_placeholders};
