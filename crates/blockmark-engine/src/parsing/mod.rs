//! # Block Markup Parser
//!
//! Reads serialized block markup into a [`Document`]. Three passes:
//!
//! 1. **`tokens`**: split the source into delimiter comments and free text
//!    (malformed delimiters stay text)
//! 2. **`builder`**: nest blocks with a stack of open blocks
//! 3. **`assemble`**: look each block up in the registry, resolve its
//!    attributes and hand top-level free text to the raw handler
//!
//! Parsing never fails. Unregistered types go to the unknown-type handler if
//! one is set, and are dropped otherwise.

pub mod assemble;
pub mod builder;
pub mod cursor;
pub mod delimiter;
pub mod rope;
pub mod snapshot;
pub mod tokens;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use crate::model::Document;
use crate::registry::Registry;

use builder::BlockBuilder;

pub use delimiter::{Delimiter, DelimiterKind};
pub use tokens::{Token, tokenize};

pub fn parse_document(registry: &Registry, rope: &Rope) -> Document {
    let src = rope.slice_to_cow(0..rope.len());
    let mut builder = BlockBuilder::new();
    for token in tokenize(&src) {
        builder.push(token);
    }
    let pieces = builder.finish(src.len());
    Document::from(assemble::assemble(registry, &src, pieces))
}

/// Convenience wrapper over [`parse_document`] for in-memory strings.
pub fn parse(registry: &Registry, src: &str) -> Document {
    parse_document(registry, &Rope::from(src))
}
