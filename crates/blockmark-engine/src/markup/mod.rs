//! # Markup Nodes
//!
//! The inner content of a block is markup (usually an HTML fragment). The
//! attribute resolver needs a structural view of it to run its source rules,
//! so this module provides:
//!
//! - **`parser`**: `parse_fragment()`, a lenient cursor-based fragment parser
//! - **`node`**: `Fragment`, `Node` and `Element` with byte spans into the source
//! - **`selector`**: the CSS selector subset used by attribute matchers
//!
//! Parsing never fails: malformed markup degrades to text nodes, and spans
//! always slice back to the exact source bytes.

pub mod node;
pub mod parser;
pub mod selector;

pub use node::{Element, Fragment, Node};
pub use parser::parse_fragment;
pub use selector::Selector;
