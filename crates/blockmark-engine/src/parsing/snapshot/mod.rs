//! # Snapshot Testing Support
//!
//! Utilities for checking the parser via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`normalize`**: converts a parsed [`Document`](crate::model::Document)
//!   into a stable, serializable `Snap` without process-local uids
//! - **`invariants`**: runtime checks for tokenizer and tree builder output
//!   (spans in bounds, ordered, non-overlapping, children inside parents)

pub mod invariants;
pub mod normalize;

pub use invariants::{check as invariants, check_tree};
pub use normalize::{BlockSnap, InnerSnap, Snap, normalize};
