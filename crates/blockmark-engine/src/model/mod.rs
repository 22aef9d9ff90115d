//! Block records, documents and helpers for creating and checking them.

pub mod document;
pub mod factory;
pub mod record;
pub mod validation;

pub use document::Document;
pub use factory::{block_class_names, create_block, switch_to_block_type};
pub use record::{BlockRecord, InnerPart};
pub use validation::{AttributeIssue, is_valid_block, validate_block};
