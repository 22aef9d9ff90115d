//! # Attribute Resolution
//!
//! Computes concrete attribute values for a block from its type's schema, the
//! parsed inner markup, and the explicit JSON blob on the block delimiter.
//!
//! ## Precedence
//!
//! 1. An explicit blob value that fits the declared kind
//! 2. The attribute's source rule (`Extract` or `Raw`)
//! 3. The declared default
//!
//! If none of these yields a value the attribute is simply absent. The
//! resolver is pure: it never mutates the registry or the markup it reads.

pub mod coerce;
pub mod resolve;
pub mod schema;

pub use resolve::{extract, resolve_attribute, resolve_attributes};
pub use schema::{AttributeKind, AttributeSchema, AttributeSource, Matcher, NodeProperty, QueryItem};

/// Attribute values of a block record, keyed by attribute name.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
