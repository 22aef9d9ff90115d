//! # Block Markup Serializer
//!
//! The inverse of [`parsing`](crate::parsing). Each record becomes an opener
//! with a minimal attribute blob, its inner content, and a closer. Records
//! with no inner content become a single self-closing marker. A fallback
//! `core/freeform` record whose type is not registered is written as its bare
//! markup.
//!
//! ## Minimal blobs
//!
//! A schema attribute is written only when the parser could not recover it
//! on its own: values equal to the declared default and values that the
//! attribute's source rule extracts from the inner markup are left out.
//! Attributes the schema does not declare are always written.

use uuid::Uuid;

use crate::attributes::{Attributes, extract};
use crate::markup::parse_fragment;
use crate::model::{BlockRecord, InnerPart};
use crate::raw::is_bare_freeform;
use crate::registry::{BlockType, Registry};

/// Serializes top-level blocks, separated by a blank line.
pub fn serialize(registry: &Registry, blocks: &[BlockRecord]) -> String {
    blocks
        .iter()
        .map(|b| serialize_block(registry, b))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn serialize_block(registry: &Registry, record: &BlockRecord) -> String {
    if is_bare_freeform(registry, record) {
        return block_content(registry, record);
    }
    let attrs = match registry.get(&record.name) {
        Some(block_type) => serialize_attributes(&block_type, record),
        None => stored_attributes(record),
    };
    let content = block_content(registry, record);
    let name = comment_name(&record.name);
    let blob = if attrs.is_empty() {
        String::new()
    } else {
        format!("{} ", escape_blob(&attrs))
    };

    if content.is_empty() {
        format!("<!-- wp:{name} {blob}/-->")
    } else {
        format!("<!-- wp:{name} {blob}-->\n{content}\n<!-- /wp:{name} -->")
    }
}

/// The record's inner content with nested blocks serialized in place.
pub fn block_content(registry: &Registry, record: &BlockRecord) -> String {
    let mut out = String::new();
    for part in &record.inner {
        match part {
            InnerPart::Markup(m) => out.push_str(m),
            InnerPart::Block(child) => out.push_str(&serialize_block(registry, child)),
        }
    }
    out
}

/// The attributes that go into the delimiter blob for `record`.
pub fn serialize_attributes(block_type: &BlockType, record: &BlockRecord) -> Attributes {
    let markup = record.markup();
    let fragment = parse_fragment(&markup);

    let mut out = Attributes::new();
    for (key, value) in &record.attributes {
        if let Some(schema) = block_type.attributes.get(key) {
            if schema.default.as_ref() == Some(value) {
                continue;
            }
            if schema.is_sourced() && extract(schema, &fragment).as_ref() == Some(value) {
                continue;
            }
        }
        out.insert(key.clone(), value.clone());
    }

    if block_type.has_support("className", true)
        && let Some(class_name) = &record.class_name
    {
        out.insert("className".into(), class_name.clone().into());
    }
    if block_type.has_support("anchor", false)
        && let Some(anchor) = &record.anchor
    {
        let from_markup = fragment.first_element().and_then(|el| el.id());
        if from_markup != Some(anchor.as_str()) {
            out.insert("anchor".into(), anchor.clone().into());
        }
    }
    out
}

/// Blob for a record whose type is not registered: everything as stored.
fn stored_attributes(record: &BlockRecord) -> Attributes {
    let mut out = record.attributes.clone();
    if let Some(class_name) = &record.class_name {
        out.insert("className".into(), class_name.clone().into());
    }
    if let Some(anchor) = &record.anchor {
        out.insert("anchor".into(), anchor.clone().into());
    }
    out
}

/// `core/paragraph` is written as `paragraph`; other namespaces stay.
fn comment_name(name: &str) -> &str {
    name.strip_prefix("core/").unwrap_or(name)
}

/// Encodes the blob so it cannot end the surrounding comment early.
fn escape_blob(attrs: &Attributes) -> String {
    let json = serde_json::Value::Object(attrs.clone()).to_string();
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('"') => out.push_str("\\u0022"),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str("\\u002d\\u002d");
            }
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            c => out.push(c),
        }
    }
    out
}

/// `wp-block-<name>`, with `core/` dropped and `/` turned into `-`.
pub fn default_class_name(name: &str) -> String {
    format!("wp-block-{}", comment_name(name).replace('/', "-"))
}

/// A fresh anchor id for a block of type `name`.
pub fn random_anchor(name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", default_class_name(name), &id[..8])
}
