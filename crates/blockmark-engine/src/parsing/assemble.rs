use serde_json::Value;

use crate::attributes::{Attributes, resolve::resolve_with_fragment};
use crate::markup::parse_fragment;
use crate::model::{BlockRecord, InnerPart};
use crate::raw::{freeform_record, is_bare_freeform, raw_handler};
use crate::registry::{BlockType, Registry};

use super::builder::{BlockNode, Piece};

/// Turns the built tree into block records.
pub fn assemble(registry: &Registry, src: &str, pieces: Vec<Piece>) -> Vec<BlockRecord> {
    let mut out = Vec::new();
    for piece in pieces {
        match piece {
            Piece::Text(span) => {
                let text = trim_blank_lines(span.slice(src));
                if !text.is_empty() {
                    for record in raw_handler(registry, text) {
                        push_text_record(registry, &mut out, record);
                    }
                }
            }
            Piece::Block(node) => out.extend(assemble_block(registry, src, node)),
        }
    }
    out
}

/// Drops the blank lines around top-level text; they only separate blocks.
/// Indentation on the first content line is kept.
fn trim_blank_lines(text: &str) -> &str {
    let text = text.trim_end();
    let lead = text.len() - text.trim_start().len();
    let start = text[..lead].rfind('\n').map_or(0, |i| i + 1);
    &text[start..]
}

/// Adjacent bare freeform records serialize as one run of text, so they are
/// joined here the same way.
fn push_text_record(registry: &Registry, out: &mut Vec<BlockRecord>, record: BlockRecord) {
    if let Some(prev) = out.last_mut()
        && is_bare_freeform(registry, prev)
        && is_bare_freeform(registry, &record)
    {
        let joined = format!("{}\n\n{}", prev.markup(), record.markup());
        *prev = freeform_record(registry, &joined);
        return;
    }
    out.push(record);
}

fn assemble_block(registry: &Registry, src: &str, node: BlockNode) -> Option<BlockRecord> {
    let BlockNode {
        name,
        attrs,
        pieces,
        ..
    } = node;
    let inner = inner_parts(registry, src, pieces);

    if let Some(block_type) = registry.get(&name) {
        return Some(record_for(&block_type, inner, attrs));
    }

    match registry
        .unknown_type_handler_name()
        .and_then(|handler| registry.get(handler))
    {
        Some(handler) => {
            log::debug!("{name} is not registered; handing it to {}", handler.name);
            Some(record_for(&handler, inner, Attributes::new()))
        }
        None => {
            log::debug!("{name} is not registered and no handler is set; dropping it");
            None
        }
    }
}

/// Converts child pieces into inner parts, undoing the newline the
/// serializer puts after the opener and before the closer.
fn inner_parts(registry: &Registry, src: &str, pieces: Vec<Piece>) -> Vec<InnerPart> {
    let mut parts: Vec<InnerPart> = pieces
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Text(span) => Some(InnerPart::Markup(span.slice(src).to_string())),
            Piece::Block(child) => assemble_block(registry, src, child).map(InnerPart::Block),
        })
        .collect();

    if let Some(InnerPart::Markup(first)) = parts.first_mut()
        && first.starts_with('\n')
    {
        first.remove(0);
    }
    if let Some(InnerPart::Markup(last)) = parts.last_mut()
        && last.ends_with('\n')
    {
        last.pop();
    }
    parts.retain(|p| !matches!(p, InnerPart::Markup(m) if m.is_empty()));
    parts
}

/// Builds a record of `block_type` from its inner parts and delimiter blob.
///
/// `className` and `anchor` are lifted out of the blob into their own fields
/// when the type supports them; an anchor can also come from the first
/// element's `id`.
pub(crate) fn record_for(block_type: &BlockType, inner: Vec<InnerPart>, mut explicit: Attributes) -> BlockRecord {
    let markup: String = inner
        .iter()
        .filter_map(|p| match p {
            InnerPart::Markup(m) => Some(m.as_str()),
            InnerPart::Block(_) => None,
        })
        .collect();
    let fragment = parse_fragment(&markup);

    let class_name = if block_type.has_support("className", true) {
        take_string(&mut explicit, "className")
    } else {
        None
    };
    let anchor = if block_type.has_support("anchor", false) {
        take_string(&mut explicit, "anchor")
            .or_else(|| fragment.first_element().and_then(|el| el.id()).map(str::to_string))
    } else {
        None
    };

    let attributes = resolve_with_fragment(block_type, &fragment, &explicit);
    BlockRecord {
        attributes,
        inner,
        anchor,
        class_name,
        ..BlockRecord::new(&block_type.name)
    }
}

fn take_string(attrs: &mut Attributes, key: &str) -> Option<String> {
    match attrs.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            // Not a string: leave it where it was so nothing is lost.
            attrs.insert(key.to_string(), other);
            None
        }
    }
}
