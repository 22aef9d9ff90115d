//! # Raw-content Handler
//!
//! Best-effort conversion of markup that carries no block delimiters (pasted
//! text, legacy posts, markdown) into block records.
//!
//! Content is split at top-level markdown block boundaries. Each chunk maps
//! to a specific core type when that type is registered, else to the
//! registry's default block, else to the unknown-type handler. When nothing
//! usable is registered the whole input becomes a single `core/freeform`
//! record. It never fails.
//!
//! While `core/freeform` itself is unregistered such a record is written back
//! as bare markup, so the next parse lands here again.

pub mod classify;

use pulldown_cmark::{Parser, html};

use crate::attributes::Attributes;
use crate::model::{BlockRecord, InnerPart};
use crate::parsing::assemble::record_for;
use crate::registry::Registry;

pub use classify::{Chunk, ChunkKind, chunks, classify_html};

pub const FREEFORM_BLOCK_NAME: &str = "core/freeform";

pub fn raw_handler(registry: &Registry, text: &str) -> Vec<BlockRecord> {
    let fallback = registry
        .default_block_name()
        .or(registry.unknown_type_handler_name())
        .and_then(|name| registry.get(name));

    let mut out = Vec::new();
    for chunk in chunks(text) {
        let source = &text[chunk.range.clone()];
        let block_type = registry.get(chunk.kind.block_name()).or_else(|| fallback.clone());
        let Some(block_type) = block_type else {
            log::debug!(
                "no block type for {:?} chunk; wrapping input as {FREEFORM_BLOCK_NAME}",
                chunk.kind
            );
            return vec![freeform_record(registry, text)];
        };
        out.push(record_for(
            &block_type,
            vec![InnerPart::Markup(chunk_markup(&chunk, source))],
            Attributes::new(),
        ));
    }
    out
}

/// Markup stored for a chunk: paragraph text and HTML as written, other
/// markdown rendered to HTML.
fn chunk_markup(chunk: &Chunk, source: &str) -> String {
    if chunk.is_html || chunk.kind == ChunkKind::Paragraph {
        return source.trim().to_string();
    }
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new(source));
    rendered.trim().to_string()
}

/// Whether `record` is a fallback record of an unregistered `core/freeform`.
pub fn is_bare_freeform(registry: &Registry, record: &BlockRecord) -> bool {
    record.name == FREEFORM_BLOCK_NAME && !registry.contains(FREEFORM_BLOCK_NAME)
}

pub(crate) fn freeform_record(registry: &Registry, text: &str) -> BlockRecord {
    let inner = vec![InnerPart::Markup(text.to_string())];
    match registry.get(FREEFORM_BLOCK_NAME) {
        Some(block_type) => record_for(&block_type, inner, Attributes::new()),
        None => {
            let mut attributes = Attributes::new();
            attributes.insert("content".into(), text.into());
            BlockRecord {
                attributes,
                inner,
                ..BlockRecord::new(FREEFORM_BLOCK_NAME)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeSchema, Matcher};
    use crate::registry::BlockType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paragraph() -> BlockType {
        BlockType::new("core/paragraph", "Paragraph", "common").with_attribute(
            "content",
            AttributeSchema::string().with_default("").extract(Matcher::text("")),
        )
    }

    fn names(records: &[BlockRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn plain_text_becomes_default_paragraph() {
        let mut reg = Registry::new();
        reg.register(paragraph()).unwrap();
        reg.set_default_block_name("core/paragraph").unwrap();

        let records = raw_handler(&reg, "Hello world");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "core/paragraph");
        assert_eq!(records[0].attributes.get("content"), Some(&json!("Hello world")));
        assert_eq!(records[0].markup(), "Hello world");
    }

    #[test]
    fn one_record_per_paragraph() {
        let mut reg = Registry::new();
        reg.register(paragraph()).unwrap();
        reg.set_default_block_name("core/paragraph").unwrap();

        let records = raw_handler(&reg, "first\n\nsecond\n\n\nthird");
        let texts: Vec<String> = records.iter().map(|r| r.markup()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn markdown_heading_is_rendered_when_type_is_registered() {
        let mut reg = Registry::new();
        reg.register(paragraph()).unwrap();
        reg.register(BlockType::new("core/heading", "Heading", "common")).unwrap();
        reg.set_default_block_name("core/paragraph").unwrap();

        let records = raw_handler(&reg, "## Section\n\nBody");
        assert_eq!(names(&records), vec!["core/heading", "core/paragraph"]);
        assert_eq!(records[0].markup(), "<h2>Section</h2>");
    }

    #[test]
    fn unregistered_specific_type_falls_back_to_default() {
        let mut reg = Registry::new();
        reg.register(paragraph()).unwrap();
        reg.set_default_block_name("core/paragraph").unwrap();

        let records = raw_handler(&reg, "- a\n- b");
        assert_eq!(names(&records), vec!["core/paragraph"]);
        assert_eq!(records[0].markup(), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn handler_is_used_without_default() {
        let mut reg = Registry::new();
        reg.register(BlockType::new("my/catchall", "Catch all", "common")).unwrap();
        reg.set_unknown_type_handler_name("my/catchall").unwrap();

        let records = raw_handler(&reg, "text");
        assert_eq!(names(&records), vec!["my/catchall"]);
    }

    #[test]
    fn nothing_usable_wraps_input_in_freeform() {
        let reg = Registry::new();
        let records = raw_handler(&reg, "a\n\nb");
        assert_eq!(names(&records), vec![FREEFORM_BLOCK_NAME]);
        assert_eq!(records[0].markup(), "a\n\nb");
        assert_eq!(records[0].attributes.get("content"), Some(&json!("a\n\nb")));
        assert!(is_bare_freeform(&reg, &records[0]));
    }

    #[test]
    fn registered_freeform_is_not_bare() {
        let mut reg = Registry::new();
        reg.register(BlockType::new("core/freeform", "Classic", "formatting")).unwrap();

        let records = raw_handler(&reg, "text");
        assert_eq!(names(&records), vec![FREEFORM_BLOCK_NAME]);
        assert!(!is_bare_freeform(&reg, &records[0]));
    }

    #[test]
    fn html_chunks_are_kept_verbatim() {
        let mut reg = Registry::new();
        reg.register(paragraph()).unwrap();
        reg.register(BlockType::new("core/html", "Custom HTML", "formatting")).unwrap();
        reg.set_default_block_name("core/paragraph").unwrap();

        let records = raw_handler(&reg, "<div class=\"x\">box</div>");
        assert_eq!(names(&records), vec!["core/html"]);
        assert_eq!(records[0].markup(), "<div class=\"x\">box</div>");
    }
}
