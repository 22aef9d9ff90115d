//! The built-in `core/*` block types.

use serde_json::Value;

use crate::attributes::{AttributeSchema, Attributes, Matcher, NodeProperty};
use crate::model::BlockRecord;
use crate::raw::FREEFORM_BLOCK_NAME;
use crate::registry::{BlockType, Registry, Result, Transform, map_attributes};
use crate::reusable::reusable_block_type;

pub const DEFAULT_BLOCK_NAME: &str = "core/paragraph";

pub fn paragraph() -> BlockType {
    BlockType::new("core/paragraph", "Paragraph", "common")
        .with_description("The basic building block of narrative.")
        .with_keywords(&["text"])
        .with_attribute(
            "content",
            AttributeSchema::string().with_default("").extract(Matcher::text("")),
        )
        .with_attribute("align", AttributeSchema::string())
        .with_attribute("dropCap", AttributeSchema::boolean().with_default(false))
}

pub fn heading() -> BlockType {
    let levels = "h1,h2,h3,h4,h5,h6";
    BlockType::new("core/heading", "Heading", "common")
        .with_keywords(&["title", "subtitle"])
        .with_attribute("content", AttributeSchema::string().extract(Matcher::text(levels)))
        .with_attribute(
            "nodeName",
            AttributeSchema::string()
                .with_default("H2")
                .extract(Matcher::property(levels, NodeProperty::NodeName)),
        )
        .with_attribute("align", AttributeSchema::string())
        .with_support("anchor", true)
        .with_transform(Transform::from_blocks(
            &[DEFAULT_BLOCK_NAME],
            map_attributes("core/heading", &[("content", "content")]),
        ))
        .with_transform(Transform::to_blocks(
            &[DEFAULT_BLOCK_NAME],
            map_attributes(DEFAULT_BLOCK_NAME, &[("content", "content")]),
        ))
}

fn paragraph_with(content: Value) -> BlockRecord {
    let mut attributes = Attributes::new();
    attributes.insert("content".into(), content);
    BlockRecord::new(DEFAULT_BLOCK_NAME).with_attributes(attributes)
}

pub fn list() -> BlockType {
    BlockType::new("core/list", "List", "common")
        .with_keywords(&["bullet list", "ordered list", "numbered list"])
        .with_attribute(
            "nodeName",
            AttributeSchema::string()
                .with_default("UL")
                .extract(Matcher::property("ul,ol", NodeProperty::NodeName)),
        )
        .with_attribute("values", AttributeSchema::string().extract(Matcher::html("ul,ol")))
}

pub fn quote() -> BlockType {
    BlockType::new("core/quote", "Quote", "common")
        .with_attribute(
            "value",
            AttributeSchema::array().extract(Matcher::query("blockquote > p", Matcher::text(""))),
        )
        .with_attribute("citation", AttributeSchema::string().extract(Matcher::html("cite")))
        .with_attribute("align", AttributeSchema::string())
        .with_attribute("style", AttributeSchema::integer().with_default(1))
        .with_transform(Transform::from_blocks(&[DEFAULT_BLOCK_NAME], |attrs| {
            let mut attributes = Attributes::new();
            if let Some(content) = attrs.get("content") {
                attributes.insert("value".into(), Value::Array(vec![content.clone()]));
            }
            vec![BlockRecord::new("core/quote").with_attributes(attributes)]
        }))
        // One paragraph per quoted line, then one for the citation.
        .with_transform(Transform::to_blocks(&[DEFAULT_BLOCK_NAME], |attrs| {
            let mut out: Vec<BlockRecord> = attrs
                .get("value")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .map(|line| paragraph_with(line.clone()))
                .collect();
            if let Some(citation) = attrs.get("citation").filter(|c| c.as_str().is_some_and(|s| !s.is_empty())) {
                out.push(paragraph_with(citation.clone()));
            }
            out
        }))
}

pub fn code() -> BlockType {
    BlockType::new("core/code", "Code", "formatting")
        .with_attribute("content", AttributeSchema::string().extract(Matcher::text("code")))
        .with_support("html", false)
}

pub fn separator() -> BlockType {
    BlockType::new("core/separator", "Separator", "layout")
        .with_keywords(&["horizontal-line", "hr", "divider"])
}

pub fn html() -> BlockType {
    BlockType::new("core/html", "Custom HTML", "formatting")
        .with_keywords(&["embed"])
        .with_attribute("content", AttributeSchema::string().raw())
        .with_support("className", false)
        .with_support("html", false)
}

pub fn freeform() -> BlockType {
    BlockType::new(FREEFORM_BLOCK_NAME, "Classic", "formatting")
        .with_attribute("content", AttributeSchema::string().raw())
        .with_support("className", false)
        .private()
}

pub fn image() -> BlockType {
    BlockType::new("core/image", "Image", "common")
        .with_keywords(&["photo"])
        .with_attribute("url", AttributeSchema::string().extract(Matcher::attribute("img", "src")))
        .with_attribute("alt", AttributeSchema::string().with_default("").extract(Matcher::attribute("img", "alt")))
        .with_attribute("caption", AttributeSchema::string().extract(Matcher::html("figcaption")))
        .with_attribute("href", AttributeSchema::string().extract(Matcher::attribute("figure > a", "href")))
        .with_attribute("id", AttributeSchema::integer())
        .with_attribute("align", AttributeSchema::string())
}

/// Every built-in type, in registration order.
pub fn core_blocks() -> Vec<BlockType> {
    vec![
        paragraph(),
        heading(),
        list(),
        quote(),
        code(),
        separator(),
        html(),
        freeform(),
        image(),
        reusable_block_type(),
    ]
}

/// Registers the built-in types and designates `core/paragraph` as the
/// default block and `core/freeform` as the unknown-type handler.
pub fn register_core_blocks(registry: &mut Registry) -> Result<()> {
    for block_type in core_blocks() {
        registry.register(block_type)?;
    }
    registry.set_default_block_name(DEFAULT_BLOCK_NAME)?;
    registry.set_unknown_type_handler_name(FREEFORM_BLOCK_NAME)?;
    log::info!("registered {} core block types", registry.len());
    Ok(())
}

/// A registry with the core library already registered.
pub fn core_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    register_core_blocks(&mut registry)?;
    Ok(registry)
}
