use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::Attributes;

/// One piece of a block's inner content, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InnerPart {
    Markup(String),
    Block(BlockRecord),
}

/// An instance of a block type inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Process-local identity for UI operations. Not part of the content.
    #[serde(default = "Uuid::new_v4")]
    pub uid: Uuid,
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub inner: Vec<InnerPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl BlockRecord {
    pub fn new(name: &str) -> Self {
        Self {
            uid: Uuid::new_v4(),
            name: name.to_string(),
            attributes: Attributes::new(),
            inner: Vec::new(),
            anchor: None,
            class_name: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        if !markup.is_empty() {
            self.inner.push(InnerPart::Markup(markup.to_string()));
        }
        self
    }

    pub fn with_child(mut self, child: BlockRecord) -> Self {
        self.inner.push(InnerPart::Block(child));
        self
    }

    /// All markup parts concatenated, skipping nested blocks.
    ///
    /// This is what attribute extraction runs against.
    pub fn markup(&self) -> String {
        self.inner
            .iter()
            .filter_map(|p| match p {
                InnerPart::Markup(m) => Some(m.as_str()),
                InnerPart::Block(_) => None,
            })
            .collect()
    }

    pub fn children(&self) -> impl Iterator<Item = &BlockRecord> {
        self.inner.iter().filter_map(|p| match p {
            InnerPart::Block(b) => Some(b),
            InnerPart::Markup(_) => None,
        })
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut BlockRecord> {
        self.inner.iter_mut().filter_map(|p| match p {
            InnerPart::Block(b) => Some(b),
            InnerPart::Markup(_) => None,
        })
    }

    /// Structural equality that ignores `uid`, recursively.
    pub fn content_eq(&self, other: &BlockRecord) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.anchor == other.anchor
            && self.class_name == other.class_name
            && self.inner.len() == other.inner.len()
            && self
                .inner
                .iter()
                .zip(&other.inner)
                .all(|pair| match pair {
                    (InnerPart::Markup(a), InnerPart::Markup(b)) => a == b,
                    (InnerPart::Block(a), InnerPart::Block(b)) => a.content_eq(b),
                    _ => false,
                })
    }

    /// Copy of the record with fresh uids throughout.
    pub fn duplicate(&self) -> BlockRecord {
        let mut copy = self.clone();
        copy.uid = Uuid::new_v4();
        for part in &mut copy.inner {
            if let InnerPart::Block(child) = part {
                *child = child.duplicate();
            }
        }
        copy
    }
}
