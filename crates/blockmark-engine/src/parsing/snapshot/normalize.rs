use serde::Serialize;
use serde_json::Value;

use crate::model::{BlockRecord, Document, InnerPart};

/// Stable, uid-free view of a parsed document.
#[derive(Debug, Serialize)]
pub struct Snap {
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Serialize)]
pub struct BlockSnap {
    pub name: String,
    /// Sorted by key.
    pub attributes: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub inner: Vec<InnerSnap>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InnerSnap {
    /// Markup shortened for readability.
    Markup(String),
    Block(BlockSnap),
}

const PREVIEW: usize = 60;

pub fn normalize(doc: &Document) -> Snap {
    Snap {
        blocks: doc.iter().map(block_snap).collect(),
    }
}

fn block_snap(b: &BlockRecord) -> BlockSnap {
    BlockSnap {
        name: b.name.clone(),
        attributes: Value::Object(b.attributes.clone()),
        anchor: b.anchor.clone(),
        class_name: b.class_name.clone(),
        inner: b
            .inner
            .iter()
            .map(|p| match p {
                InnerPart::Markup(m) => InnerSnap::Markup(preview(m)),
                InnerPart::Block(child) => InnerSnap::Block(block_snap(child)),
            })
            .collect(),
    }
}

fn preview(s: &str) -> String {
    if s.len() <= PREVIEW {
        return s.to_string();
    }
    let mut cut = PREVIEW;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}
