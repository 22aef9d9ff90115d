//! # Reusable Blocks
//!
//! A reusable block is content stored once and referenced from documents by a
//! `core/block` placeholder whose `ref` attribute holds the reusable block's
//! id. Its lifecycle is independent of the documents that reference it:
//! editing it changes every placeholder's rendering, and a placeholder can be
//! converted back into a static copy at any time.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::attributes::{AttributeSchema, Attributes};
use crate::model::{BlockRecord, Document, InnerPart};
use crate::registry::BlockType;

pub const REUSABLE_BLOCK_NAME: &str = "core/block";

/// The placeholder type. Private, so it never shows up for insertion.
pub fn reusable_block_type() -> BlockType {
    BlockType::new(REUSABLE_BLOCK_NAME, "Reusable Block", "reusable-blocks")
        .with_attribute("ref", AttributeSchema::string())
        .with_support("className", false)
        .with_support("html", false)
        .private()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReusableBlock {
    pub id: String,
    pub name: String,
    /// Type of the stored block.
    #[serde(rename = "type")]
    pub block_type: String,
    pub attributes: Attributes,
    #[serde(default)]
    pub inner: Vec<InnerPart>,
}

impl ReusableBlock {
    /// A detached record holding this block's content, with a fresh uid.
    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            attributes: self.attributes.clone(),
            inner: self.inner.clone(),
            ..BlockRecord::new(&self.block_type)
        }
        .duplicate()
    }
}

/// Changes to apply to a stored reusable block. Only `Some` fields change;
/// attributes merge into the existing ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReusableBlockUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl ReusableBlockUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.attributes.is_none()
    }
}

/// In-memory reusable blocks keyed by id, plus which ones are being saved.
#[derive(Debug, Clone, Default)]
pub struct ReusableBlocks {
    data: HashMap<String, ReusableBlock>,
    saving: HashSet<String>,
}

impl ReusableBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `block`, replacing any block with the same id.
    pub fn insert(&mut self, block: ReusableBlock) -> Option<ReusableBlock> {
        self.data.insert(block.id.clone(), block)
    }

    pub fn get(&self, id: &str) -> Option<&ReusableBlock> {
        self.data.get(id)
    }

    /// Applies `update` to the block with `id`. Returns false if it is unknown.
    pub fn update(&mut self, id: &str, update: ReusableBlockUpdate) -> bool {
        let Some(block) = self.data.get_mut(id) else {
            log::debug!("update for unknown reusable block {id}");
            return false;
        };
        if let Some(name) = update.name {
            block.name = name;
        }
        if let Some(attributes) = update.attributes {
            block.attributes.extend(attributes);
        }
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<ReusableBlock> {
        self.saving.remove(id);
        self.data.remove(id)
    }

    pub fn mark_saving(&mut self, id: &str) {
        self.saving.insert(id.to_string());
    }

    pub fn is_saving(&self, id: &str) -> bool {
        self.saving.contains(id)
    }

    pub fn finish_saving(&mut self, id: &str) {
        self.saving.remove(id);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The id a placeholder record points at, if it is a placeholder.
pub fn reference(record: &BlockRecord) -> Option<&str> {
    if record.name != REUSABLE_BLOCK_NAME {
        return None;
    }
    record.attributes.get("ref").and_then(Value::as_str)
}

/// Turns `record` into a new reusable block named `name`, returning it with
/// the placeholder that should take the record's place in the document.
pub fn create_reusable_block(record: &BlockRecord, name: &str) -> (ReusableBlock, BlockRecord) {
    let id = Uuid::new_v4().to_string();
    let reusable = ReusableBlock {
        id: id.clone(),
        name: name.to_string(),
        block_type: record.name.clone(),
        attributes: record.attributes.clone(),
        inner: record.inner.clone(),
    };
    let mut attributes = Attributes::new();
    attributes.insert("ref".into(), Value::String(id));
    let placeholder = BlockRecord::new(REUSABLE_BLOCK_NAME).with_attributes(attributes);
    (reusable, placeholder)
}

/// Replaces the placeholder with `uid` by a static copy of the block it
/// references. Returns false if `uid` is not a placeholder or the referenced
/// block is not loaded.
pub fn convert_to_static(doc: &mut Document, uid: Uuid, store: &ReusableBlocks) -> bool {
    let Some(id) = doc.find_by_uid(uid).and_then(reference) else {
        return false;
    };
    let Some(reusable) = store.get(id) else {
        log::debug!("reusable block {id} is not loaded; cannot convert {uid}");
        return false;
    };
    doc.replace(uid, reusable.to_record()).is_some()
}

/// Pending edits to one reusable block, held while the user edits it.
///
/// Nothing reaches the store until [`EditSession::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    pub is_editing: bool,
    pub name: Option<String>,
    pub attributes: Option<Attributes>,
}

impl EditSession {
    pub fn start(&mut self) {
        self.is_editing = true;
    }

    /// Ends editing and discards pending changes.
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Merges `attributes` into the pending attribute changes.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        if !self.is_editing {
            return;
        }
        self.attributes.get_or_insert_with(Attributes::new).extend(attributes);
    }

    /// The block's attributes with pending changes applied on top.
    pub fn effective_attributes(&self, block: &ReusableBlock) -> Attributes {
        let mut merged = block.attributes.clone();
        if let Some(pending) = &self.attributes {
            merged.extend(pending.clone());
        }
        merged
    }

    pub fn effective_name<'a>(&'a self, block: &'a ReusableBlock) -> &'a str {
        self.name.as_deref().unwrap_or(&block.name)
    }

    /// Applies the pending changes to `store`, marks the block as saving and
    /// ends the session.
    pub fn commit(&mut self, store: &mut ReusableBlocks, id: &str) -> bool {
        let update = ReusableBlockUpdate {
            name: self.name.take(),
            attributes: self.attributes.take(),
        };
        let applied = store.update(id, update);
        if applied {
            store.mark_saving(id);
        }
        self.stop();
        applied
    }
}
