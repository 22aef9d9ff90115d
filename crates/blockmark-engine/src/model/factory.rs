use crate::attributes::Attributes;
use crate::registry::{BlockType, Registry, TransformDirection};
use crate::serialize::default_class_name;

use super::record::BlockRecord;

/// Creates a record of a registered type with schema defaults filled in.
///
/// Values in `attributes` override the defaults; keys the schema does not
/// declare are kept. Returns `None` when `name` is not registered.
pub fn create_block(registry: &Registry, name: &str, attributes: Attributes) -> Option<BlockRecord> {
    let Some(block_type) = registry.get(name) else {
        log::debug!("create_block: {name} is not registered");
        return None;
    };
    let mut filled = Attributes::new();
    for (attr, schema) in &block_type.attributes {
        if let Some(default) = &schema.default {
            filled.insert(attr.clone(), default.clone());
        }
    }
    filled.extend(attributes);
    Some(BlockRecord::new(name).with_attributes(filled))
}

/// Converts `record` into records of type `to` through a declared transform.
///
/// The source type's `To` transforms are tried before the destination's
/// `From` transforms. Results get their type's defaults filled in, and the
/// first result of type `to` keeps the source record's uid. Returns `None`
/// when no transform connects the two types, when a result's type is not
/// registered, or when no result has type `to`.
pub fn switch_to_block_type(registry: &Registry, record: &BlockRecord, to: &str) -> Option<Vec<BlockRecord>> {
    let source = registry.get(&record.name);
    let destination = registry.get(to);
    let transform = source
        .as_ref()
        .and_then(|s| {
            s.transforms
                .iter()
                .find(|t| t.direction == TransformDirection::To && t.involves(to))
        })
        .or_else(|| {
            destination.as_ref().and_then(|d| {
                d.transforms
                    .iter()
                    .find(|t| t.direction == TransformDirection::From && t.involves(&record.name))
            })
        });
    let Some(transform) = transform else {
        log::debug!("no transform from {} to {to}", record.name);
        return None;
    };

    let mut results = Vec::new();
    for result in transform.apply(&record.attributes) {
        let Some(block_type) = registry.get(&result.name) else {
            log::debug!("transform to {to} produced unregistered type {}", result.name);
            return None;
        };
        let mut attributes = Attributes::new();
        for (attr, schema) in &block_type.attributes {
            if let Some(default) = &schema.default {
                attributes.insert(attr.clone(), default.clone());
            }
        }
        attributes.extend(result.attributes.clone());
        results.push(BlockRecord { attributes, ..result });
    }

    let first = results.iter().position(|r| r.name == to)?;
    results[first].uid = record.uid;
    Some(results)
}

/// Class names a renderer should put on the block's wrapper element.
///
/// The generated `wp-block-*` class comes first when the type supports
/// `className` (on unless disabled), followed by the record's custom class.
pub fn block_class_names(block_type: &BlockType, record: &BlockRecord) -> Vec<String> {
    let mut classes = Vec::new();
    if block_type.has_support("className", true) {
        classes.push(default_class_name(&block_type.name));
    }
    if let Some(custom) = &record.class_name {
        classes.extend(custom.split_whitespace().map(str::to_string));
    }
    classes
}
