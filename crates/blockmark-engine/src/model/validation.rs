use crate::attributes::AttributeKind;
use crate::registry::Registry;

use super::record::BlockRecord;

/// A way a record fails to conform to its type's schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeIssue {
    #[error("block type {0} is not registered")]
    UnregisteredType(String),
    #[error("attribute {attribute} is not a {expected:?}")]
    WrongKind {
        attribute: String,
        expected: AttributeKind,
    },
}

/// Checks every schema attribute present on `record` against its kind.
///
/// Missing attributes are fine since they fall back to defaults, and
/// undeclared attributes are preserved rather than checked.
pub fn validate_block(registry: &Registry, record: &BlockRecord) -> Vec<AttributeIssue> {
    let Some(block_type) = registry.get(&record.name) else {
        return vec![AttributeIssue::UnregisteredType(record.name.clone())];
    };
    block_type
        .attributes
        .iter()
        .filter_map(|(name, schema)| {
            let value = record.attributes.get(name)?;
            (!schema.kind.accepts(value)).then(|| AttributeIssue::WrongKind {
                attribute: name.clone(),
                expected: schema.kind,
            })
        })
        .collect()
}

pub fn is_valid_block(registry: &Registry, record: &BlockRecord) -> bool {
    validate_block(registry, record).is_empty()
}
