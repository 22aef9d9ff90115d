use std::fmt;
use std::sync::Arc;

use crate::attributes::Attributes;
use crate::model::BlockRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    /// Declared on the destination type: converts the listed types into it.
    From,
    /// Declared on the source type: converts it into the listed types.
    To,
}

type ConvertFn = dyn Fn(&Attributes) -> Vec<BlockRecord> + Send + Sync;

/// A declared conversion between a block type and the types in `blocks`.
///
/// The conversion sees only the source record's attributes and returns the
/// records that replace it, which may be of several types.
#[derive(Clone)]
pub struct Transform {
    pub direction: TransformDirection,
    /// Types on the other side of the conversion.
    pub blocks: Vec<String>,
    convert: Arc<ConvertFn>,
}

impl Transform {
    fn new(
        direction: TransformDirection,
        blocks: &[&str],
        convert: impl Fn(&Attributes) -> Vec<BlockRecord> + Send + Sync + 'static,
    ) -> Self {
        Self {
            direction,
            blocks: blocks.iter().map(|b| b.to_string()).collect(),
            convert: Arc::new(convert),
        }
    }

    pub fn from_blocks(
        blocks: &[&str],
        convert: impl Fn(&Attributes) -> Vec<BlockRecord> + Send + Sync + 'static,
    ) -> Self {
        Self::new(TransformDirection::From, blocks, convert)
    }

    pub fn to_blocks(
        blocks: &[&str],
        convert: impl Fn(&Attributes) -> Vec<BlockRecord> + Send + Sync + 'static,
    ) -> Self {
        Self::new(TransformDirection::To, blocks, convert)
    }

    pub fn involves(&self, name: &str) -> bool {
        self.blocks.iter().any(|b| b == name)
    }

    pub fn apply(&self, attributes: &Attributes) -> Vec<BlockRecord> {
        (self.convert)(attributes)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("direction", &self.direction)
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

/// A conversion into one `target` record that copies attributes across
/// under new names, given as `(source key, target key)` pairs. Keys without
/// a pair are dropped.
pub fn map_attributes(
    target: &str,
    mapping: &[(&str, &str)],
) -> impl Fn(&Attributes) -> Vec<BlockRecord> + Send + Sync + 'static {
    let target = target.to_string();
    let mapping: Vec<(String, String)> = mapping
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    move |attributes| {
        let mut out = Attributes::new();
        for (from, to) in &mapping {
            if let Some(value) = attributes.get(from) {
                out.insert(to.clone(), value.clone());
            }
        }
        vec![BlockRecord::new(&target).with_attributes(out)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn map_attributes_renames_and_drops() {
        let mut attrs = Attributes::new();
        attrs.insert("content".into(), json!("Title"));
        attrs.insert("align".into(), json!("left"));

        let transform = Transform::to_blocks(
            &["core/paragraph"],
            map_attributes("core/paragraph", &[("content", "text")]),
        );
        let out = transform.apply(&attrs);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "core/paragraph");
        assert_eq!(out[0].attributes.get("text"), Some(&json!("Title")));
        assert!(out[0].attributes.get("align").is_none());
    }

    #[test]
    fn involves_checks_listed_types() {
        let transform = Transform::from_blocks(&["core/paragraph", "core/list"], |_| Vec::new());
        assert_eq!(transform.direction, TransformDirection::From);
        assert!(transform.involves("core/list"));
        assert!(!transform.involves("core/quote"));
        assert_eq!(
            format!("{transform:?}"),
            r#"Transform { direction: From, blocks: ["core/paragraph", "core/list"], .. }"#
        );
    }
}
