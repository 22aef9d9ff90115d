use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::attributes::AttributeSchema;

use super::transform::Transform;

/// Opaque reference to the UI's edit/save behavior for a block type.
///
/// The engine stores and hands back the handle; it never calls into it.
#[derive(Clone)]
pub struct BehaviorHandle(Arc<dyn Any + Send + Sync>);

impl BehaviorHandle {
    pub fn new<T: Any + Send + Sync>(behavior: T) -> Self {
        Self(Arc::new(behavior))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether both handles point at the same behavior value.
    pub fn same_as(&self, other: &BehaviorHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for BehaviorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BehaviorHandle(..)")
    }
}

/// Definition of one kind of block: its schema, category and capabilities.
#[derive(Debug, Clone)]
pub struct BlockType {
    /// `namespace/type`, e.g. `core/paragraph`.
    pub name: String,
    pub title: String,
    /// Category slug, e.g. `common`.
    pub category: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// Capability flags such as `className` or `anchor`. Values may nest.
    pub supports: Map<String, Value>,
    /// Private types are left out of insertion listings but still parse and
    /// serialize normally.
    pub is_private: bool,
    pub behavior: Option<BehaviorHandle>,
    pub transforms: Vec<Transform>,
}

impl BlockType {
    pub fn new(name: &str, title: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            description: None,
            keywords: Vec::new(),
            attributes: BTreeMap::new(),
            supports: Map::new(),
            is_private: false,
            behavior: None,
            transforms: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, schema: AttributeSchema) -> Self {
        self.attributes.insert(name.to_string(), schema);
        self
    }

    pub fn with_support(mut self, flag: &str, value: impl Into<Value>) -> Self {
        self.supports.insert(flag.to_string(), value.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorHandle) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    /// Looks up a support flag by dotted path (`"color.background"`).
    ///
    /// Returns `fallback` when the path is not set. A set value counts by JSON
    /// truthiness: `null`, `false`, `0` and `""` are false, containers true.
    pub fn has_support(&self, flag: &str, fallback: bool) -> bool {
        let mut parts = flag.split('.');
        let Some(first) = parts.next() else {
            return fallback;
        };
        let mut value = match self.supports.get(first) {
            Some(v) => v,
            None => return fallback,
        };
        for part in parts {
            match value.get(part) {
                Some(v) => value = v,
                None => return fallback,
            }
        }
        truthy(value)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn has_support_uses_fallback_when_unset() {
        let t = BlockType::new("core/x", "X", "common");
        assert!(t.has_support("className", true));
        assert!(!t.has_support("anchor", false));
    }

    #[test]
    fn has_support_reads_booleans() {
        let t = BlockType::new("core/x", "X", "common")
            .with_support("className", false)
            .with_support("anchor", true);
        assert!(!t.has_support("className", true));
        assert!(t.has_support("anchor", false));
    }

    #[test]
    fn has_support_follows_dotted_paths() {
        let t = BlockType::new("core/x", "X", "common")
            .with_support("color", json!({"background": true, "text": false}));
        assert!(t.has_support("color", false));
        assert!(t.has_support("color.background", false));
        assert!(!t.has_support("color.text", true));
        assert!(t.has_support("color.gradient", true));
    }

    #[test]
    fn behavior_handle_is_opaque_but_recoverable() {
        struct Edit(&'static str);
        let handle = BehaviorHandle::new(Edit("paragraph-edit"));
        let t = BlockType::new("core/x", "X", "common").with_behavior(handle.clone());
        let stored = t.behavior.as_ref().and_then(|b| b.downcast_ref::<Edit>());
        assert_eq!(stored.map(|e| e.0), Some("paragraph-edit"));
        assert!(t.behavior.as_ref().is_some_and(|b| b.same_as(&handle)));
    }
}
