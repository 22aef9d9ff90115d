//! # Block Type Registry
//!
//! Holds every block type the engine knows about, keyed by `namespace/type`
//! name, plus two optional designated names:
//!
//! - the **default block**, used when free text is converted into blocks
//! - the **unknown-type handler**, which receives content whose type is not
//!   registered
//!
//! A designated name always refers to a registered type. Unregistering a type
//! clears any designation that pointed at it.
//!
//! Registries are plain values owned by the caller. Type definitions are
//! immutable once registered and are shared out as `Arc<BlockType>`.

pub mod block_type;
pub mod categories;
pub mod transform;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use thiserror::Error;

pub use block_type::{BehaviorHandle, BlockType};
pub use categories::{Category, default_categories};
pub use transform::{Transform, TransformDirection, map_attributes};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("block type {0:?} is already registered")]
    DuplicateType(String),
    #[error("invalid block type definition {name:?}: {reason}")]
    InvalidDefinition { name: String, reason: String },
    #[error("block type {0:?} is not registered")]
    UnknownType(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9-]*/[a-z][a-z0-9-]*$").expect("Invalid block name regex")
    })
}

/// Whether `name` has the `namespace/type` shape block names require.
pub fn is_valid_block_name(name: &str) -> bool {
    name_regex().is_match(name)
}

#[derive(Debug, Clone)]
pub struct Registry {
    types: HashMap<String, Arc<BlockType>>,
    order: Vec<String>,
    categories: Vec<Category>,
    default_block: Option<String>,
    unknown_handler: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry with the default category list.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            order: Vec::new(),
            categories: default_categories(),
            default_block: None,
            unknown_handler: None,
        }
    }

    pub fn register(&mut self, definition: BlockType) -> Result<Arc<BlockType>> {
        let name = definition.name.clone();
        if !is_valid_block_name(&name) {
            return Err(RegistryError::InvalidDefinition {
                name,
                reason: "name must look like namespace/type in lowercase".into(),
            });
        }
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        if definition.title.trim().is_empty() {
            return Err(RegistryError::InvalidDefinition {
                name,
                reason: "title is required".into(),
            });
        }
        if !self.categories.iter().any(|c| c.slug == definition.category) {
            return Err(RegistryError::InvalidDefinition {
                reason: format!("unknown category {:?}", definition.category),
                name,
            });
        }
        for (attr, schema) in &definition.attributes {
            if let Some(default) = &schema.default
                && !schema.kind.accepts(default)
            {
                return Err(RegistryError::InvalidDefinition {
                    reason: format!("default for attribute {attr:?} is not a {:?}", schema.kind),
                    name,
                });
            }
        }

        let definition = Arc::new(definition);
        self.types.insert(name.clone(), definition.clone());
        self.order.push(name.clone());
        log::debug!("registered block type {name}");
        Ok(definition)
    }

    /// Removes a type and returns its definition.
    pub fn unregister(&mut self, name: &str) -> Result<Arc<BlockType>> {
        let Some(removed) = self.types.remove(name) else {
            return Err(RegistryError::UnknownType(name.to_string()));
        };
        self.order.retain(|n| n != name);
        if self.default_block.as_deref() == Some(name) {
            log::info!("default block {name} unregistered; clearing designation");
            self.default_block = None;
        }
        if self.unknown_handler.as_deref() == Some(name) {
            log::info!("unknown-type handler {name} unregistered; clearing designation");
            self.unknown_handler = None;
        }
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Option<Arc<BlockType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Snapshot of all registered types in registration order.
    pub fn list(&self) -> Vec<Arc<BlockType>> {
        self.order
            .iter()
            .filter_map(|n| self.types.get(n).cloned())
            .collect()
    }

    /// Types offered for insertion: everything not marked private.
    pub fn insertable(&self) -> Vec<Arc<BlockType>> {
        self.list().into_iter().filter(|t| !t.is_private).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn set_default_block_name(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(RegistryError::UnknownType(name.to_string()));
        }
        log::info!("default block set to {name}");
        self.default_block = Some(name.to_string());
        Ok(())
    }

    pub fn default_block_name(&self) -> Option<&str> {
        self.default_block.as_deref()
    }

    pub fn set_unknown_type_handler_name(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(RegistryError::UnknownType(name.to_string()));
        }
        log::info!("unknown-type handler set to {name}");
        self.unknown_handler = Some(name.to_string());
        Ok(())
    }

    pub fn unknown_type_handler_name(&self) -> Option<&str> {
        self.unknown_handler.as_deref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Adds a category, or retitles it if the slug already exists.
    pub fn add_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.slug == category.slug) {
            Some(existing) => existing.title = category.title,
            None => self.categories.push(category),
        }
    }
}
