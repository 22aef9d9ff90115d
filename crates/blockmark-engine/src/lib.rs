pub mod attributes;
pub mod io;
pub mod library;
pub mod markup;
pub mod model;
pub mod parsing;
pub mod raw;
pub mod registry;
pub mod reusable;
pub mod serialize;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use attributes::{AttributeKind, AttributeSchema, AttributeSource, Attributes, Matcher, NodeProperty};
pub use io::{IoError, read_document};
pub use library::{core_registry, register_core_blocks};
pub use model::{
    AttributeIssue, BlockRecord, Document, InnerPart, block_class_names, create_block, is_valid_block,
    switch_to_block_type, validate_block,
};
pub use parsing::{parse, parse_document};
pub use raw::raw_handler;
pub use registry::{
    BehaviorHandle, BlockType, Category, Registry, RegistryError, Transform, TransformDirection, map_attributes,
};
pub use reusable::{
    EditSession, ReusableBlock, ReusableBlockUpdate, ReusableBlocks, convert_to_static, create_reusable_block,
};
pub use serialize::{block_content, default_class_name, random_anchor, serialize, serialize_attributes, serialize_block};
