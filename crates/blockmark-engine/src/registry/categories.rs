use serde::{Deserialize, Serialize};

/// A grouping for block types in insertion UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
}

impl Category {
    pub fn new(slug: &str, title: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
        }
    }
}

/// The categories every registry starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("common", "Common Blocks"),
        Category::new("formatting", "Formatting"),
        Category::new("layout", "Layout Elements"),
        Category::new("widgets", "Widgets"),
        Category::new("embed", "Embeds"),
        Category::new("reusable-blocks", "Reusable Blocks"),
    ]
}
