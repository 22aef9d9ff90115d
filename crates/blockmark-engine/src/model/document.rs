use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{BlockRecord, InnerPart};

/// An ordered sequence of top-level blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub blocks: Vec<BlockRecord>,
}

impl From<Vec<BlockRecord>> for Document {
    fn from(blocks: Vec<BlockRecord>) -> Self {
        Self { blocks }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockRecord> {
        self.blocks.iter()
    }

    pub fn content_eq(&self, other: &Document) -> bool {
        self.blocks.len() == other.blocks.len()
            && self
                .blocks
                .iter()
                .zip(&other.blocks)
                .all(|(a, b)| a.content_eq(b))
    }

    /// Visits every block depth-first, parents before children.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a BlockRecord, usize)) {
        fn go<'a>(block: &'a BlockRecord, depth: usize, visit: &mut impl FnMut(&'a BlockRecord, usize)) {
            visit(block, depth);
            for child in block.children() {
                go(child, depth + 1, visit);
            }
        }
        for block in &self.blocks {
            go(block, 0, &mut visit);
        }
    }

    pub fn find_by_uid(&self, uid: Uuid) -> Option<&BlockRecord> {
        fn find(block: &BlockRecord, uid: Uuid) -> Option<&BlockRecord> {
            if block.uid == uid {
                return Some(block);
            }
            block.children().find_map(|child| find(child, uid))
        }
        self.blocks.iter().find_map(|b| find(b, uid))
    }

    pub fn find_by_uid_mut(&mut self, uid: Uuid) -> Option<&mut BlockRecord> {
        fn find(block: &mut BlockRecord, uid: Uuid) -> Option<&mut BlockRecord> {
            if block.uid == uid {
                return Some(block);
            }
            block.children_mut().find_map(|child| find(child, uid))
        }
        self.blocks.iter_mut().find_map(|b| find(b, uid))
    }

    /// Swaps the block with `uid` for `replacement`, wherever it is nested.
    ///
    /// Returns the block that was replaced.
    pub fn replace(&mut self, uid: Uuid, replacement: BlockRecord) -> Option<BlockRecord> {
        fn swap(parts: &mut [InnerPart], uid: Uuid, replacement: &mut Option<BlockRecord>) -> Option<BlockRecord> {
            for part in parts {
                if let InnerPart::Block(block) = part {
                    if block.uid == uid {
                        let new = replacement.take()?;
                        return Some(std::mem::replace(block, new));
                    }
                    if let Some(old) = swap(&mut block.inner, uid, replacement) {
                        return Some(old);
                    }
                }
            }
            None
        }

        let mut replacement = Some(replacement);
        for block in &mut self.blocks {
            if block.uid == uid {
                let new = replacement.take()?;
                return Some(std::mem::replace(block, new));
            }
            if let Some(old) = swap(&mut block.inner, uid, &mut replacement) {
                return Some(old);
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a BlockRecord;
    type IntoIter = std::slice::Iter<'a, BlockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> (Document, Uuid) {
        let leaf = BlockRecord::new("core/paragraph").with_markup("leaf");
        let uid = leaf.uid;
        let doc = Document::from(vec![
            BlockRecord::new("core/separator"),
            BlockRecord::new("my/group")
                .with_markup("<div>")
                .with_child(leaf)
                .with_markup("</div>"),
        ]);
        (doc, uid)
    }

    #[test]
    fn find_by_uid_reaches_nested_blocks() {
        let (doc, uid) = nested();
        assert_eq!(doc.find_by_uid(uid).map(|b| b.markup()), Some("leaf".to_string()));
        assert!(doc.find_by_uid(Uuid::new_v4()).is_none());
    }

    #[test]
    fn find_by_uid_mut_allows_edits() {
        let (mut doc, uid) = nested();
        if let Some(block) = doc.find_by_uid_mut(uid) {
            block.class_name = Some("edited".into());
        }
        assert_eq!(
            doc.find_by_uid(uid).and_then(|b| b.class_name.as_deref()),
            Some("edited")
        );
    }

    #[test]
    fn replace_swaps_nested_block() {
        let (mut doc, uid) = nested();
        let old = doc.replace(uid, BlockRecord::new("core/html").with_markup("<b>new</b>"));
        assert_eq!(old.map(|b| b.name), Some("core/paragraph".to_string()));
        let names: Vec<_> = doc.blocks[1].children().map(|b| b.name.clone()).collect();
        assert_eq!(names, vec!["core/html"]);
    }

    #[test]
    fn walk_reports_depth() {
        let (doc, _) = nested();
        let mut seen = Vec::new();
        doc.walk(|b, depth| seen.push((b.name.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("core/separator".to_string(), 0),
                ("my/group".to_string(), 0),
                ("core/paragraph".to_string(), 1),
            ]
        );
    }

    #[test]
    fn transparent_serde() {
        let doc = Document::from(vec![BlockRecord::new("core/separator")]);
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.is_array());
    }
}
