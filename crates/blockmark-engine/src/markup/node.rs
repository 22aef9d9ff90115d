use crate::parsing::rope::span::Span;

use super::selector::Selector;

/// A node in a parsed markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data with entities already decoded.
    Text { span: Span, text: String },
    /// An HTML comment, `<!-- ... -->` included in the span.
    Comment(Span),
}

/// An element with its attributes and children.
///
/// `span` covers the whole element from `<` of the start tag to `>` of the end
/// tag; `inner` covers only the content between the tags. For elements that
/// were never closed both end where their parent (or the input) ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order, names lowercased, values decoded.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub span: Span,
    pub inner: Span,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated decoded text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// The verbatim markup between the start and end tags.
    pub fn inner_html<'s>(&self, source: &'s str) -> &'s str {
        self.inner.slice(source)
    }

    /// The verbatim markup of the whole element.
    pub fn outer_html<'s>(&self, source: &'s str) -> &'s str {
        self.span.slice(source)
    }

    /// The DOM `nodeName`: the tag name uppercased.
    pub fn node_name(&self) -> String {
        self.tag.to_ascii_uppercase()
    }

    /// First descendant matching `selector`, in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<&Element> {
        select(&self.children, selector, true).into_iter().next()
    }

    /// All descendants matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<&Element> {
        select(&self.children, selector, false)
    }
}

/// A parsed markup fragment: the owned source plus its top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    source: String,
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub(crate) fn new(source: String, nodes: Vec<Node>) -> Self {
        Self { source, nodes }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// The first top-level element, skipping text and comments.
    pub fn first_element(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn select_first(&self, selector: &Selector) -> Option<&Element> {
        select(&self.nodes, selector, true).into_iter().next()
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<&Element> {
        select(&self.nodes, selector, false)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text, .. } => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Comment(_) => {}
        }
    }
}

fn select<'n>(nodes: &'n [Node], selector: &Selector, first_only: bool) -> Vec<&'n Element> {
    let mut out = Vec::new();
    let mut ancestors = Vec::new();
    walk(nodes, selector, first_only, &mut ancestors, &mut out);
    out
}

fn walk<'n>(
    nodes: &'n [Node],
    selector: &Selector,
    first_only: bool,
    ancestors: &mut Vec<&'n Element>,
    out: &mut Vec<&'n Element>,
) {
    for node in nodes {
        if first_only && !out.is_empty() {
            return;
        }
        if let Node::Element(el) = node {
            if selector.matches(el, ancestors) {
                out.push(el);
                if first_only {
                    return;
                }
            }
            ancestors.push(el);
            walk(&el.children, selector, first_only, ancestors, out);
            ancestors.pop();
        }
    }
}
