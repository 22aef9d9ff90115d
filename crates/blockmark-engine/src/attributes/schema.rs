use serde_json::Value;

use crate::markup::Selector;

/// The declared JSON type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Where an attribute's value comes from when a block is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSource {
    /// Stored in the block delimiter's JSON blob. When the blob omits it the
    /// declared default applies.
    Delimiter,
    /// Extracted structurally from the block's inner markup.
    Extract(Matcher),
    /// The block's whole inner markup, verbatim.
    Raw,
}

/// A structural extraction rule over a markup scope.
///
/// A `None` selector means the scope itself: the whole fragment at the top
/// level, or the matched element inside a [`Matcher::Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Decoded text content of the first match.
    Text { selector: Option<Selector> },
    /// Verbatim inner markup of the first match.
    Html { selector: Option<Selector> },
    /// Value of a named attribute on the first match.
    Attribute {
        selector: Option<Selector>,
        attribute: String,
    },
    /// A DOM-style property of the first match.
    Property {
        selector: Option<Selector>,
        property: NodeProperty,
    },
    /// Every match in document order, each mapped through `item`.
    Query { selector: Selector, item: QueryItem },
}

/// What each element matched by a [`Matcher::Query`] turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryItem {
    /// A single value per match.
    Value(Box<Matcher>),
    /// An object per match; fields whose matcher finds nothing are left out.
    Fields(Vec<(String, Matcher)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeProperty {
    NodeName,
    TextContent,
    InnerHtml,
    OuterHtml,
    Id,
    ClassName,
}

fn selector(s: &str) -> Option<Selector> {
    if s.trim().is_empty() {
        None
    } else {
        Some(Selector::parse(s))
    }
}

impl Matcher {
    /// Text of the first element matching `sel`; `""` selects the scope.
    pub fn text(sel: &str) -> Self {
        Matcher::Text {
            selector: selector(sel),
        }
    }

    pub fn html(sel: &str) -> Self {
        Matcher::Html {
            selector: selector(sel),
        }
    }

    pub fn attribute(sel: &str, attribute: &str) -> Self {
        Matcher::Attribute {
            selector: selector(sel),
            attribute: attribute.to_ascii_lowercase(),
        }
    }

    pub fn property(sel: &str, property: NodeProperty) -> Self {
        Matcher::Property {
            selector: selector(sel),
            property,
        }
    }

    pub fn query(sel: &str, item: Matcher) -> Self {
        Matcher::Query {
            selector: Selector::parse(sel),
            item: QueryItem::Value(Box::new(item)),
        }
    }

    pub fn query_fields(sel: &str, fields: Vec<(&str, Matcher)>) -> Self {
        Matcher::Query {
            selector: Selector::parse(sel),
            item: QueryItem::Fields(
                fields
                    .into_iter()
                    .map(|(name, m)| (name.to_string(), m))
                    .collect(),
            ),
        }
    }
}

/// Schema entry for one attribute of a block type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub kind: AttributeKind,
    pub default: Option<Value>,
    pub source: AttributeSource,
}

impl AttributeSchema {
    /// A delimiter-sourced attribute with no default.
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            default: None,
            source: AttributeSource::Delimiter,
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeKind::String)
    }

    pub fn number() -> Self {
        Self::new(AttributeKind::Number)
    }

    pub fn integer() -> Self {
        Self::new(AttributeKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(AttributeKind::Boolean)
    }

    pub fn array() -> Self {
        Self::new(AttributeKind::Array)
    }

    pub fn object() -> Self {
        Self::new(AttributeKind::Object)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn extract(mut self, matcher: Matcher) -> Self {
        self.source = AttributeSource::Extract(matcher);
        self
    }

    pub fn raw(mut self) -> Self {
        self.source = AttributeSource::Raw;
        self
    }

    /// Whether the value can be recovered from inner markup alone.
    pub fn is_sourced(&self) -> bool {
        !matches!(self.source, AttributeSource::Delimiter)
    }
}
