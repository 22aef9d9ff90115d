use serde_json::{Map, Value};

use crate::markup::{Element, Fragment, Selector, parse_fragment};
use crate::registry::BlockType;

use super::{
    Attributes,
    schema::{AttributeSchema, AttributeSource, Matcher, NodeProperty, QueryItem},
};

/// The region a matcher runs against: a whole fragment or one element of it.
#[derive(Clone, Copy)]
enum Scope<'a> {
    Fragment(&'a Fragment),
    Element(&'a Element, &'a str),
}

impl<'a> Scope<'a> {
    fn source(self) -> &'a str {
        match self {
            Scope::Fragment(f) => f.source(),
            Scope::Element(_, source) => source,
        }
    }

    fn select_first(self, selector: &Selector) -> Option<&'a Element> {
        match self {
            Scope::Fragment(f) => f.select_first(selector),
            Scope::Element(el, _) => el.select_first(selector),
        }
    }

    fn select_all(self, selector: &Selector) -> Vec<&'a Element> {
        match self {
            Scope::Fragment(f) => f.select_all(selector),
            Scope::Element(el, _) => el.select_all(selector),
        }
    }

    /// Narrows to the first match of `selector`, or keeps the scope for `None`.
    fn narrow(self, selector: Option<&Selector>) -> Option<Scope<'a>> {
        match selector {
            None => Some(self),
            Some(sel) => self
                .select_first(sel)
                .map(|el| Scope::Element(el, self.source())),
        }
    }

    fn text(self) -> String {
        match self {
            Scope::Fragment(f) => f.text_content(),
            Scope::Element(el, _) => el.text_content(),
        }
    }

    fn inner_html(self) -> &'a str {
        match self {
            Scope::Fragment(f) => f.source(),
            Scope::Element(el, source) => el.inner_html(source),
        }
    }

    fn element(self) -> Option<&'a Element> {
        match self {
            Scope::Fragment(_) => None,
            Scope::Element(el, _) => Some(el),
        }
    }
}

fn run_matcher(matcher: &Matcher, scope: Scope<'_>) -> Option<Value> {
    match matcher {
        Matcher::Text { selector } => scope
            .narrow(selector.as_ref())
            .map(|s| Value::String(s.text())),
        Matcher::Html { selector } => scope
            .narrow(selector.as_ref())
            .map(|s| Value::String(s.inner_html().to_string())),
        Matcher::Attribute {
            selector,
            attribute,
        } => scope
            .narrow(selector.as_ref())
            .and_then(Scope::element)
            .and_then(|el| el.attr(attribute))
            .map(|v| Value::String(v.to_string())),
        Matcher::Property { selector, property } => {
            let target = scope.narrow(selector.as_ref())?;
            property_of(target, *property)
        }
        Matcher::Query { selector, item } => {
            let source = scope.source();
            let values = scope
                .select_all(selector)
                .into_iter()
                .filter_map(|el| query_item(item, Scope::Element(el, source)))
                .collect();
            Some(Value::Array(values))
        }
    }
}

fn query_item(item: &QueryItem, scope: Scope<'_>) -> Option<Value> {
    match item {
        QueryItem::Value(matcher) => run_matcher(matcher, scope),
        QueryItem::Fields(fields) => {
            let mut obj = Map::new();
            for (name, matcher) in fields {
                if let Some(v) = run_matcher(matcher, scope) {
                    obj.insert(name.clone(), v);
                }
            }
            Some(Value::Object(obj))
        }
    }
}

fn property_of(scope: Scope<'_>, property: NodeProperty) -> Option<Value> {
    let value = match (property, scope) {
        (NodeProperty::TextContent, s) => s.text(),
        (NodeProperty::InnerHtml, s) => s.inner_html().to_string(),
        (NodeProperty::OuterHtml, Scope::Fragment(f)) => f.source().to_string(),
        (NodeProperty::OuterHtml, Scope::Element(el, source)) => el.outer_html(source).to_string(),
        (NodeProperty::NodeName, s) => s.element()?.node_name(),
        (NodeProperty::Id, s) => s.element()?.id()?.to_string(),
        (NodeProperty::ClassName, s) => s.element()?.attr("class")?.to_string(),
    };
    Some(Value::String(value))
}

/// Runs an attribute's source rule against `fragment`, ignoring any explicit
/// value and the default. `Delimiter` attributes never extract anything.
pub fn extract(schema: &AttributeSchema, fragment: &Fragment) -> Option<Value> {
    let raw = match &schema.source {
        AttributeSource::Delimiter => return None,
        AttributeSource::Extract(matcher) => run_matcher(matcher, Scope::Fragment(fragment))?,
        AttributeSource::Raw => Value::String(fragment.source().to_string()),
    };
    schema.kind.coerce(raw)
}

/// Resolves one attribute value.
///
/// An explicit value that coerces to the declared kind wins; otherwise the
/// source rule runs; otherwise the default applies. `None` means the
/// attribute is absent, which is not an error.
///
/// For a sourced attribute an explicit value equal to the default counts as
/// absent. Serialized blobs never carry defaults, so the markup decides.
pub fn resolve_attribute(
    schema: &AttributeSchema,
    fragment: &Fragment,
    explicit: Option<&Value>,
) -> Option<Value> {
    if let Some(value) = explicit {
        match schema.kind.coerce(value.clone()) {
            Some(v) if schema.is_sourced() && schema.default.as_ref() == Some(&v) => {
                log::debug!("explicit value {v} equals the default; extracting instead");
            }
            Some(v) => return Some(v),
            None => log::debug!(
                "explicit value {value} does not fit {:?}; falling back",
                schema.kind
            ),
        }
    }
    extract(schema, fragment).or_else(|| schema.default.clone())
}

/// Resolves every attribute of `block_type` for a block whose inner markup is
/// `markup` and whose delimiter carried `explicit`.
///
/// Keys in `explicit` that the schema does not declare are carried over as-is.
pub fn resolve_attributes(block_type: &BlockType, markup: &str, explicit: &Attributes) -> Attributes {
    let fragment = parse_fragment(markup);
    resolve_with_fragment(block_type, &fragment, explicit)
}

pub(crate) fn resolve_with_fragment(
    block_type: &BlockType,
    fragment: &Fragment,
    explicit: &Attributes,
) -> Attributes {
    let mut out = Attributes::new();
    for (name, schema) in &block_type.attributes {
        if let Some(v) = resolve_attribute(schema, fragment, explicit.get(name)) {
            out.insert(name.clone(), v);
        }
    }
    for (name, value) in explicit {
        if !block_type.attributes.contains_key(name) {
            out.insert(name.clone(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolve(schema: AttributeSchema, markup: &str, explicit: Option<Value>) -> Option<Value> {
        resolve_attribute(&schema, &parse_fragment(markup), explicit.as_ref())
    }

    #[test]
    fn delimiter_attribute_uses_default_without_blob() {
        let schema = AttributeSchema::string().with_default("left");
        assert_eq!(resolve(schema, "<p>x</p>", None), Some(json!("left")));
    }

    #[test]
    fn delimiter_attribute_without_default_is_absent() {
        assert_eq!(resolve(AttributeSchema::string(), "<p>x</p>", None), None);
    }

    #[test]
    fn text_of_whole_fragment() {
        let schema = AttributeSchema::string().extract(Matcher::text(""));
        assert_eq!(resolve(schema, "Hello world", None), Some(json!("Hello world")));
    }

    #[test]
    fn text_of_selected_element() {
        let schema = AttributeSchema::string().extract(Matcher::text("h2"));
        assert_eq!(
            resolve(schema, "<div><h2>Title &amp; more</h2></div>", None),
            Some(json!("Title & more"))
        );
    }

    #[test]
    fn html_of_selected_element() {
        let schema = AttributeSchema::string().extract(Matcher::html("ul"));
        assert_eq!(
            resolve(schema, "<ul><li>a</li><li>b</li></ul>", None),
            Some(json!("<li>a</li><li>b</li>"))
        );
    }

    #[test]
    fn attribute_of_selected_element() {
        let schema = AttributeSchema::string().extract(Matcher::attribute("img", "src"));
        assert_eq!(
            resolve(schema, r#"<figure><img src="a.png" alt=""></figure>"#, None),
            Some(json!("a.png"))
        );
    }

    #[test]
    fn property_node_name_is_uppercase() {
        let schema = AttributeSchema::string()
            .with_default("H2")
            .extract(Matcher::property("h1,h2,h3", NodeProperty::NodeName));
        assert_eq!(resolve(schema.clone(), "<h3>x</h3>", None), Some(json!("H3")));
        assert_eq!(resolve(schema, "plain", None), Some(json!("H2")));
    }

    #[test]
    fn query_collects_matches_in_order() {
        let schema = AttributeSchema::array().extract(Matcher::query("li", Matcher::text("")));
        assert_eq!(
            resolve(schema, "<ul><li>one</li><li>two</li></ul>", None),
            Some(json!(["one", "two"]))
        );
    }

    #[test]
    fn query_with_fields_builds_objects() {
        let schema = AttributeSchema::array().extract(Matcher::query_fields(
            "img",
            vec![
                ("url", Matcher::attribute("", "src")),
                ("alt", Matcher::attribute("", "alt")),
            ],
        ));
        assert_eq!(
            resolve(schema, r#"<img src="a.png" alt="A"><img src="b.png">"#, None),
            Some(json!([{"url": "a.png", "alt": "A"}, {"url": "b.png"}]))
        );
    }

    #[test]
    fn raw_source_passes_markup_through() {
        let schema = AttributeSchema::string().raw();
        assert_eq!(
            resolve(schema, "<b>keep</b> this", None),
            Some(json!("<b>keep</b> this"))
        );
    }

    #[test]
    fn explicit_value_wins_over_extraction() {
        let schema = AttributeSchema::string().extract(Matcher::text("p"));
        assert_eq!(
            resolve(schema, "<p>from markup</p>", Some(json!("explicit"))),
            Some(json!("explicit"))
        );
    }

    #[test]
    fn explicit_default_on_sourced_attribute_defers_to_markup() {
        let schema = AttributeSchema::string()
            .with_default("H2")
            .extract(Matcher::property("h1,h2,h3", NodeProperty::NodeName));
        assert_eq!(
            resolve(schema.clone(), "<h3>T</h3>", Some(json!("H2"))),
            Some(json!("H3"))
        );
        assert_eq!(resolve(schema, "plain", Some(json!("H2"))), Some(json!("H2")));
    }

    #[test]
    fn explicit_default_on_delimiter_attribute_is_kept() {
        let schema = AttributeSchema::string().with_default("left");
        assert_eq!(resolve(schema, "", Some(json!("left"))), Some(json!("left")));
    }

    #[test]
    fn explicit_value_of_wrong_kind_falls_back() {
        let schema = AttributeSchema::integer().with_default(1);
        assert_eq!(resolve(schema, "", Some(json!({"not": "int"}))), Some(json!(1)));
    }

    #[test]
    fn missing_selector_match_uses_default() {
        let schema = AttributeSchema::string()
            .with_default("")
            .extract(Matcher::text("cite"));
        assert_eq!(resolve(schema, "<p>no citation</p>", None), Some(json!("")));
    }

    #[test]
    fn extracted_text_is_coerced_to_kind() {
        let schema = AttributeSchema::integer().extract(Matcher::attribute("ol", "start"));
        assert_eq!(resolve(schema, r#"<ol start="3"></ol>"#, None), Some(json!(3)));
    }

    #[test]
    fn resolve_attributes_preserves_unknown_keys() {
        let block_type = BlockType::new("test/thing", "Thing", "common")
            .with_attribute("title", AttributeSchema::string().extract(Matcher::text("h2")));
        let mut explicit = Attributes::new();
        explicit.insert("legacy".into(), json!(true));

        let attrs = resolve_attributes(&block_type, "<h2>Hi</h2>", &explicit);
        assert_eq!(attrs.get("title"), Some(&json!("Hi")));
        assert_eq!(attrs.get("legacy"), Some(&json!(true)));
    }

    #[test]
    fn resolver_does_not_touch_the_fragment() {
        let fragment = parse_fragment("<p>same</p>");
        let before = fragment.clone();
        let schema = AttributeSchema::string().extract(Matcher::text("p"));
        let _ = resolve_attribute(&schema, &fragment, None);
        assert_eq!(fragment, before);
    }
}
