//! A small CSS selector subset for attribute sources.
//!
//! Supported: type selectors, `*`, `.class`, `#id`, `[attr]`, `[attr=value]`
//! (quoted or bare value), descendant and child (`>`) combinators, and comma
//! separated lists. A selector that fails to parse matches nothing.

use crate::parsing::cursor::Cursor;

use super::node::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

/// One comma-separated alternative, stored right to left: `subject` is the
/// compound the element itself must match, `ancestry` walks outward.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestry: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    pub fn parse(source: &str) -> Self {
        let alternatives = split_top_level(source)
            .into_iter()
            .filter_map(parse_complex)
            .collect::<Vec<_>>();
        if alternatives.is_empty() && !source.trim().is_empty() {
            log::debug!("selector {source:?} failed to parse; it will match nothing");
        }
        Self {
            source: source.to_string(),
            alternatives,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `el` matches, given its ancestors ordered outermost first.
    pub fn matches(&self, el: &Element, ancestors: &[&Element]) -> bool {
        self.alternatives.iter().any(|c| c.matches(el, ancestors))
    }
}

impl Complex {
    fn matches(&self, el: &Element, ancestors: &[&Element]) -> bool {
        self.subject.matches(el) && self.match_ancestry(0, ancestors)
    }

    fn match_ancestry(&self, idx: usize, ancestors: &[&Element]) -> bool {
        let Some((combinator, compound)) = self.ancestry.get(idx) else {
            return true;
        };
        match combinator {
            Combinator::Child => match ancestors.split_last() {
                Some((parent, above)) => {
                    compound.matches(parent) && self.match_ancestry(idx + 1, above)
                }
                None => false,
            },
            Combinator::Descendant => (0..ancestors.len())
                .rev()
                .any(|i| compound.matches(ancestors[i]) && self.match_ancestry(idx + 1, &ancestors[..i])),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && *tag != el.tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.id() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| el.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (el.attr(name), value) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

/// Splits on commas that are not inside an attribute bracket or quotes.
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn parse_complex(source: &str) -> Option<Complex> {
    let mut cur = Cursor::new(source.trim(), 0);
    let mut chain: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();

    loop {
        let compound = parse_compound(&mut cur)?;
        chain.push(compound);

        let had_space = cur.skip_whitespace() > 0;
        if cur.eof() {
            break;
        }
        if cur.peek() == Some(b'>') {
            cur.bump();
            cur.skip_whitespace();
            combinators.push(Combinator::Child);
        } else if had_space {
            combinators.push(Combinator::Descendant);
        } else {
            return None;
        }
    }

    let subject = chain.pop()?;
    let ancestry = combinators
        .into_iter()
        .rev()
        .zip(chain.into_iter().rev())
        .collect();
    Some(Complex { subject, ancestry })
}

fn parse_compound(cur: &mut Cursor<'_>) -> Option<Compound> {
    let mut compound = Compound::default();

    if cur.peek() == Some(b'*') {
        cur.bump();
        compound.tag = Some("*".to_string());
    } else {
        let tag = cur.bump_while(is_ident_byte);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    loop {
        match cur.peek() {
            Some(b'.') => {
                cur.bump();
                let class = cur.bump_while(is_ident_byte);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class.to_string());
            }
            Some(b'#') => {
                cur.bump();
                let id = cur.bump_while(is_ident_byte);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id.to_string());
            }
            Some(b'[') => {
                cur.bump();
                compound.attrs.push(parse_attr_condition(cur)?);
            }
            _ => break,
        }
    }

    if compound.is_empty() {
        return None;
    }
    Some(compound)
}

fn parse_attr_condition(cur: &mut Cursor<'_>) -> Option<(String, Option<String>)> {
    cur.skip_whitespace();
    let name = cur.bump_while(is_ident_byte).to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    cur.skip_whitespace();
    let value = if cur.peek() == Some(b'=') {
        cur.bump();
        cur.skip_whitespace();
        match cur.peek() {
            Some(q @ (b'"' | b'\'')) => {
                cur.bump();
                let v = cur.bump_while(|b| b != q).to_string();
                cur.bump()?;
                Some(v)
            }
            _ => Some(cur.bump_while(is_ident_byte).to_string()),
        }
    } else {
        None
    };
    cur.skip_whitespace();
    if cur.bump()? != b']' {
        return None;
    }
    Some((name, value))
}
