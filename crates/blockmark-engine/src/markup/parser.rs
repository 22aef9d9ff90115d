use crate::parsing::{cursor::Cursor, rope::span::Span};

use super::node::{Element, Fragment, Node};

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &str = "-->";

/// An element whose end tag has not been seen yet.
struct OpenElement {
    tag: String,
    attrs: Vec<(String, String)>,
    start: usize,
    inner_start: usize,
    children: Vec<Node>,
}

/// Parses a markup fragment into a node tree. Never fails.
///
/// Leniency rules: end tags close the nearest open element with the same name
/// (implicitly closing anything opened inside it), end tags with no open
/// counterpart are ignored, and elements still open at the end of input close
/// there. A `<` that does not begin a tag or comment is text.
pub fn parse_fragment(source: &str) -> Fragment {
    let mut cur = Cursor::new(source, 0);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();
    let mut text_start = cur.pos();

    fn flush_text(
        source: &str,
        stack: &mut [OpenElement],
        roots: &mut Vec<Node>,
        start: usize,
        end: usize,
    ) {
        if end > start {
            let span = Span::new(start, end);
            let text = html_escape::decode_html_entities(span.slice(source)).into_owned();
            attach(stack, roots, Node::Text { span, text });
        }
    }

    while !cur.eof() {
        if cur.peek() != Some(b'<') {
            cur.bump();
            continue;
        }

        let at = cur.pos();
        if cur.starts_with(COMMENT_OPEN) {
            flush_text(source, &mut stack, &mut roots, text_start, at);
            let end = cur
                .find(COMMENT_CLOSE)
                .map(|i| i + COMMENT_CLOSE.len())
                .unwrap_or(source.len());
            cur.bump_n(end - cur.i);
            attach(&mut stack, &mut roots, Node::Comment(Span::new(at, end)));
            text_start = cur.pos();
            continue;
        }

        if cur.peek_at(1) == Some(b'/') && cur.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic())
        {
            flush_text(source, &mut stack, &mut roots, text_start, at);
            cur.bump_n(2);
            let tag = cur.bump_while(is_tag_name_byte).to_ascii_lowercase();
            let end = cur.find(">").map(|i| i + 1).unwrap_or(source.len());
            cur.bump_n(end - cur.i);
            close_element(&mut stack, &mut roots, &tag, at, end);
            text_start = cur.pos();
            continue;
        }

        if cur.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            let saved = cur.clone();
            if let Some((tag, attrs, self_closing)) = parse_start_tag(&mut cur) {
                flush_text(source, &mut stack, &mut roots, text_start, at);
                let after_tag = cur.pos();

                if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
                    let el = Element {
                        tag,
                        attrs,
                        children: Vec::new(),
                        span: Span::new(at, after_tag),
                        inner: Span::new(after_tag, after_tag),
                    };
                    attach(&mut stack, &mut roots, Node::Element(el));
                } else if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let closer = format!("</{tag}");
                    let inner_end = loop {
                        if cur.eof() {
                            break cur.pos();
                        }
                        if cur.starts_with_ignore_case(closer.as_bytes()) {
                            break cur.pos();
                        }
                        cur.bump();
                    };
                    let end = cur.find(">").map(|i| i + 1).unwrap_or(source.len());
                    cur.bump_n(end - cur.i);
                    let mut children = Vec::new();
                    if inner_end > after_tag {
                        let span = Span::new(after_tag, inner_end);
                        children.push(Node::Text {
                            span,
                            text: span.slice(source).to_string(),
                        });
                    }
                    let el = Element {
                        tag,
                        attrs,
                        children,
                        span: Span::new(at, end),
                        inner: Span::new(after_tag, inner_end),
                    };
                    attach(&mut stack, &mut roots, Node::Element(el));
                } else {
                    stack.push(OpenElement {
                        tag,
                        attrs,
                        start: at,
                        inner_start: after_tag,
                        children: Vec::new(),
                    });
                }
                text_start = cur.pos();
                continue;
            }
            cur = saved;
        }

        // A stray `<` is ordinary text.
        cur.bump();
    }

    flush_text(source, &mut stack, &mut roots, text_start, cur.pos());
    let end = source.len();
    while let Some(open) = stack.pop() {
        let el = finish(open, end, end);
        attach(&mut stack, &mut roots, Node::Element(el));
    }

    Fragment::new(source.to_string(), roots)
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

fn is_attr_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
}

fn attach(stack: &mut [OpenElement], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn finish(open: OpenElement, inner_end: usize, end: usize) -> Element {
    Element {
        tag: open.tag,
        attrs: open.attrs,
        children: open.children,
        span: Span::new(open.start, end),
        inner: Span::new(open.inner_start, inner_end),
    }
}

/// Closes the nearest open `tag`, implicitly closing elements opened inside it.
fn close_element(
    stack: &mut Vec<OpenElement>,
    roots: &mut Vec<Node>,
    tag: &str,
    closer_start: usize,
    closer_end: usize,
) {
    let Some(pos) = stack.iter().rposition(|open| open.tag == tag) else {
        return;
    };
    while stack.len() > pos + 1 {
        if let Some(inner) = stack.pop() {
            let el = finish(inner, closer_start, closer_start);
            attach(stack, roots, Node::Element(el));
        }
    }
    if let Some(open) = stack.pop() {
        let el = finish(open, closer_start, closer_end);
        attach(stack, roots, Node::Element(el));
    }
}

/// Parses `<tag attr=value ...>` at the cursor. Returns `None` (cursor state
/// unspecified) when the tag is never terminated by `>`.
fn parse_start_tag(cur: &mut Cursor<'_>) -> Option<(String, Vec<(String, String)>, bool)> {
    cur.bump(); // <
    let tag = cur.bump_while(is_tag_name_byte).to_ascii_lowercase();
    let mut attrs = Vec::new();

    loop {
        cur.skip_whitespace();
        match cur.peek()? {
            b'>' => {
                cur.bump();
                return Some((tag, attrs, false));
            }
            b'/' if cur.peek_at(1) == Some(b'>') => {
                cur.bump_n(2);
                return Some((tag, attrs, true));
            }
            b'/' => {
                cur.bump();
            }
            b'<' => return None,
            _ => {
                let name = cur.bump_while(is_attr_name_byte).to_ascii_lowercase();
                if name.is_empty() {
                    // Unexpected quote; skip it so the loop makes progress.
                    cur.bump();
                    continue;
                }
                cur.skip_whitespace();
                let value = if cur.peek() == Some(b'=') {
                    cur.bump();
                    cur.skip_whitespace();
                    match cur.peek()? {
                        q @ (b'"' | b'\'') => {
                            cur.bump();
                            let raw = cur.bump_while(|b| b != q);
                            cur.bump()?;
                            raw
                        }
                        _ => cur.bump_while(|b| !b.is_ascii_whitespace() && b != b'>'),
                    }
                } else {
                    ""
                };
                attrs.push((name, html_escape::decode_html_entities(value).into_owned()));
            }
        }
    }
}
