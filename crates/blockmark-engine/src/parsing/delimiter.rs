use serde_json::Value;

use crate::attributes::Attributes;
use crate::registry::is_valid_block_name;

use super::{cursor::Cursor, rope::Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    /// `<!-- wp:name {..} -->`
    Opener,
    /// `<!-- wp:name {..} /-->`
    Void,
    /// `<!-- /wp:name -->`
    Closer,
}

/// A recognized block delimiter comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Delimiter {
    pub kind: DelimiterKind,
    /// Fully qualified name, `core/` added when the source omitted a namespace.
    pub name: String,
    pub attrs: Attributes,
    pub span: Span,
}

/// Qualifies a delimiter name: `paragraph` becomes `core/paragraph`.
pub fn qualify_name(raw: &str) -> String {
    if raw.contains('/') {
        raw.to_string()
    } else {
        format!("core/{raw}")
    }
}

/// Tries to read a block delimiter starting at byte `start` of `src`, which
/// must point at `<!--`.
///
/// Returns `None` for ordinary comments and for malformed delimiters. The
/// latter are logged since they usually mean hand-edited markup.
pub fn parse_delimiter(src: &str, start: usize) -> Option<Delimiter> {
    let mut cur = Cursor::new(src.get(start..)?, start);
    if !cur.starts_with(b"<!--") {
        return None;
    }
    cur.bump_n(4);
    cur.skip_whitespace();

    let closer = cur.peek() == Some(b'/');
    if closer {
        cur.bump();
    }
    if !cur.starts_with(b"wp:") {
        return None;
    }
    cur.bump_n(3);

    let malformed = |reason: &str| {
        let head: String = src[start..].chars().take(60).collect();
        log::warn!("malformed block delimiter at byte {start} ({reason}): {head:?}");
        None
    };

    let name = read_name(&mut cur);
    let name = qualify_name(name);
    if !is_valid_block_name(&name) {
        return malformed("bad block name");
    }
    cur.skip_whitespace();

    if closer {
        if !cur.starts_with(b"-->") {
            return malformed("closer not terminated");
        }
        cur.bump_n(3);
        return Some(Delimiter {
            kind: DelimiterKind::Closer,
            name,
            attrs: Attributes::new(),
            span: Span::new(start, cur.pos()),
        });
    }

    if cur.starts_with(b"/-->") {
        cur.bump_n(4);
        return Some(bare(DelimiterKind::Void, name, start, cur.pos()));
    }
    if cur.starts_with(b"-->") {
        cur.bump_n(3);
        return Some(bare(DelimiterKind::Opener, name, start, cur.pos()));
    }
    if cur.peek() != Some(b'{') {
        return malformed("unexpected text after name");
    }

    let Some(end) = cur.find("-->") else {
        return malformed("never terminated");
    };
    let body = cur.s[cur.i..end].trim_end();
    let (kind, blob) = match body.strip_suffix('/') {
        Some(blob) => (DelimiterKind::Void, blob.trim_end()),
        None => (DelimiterKind::Opener, body),
    };
    let attrs = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return malformed("attribute blob is not an object"),
        Err(_) => return malformed("attribute blob is not valid JSON"),
    };
    cur.i = end + 3;
    Some(Delimiter {
        kind,
        name,
        attrs,
        span: Span::new(start, cur.pos()),
    })
}

fn bare(kind: DelimiterKind, name: String, start: usize, end: usize) -> Delimiter {
    Delimiter {
        kind,
        name,
        attrs: Attributes::new(),
        span: Span::new(start, end),
    }
}

/// Reads `segment` or `segment/segment`. A `/` only joins the name when a
/// letter follows, so `name/-->` still reads as a self-closing marker.
fn read_name<'a>(cur: &mut Cursor<'a>) -> &'a str {
    let from = cur.i;
    let segment = |b: u8| b.is_ascii_alphanumeric() || b == b'-' || b == b'_';
    cur.bump_while(segment);
    if cur.peek() == Some(b'/') && cur.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) {
        cur.bump();
        cur.bump_while(segment);
    }
    cur.s.get(from..cur.i).unwrap_or("")
}
