use std::ops::Range;

use pulldown_cmark::{Event, Parser, Tag};

/// What a top-level chunk of raw content looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Paragraph,
    Heading,
    List,
    Quote,
    Code,
    Separator,
    Html,
}

impl ChunkKind {
    /// The block type this kind of chunk maps to when it is registered.
    pub fn block_name(self) -> &'static str {
        match self {
            ChunkKind::Paragraph => "core/paragraph",
            ChunkKind::Heading => "core/heading",
            ChunkKind::List => "core/list",
            ChunkKind::Quote => "core/quote",
            ChunkKind::Code => "core/code",
            ChunkKind::Separator => "core/separator",
            ChunkKind::Html => "core/html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    /// Byte range in the raw input.
    pub range: Range<usize>,
    /// The chunk came from an HTML block rather than markdown syntax.
    pub is_html: bool,
}

/// Splits raw content at top-level markdown block boundaries.
///
/// Text between blocks that the markdown parser emits nothing for (link
/// reference definitions and the like) becomes a paragraph chunk when it is
/// not blank.
pub fn chunks(text: &str) -> Vec<Chunk> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<(ChunkKind, bool, usize)> = None;
    let mut covered = 0;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    push_gap(text, covered, range.start, &mut out);
                    let start = range.start;
                    open = Some(match tag {
                        Tag::HtmlBlock => (classify_html(&text[range.clone()]), true, start),
                        other => (kind_of(&other), false, start),
                    });
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0
                    && let Some((kind, is_html, start)) = open.take()
                {
                    let end = range.end.max(start);
                    out.push(Chunk {
                        kind,
                        range: start..end,
                        is_html,
                    });
                    covered = end;
                }
            }
            Event::Rule if depth == 0 => {
                push_gap(text, covered, range.start, &mut out);
                out.push(Chunk {
                    kind: ChunkKind::Separator,
                    range: range.clone(),
                    is_html: false,
                });
                covered = range.end;
            }
            _ => {}
        }
    }
    push_gap(text, covered, text.len(), &mut out);
    out
}

fn push_gap(text: &str, from: usize, to: usize, out: &mut Vec<Chunk>) {
    if from < to && text.get(from..to).is_some_and(|gap| !gap.trim().is_empty()) {
        out.push(Chunk {
            kind: ChunkKind::Paragraph,
            range: from..to,
            is_html: false,
        });
    }
}

fn kind_of(tag: &Tag<'_>) -> ChunkKind {
    match tag {
        Tag::Heading { .. } => ChunkKind::Heading,
        Tag::List(_) => ChunkKind::List,
        Tag::BlockQuote(_) => ChunkKind::Quote,
        Tag::CodeBlock(_) => ChunkKind::Code,
        _ => ChunkKind::Paragraph,
    }
}

/// Classifies an HTML chunk by its leading tag.
pub fn classify_html(html: &str) -> ChunkKind {
    let trimmed = html.trim_start();
    let Some(rest) = trimmed.strip_prefix('<') else {
        return ChunkKind::Html;
    };
    let tag: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    match tag.as_str() {
        "p" => ChunkKind::Paragraph,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => ChunkKind::Heading,
        "ul" | "ol" => ChunkKind::List,
        "blockquote" => ChunkKind::Quote,
        "pre" => ChunkKind::Code,
        "hr" => ChunkKind::Separator,
        _ => ChunkKind::Html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(text: &str) -> Vec<ChunkKind> {
        chunks(text).into_iter().map(|c| c.kind).collect()
    }

    #[test]
    fn markdown_blocks_are_chunked_in_order() {
        let text = "# Title\n\nSome text.\n\n- a\n- b\n\n> quoted\n\n```\ncode\n```\n\n---\n";
        assert_eq!(
            kinds(text),
            vec![
                ChunkKind::Heading,
                ChunkKind::Paragraph,
                ChunkKind::List,
                ChunkKind::Quote,
                ChunkKind::Code,
                ChunkKind::Separator,
            ]
        );
    }

    #[test]
    fn chunk_ranges_slice_the_source() {
        let text = "Hello world\n\n## Next\n";
        let found = chunks(text);
        assert_eq!(text[found[0].range.clone()].trim(), "Hello world");
        assert_eq!(text[found[1].range.clone()].trim(), "## Next");
    }

    #[test]
    fn html_blocks_are_classified_by_leading_tag() {
        let found = chunks("<ul>\n<li>a</li>\n</ul>\n\n<div>box</div>\n");
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].kind, found[0].is_html), (ChunkKind::List, true));
        assert_eq!((found[1].kind, found[1].is_html), (ChunkKind::Html, true));
    }

    #[test]
    fn blank_input_has_no_chunks() {
        assert!(chunks("  \n\n ").is_empty());
    }

    #[rstest]
    #[case("<p>x</p>", ChunkKind::Paragraph)]
    #[case("<H3>x</H3>", ChunkKind::Heading)]
    #[case("<ol><li>x</li></ol>", ChunkKind::List)]
    #[case("<blockquote>x</blockquote>", ChunkKind::Quote)]
    #[case("<pre>x</pre>", ChunkKind::Code)]
    #[case("<hr/>", ChunkKind::Separator)]
    #[case("<table></table>", ChunkKind::Html)]
    #[case("plain", ChunkKind::Html)]
    fn html_classification(#[case] html: &str, #[case] expected: ChunkKind) {
        assert_eq!(classify_html(html), expected);
    }
}
