use crate::attributes::Attributes;

use super::{
    delimiter::{Delimiter, DelimiterKind},
    rope::Span,
    tokens::Token,
};

/// A child of a block (or of the document root): free text or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(Span),
    Block(BlockNode),
}

/// A delimited block as it appears in source, before registry lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub name: String,
    pub attrs: Attributes,
    /// From the start of the opener to the end of the closer.
    pub span: Span,
    /// Between opener and closer. Empty for self-closing markers.
    pub content_span: Span,
    pub pieces: Vec<Piece>,
}

struct Frame {
    name: String,
    attrs: Attributes,
    start: usize,
    content_start: usize,
    pieces: Vec<Piece>,
}

impl Frame {
    fn close(self, content_end: usize, end: usize) -> BlockNode {
        BlockNode {
            name: self.name,
            attrs: self.attrs,
            span: Span::new(self.start, end),
            content_span: Span::new(self.content_start, content_end),
            pieces: self.pieces,
        }
    }
}

/// Assembles a flat token stream into a block tree using a stack of open
/// blocks.
pub struct BlockBuilder {
    open: Vec<Frame>,
    out: Vec<Piece>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            open: vec![],
            out: vec![],
        }
    }

    pub fn push(&mut self, token: Token) {
        match token {
            Token::Text(span) => self.push_text(span),
            Token::Delimiter(d) => match d.kind {
                DelimiterKind::Opener => self.open.push(Frame {
                    name: d.name,
                    attrs: d.attrs,
                    start: d.span.start,
                    content_start: d.span.end,
                    pieces: vec![],
                }),
                DelimiterKind::Void => {
                    let node = BlockNode {
                        name: d.name,
                        attrs: d.attrs,
                        span: d.span,
                        content_span: Span::new(d.span.end, d.span.end),
                        pieces: vec![],
                    };
                    self.push_piece(Piece::Block(node));
                }
                DelimiterKind::Closer => self.close(d),
            },
        }
    }

    pub fn finish(mut self, eof: usize) -> Vec<Piece> {
        // Blocks still open at EOF close there.
        while let Some(frame) = self.open.pop() {
            log::debug!("block {} left open; closing at end of input", frame.name);
            let node = frame.close(eof, eof);
            self.push_piece(Piece::Block(node));
        }
        self.out
    }

    fn close(&mut self, closer: Delimiter) {
        let Some(depth) = self.open.iter().rposition(|f| f.name == closer.name) else {
            log::warn!(
                "closer for {} at byte {} matches no open block; keeping it as text",
                closer.name,
                closer.span.start
            );
            self.push_text(closer.span);
            return;
        };

        // Inner blocks end where the matching closer begins.
        while self.open.len() > depth + 1 {
            if let Some(inner) = self.open.pop() {
                log::debug!("block {} implicitly closed by {}", inner.name, closer.name);
                let node = inner.close(closer.span.start, closer.span.start);
                self.push_piece(Piece::Block(node));
            }
        }
        if let Some(frame) = self.open.pop() {
            let node = frame.close(closer.span.start, closer.span.end);
            self.push_piece(Piece::Block(node));
        }
    }

    fn pieces(&mut self) -> &mut Vec<Piece> {
        match self.open.last_mut() {
            Some(frame) => &mut frame.pieces,
            None => &mut self.out,
        }
    }

    fn push_piece(&mut self, piece: Piece) {
        self.pieces().push(piece);
    }

    fn push_text(&mut self, span: Span) {
        let pieces = self.pieces();
        if let Some(Piece::Text(prev)) = pieces.last_mut()
            && prev.end == span.start
        {
            prev.end = span.end;
            return;
        }
        pieces.push(Piece::Text(span));
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
