use super::{
    delimiter::{Delimiter, parse_delimiter},
    rope::Span,
};

/// A lexical unit of block markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Delimiter(Delimiter),
    /// Anything that is not a recognized delimiter, including ordinary
    /// comments and malformed delimiters.
    Text(Span),
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Delimiter(d) => d.span,
            Token::Text(span) => *span,
        }
    }
}

/// Splits `src` into delimiter and free-text tokens covering it exactly.
pub fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut search = 0;

    while let Some(off) = src.get(search..).and_then(|rest| rest.find("<!--")) {
        let at = search + off;
        match parse_delimiter(src, at) {
            Some(delimiter) => {
                if text_start < at {
                    tokens.push(Token::Text(Span::new(text_start, at)));
                }
                search = delimiter.span.end;
                text_start = search;
                tokens.push(Token::Delimiter(delimiter));
            }
            None => search = at + 4,
        }
    }

    if text_start < src.len() {
        tokens.push(Token::Text(Span::new(text_start, src.len())));
    }
    tokens
}
