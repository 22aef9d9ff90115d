use xi_rope::Rope;

use crate::parsing::{
    builder::{BlockNode, Piece},
    tokens::Token,
};

/// Validates tokenizer output.
///
/// Asserts that:
/// - All token spans are within rope bounds
/// - Tokens are in source order and do not overlap
/// - Together they cover the whole input
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(rope: &Rope, tokens: &[Token]) {
    let n = rope.len();
    let mut at = 0;
    for t in tokens {
        let sp = t.span();
        assert!(
            sp.start <= sp.end && sp.end <= n,
            "token span out of bounds: {sp:?} (rope len: {n})"
        );
        assert!(
            sp.start >= at,
            "token {sp:?} overlaps or precedes previous token ending at {at}"
        );
        assert_eq!(sp.start, at, "gap before token {sp:?}");
        at = sp.end;
    }
    assert_eq!(at, n, "tokens stop at {at}, input has {n} bytes");
}

/// Validates the built block tree: every content span lies inside its block
/// span, and every child lies inside its parent's content.
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check_tree(rope: &Rope, pieces: &[Piece]) {
    let n = rope.len();
    for piece in pieces {
        if let Piece::Block(b) = piece {
            check_block(n, b);
        }
    }
}

fn check_block(n: usize, b: &BlockNode) {
    assert!(
        b.span.start <= b.span.end && b.span.end <= n,
        "block span out of bounds: {:?} (rope len: {n})",
        b.span
    );
    assert!(
        b.content_span.start >= b.span.start && b.content_span.end <= b.span.end,
        "content span not contained in block span: content {:?}, block {:?}",
        b.content_span,
        b.span
    );
    for piece in &b.pieces {
        let sp = match piece {
            Piece::Text(sp) => *sp,
            Piece::Block(child) => {
                check_block(n, child);
                child.span
            }
        };
        assert!(
            sp.start >= b.content_span.start && sp.end <= b.content_span.end,
            "child {sp:?} escapes content {:?} of {}",
            b.content_span,
            b.name
        );
    }
}
