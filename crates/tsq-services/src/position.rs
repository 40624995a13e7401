//! Offset to token and node resolution.
//!
//! Two tie-break rules exist for an offset sitting exactly between two
//! tokens. Completion and edit computations prefer the *trailing* token, the
//! one whose end equals the offset, because that is what the user just
//! typed. Hover and definition prefer the token that contains the offset and
//! only fall back to the trailing token when it is a name.

use tsq_common::TextSpan;
use tsq_syntax::{NodeIndex, SourceFile, SyntaxKind, Token};

/// The token containing `offset` (`pos <= offset < end`).
pub fn token_at(source: &SourceFile, offset: u32) -> Option<Token> {
    let idx = source.token_index_after(offset);
    source
        .tokens
        .get(idx)
        .filter(|t| t.pos <= offset && t.kind != SyntaxKind::EndOfFile)
        .copied()
}

/// The last token ending at or before `offset`.
pub fn previous_token(source: &SourceFile, offset: u32) -> Option<Token> {
    source.token_before(offset).copied()
}

/// The token touching `offset` under the trailing-edge rule.
pub fn touching_token(source: &SourceFile, offset: u32) -> Option<Token> {
    match previous_token(source, offset) {
        Some(prev) if prev.end == offset => Some(prev),
        _ => token_at(source, offset),
    }
}

pub fn is_name_token(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier)
}

pub fn token_text<'s>(source: &'s SourceFile, token: &Token) -> &'s str {
    source.slice(TextSpan::from_bounds(token.pos, token.end))
}

/// Innermost node whose span covers `token`.
pub fn node_of_token(source: &SourceFile, token: &Token) -> NodeIndex {
    source
        .arena
        .covering_node(source.root, token.pos, token.end)
}

/// The node a hover or definition request at `offset` is about.
pub fn node_at_offset(source: &SourceFile, offset: u32) -> NodeIndex {
    let containing = token_at(source, offset);
    let trailing = previous_token(source, offset).filter(|t| t.end == offset);
    let chosen = match (containing, trailing) {
        (Some(c), _) if is_name_token(c.kind) || c.kind.is_literal_token() => Some(c),
        (_, Some(t)) if is_name_token(t.kind) => Some(t),
        (Some(c), _) => Some(c),
        (None, t) => t,
    };
    match chosen {
        Some(token) => node_of_token(source, &token),
        None => source.arena.covering_node(source.root, offset, offset),
    }
}

/// Where a completion request sits, with the partial word split out.
#[derive(Debug, Clone, Copy)]
pub struct CompletionLocation {
    pub offset: u32,
    /// Identifier or private name the cursor is inside or at the end of.
    pub word: Option<Token>,
    /// Node of `word`, or `NONE`.
    pub word_node: NodeIndex,
    /// The token before the partial word (or before the offset).
    pub context_token: Option<Token>,
    /// Innermost node covering `context_token`.
    pub context_node: NodeIndex,
    /// `word_node` when present, otherwise the innermost node touching
    /// the offset.
    pub node: NodeIndex,
    /// Text a chosen entry replaces: the whole partial word, or an empty
    /// span at the offset.
    pub replacement: TextSpan,
}

impl CompletionLocation {
    pub fn resolve(source: &SourceFile, offset: u32) -> Self {
        let word = word_at(source, offset);
        let word_node = word.map_or(NodeIndex::NONE, |w| node_of_token(source, &w));
        let before = word.map_or(offset, |w| w.pos);
        let context_token = previous_token(source, before);
        let context_node = context_token.map_or(NodeIndex::NONE, |t| node_of_token(source, &t));
        let node = if word_node.is_some() {
            word_node
        } else {
            source.arena.covering_node(source.root, offset, offset)
        };
        let replacement = word.map_or(TextSpan::new(offset, 0), |w| {
            TextSpan::from_bounds(w.pos, w.end)
        });
        CompletionLocation {
            offset,
            word,
            word_node,
            context_token,
            context_node,
            node,
            replacement,
        }
    }

    /// The typed part of the word, up to the cursor.
    pub fn prefix<'s>(&self, source: &'s SourceFile) -> &'s str {
        match self.word {
            Some(w) => source.slice(TextSpan::from_bounds(w.pos, self.offset.min(w.end))),
            None => "",
        }
    }

    pub fn context_kind(&self) -> Option<SyntaxKind> {
        self.context_token.map(|t| t.kind)
    }

    pub fn context_text<'s>(&self, source: &'s SourceFile) -> &'s str {
        self.context_token.map_or("", |t| token_text(source, &t))
    }
}

/// A name token the cursor is strictly inside of, or touching at its end.
fn word_at(source: &SourceFile, offset: u32) -> Option<Token> {
    if let Some(inside) = token_at(source, offset)
        && inside.pos < offset
        && is_name_token(inside.kind)
    {
        return Some(inside);
    }
    previous_token(source, offset).filter(|t| t.end == offset && is_name_token(t.kind))
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
