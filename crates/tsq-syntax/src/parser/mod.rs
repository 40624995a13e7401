//! Recursive-descent parser.
//!
//! The parser never fails: malformed input produces a tree with
//! zero-width `MISSING` identifiers and `UNTERMINATED` lists so that
//! editor queries on half-typed code still find the surrounding
//! constructs. Every consumed token is recorded for position lookups.

mod state_class_members;
mod state_expressions;
mod state_statements;
mod state_types;

use crate::kind::{SyntaxKind, is_reserved_word};
use crate::node::{NodeArena, NodeFlags, NodeIndex};
use crate::scanner::{CommentRange, Scanner, ScannerState, Token, TokenFlags};

/// Nesting depth at which blocks and expressions stop descending.
const MAX_RECURSION_DEPTH: u32 = 256;

/// Output of a parse, consumed by [`crate::SourceFile::parse`].
pub(crate) struct ParseResult {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub tokens: Vec<Token>,
    pub comments: Vec<CommentRange>,
}

struct Speculation {
    scanner: ScannerState,
    token_count: usize,
    node_count: usize,
    prev_token_end: u32,
}

pub(crate) struct ParserState<'a> {
    scanner: Scanner<'a>,
    arena: NodeArena,
    tokens: Vec<Token>,
    prev_token_end: u32,
    recursion_depth: u32,
    /// Inside `declare` or a declaration file.
    ambient: bool,
    /// `in` is not a binary operator inside a `for` initializer.
    disallow_in: bool,
}

impl<'a> ParserState<'a> {
    pub fn new(text: &'a str, ambient: bool) -> Self {
        let mut scanner = Scanner::new(text);
        scanner.scan();
        ParserState {
            scanner,
            arena: NodeArena::new(),
            tokens: Vec::new(),
            prev_token_end: 0,
            recursion_depth: 0,
            ambient,
            disallow_in: false,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let root = self.parse_source_file();
        self.arena.link_parents(root);
        let comments = self.scanner.take_comments();
        tracing::trace!(
            nodes = self.arena.len(),
            tokens = self.tokens.len(),
            comments = comments.len(),
            "parsed source file"
        );
        ParseResult {
            arena: self.arena,
            root,
            tokens: self.tokens,
            comments,
        }
    }

    // ---- token access ------------------------------------------------------

    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    fn next_token(&mut self) -> SyntaxKind {
        if self.token() != SyntaxKind::EndOfFile {
            self.tokens.push(self.scanner.current_token());
            self.prev_token_end = self.token_end();
        }
        self.scanner.scan()
    }

    fn is(&self, kind: SyntaxKind) -> bool {
        self.token() == kind
    }

    /// Current token is the identifier-like word `word`.
    fn is_word(&self, word: &str) -> bool {
        self.token() == SyntaxKind::Identifier
            && self.token_value() == word
            && !self.scanner.token_flags().contains(TokenFlags::ESCAPED)
    }

    fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_optional_word(&mut self, word: &str) -> bool {
        if self.is_word(word) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` if present. A missing token is tolerated silently.
    fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        self.parse_optional(kind)
    }

    /// Automatic semicolon insertion: a missing `;` is never an error here.
    fn parse_semicolon(&mut self) {
        self.parse_optional(SyntaxKind::Semicolon);
    }

    fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::Semicolon | SyntaxKind::CloseBrace | SyntaxKind::EndOfFile
        ) || self.has_preceding_line_break()
    }

    /// Identifier usable as a binding or reference.
    fn is_identifier(&self) -> bool {
        self.token() == SyntaxKind::Identifier && !is_reserved_word(self.token_value())
    }

    /// Any identifier including reserved words (property names).
    fn is_identifier_or_keyword(&self) -> bool {
        self.token() == SyntaxKind::Identifier
    }

    // ---- speculation -------------------------------------------------------

    fn mark(&self) -> Speculation {
        Speculation {
            scanner: self.scanner.save(),
            token_count: self.tokens.len(),
            node_count: self.arena.len(),
            prev_token_end: self.prev_token_end,
        }
    }

    fn rewind(&mut self, mark: Speculation) {
        self.scanner.restore(mark.scanner);
        self.tokens.truncate(mark.token_count);
        self.arena.truncate(mark.node_count);
        self.prev_token_end = mark.prev_token_end;
    }

    /// Run `f` and always restore the parser afterwards.
    fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mark = self.mark();
        let result = f(self);
        self.rewind(mark);
        result
    }

    /// Run `f`; keep its effects only when it returns `Some`.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mark = self.mark();
        let result = f(self);
        if result.is_none() {
            self.rewind(mark);
        }
        result
    }

    fn look_ahead_next_is(&mut self, pred: impl FnOnce(&Self) -> bool) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            pred(p)
        })
    }

    fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // ---- node construction -------------------------------------------------

    fn start_node(&mut self, kind: SyntaxKind, pos: u32) -> NodeIndex {
        self.arena.alloc(kind, pos, pos)
    }

    /// Close a node at the end of the last consumed token.
    fn finish_node(&mut self, idx: NodeIndex, children: &[NodeIndex]) -> NodeIndex {
        let end = self.prev_token_end;
        let node = self.arena.get_mut(idx);
        node.end = end.max(node.pos);
        self.arena.set_children(idx, children);
        idx
    }

    fn add_flags(&mut self, idx: NodeIndex, flags: NodeFlags) {
        if idx.is_some() {
            self.arena.get_mut(idx).flags |= flags;
        }
    }

    fn set_op(&mut self, idx: NodeIndex, op: SyntaxKind) {
        self.arena.get_mut(idx).op = op;
    }

    /// Zero-width placeholder identifier after the last consumed token.
    fn create_missing_identifier(&mut self) -> NodeIndex {
        let pos = self.prev_token_end;
        let idx = self.arena.alloc(SyntaxKind::Identifier, pos, pos);
        self.add_flags(idx, NodeFlags::MISSING);
        idx
    }

    /// Identifier node from the current token, which must be identifier-like.
    fn take_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let idx = self.arena.alloc(SyntaxKind::Identifier, pos, self.token_end());
        let text = self.token_value().to_string();
        self.arena.set_text(idx, &text);
        self.next_token();
        idx
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier() {
            self.take_identifier()
        } else {
            self.create_missing_identifier()
        }
    }

    /// Identifier including reserved words, as after `.`.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            self.take_identifier()
        } else {
            self.create_missing_identifier()
        }
    }

    fn parse_private_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let idx = self.arena.alloc(SyntaxKind::PrivateIdentifier, pos, self.token_end());
        let text = self.token_value().to_string();
        self.arena.set_text(idx, &text);
        self.next_token();
        idx
    }

    /// String, numeric, bigint or template literal from the current token.
    fn parse_literal_node(&mut self) -> NodeIndex {
        let kind = self.token();
        let pos = self.token_pos();
        let flags = self.scanner.token_flags();
        let idx = self.arena.alloc(kind, pos, self.token_end());
        let text = self.token_value().to_string();
        self.arena.set_text(idx, &text);
        if flags.contains(TokenFlags::UNTERMINATED) {
            self.add_flags(idx, NodeFlags::UNTERMINATED);
        }
        if flags.contains(TokenFlags::SINGLE_QUOTE) {
            self.add_flags(idx, NodeFlags::SINGLE_QUOTE);
        }
        self.next_token();
        idx
    }

    fn is_property_name_start(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::Identifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::OpenBracket
        )
    }

    /// Member or property name: identifier, literal, `#private` or `[expr]`.
    fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            SyntaxKind::OpenBracket => {
                let node = self.start_node(SyntaxKind::ComputedPropertyName, self.token_pos());
                self.next_token();
                let expr = self.parse_assignment_expression();
                self.parse_expected(SyntaxKind::CloseBracket);
                self.finish_node(node, &[expr])
            }
            _ => self.parse_identifier_name(),
        }
    }

    /// Consume one token that no rule accepted, so list loops always advance.
    fn skip_token(&mut self) {
        if !self.is(SyntaxKind::EndOfFile) {
            self.next_token();
        }
    }
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;
