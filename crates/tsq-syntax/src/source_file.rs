//! A parsed file plus the side tables editor queries need.

use std::sync::Arc;

use tsq_common::{LineMap, TextSpan};

use crate::kind::SyntaxKind;
use crate::node::{NodeArena, NodeFlags, NodeIndex};
use crate::parser::ParserState;
use crate::scanner::{CommentKind, CommentRange, Token};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub text: Arc<str>,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub line_map: LineMap,
    /// Every consumed token in source order, ending with end-of-file.
    pub tokens: Vec<Token>,
    /// Comments in source order.
    pub comments: Vec<CommentRange>,
    pub is_declaration_file: bool,
    pub is_js: bool,
}

impl SourceFile {
    pub fn parse(file_name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        let file_name = file_name.into();
        let text: Arc<str> = text.into();
        let is_declaration_file = is_declaration_file_name(&file_name);
        let is_js = [".js", ".jsx", ".mjs", ".cjs"]
            .iter()
            .any(|ext| file_name.ends_with(ext));
        let _span = tracing::debug_span!("parse", file = %file_name, len = text.len()).entered();
        let result = ParserState::new(&text, is_declaration_file).parse();
        let line_map = LineMap::build(&text);
        SourceFile {
            file_name,
            text,
            arena: result.arena,
            root: result.root,
            line_map,
            tokens: result.tokens,
            comments: result.comments,
            is_declaration_file,
            is_js,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source text covered by `span`, clamped to the file.
    pub fn slice(&self, span: TextSpan) -> &str {
        let len = self.text.len();
        let start = (span.start as usize).min(len);
        let end = (span.end() as usize).clamp(start, len);
        self.text.get(start..end).unwrap_or("")
    }

    pub fn node_text(&self, idx: NodeIndex) -> &str {
        self.slice(self.arena.span(idx))
    }

    /// Identifier or literal value of `idx` as seen by name binding.
    pub fn name_text(&self, idx: NodeIndex) -> &str {
        self.arena.text(idx)
    }

    /// Index of the first token ending after `offset`.
    pub fn token_index_after(&self, offset: u32) -> usize {
        self.tokens.partition_point(|t| t.end <= offset)
    }

    /// The last real token that ends at or before `offset`. The zero-width
    /// end-of-file token is skipped.
    pub fn token_before(&self, offset: u32) -> Option<&Token> {
        let idx = self.tokens.partition_point(|t| t.end <= offset);
        self.tokens[..idx].iter().rev().find(|t| t.kind != SyntaxKind::EndOfFile)
    }

    /// The comment whose interior contains `offset`. The end of a line
    /// comment counts as inside it.
    pub fn comment_containing(&self, offset: u32) -> Option<&CommentRange> {
        let idx = self.comments.partition_point(|c| c.end < offset);
        let comment = self.comments.get(idx)?;
        let inside = match comment.kind {
            CommentKind::Line => comment.pos < offset && offset <= comment.end,
            CommentKind::Block | CommentKind::Doc => {
                comment.pos < offset && (offset < comment.end || comment.unterminated)
            }
        };
        inside.then_some(comment)
    }

    /// `/** */` comments attached to the statement-level node `idx`:
    /// those that end before it with only whitespace in between.
    pub fn doc_comments_before(&self, idx: NodeIndex) -> Vec<CommentRange> {
        let pos = self.arena.span(idx).start;
        let end = self.comments.partition_point(|c| c.end <= pos);
        let mut attached = Vec::new();
        let mut cursor = pos;
        for comment in self.comments[..end].iter().rev() {
            let gap = self.slice(TextSpan::from_bounds(comment.end, cursor));
            if !gap.trim().is_empty() {
                break;
            }
            if comment.kind == CommentKind::Doc {
                attached.push(*comment);
            }
            cursor = comment.pos;
        }
        attached.reverse();
        attached
    }

    /// Files with a top-level import or export are modules; everything
    /// else contributes to the global scope.
    pub fn is_external_module(&self) -> bool {
        self.arena.statements(self.root).iter().any(|&stmt| {
            matches!(
                self.arena.kind(stmt),
                SyntaxKind::ImportDeclaration
                    | SyntaxKind::ImportEqualsDeclaration
                    | SyntaxKind::ExportDeclaration
                    | SyntaxKind::ExportAssignment
            ) || self.arena.flags(stmt).contains(NodeFlags::EXPORT)
        })
    }
}

pub fn is_declaration_file_name(file_name: &str) -> bool {
    [".d.ts", ".d.mts", ".d.cts"]
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

#[cfg(test)]
#[path = "tests/source_file_tests.rs"]
mod source_file_tests;
