//! Tag names and `@param` names inside documentation comments.

use super::*;

use rustc_hash::FxHashSet;
use tsq_syntax::{CommentRange, NodeIndex, SyntaxKind};

use crate::jsdoc;

/// What a tag may document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagScope {
    Anywhere,
    FunctionLike,
    ClassLike,
}

const TAG_VOCABULARY: &[(&str, TagScope)] = &[
    ("augments", TagScope::ClassLike),
    ("callback", TagScope::Anywhere),
    ("class", TagScope::ClassLike),
    ("constructor", TagScope::ClassLike),
    ("default", TagScope::Anywhere),
    ("deprecated", TagScope::Anywhere),
    ("enum", TagScope::Anywhere),
    ("example", TagScope::Anywhere),
    ("extends", TagScope::ClassLike),
    ("implements", TagScope::ClassLike),
    ("override", TagScope::Anywhere),
    ("param", TagScope::FunctionLike),
    ("private", TagScope::Anywhere),
    ("property", TagScope::Anywhere),
    ("protected", TagScope::Anywhere),
    ("public", TagScope::Anywhere),
    ("readonly", TagScope::Anywhere),
    ("return", TagScope::FunctionLike),
    ("returns", TagScope::FunctionLike),
    ("see", TagScope::Anywhere),
    ("since", TagScope::Anywhere),
    ("template", TagScope::FunctionLike),
    ("this", TagScope::FunctionLike),
    ("throws", TagScope::FunctionLike),
    ("type", TagScope::Anywhere),
    ("typedef", TagScope::Anywhere),
];

impl<'q, 'a> Completions<'q, 'a> {
    pub(super) fn add_jsdoc_tag_completions(&mut self, comment: &CommentRange) {
        let documented = self.documented_declaration(comment);
        let arena = self.q.arena();
        let kind = documented.map(|d| arena.kind(d));
        let function_like = kind.is_some_and(|k| k.is_function_like());
        // A plain function in a JavaScript file may be a constructor function.
        let class_like = kind.is_some_and(|k| {
            k.is_class_like()
                || k == SyntaxKind::Constructor
                || (self.q.source.is_js
                    && matches!(k, SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression))
        });
        for &(tag, scope) in TAG_VOCABULARY {
            let offered = match scope {
                TagScope::Anywhere => true,
                TagScope::FunctionLike => function_like,
                TagScope::ClassLike => class_like,
            };
            if offered {
                self.add_entry(Entry::new(tag, ScriptElementKind::Keyword, SortTier::LocationPriority));
            }
        }
    }

    /// Parameters of the documented function that no `@param` names yet.
    pub(super) fn add_jsdoc_param_completions(&mut self, comment: &CommentRange) {
        let Some(declaration) = self.documented_declaration(comment) else {
            return;
        };
        let source = self.q.source;
        let arena = &source.arena;
        if !arena.kind(declaration).is_function_like() {
            return;
        }
        let typing = source.slice(self.loc.replacement);
        let doc = jsdoc::parse(source.slice(TextSpan::from_bounds(comment.pos, comment.end)));
        let documented: FxHashSet<&str> = doc
            .tags
            .iter()
            .filter(|t| matches!(t.name.as_str(), "param" | "arg" | "argument"))
            .filter_map(|t| t.parameter_name.as_deref())
            .filter(|&name| name != typing)
            .collect();
        for &parameter in arena.parameters(declaration) {
            let name = arena.name(parameter);
            if arena.kind(name) != SyntaxKind::Identifier {
                continue;
            }
            let text = source.name_text(name);
            if text.is_empty() || documented.contains(text) {
                continue;
            }
            self.add_entry(Entry::new(
                text,
                ScriptElementKind::Parameter,
                SortTier::LocationPriority,
            ));
        }
    }

    /// The declaration a comment sits in front of. A variable statement
    /// documents its first declaration, or the function it is initialized
    /// with.
    fn documented_declaration(&self, comment: &CommentRange) -> Option<NodeIndex> {
        let source = self.q.source;
        let arena = &source.arena;
        let token = source.tokens.get(source.token_index_after(comment.end))?;
        let innermost = arena.covering_node(source.root, token.pos, token.end);
        let mut host = None;
        for node in arena.ancestors(innermost) {
            if node == source.root || arena.span(node).start != token.pos {
                break;
            }
            host = Some(node);
        }
        let host = host?;
        let mut declaration = match arena.kind(host) {
            SyntaxKind::VariableStatement => *arena.declarations(host).first()?,
            _ => host,
        };
        if arena.kind(declaration) == SyntaxKind::VariableDeclaration {
            let initializer = arena.initializer(declaration);
            if arena.kind(initializer).is_function_like() || arena.kind(initializer).is_class_like() {
                declaration = initializer;
            }
        }
        Some(declaration)
    }
}
