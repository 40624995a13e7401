//! Exclusion rules shared by the collectors.

use super::*;

use rustc_hash::FxHashSet;
use tsq_checker::SymbolFlags;
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use crate::symbol_resolver::is_member_accessible;

impl<'q, 'a> Completions<'q, 'a> {
    /// Members that never appear in a member list: compiler-internal
    /// names, constructors, signatures, and members hidden by accessibility.
    pub(super) fn is_offered_member(&self, symbol: SymbolId) -> bool {
        let checker = &self.q.checker;
        let s = checker.symbol(symbol);
        if s.is_internal_name() || s.has(SymbolFlags::CONSTRUCTOR | SymbolFlags::SIGNATURE) {
            return false;
        }
        is_member_accessible(checker, self.q.file, self.loc.node, symbol)
    }

    /// Whether any declaration of `symbol` sits in the requesting file.
    pub(super) fn is_declared_here(&self, symbol: SymbolId) -> bool {
        let checker = &self.q.checker;
        !self.q.program.is_lib_file(self.q.file)
            && checker
                .symbol(symbol)
                .declarations
                .iter()
                .any(|d| d.file == self.q.file)
    }

    /// Names already written as members of an object literal or object
    /// binding pattern, except the one being edited.
    pub(super) fn present_member_names(
        &self,
        container: NodeIndex,
        editing: Option<NodeIndex>,
    ) -> FxHashSet<&'a str> {
        let source = self.q.source;
        let arena = &source.arena;
        let members = if arena.kind(container) == SyntaxKind::ObjectLiteralExpression {
            arena.members(container)
        } else {
            arena.elements(container)
        };
        let mut names = FxHashSet::default();
        for &member in members {
            if Some(member) == editing {
                continue;
            }
            let name = match arena.kind(member) {
                SyntaxKind::BindingElement if arena.flags(member).contains(NodeFlags::REST) => continue,
                SyntaxKind::BindingElement => {
                    let property = arena.property_name(member);
                    if property.is_some() {
                        property
                    } else {
                        arena.name(member)
                    }
                }
                SyntaxKind::SpreadAssignment => continue,
                _ => arena.child(member, 0),
            };
            if name.is_none() || arena.flags(name).contains(NodeFlags::MISSING) {
                continue;
            }
            // An identifier the cursor sits in is still being typed.
            if self.loc.word_node == name {
                continue;
            }
            let text = source.name_text(name);
            if !text.is_empty() {
                names.insert(text);
            }
        }
        names
    }
}
