//! Go to definition.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use tsq_checker::{DeclRef, SymbolFlags, SymbolId, TypeChecker, TypeKind};
use tsq_common::{Cancelled, TextSpan};
use tsq_syntax::{NodeIndex, SyntaxKind};

use crate::display::{self, ScriptElementKind};
use crate::position;
use crate::query::FileQuery;
use crate::symbol_resolver::{alias_target, is_alias_declaration_name, symbol_at_node};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionInfo {
    pub file_name: String,
    /// The declared name, or the whole declaration when it has none.
    pub text_span: TextSpan,
    pub kind: ScriptElementKind,
    pub name: String,
    pub container_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_span: Option<TextSpan>,
}

/// Declarations of the symbol at `offset`. Empty when the offset names
/// nothing.
#[instrument(skip_all, fields(file = %q.source.file_name, offset))]
pub fn definition_at(q: &FileQuery<'_>, offset: u32) -> Result<Vec<DefinitionInfo>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    let node = position::node_at_offset(q.source, offset);
    let arena = q.arena();
    if node.is_none() || node == q.root() {
        return Ok(Vec::new());
    }
    let checker = &q.checker;

    if arena.kind(node) == SyntaxKind::StringLiteral {
        if !tsq_checker::checker::is_module_specifier(arena, node) {
            return Ok(Vec::new());
        }
        return Ok(module_definition(q, node).into_iter().collect());
    }

    let symbol = match arena.kind(node) {
        SyntaxKind::SuperKeyword => super_class(checker, q, node),
        SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier => symbol_at_node(checker, q.file, node),
        _ => None,
    };
    let Some(symbol) = symbol else {
        debug!("no symbol at offset");
        return Ok(Vec::new());
    };
    let symbol = if is_alias_declaration_name(checker, q.file, node) {
        symbol
    } else {
        alias_target(checker, symbol)
    };

    let definitions: Vec<DefinitionInfo> = definition_declarations(checker, symbol)
        .into_iter()
        .filter_map(|declaration| definition_info(checker, symbol, declaration))
        .collect();
    debug!(count = definitions.len(), "definitions");
    Ok(definitions)
}

/// The declarations a definition request reports. Overloads hide their
/// implementation; an implementation without overloads is reported.
pub fn definition_declarations(checker: &TypeChecker<'_>, symbol: SymbolId) -> Vec<DeclRef> {
    let declarations = &checker.symbol(symbol).declarations;
    let has_body = |d: &DeclRef| {
        checker
            .source(d.file)
            .is_some_and(|source| source.arena.body(d.node).is_some())
    };
    let is_callable = |d: &DeclRef| {
        checker
            .source(d.file)
            .is_some_and(|source| source.arena.kind(d.node).is_function_like())
    };
    let has_signatures = declarations.iter().any(|d| is_callable(d) && !has_body(d));
    declarations
        .iter()
        .filter(|d| !(has_signatures && is_callable(d) && has_body(d)))
        .copied()
        .collect()
}

fn definition_info(
    checker: &TypeChecker<'_>,
    symbol: SymbolId,
    declaration: DeclRef,
) -> Option<DefinitionInfo> {
    let source = checker.source(declaration.file)?;
    let arena = &source.arena;
    let s = checker.symbol(symbol);
    let container_name = s
        .parent
        .map(|p| checker.symbol(p))
        .filter(|p| !p.is_internal_name() && !p.has(SymbolFlags::SOURCE_MODULE))
        .map(|p| p.name.clone())
        .unwrap_or_default();

    if declaration.node == source.root {
        return Some(DefinitionInfo {
            file_name: source.file_name.clone(),
            text_span: TextSpan::new(0, 0),
            kind: ScriptElementKind::Module,
            name: s.name.clone(),
            container_name,
            context_span: None,
        });
    }

    let name = arena.name(declaration.node);
    let text_span = if name.is_some() {
        arena.span(name)
    } else {
        arena.span(declaration.node)
    };
    let context = match arena.kind(declaration.node) {
        SyntaxKind::VariableDeclaration => arena.parent(declaration.node),
        _ => declaration.node,
    };
    Some(DefinitionInfo {
        file_name: source.file_name.clone(),
        text_span,
        kind: display::symbol_kind(checker, symbol),
        name: s.name.clone(),
        container_name,
        context_span: Some(arena.span(context)),
    })
}

/// A module specifier goes to the start of the file it resolves to.
fn module_definition(q: &FileQuery<'_>, specifier: NodeIndex) -> Option<DefinitionInfo> {
    let text = q.source.name_text(specifier);
    let file = q.program.resolve_module_file(q.file, text)?;
    let source = q.program.file(file)?;
    Some(DefinitionInfo {
        file_name: source.file_name.clone(),
        text_span: TextSpan::new(0, 0),
        kind: ScriptElementKind::Script,
        name: text.to_string(),
        container_name: String::new(),
        context_span: None,
    })
}

/// `super` denotes the base class of the enclosing class.
fn super_class(checker: &TypeChecker<'_>, q: &FileQuery<'_>, node: NodeIndex) -> Option<SymbolId> {
    let arena = q.arena();
    let class = arena.find_ancestor(node, |k| k.is_class_like());
    let class_symbol = checker.declaration_symbol(q.file, class)?;
    let base = checker.base_constructor_type(class_symbol)?;
    match &*checker.types().get(base) {
        TypeKind::Anonymous { symbol, .. } => Some(*symbol),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/definition_tests.rs"]
mod definition_tests;
