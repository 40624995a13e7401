//! Symbol lookup shared by the engines.
//!
//! Every engine asks the same questions of the checker: which symbol does a
//! node denote, what does an alias ultimately point at, is a member visible
//! from here. Merged declarations stay one `SymbolId`; engines that need the
//! individual declarations iterate `Symbol::declarations`.

use smallvec::SmallVec;
use tsq_checker::{DeclRef, FileId, SymbolFlags, SymbolId, TypeChecker, TypeKind};
use tsq_syntax::{NodeIndex, SyntaxKind};

/// Base class chains deeper than this are treated as unrelated.
const MAX_BASE_WALK: usize = 32;

/// Symbol a node denotes, without following aliases.
pub fn symbol_at_node(checker: &TypeChecker<'_>, file: FileId, node: NodeIndex) -> Option<SymbolId> {
    let source = checker.source(file)?;
    let arena = &source.arena;
    match arena.kind(node) {
        SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword => None,
        _ => checker.symbol_at_location(file, node),
    }
}

/// Every symbol one occurrence stands for. A shorthand property is both the
/// property and the local it reads; a parameter property is both the
/// parameter and the class member.
pub fn occurrence_symbols(
    checker: &TypeChecker<'_>,
    file: FileId,
    node: NodeIndex,
) -> SmallVec<[SymbolId; 2]> {
    let mut result = SmallVec::new();
    let Some(source) = checker.source(file) else {
        return result;
    };
    let arena = &source.arena;
    if let Some(symbol) = symbol_at_node(checker, file, node) {
        result.push(symbol);
    }
    let parent = arena.parent(node);
    match arena.kind(parent) {
        SyntaxKind::ShorthandPropertyAssignment if arena.name(parent) == node => {
            if let Some(local) = checker.shorthand_value_symbol(file, parent)
                && !result.contains(&local)
            {
                result.push(local);
            }
        }
        SyntaxKind::Parameter if arena.name(parent) == node => {
            if let Some(property) = checker
                .binding(file)
                .and_then(|b| b.parameter_properties.get(&parent).copied())
                && !result.contains(&property)
            {
                result.push(property);
            }
        }
        _ => {}
    }
    result
}

/// The symbol a chain of aliases ends at.
pub fn alias_target(checker: &TypeChecker<'_>, symbol: SymbolId) -> SymbolId {
    if checker.symbol(symbol).has(SymbolFlags::ALIAS) {
        checker.resolve_alias(symbol)
    } else {
        symbol
    }
}

/// Whether `candidate` denotes `root` directly or through aliases.
pub fn denotes(checker: &TypeChecker<'_>, candidate: SymbolId, root: SymbolId) -> bool {
    candidate == root || alias_target(checker, candidate) == root
}

/// Whether `node` is the declared name of an import or export alias.
pub fn is_alias_declaration_name(checker: &TypeChecker<'_>, file: FileId, node: NodeIndex) -> bool {
    let Some(source) = checker.source(file) else {
        return false;
    };
    let arena = &source.arena;
    let parent = arena.parent(node);
    matches!(
        arena.kind(parent),
        SyntaxKind::ImportClause
            | SyntaxKind::NamespaceImport
            | SyntaxKind::ImportSpecifier
            | SyntaxKind::ExportSpecifier
            | SyntaxKind::ImportEqualsDeclaration
    ) && arena.name(parent) == node
}

pub fn declarations<'c>(checker: &'c TypeChecker<'_>, symbol: SymbolId) -> &'c [DeclRef] {
    &checker.symbol(symbol).declarations
}

// =============================================================================
// Accessibility
// =============================================================================

/// Class symbols lexically enclosing `node`, innermost first.
pub fn enclosing_classes(checker: &TypeChecker<'_>, file: FileId, node: NodeIndex) -> Vec<SymbolId> {
    let Some(source) = checker.source(file) else {
        return Vec::new();
    };
    let arena = &source.arena;
    arena
        .ancestors(node)
        .filter(|&a| arena.kind(a).is_class_like())
        .filter_map(|class| checker.declaration_symbol(file, class))
        .collect()
}

/// Whether class `derived` is `base` or inherits from it.
pub fn derives_from(checker: &TypeChecker<'_>, derived: SymbolId, base: SymbolId) -> bool {
    let mut frontier = vec![derived];
    let mut visited = Vec::new();
    while let Some(current) = frontier.pop() {
        if current == base {
            return true;
        }
        if visited.contains(&current) || visited.len() >= MAX_BASE_WALK {
            continue;
        }
        visited.push(current);
        let declared = checker.declared_type_of_symbol(current);
        let (target, args) = match &*checker.types().get(declared) {
            TypeKind::Reference { target, args } => (*target, args.to_vec()),
            _ => continue,
        };
        for base_type in checker.base_types(target, &args) {
            if let TypeKind::Reference { target, .. } = &*checker.types().get(base_type) {
                frontier.push(*target);
            }
        }
    }
    false
}

/// Whether `member` may be accessed from `location`: `#names` and
/// `private` members only inside their class, `protected` members also
/// inside subclasses.
pub fn is_member_accessible(
    checker: &TypeChecker<'_>,
    file: FileId,
    location: NodeIndex,
    member: SymbolId,
) -> bool {
    let symbol = checker.symbol(member);
    let is_private_name = symbol.name.starts_with('#');
    if !is_private_name && !symbol.has(SymbolFlags::PRIVATE | SymbolFlags::PROTECTED) {
        return true;
    }
    let Some(owner) = symbol.parent else {
        return true;
    };
    let classes = enclosing_classes(checker, file, location);
    if is_private_name || symbol.has(SymbolFlags::PRIVATE) {
        return classes.contains(&owner);
    }
    classes.iter().any(|&class| derives_from(checker, class, owner))
}

#[cfg(test)]
#[path = "tests/symbol_resolver_tests.rs"]
mod symbol_resolver_tests;
