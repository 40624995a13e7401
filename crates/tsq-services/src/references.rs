//! Find all references.
//!
//! A search starts from the symbols the cursor occurrence stands for, closed
//! over aliases, parameter properties and shorthand properties so that the
//! result is the same from every occurrence. Candidate names are the root names plus the local
//! names of every import or export alias that resolves to a root. Project
//! files are then scanned in parallel: a byte search finds each candidate
//! name, the token there must spell it exactly, and the node must resolve
//! to a root.

use memchr::memmem;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, instrument, trace};
use tsq_checker::checker::is_declaration_kind;
use tsq_checker::{FileId, Program, SymbolId, TypeChecker};
use tsq_common::{CancellationToken, Cancelled, TextSpan};
use tsq_syntax::{NodeArena, NodeIndex, SourceFile, SyntaxKind};

use crate::position;
use crate::query::FileQuery;
use crate::symbol_resolver::{alias_target, denotes, occurrence_symbols};

/// Bound on rescans caused by symbols linked through shorthand properties.
const MAX_SEARCH_ROUNDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub file_name: String,
    pub text_span: TextSpan,
    pub is_definition: bool,
    pub is_write_access: bool,
    /// The line holding the occurrence, without its terminator.
    pub line_text: String,
}

/// Every occurrence of the symbol at `offset` across the project.
#[instrument(skip_all, fields(file = %q.source.file_name, offset))]
pub fn references_at(q: &FileQuery<'_>, offset: u32) -> Result<Vec<ReferenceEntry>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    let node = position::node_at_offset(q.source, offset);
    if !matches!(q.arena().kind(node), SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier) {
        return Ok(Vec::new());
    }
    let mut roots = search_roots(&q.checker, q.file, node);
    if roots.is_empty() {
        debug!("no symbol at offset");
        return Ok(Vec::new());
    }

    let files: Vec<(usize, FileId, &SourceFile)> = q
        .program
        .project_files()
        .enumerate()
        .map(|(order, (id, source))| (order, id, &**source))
        .collect();
    let program = q.program;
    let cancel = q.cancel;
    // Shorthand properties found by a scan join the roots, and the scan
    // repeats until no occurrence brings in a new symbol.
    let mut round = 0;
    let per_file = loop {
        round += 1;
        let names = candidate_names(q.program, &q.checker, &roots, q.cancel)?;
        trace!(?roots, ?names, round, "reference search");
        let scans: Vec<FileScan> = files
            .par_iter()
            .map(|&(order, file, source)| scan_file(program, order, file, source, &roots, &names, cancel))
            .collect::<Result<_, Cancelled>>()?;
        let before = roots.len();
        for &linked in scans.iter().flat_map(|scan| scan.linked.iter()) {
            if !roots.contains(&linked) {
                roots.push(linked);
            }
        }
        if roots.len() == before || round >= MAX_SEARCH_ROUNDS {
            break scans;
        }
        close_roots(&q.checker, &mut roots);
    };

    let mut entries: Vec<(usize, ReferenceEntry)> =
        per_file.into_iter().flat_map(|scan| scan.entries).collect();
    entries.sort_by_key(|(order, e)| (*order, e.text_span.start));
    entries.dedup_by(|a, b| a.0 == b.0 && a.1.text_span == b.1.text_span);
    let mut entries: Vec<ReferenceEntry> = entries.into_iter().map(|(_, e)| e).collect();
    if let Some(max) = q.options.max_reference_results {
        entries.truncate(max);
    }
    debug!(count = entries.len(), "references");
    Ok(entries)
}

// =============================================================================
// Roots and names
// =============================================================================

/// Symbols an occurrence refers to, after aliases. A parameter property
/// brings its parameter and its class member together, and a shorthand
/// property its property and the local it reads.
pub fn search_roots(checker: &TypeChecker<'_>, file: FileId, node: NodeIndex) -> SmallVec<[SymbolId; 2]> {
    let mut roots: SmallVec<[SymbolId; 2]> = SmallVec::new();
    for symbol in occurrence_symbols(checker, file, node) {
        let target = alias_target(checker, symbol);
        if !roots.contains(&target) {
            roots.push(target);
        }
    }
    close_roots(checker, &mut roots);
    roots
}

/// Add the symbols declared together with a root: both sides of parameter
/// properties and of shorthand properties.
fn close_roots(checker: &TypeChecker<'_>, roots: &mut SmallVec<[SymbolId; 2]>) {
    let mut i = 0;
    while i < roots.len() {
        for decl in checker.symbol(roots[i]).declarations.iter() {
            let Some(source) = checker.source(decl.file) else {
                continue;
            };
            let linked = match source.arena.kind(decl.node) {
                SyntaxKind::Parameter => [
                    checker.declaration_symbol(decl.file, decl.node),
                    checker
                        .binding(decl.file)
                        .and_then(|b| b.parameter_properties.get(&decl.node).copied()),
                ],
                SyntaxKind::ShorthandPropertyAssignment => [
                    checker
                        .shorthand_value_symbol(decl.file, decl.node)
                        .map(|local| alias_target(checker, local)),
                    None,
                ],
                _ => continue,
            };
            for symbol in linked.into_iter().flatten() {
                if !roots.contains(&symbol) {
                    roots.push(symbol);
                }
            }
        }
        i += 1;
    }
}

/// Spellings an occurrence of a root may have: declared names plus the
/// local names of aliases that resolve to a root.
fn candidate_names(
    program: &Program,
    checker: &TypeChecker<'_>,
    roots: &[SymbolId],
    cancel: &CancellationToken,
) -> Result<Vec<String>, Cancelled> {
    let mut names: FxHashSet<String> = FxHashSet::default();
    for &root in roots {
        let symbol = checker.symbol(root);
        for decl in symbol.declarations.iter() {
            if let Some(source) = checker.source(decl.file) {
                let name = source.arena.name(decl.node);
                if matches!(source.arena.kind(name), SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier) {
                    names.insert(source.node_text(name).to_string());
                }
            }
        }
        if !symbol.is_internal_name() {
            names.insert(symbol.name.clone());
        }
    }

    let mut checkpoint = cancel.checkpoint();
    for (file, source) in program.project_files() {
        let arena = &source.arena;
        for node in (0..arena.len() as u32).map(NodeIndex) {
            checkpoint.tick()?;
            if !is_alias_declaration(arena.kind(node)) {
                continue;
            }
            let Some(alias) = checker.declaration_symbol(file, node) else {
                continue;
            };
            if !roots.contains(&alias_target(checker, alias)) {
                continue;
            }
            for name in [arena.name(node), arena.property_name(node)] {
                if arena.kind(name) == SyntaxKind::Identifier {
                    names.insert(source.node_text(name).to_string());
                }
            }
        }
    }
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    Ok(names)
}

fn is_alias_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ImportClause
            | SyntaxKind::NamespaceImport
            | SyntaxKind::ImportSpecifier
            | SyntaxKind::ExportSpecifier
            | SyntaxKind::ImportEqualsDeclaration
    )
}

// =============================================================================
// Scan
// =============================================================================

/// Occurrences of any root in one file. Runs on a rayon worker with its own
/// checker.
/// Matches in one file, plus symbols the matched occurrences stand for
/// that are not roots yet.
struct FileScan {
    entries: Vec<(usize, ReferenceEntry)>,
    linked: Vec<SymbolId>,
}

fn scan_file(
    program: &Program,
    order: usize,
    file: FileId,
    source: &SourceFile,
    roots: &[SymbolId],
    names: &[String],
    cancel: &CancellationToken,
) -> Result<FileScan, Cancelled> {
    let checker = program.checker();
    let mut checkpoint = cancel.checkpoint();
    let text = source.text();
    let mut scan = FileScan {
        entries: Vec::new(),
        linked: Vec::new(),
    };
    for name in names {
        for hit in memmem::find_iter(text.as_bytes(), name.as_bytes()) {
            checkpoint.tick()?;
            let pos = hit as u32;
            let Ok(index) = source.tokens.binary_search_by_key(&pos, |t| t.pos) else {
                continue;
            };
            let token = source.tokens[index];
            if !position::is_name_token(token.kind) || position::token_text(source, &token) != name {
                continue;
            }
            let node = position::node_of_token(source, &token);
            if !position::is_name_token(source.arena.kind(node)) {
                continue;
            }
            let candidates = occurrence_symbols(&checker, file, node);
            let matched = candidates
                .iter()
                .any(|&candidate| roots.iter().any(|&root| denotes(&checker, candidate, root)));
            if !matched {
                continue;
            }
            scan.entries.push((order, reference_entry(source, node)));
            for candidate in candidates {
                let target = alias_target(&checker, candidate);
                if !roots.contains(&target) && !scan.linked.contains(&target) {
                    scan.linked.push(target);
                }
            }
        }
    }
    Ok(scan)
}

fn reference_entry(source: &SourceFile, node: NodeIndex) -> ReferenceEntry {
    let arena = &source.arena;
    let span = arena.span(node);
    ReferenceEntry {
        file_name: source.file_name.clone(),
        text_span: span,
        is_definition: is_definition(arena, node),
        is_write_access: is_write_access(arena, node, source.is_declaration_file),
        line_text: source.line_map.line_text(span.start, source.text()).to_string(),
    }
}

pub fn is_definition(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent(node);
    arena.name(parent) == node && is_declaration_kind(arena.kind(parent))
}

// =============================================================================
// Write access
// =============================================================================

/// Whether an occurrence writes its symbol: declarations that give it a
/// value, assignment targets and destructuring targets.
pub fn is_write_access(arena: &NodeArena, node: NodeIndex, in_declaration_file: bool) -> bool {
    let parent = arena.parent(node);
    if arena.name(parent) == node && is_declaration_kind(arena.kind(parent)) {
        return !in_declaration_file && declaration_writes(arena, parent);
    }

    let mut target = node;
    if arena.kind(parent) == SyntaxKind::PropertyAccessExpression && arena.name(parent) == node {
        target = parent;
    }
    while arena.kind(arena.parent(target)) == SyntaxKind::ParenthesizedExpression {
        target = arena.parent(target);
    }
    if is_assignment_target(arena, target) {
        return true;
    }
    let parent = arena.parent(target);
    match arena.kind(parent) {
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression => arena
            .get(parent)
            .is_some_and(|n| matches!(n.op, SyntaxKind::PlusPlus | SyntaxKind::MinusMinus)),
        _ => is_destructuring_target(arena, target),
    }
}

fn declaration_writes(arena: &NodeArena, declaration: NodeIndex) -> bool {
    match arena.kind(declaration) {
        SyntaxKind::VariableDeclaration | SyntaxKind::PropertyDeclaration => {
            arena.initializer(declaration).is_some()
        }
        SyntaxKind::PropertySignature | SyntaxKind::MethodSignature | SyntaxKind::IndexSignature => false,
        k if k.is_function_like() => arena.body(declaration).is_some(),
        _ => true,
    }
}

fn is_assignment_target(arena: &NodeArena, target: NodeIndex) -> bool {
    let parent = arena.parent(target);
    arena.kind(parent) == SyntaxKind::BinaryExpression
        && arena.left(parent) == target
        && arena.get(parent).is_some_and(|n| n.op.is_assignment_operator())
}

/// `[a, b] = ...` and `({ a, b: c } = ...)` write `a`, `b` and `c`.
fn is_destructuring_target(arena: &NodeArena, target: NodeIndex) -> bool {
    let mut current = target;
    loop {
        let parent = arena.parent(current);
        match arena.kind(parent) {
            SyntaxKind::ArrayLiteralExpression
            | SyntaxKind::ObjectLiteralExpression
            | SyntaxKind::SpreadElement
            | SyntaxKind::SpreadAssignment
            | SyntaxKind::ParenthesizedExpression => current = parent,
            SyntaxKind::ShorthandPropertyAssignment if arena.name(parent) == current => current = parent,
            SyntaxKind::PropertyAssignment if arena.initializer(parent) == current => current = parent,
            _ => break,
        }
    }
    current != target
        && matches!(
            arena.kind(current),
            SyntaxKind::ArrayLiteralExpression | SyntaxKind::ObjectLiteralExpression
        )
        && is_assignment_target(arena, current)
}

#[cfg(test)]
#[path = "tests/references_tests.rs"]
mod references_tests;
