//! Signature help inside call and `new` argument lists.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use tsq_checker::printer::part_kind_of_symbol;
use tsq_checker::{DeclRef, DisplayPartKind, DisplayParts, Signature, SignatureStyle, TypeChecker, TypePrinter};
use tsq_common::{Cancelled, TextSpan};
use tsq_syntax::{NodeArena, NodeFlags, NodeIndex, SourceFile, SyntaxKind};

use crate::jsdoc::{self, JsDoc, TagInfo};
use crate::position;
use crate::query::FileQuery;

/// Characters that open or advance signature help.
pub const TRIGGER_CHARACTERS: &[&str] = &["(", ",", "<"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHelpItems {
    pub items: Vec<SignatureHelpItem>,
    /// The argument list contents, between the parentheses.
    pub applicable_span: TextSpan,
    pub selected_item_index: usize,
    pub argument_index: usize,
    pub argument_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHelpItem {
    pub prefix: DisplayParts,
    pub suffix: DisplayParts,
    pub separator: DisplayParts,
    pub parameters: Vec<SignatureHelpParameter>,
    pub documentation: DisplayParts,
    pub tags: Vec<TagInfo>,
    pub is_variadic: bool,
}

impl SignatureHelpItem {
    /// `prefix`, the parameter labels joined by `separator`, then `suffix`.
    pub fn label(&self) -> String {
        let separator = self.separator.to_text();
        let parameters: Vec<String> = self.parameters.iter().map(|p| p.label.to_text()).collect();
        format!("{}{}{}", self.prefix.to_text(), parameters.join(&separator), self.suffix.to_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHelpParameter {
    pub name: String,
    pub label: DisplayParts,
    pub documentation: DisplayParts,
    pub is_optional: bool,
    pub is_rest: bool,
}

/// The argument list a cursor sits in and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentListInfo {
    pub call: NodeIndex,
    pub list: NodeIndex,
    pub applicable_span: TextSpan,
    pub argument_index: usize,
    pub argument_count: usize,
}

#[instrument(skip_all, fields(file = %q.source.file_name, offset, trigger = ?trigger_character))]
pub fn signature_help_at(
    q: &FileQuery<'_>,
    offset: u32,
    trigger_character: Option<&str>,
) -> Result<Option<SignatureHelpItems>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    // `)` retriggers; a list it closed no longer contains the cursor.
    if let Some(c) = trigger_character
        && c != ")"
        && !TRIGGER_CHARACTERS.contains(&c)
    {
        return Ok(None);
    }
    let Some(info) = containing_argument_list(q.source, offset) else {
        debug!("not inside an argument list");
        return Ok(None);
    };
    trace!(?info, "argument list");

    let checker = &q.checker;
    let candidates = checker.call_candidates(q.file, info.call);
    if candidates.is_empty() {
        debug!("callee has no signatures");
        return Ok(None);
    }
    q.cancel.check()?;

    let resolved = checker.resolve_call(q.file, info.call);
    let selected_declaration = resolved
        .as_ref()
        .and_then(|r| r.candidates.get(r.selected))
        .cloned();
    let compatible: Vec<usize> = (0..candidates.len())
        .filter(|&i| arity_compatible(&candidates[i], info.argument_index, info.argument_count))
        .collect();
    let shown: Vec<usize> = if compatible.is_empty() {
        (0..candidates.len()).collect()
    } else {
        compatible
    };
    let selected_item_index = shown
        .iter()
        .position(|&i| Some(&candidates[i]) == selected_declaration.as_ref())
        .unwrap_or(0);

    let name = callee_name(q, info.call);
    let items = shown
        .iter()
        .map(|&i| {
            let signature = match &resolved {
                Some(r) if Some(&candidates[i]) == selected_declaration.as_ref() => r.signature(checker),
                _ => candidates[i].clone(),
            };
            signature_item(checker, &name, &signature)
        })
        .collect();

    Ok(Some(SignatureHelpItems {
        items,
        applicable_span: info.applicable_span,
        selected_item_index,
        argument_index: info.argument_index,
        argument_count: info.argument_count,
    }))
}

fn arity_compatible(signature: &Signature, argument_index: usize, argument_count: usize) -> bool {
    let needed = argument_count.max(argument_index + 1);
    signature.has_rest_parameter()
        || needed <= signature.parameters.len()
        || (signature.parameters.is_empty() && argument_count == 0)
}

// =============================================================================
// Argument lists
// =============================================================================

/// The innermost call or `new` argument list enclosing `offset`. Lists
/// closed before the cursor are skipped, and a cursor in a string or comment
/// inside the list still belongs to it.
pub fn containing_argument_list(source: &SourceFile, offset: u32) -> Option<ArgumentListInfo> {
    let arena = &source.arena;
    let start = match position::previous_token(source, offset) {
        Some(token) => position::node_of_token(source, &token),
        None => return None,
    };
    arena
        .ancestors(start)
        .filter(|&n| arena.kind(n) == SyntaxKind::ArgumentList)
        .find(|&list| list_contains(source, list, offset))
        .map(|list| argument_list_info(source, list, offset))
}

fn list_contains(source: &SourceFile, list: NodeIndex, offset: u32) -> bool {
    let arena = &source.arena;
    let call = arena.parent(list);
    if !matches!(arena.kind(call), SyntaxKind::CallExpression | SyntaxKind::NewExpression) {
        return false;
    }
    let span = arena.span(list);
    if source.text().as_bytes().get(span.start as usize) != Some(&b'(') || offset <= span.start {
        return false;
    }
    if !is_unterminated(arena, list) {
        return offset < span.end();
    }
    // An open list reaches up to the next token.
    let next = source.tokens.get(source.token_index_after(span.end()));
    next.is_none_or(|t| t.kind == SyntaxKind::EndOfFile || offset <= t.pos)
}

fn is_unterminated(arena: &NodeArena, list: NodeIndex) -> bool {
    arena.get(list).is_some_and(|n| n.has_flag(NodeFlags::UNTERMINATED))
}

fn argument_list_info(source: &SourceFile, list: NodeIndex, offset: u32) -> ArgumentListInfo {
    let arena = &source.arena;
    let span = arena.span(list);
    let contents_end = if is_unterminated(arena, list) {
        span.end()
    } else {
        span.end().saturating_sub(1)
    };
    let contents = TextSpan::from_bounds(span.start + 1, contents_end);

    let mut depth = 0u32;
    let mut commas_before = 0;
    let mut commas = 0;
    let mut has_tokens = false;
    let first = source.token_index_after(contents.start);
    for token in &source.tokens[first.min(source.tokens.len())..] {
        if token.pos >= contents.end() || token.kind == SyntaxKind::EndOfFile {
            break;
        }
        has_tokens = true;
        match token.kind {
            SyntaxKind::OpenParen | SyntaxKind::OpenBracket | SyntaxKind::OpenBrace => depth += 1,
            SyntaxKind::CloseParen | SyntaxKind::CloseBracket | SyntaxKind::CloseBrace => {
                depth = depth.saturating_sub(1);
            }
            SyntaxKind::Comma if depth == 0 => {
                commas += 1;
                if token.end <= offset {
                    commas_before += 1;
                }
            }
            _ => {}
        }
    }
    let argument_count = if has_tokens || commas > 0 { commas + 1 } else { 0 };
    ArgumentListInfo {
        call: arena.parent(list),
        list,
        applicable_span: contents,
        argument_index: commas_before,
        argument_count,
    }
}

// =============================================================================
// Items
// =============================================================================

/// The callee's name as the label prefix shows it, with its display kind.
fn callee_name(q: &FileQuery<'_>, call: NodeIndex) -> Option<(String, DisplayPartKind)> {
    let arena = q.arena();
    let callee = arena.expression(call);
    let name = match arena.kind(callee) {
        SyntaxKind::Identifier => callee,
        SyntaxKind::PropertyAccessExpression => arena.name(callee),
        SyntaxKind::SuperKeyword => return Some(("super".to_string(), DisplayPartKind::Keyword)),
        _ => return None,
    };
    if name.is_none() {
        return None;
    }
    let kind = q
        .checker
        .symbol_at_location(q.file, name)
        .map(|s| q.checker.resolve_alias(s))
        .map_or(DisplayPartKind::Text, |s| part_kind_of_symbol(q.checker.symbol(s).flags));
    Some((q.source.name_text(name).to_string(), kind))
}

fn signature_item(
    checker: &TypeChecker<'_>,
    name: &Option<(String, DisplayPartKind)>,
    signature: &Signature,
) -> SignatureHelpItem {
    let mut printer = TypePrinter::new(checker);
    if let Some((text, kind)) = name {
        printer.parts_mut().push(*kind, text.as_str());
    }
    printer.write_type_parameters(&signature.type_parameters);
    printer.parts_mut().punctuation("(");
    let prefix = printer.finish();

    let mut printer = TypePrinter::new(checker);
    printer.parts_mut().punctuation(")");
    printer.write_return_type(signature, SignatureStyle::Colon);
    let suffix = printer.finish();

    let mut separator = DisplayParts::new();
    separator.punctuation(",").space();

    let doc = signature.declaration.and_then(|d| signature_docs(checker, d));
    let parameters = signature
        .parameters
        .iter()
        .map(|parameter| {
            let mut printer = TypePrinter::new(checker);
            printer.write_parameter(parameter);
            let mut documentation = DisplayParts::new();
            if let Some(tag) = doc.as_ref().and_then(|d| d.param(&parameter.name)) {
                documentation.text(jsdoc::render_inline_tags(&tag.text));
            }
            SignatureHelpParameter {
                name: parameter.name.clone(),
                label: printer.finish(),
                documentation,
                is_optional: parameter.optional,
                is_rest: parameter.rest,
            }
        })
        .collect();

    let mut documentation = DisplayParts::new();
    let mut tags = Vec::new();
    if let Some(doc) = &doc {
        documentation.text(doc.documentation());
        tags = doc
            .tag_infos()
            .into_iter()
            .filter(|t| !matches!(t.name.as_str(), "param" | "arg" | "argument"))
            .collect();
    }
    SignatureHelpItem {
        prefix,
        suffix,
        separator,
        parameters,
        documentation,
        tags,
        is_variadic: signature.has_rest_parameter(),
    }
}

/// Documentation of a signature's declaration. A function expression
/// assigned to a variable is documented on the variable statement.
fn signature_docs(checker: &TypeChecker<'_>, declaration: DeclRef) -> Option<JsDoc> {
    let source = checker.source(declaration.file)?;
    let arena = &source.arena;
    let parent = arena.parent(declaration.node);
    let host = if arena.kind(parent) == SyntaxKind::VariableDeclaration
        && arena.initializer(parent) == declaration.node
    {
        parent
    } else {
        declaration.node
    };
    jsdoc::docs_for_declaration(source, host)
}

#[cfg(test)]
#[path = "tests/signature_help_tests.rs"]
mod signature_help_tests;
