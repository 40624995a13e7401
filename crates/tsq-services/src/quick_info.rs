//! Hover text for the symbol under the cursor.
//!
//! The header is written as display parts so editors can colorize it:
//!
//! ```text
//! (property) A.#foo: number
//! function foo(a: number): string (+1 overload)
//! (alias) class Foo
//! import Foo
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use tsq_checker::{
    DeclRef, DisplayPartKind, DisplayParts, Signature, SignatureKind, SignatureStyle,
    SymbolFlags, SymbolId, TypeChecker, TypeId, TypePrinter,
};
use tsq_checker::printer::part_kind_of_symbol;
use tsq_common::{Cancelled, TextSpan};
use tsq_syntax::{NodeIndex, SyntaxKind};

use crate::display::{self, ScriptElementKind};
use crate::jsdoc::{self, TagInfo};
use crate::position;
use crate::query::FileQuery;
use crate::symbol_resolver::{alias_target, symbol_at_node};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickInfo {
    pub kind: ScriptElementKind,
    pub kind_modifiers: String,
    pub display_parts: DisplayParts,
    pub documentation: DisplayParts,
    pub tags: Vec<TagInfo>,
    pub deprecated: bool,
    pub text_span: TextSpan,
}

impl QuickInfo {
    pub fn display_string(&self) -> String {
        self.display_parts.to_text()
    }

    pub fn documentation_string(&self) -> String {
        self.documentation.to_text()
    }
}

/// Quick info at `offset`, or `None` when the offset names nothing.
#[instrument(skip_all, fields(file = %q.source.file_name, offset))]
pub fn quick_info_at(q: &FileQuery<'_>, offset: u32) -> Result<Option<QuickInfo>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    let node = position::node_at_offset(q.source, offset);
    let arena = q.arena();
    if node.is_none() || node == q.root() {
        return Ok(None);
    }
    let info = match arena.kind(node) {
        SyntaxKind::ThisKeyword => Some(this_info(q, node)),
        SyntaxKind::Constructor if is_on_constructor_keyword(q, offset) => {
            constructor_declaration_info(q, node)
        }
        SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier | SyntaxKind::StringLiteral => {
            symbol_info(q, node)
        }
        _ => None,
    };
    debug!(found = info.is_some(), "quick info");
    Ok(info)
}

fn symbol_info(q: &FileQuery<'_>, node: NodeIndex) -> Option<QuickInfo> {
    let checker = &q.checker;
    let arena = q.arena();
    let symbol = if arena.kind(node) == SyntaxKind::StringLiteral {
        if !tsq_checker::checker::is_module_specifier(arena, node) {
            return None;
        }
        q.program.resolve_module_specifier(q.file, q.source.name_text(node))?
    } else {
        symbol_at_node(checker, q.file, node)?
    };

    let mut writer = DisplayWriter::new(q, node);
    let described = alias_target(checker, symbol);
    if checker.symbol(symbol).has(SymbolFlags::ALIAS) {
        writer.write_alias(symbol, described);
    } else if is_class_in_new_expression(q, node, symbol) {
        writer.write_construct_call(symbol, arena.parent(node));
    } else {
        writer.write_symbol(symbol, true);
    }

    let (documentation, tags) = documentation_of(checker, described);
    Some(QuickInfo {
        kind: display::symbol_kind(checker, symbol),
        kind_modifiers: display::symbol_kind_modifiers(checker, symbol),
        display_parts: writer.finish(),
        documentation,
        tags,
        deprecated: display::is_deprecated(checker, described),
        text_span: q.span(node),
    })
}

/// Header and documentation of `symbol` away from any use site, as shown
/// for a completion entry.
pub(crate) fn symbol_description(
    q: &FileQuery<'_>,
    symbol: SymbolId,
) -> (DisplayParts, DisplayParts, Vec<TagInfo>) {
    let checker = &q.checker;
    let mut writer = DisplayWriter::new(q, NodeIndex::NONE);
    let described = alias_target(checker, symbol);
    if checker.symbol(symbol).has(SymbolFlags::ALIAS) {
        writer.write_alias(symbol, described);
    } else {
        writer.write_symbol(symbol, false);
    }
    let (documentation, tags) = documentation_of(checker, described);
    (writer.finish(), documentation, tags)
}

fn this_info(q: &FileQuery<'_>, node: NodeIndex) -> QuickInfo {
    let checker = &q.checker;
    let mut printer = checker.printer();
    printer.parts_mut().keyword("this").punctuation(":").space();
    printer.write_type(checker.this_type_at(q.file, node));
    QuickInfo {
        kind: ScriptElementKind::Parameter,
        kind_modifiers: String::new(),
        display_parts: printer.finish(),
        documentation: DisplayParts::new(),
        tags: Vec::new(),
        deprecated: false,
        text_span: q.span(node),
    }
}

fn is_on_constructor_keyword(q: &FileQuery<'_>, offset: u32) -> bool {
    position::token_at(q.source, offset)
        .or_else(|| position::previous_token(q.source, offset).filter(|t| t.end == offset))
        .is_some_and(|t| position::token_text(q.source, &t) == "constructor")
}

fn constructor_declaration_info(q: &FileQuery<'_>, constructor: NodeIndex) -> Option<QuickInfo> {
    let checker = &q.checker;
    let class = q.arena().parent(constructor);
    let class_symbol = checker.declaration_symbol(q.file, class)?;
    let signature = checker.signature_from_declaration(q.file, constructor);
    let mut writer = DisplayWriter::new(q, constructor);
    writer.write_constructor_signature(class_symbol, &signature, 0);
    let span = TextSpan::new(q.span(constructor).start, "constructor".len() as u32);
    let (documentation, tags) = documentation_at(checker, DeclRef::new(q.file, constructor));
    Some(QuickInfo {
        kind: ScriptElementKind::Constructor,
        kind_modifiers: String::new(),
        display_parts: writer.finish(),
        documentation,
        tags,
        deprecated: false,
        text_span: span,
    })
}

fn is_class_in_new_expression(q: &FileQuery<'_>, node: NodeIndex, symbol: SymbolId) -> bool {
    let arena = q.arena();
    let parent = arena.parent(node);
    arena.kind(parent) == SyntaxKind::NewExpression
        && arena.expression(parent) == node
        && q.checker.symbol(symbol).has(SymbolFlags::CLASS)
}

// =============================================================================
// Header
// =============================================================================

/// Writes the header lines of one request.
struct DisplayWriter<'q, 'a> {
    q: &'q FileQuery<'a>,
    printer: TypePrinter<'q, 'a>,
    /// The name under the cursor; selects overloads and location types.
    node: NodeIndex,
}

impl<'q, 'a> DisplayWriter<'q, 'a> {
    fn new(q: &'q FileQuery<'a>, node: NodeIndex) -> Self {
        DisplayWriter {
            q,
            printer: q.checker.printer(),
            node,
        }
    }

    fn finish(self) -> DisplayParts {
        self.printer.finish()
    }

    fn checker(&self) -> &'q TypeChecker<'a> {
        &self.q.checker
    }

    fn parts(&mut self) -> &mut DisplayParts {
        self.printer.parts_mut()
    }

    /// `(kind) ` or `kind ` for the bare prefixes.
    fn write_kind_prefix(&mut self, kind: ScriptElementKind) {
        if kind.is_bare_prefix() {
            self.parts().keyword(kind.as_str()).space();
        } else {
            let text = kind.as_str().to_string();
            self.parts().punctuation("(").text(text).punctuation(")").space();
        }
    }

    /// Symbol header; merged symbols get one line per declaration kind.
    /// `at_cursor` allows the type at the hovered name to stand in for the
    /// declared type.
    fn write_symbol(&mut self, symbol: SymbolId, at_cursor: bool) {
        let checker = self.checker();
        let flags = checker.symbol(symbol).flags;
        let facets = [
            SymbolFlags::CLASS,
            SymbolFlags::INTERFACE,
            SymbolFlags::TYPE_ALIAS,
            SymbolFlags::ENUM,
            SymbolFlags::FUNCTION,
            SymbolFlags::VARIABLE,
            SymbolFlags::MODULE,
        ];
        let present: Vec<SymbolFlags> = facets.into_iter().filter(|&f| flags.intersects(f)).collect();
        if present.is_empty() {
            self.write_member(symbol, at_cursor);
            return;
        }
        // The hovered name only types one declaration space.
        let at_cursor = at_cursor && present.len() == 1;
        for (i, facet) in present.into_iter().enumerate() {
            if i > 0 {
                self.parts().line_break();
            }
            self.write_facet(symbol, facet, at_cursor);
        }
    }

    fn write_facet(&mut self, symbol: SymbolId, facet: SymbolFlags, at_cursor: bool) {
        let checker = self.checker();
        let s = checker.symbol(symbol);
        match facet {
            SymbolFlags::CLASS => {
                let kind = display::symbol_kind(checker, symbol);
                if kind == ScriptElementKind::LocalClass {
                    self.write_kind_prefix(kind);
                } else {
                    self.parts().keyword("class").space();
                }
                self.printer.write_qualified_name(symbol);
                self.printer.write_type_parameters(&checker.type_parameters_of_symbol(symbol));
            }
            SymbolFlags::INTERFACE => {
                self.parts().keyword("interface").space();
                self.printer.write_qualified_name(symbol);
                self.printer.write_type_parameters(&checker.type_parameters_of_symbol(symbol));
            }
            SymbolFlags::TYPE_ALIAS => {
                self.parts().keyword("type").space();
                self.printer.write_qualified_name(symbol);
                self.printer.write_type_parameters(&checker.type_parameters_of_symbol(symbol));
                self.parts().space().operator("=").space();
                self.printer.write_type(checker.aliased_type(symbol));
            }
            SymbolFlags::ENUM => {
                if s.has(SymbolFlags::CONST_ENUM) {
                    self.parts().keyword("const").space();
                }
                self.parts().keyword("enum").space();
                self.printer.write_qualified_name(symbol);
            }
            SymbolFlags::FUNCTION => {
                let kind = if s.has(SymbolFlags::VARIABLE) {
                    ScriptElementKind::Function
                } else {
                    display::symbol_kind(checker, symbol)
                };
                self.write_kind_prefix(kind);
                let ty = self.value_type(symbol, at_cursor);
                self.write_callable(symbol, ty, SignatureKind::Call);
            }
            SymbolFlags::VARIABLE => {
                let kind = display::symbol_kind(checker, symbol);
                let kind = match kind {
                    ScriptElementKind::Function | ScriptElementKind::LocalFunction => ScriptElementKind::Variable,
                    other => other,
                };
                self.write_kind_prefix(kind);
                self.write_name(symbol);
                self.parts().punctuation(":").space();
                let ty = self.value_type(symbol, at_cursor);
                self.printer.write_type(ty);
            }
            _ => {
                if s.name.starts_with('"') {
                    self.parts().keyword("module").space();
                    self.parts().push(DisplayPartKind::StringLiteral, s.name.as_str());
                } else {
                    self.parts().keyword("namespace").space();
                    self.printer.write_qualified_name(symbol);
                }
            }
        }
    }

    /// Properties, methods, accessors, parameters, enum members and type
    /// parameters.
    fn write_member(&mut self, symbol: SymbolId, at_cursor: bool) {
        let checker = self.checker();
        let s = checker.symbol(symbol);
        let flags = s.flags;
        if flags.contains(SymbolFlags::ENUM_MEMBER) {
            self.write_kind_prefix(ScriptElementKind::EnumMember);
            self.printer.write_qualified_name(symbol);
            if let Some(value) = checker.enum_member_value(symbol) {
                self.parts().space().operator("=").space();
                let kind = match value {
                    tsq_checker::ConstantValue::Number(_) => DisplayPartKind::NumericLiteral,
                    tsq_checker::ConstantValue::String(_) => DisplayPartKind::StringLiteral,
                };
                self.parts().push(kind, value.to_string());
            }
            return;
        }
        if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            self.write_kind_prefix(ScriptElementKind::TypeParameter);
            self.parts().push(DisplayPartKind::TypeParameterName, s.name.as_str());
            if let Some(constraint) = checker.type_parameter_constraint(symbol) {
                self.parts().space().keyword("extends").space();
                self.printer.write_type(constraint);
            }
            return;
        }
        if flags.contains(SymbolFlags::CONSTRUCTOR) {
            let Some(class) = s.parent else {
                return;
            };
            let ty = checker.type_of_symbol(class);
            let signatures = checker.signatures_of_type(ty, SignatureKind::Construct);
            if let Some(signature) = signatures.first() {
                self.write_constructor_signature(class, signature, signatures.len() - 1);
            }
            return;
        }
        if flags.contains(SymbolFlags::METHOD) {
            self.write_kind_prefix(ScriptElementKind::Method);
            let ty = self.value_type(symbol, at_cursor);
            self.write_callable(symbol, ty, SignatureKind::Call);
            return;
        }
        let kind = if flags.contains(SymbolFlags::PARAMETER) && !flags.contains(SymbolFlags::PROPERTY) {
            ScriptElementKind::Parameter
        } else if flags.contains(SymbolFlags::GET_ACCESSOR) && !flags.contains(SymbolFlags::SET_ACCESSOR) {
            ScriptElementKind::Getter
        } else if flags.contains(SymbolFlags::SET_ACCESSOR) && !flags.contains(SymbolFlags::GET_ACCESSOR) {
            ScriptElementKind::Setter
        } else {
            ScriptElementKind::Property
        };
        self.write_kind_prefix(kind);
        self.write_name(symbol);
        if flags.contains(SymbolFlags::OPTIONAL) {
            self.parts().punctuation("?");
        }
        self.parts().punctuation(":").space();
        let ty = self.value_type(symbol, at_cursor);
        self.printer.write_type(ty);
    }

    /// A member name qualified by its owning class, interface or enum.
    fn write_name(&mut self, symbol: SymbolId) {
        let checker = self.checker();
        let s = checker.symbol(symbol);
        if let Some(parent) = s.parent {
            let owner = checker.symbol(parent);
            let qualifies = owner.has(SymbolFlags::CLASS | SymbolFlags::INTERFACE | SymbolFlags::ENUM)
                || (owner.has(SymbolFlags::MODULE) && !owner.has(SymbolFlags::SOURCE_MODULE));
            if qualifies && !owner.is_internal_name() && s.has(SymbolFlags::CLASS_MEMBER | SymbolFlags::ENUM_MEMBER) {
                self.printer.write_qualified_name(parent);
                self.parts().punctuation(".");
                self.parts().push(part_kind_of_symbol(s.flags), s.name.as_str());
                return;
            }
            if owner.has(SymbolFlags::MODULE) && !owner.has(SymbolFlags::SOURCE_MODULE) {
                self.printer.write_qualified_name(symbol);
                return;
            }
        }
        self.parts().push(part_kind_of_symbol(s.flags), s.name.as_str());
    }

    /// The type of the hovered occurrence when it names `symbol`, else the
    /// symbol's declared value type.
    fn value_type(&self, symbol: SymbolId, at_cursor: bool) -> TypeId {
        let checker = self.checker();
        if at_cursor {
            checker.type_at_location(self.q.file, self.node)
        } else {
            checker.type_of_symbol(symbol)
        }
    }

    /// `name(params): R` for the selected signature, with an overload count.
    fn write_callable(&mut self, symbol: SymbolId, ty: TypeId, kind: SignatureKind) {
        let checker = self.checker();
        let signatures = checker.signatures_of_type(ty, kind);
        self.write_name(symbol);
        let Some(selected) = self.selected_signature(&signatures) else {
            self.parts().punctuation(":").space();
            self.printer.write_type(ty);
            return;
        };
        self.printer.write_signature(&selected, SignatureStyle::Colon);
        self.write_overload_count(signatures.len().saturating_sub(1));
    }

    /// The overload whose declaration is under the cursor, the overload a
    /// call resolves to, or the first.
    fn selected_signature(&self, signatures: &[Signature]) -> Option<Signature> {
        let checker = self.checker();
        let arena = self.q.arena();
        let declaration = arena.parent(self.node);
        if let Some(found) = signatures
            .iter()
            .find(|s| s.declaration.is_some_and(|d| d.file == self.q.file && d.node == declaration))
        {
            return Some(found.clone());
        }
        if let Some(call) = self.enclosing_call()
            && let Some(resolved) = checker.resolve_call(self.q.file, call)
        {
            return Some(resolved.signature(checker));
        }
        signatures.first().cloned()
    }

    /// The call whose callee is the hovered name.
    fn enclosing_call(&self) -> Option<NodeIndex> {
        let arena = self.q.arena();
        let mut callee = self.node;
        let parent = arena.parent(callee);
        if arena.kind(parent) == SyntaxKind::PropertyAccessExpression && arena.name(parent) == callee {
            callee = parent;
        }
        let call = arena.parent(callee);
        (matches!(arena.kind(call), SyntaxKind::CallExpression | SyntaxKind::NewExpression)
            && arena.expression(call) == callee)
            .then_some(call)
    }

    fn write_overload_count(&mut self, others: usize) {
        if others == 0 {
            return;
        }
        let noun = if others == 1 { "overload" } else { "overloads" };
        self.parts()
            .space()
            .punctuation("(")
            .operator("+")
            .text(format!("{others} {noun}"))
            .punctuation(")");
    }

    /// `constructor Foo(a: number): Foo`.
    fn write_constructor_signature(&mut self, class: SymbolId, signature: &Signature, others: usize) {
        self.parts().keyword("constructor").space();
        self.printer.write_qualified_name(class);
        self.printer.write_signature(signature, SignatureStyle::Colon);
        self.write_overload_count(others);
    }

    /// `new Foo(...)` shows the construct signature the call selects.
    fn write_construct_call(&mut self, class: SymbolId, new_expression: NodeIndex) {
        let checker = self.checker();
        let Some(resolved) = checker.resolve_call(self.q.file, new_expression) else {
            self.write_symbol(class, true);
            return;
        };
        let others = resolved.candidates.len().saturating_sub(1);
        let signature = resolved.signature(checker);
        self.write_constructor_signature(class, &signature, others);
    }

    /// `(alias) <target header>` followed by the import or export line.
    fn write_alias(&mut self, alias: SymbolId, target: SymbolId) {
        let checker = self.checker();
        self.parts().punctuation("(").text("alias").punctuation(")").space();
        if target == alias {
            self.parts().push(DisplayPartKind::AliasName, checker.symbol(alias).name.as_str());
        } else {
            self.write_symbol(target, false);
        }
        self.parts().line_break();
        self.write_alias_declaration(alias);
    }

    fn write_alias_declaration(&mut self, alias: SymbolId) {
        let checker = self.checker();
        let s = checker.symbol(alias);
        let name = s.name.clone();
        let Some(declaration) = s.first_declaration() else {
            return;
        };
        let Some(source) = checker.source(declaration.file) else {
            return;
        };
        let arena = &source.arena;
        match arena.kind(declaration.node) {
            SyntaxKind::ExportSpecifier => {
                self.parts().keyword("export").space();
                self.parts().push(DisplayPartKind::AliasName, name);
            }
            SyntaxKind::ImportEqualsDeclaration => {
                self.parts().keyword("import").space();
                self.parts().push(DisplayPartKind::AliasName, name);
                self.parts().space().operator("=").space();
                let reference = arena.module_reference(declaration.node);
                if arena.kind(reference) == SyntaxKind::ExternalModuleReference {
                    let specifier = arena.expression(reference);
                    self.parts().keyword("require").punctuation("(");
                    self.parts()
                        .push(DisplayPartKind::StringLiteral, source.node_text(specifier));
                    self.parts().punctuation(")");
                } else {
                    self.parts().text(source.node_text(reference));
                }
            }
            _ => {
                self.parts().keyword("import").space();
                self.parts().push(DisplayPartKind::AliasName, name);
            }
        }
    }
}

// =============================================================================
// Documentation
// =============================================================================

/// Documentation of the first declaration that carries any. A parameter is
/// documented by its function's `@param` tag.
fn documentation_of(checker: &TypeChecker<'_>, symbol: SymbolId) -> (DisplayParts, Vec<TagInfo>) {
    let s = checker.symbol(symbol);
    if s.has(SymbolFlags::PARAMETER)
        && let Some(declaration) = s.first_declaration()
    {
        return parameter_documentation(checker, declaration, &s.name);
    }
    for &declaration in &s.declarations {
        let (documentation, tags) = documentation_at(checker, declaration);
        if !documentation.is_empty() || !tags.is_empty() {
            return (documentation, tags);
        }
    }
    (DisplayParts::new(), Vec::new())
}

fn documentation_at(checker: &TypeChecker<'_>, declaration: DeclRef) -> (DisplayParts, Vec<TagInfo>) {
    let doc = checker
        .source(declaration.file)
        .and_then(|source| jsdoc::docs_for_declaration(source, declaration.node));
    let Some(doc) = doc else {
        return (DisplayParts::new(), Vec::new());
    };
    let mut documentation = DisplayParts::new();
    documentation.text(doc.documentation());
    (documentation, doc.tag_infos())
}

fn parameter_documentation(
    checker: &TypeChecker<'_>,
    parameter: DeclRef,
    name: &str,
) -> (DisplayParts, Vec<TagInfo>) {
    let mut documentation = DisplayParts::new();
    let Some(source) = checker.source(parameter.file) else {
        return (documentation, Vec::new());
    };
    let function = source.arena.parent(parameter.node);
    if let Some(tag) = jsdoc::docs_for_declaration(source, function)
        .as_ref()
        .and_then(|doc| doc.param(name))
    {
        documentation.text(jsdoc::render_inline_tags(&tag.text));
    }
    (documentation, Vec::new())
}

#[cfg(test)]
#[path = "tests/quick_info_tests.rs"]
mod quick_info_tests;
