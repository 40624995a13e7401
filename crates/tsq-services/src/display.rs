//! Element kinds and kind modifiers shared by completions, quick info and
//! navigation results.

use serde::{Deserialize, Serialize};
use tsq_checker::{SymbolFlags, SymbolId, TypeChecker};
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use crate::jsdoc;

/// Kind of a named element, as editors expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptElementKind {
    #[serde(rename = "")]
    Unknown,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "script")]
    Script,
    #[serde(rename = "module")]
    Module,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "local class")]
    LocalClass,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "type")]
    TypeAlias,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "enum member")]
    EnumMember,
    #[serde(rename = "var")]
    Variable,
    #[serde(rename = "local var")]
    LocalVariable,
    #[serde(rename = "let")]
    Let,
    #[serde(rename = "const")]
    Const,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "local function")]
    LocalFunction,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "getter")]
    Getter,
    #[serde(rename = "setter")]
    Setter,
    #[serde(rename = "property")]
    Property,
    #[serde(rename = "constructor")]
    Constructor,
    #[serde(rename = "index")]
    Index,
    #[serde(rename = "parameter")]
    Parameter,
    #[serde(rename = "type parameter")]
    TypeParameter,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "directory")]
    Directory,
    #[serde(rename = "external module name")]
    ExternalModuleName,
}

impl ScriptElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptElementKind::Unknown => "",
            ScriptElementKind::Warning => "warning",
            ScriptElementKind::Keyword => "keyword",
            ScriptElementKind::Script => "script",
            ScriptElementKind::Module => "module",
            ScriptElementKind::Class => "class",
            ScriptElementKind::LocalClass => "local class",
            ScriptElementKind::Interface => "interface",
            ScriptElementKind::TypeAlias => "type",
            ScriptElementKind::Enum => "enum",
            ScriptElementKind::EnumMember => "enum member",
            ScriptElementKind::Variable => "var",
            ScriptElementKind::LocalVariable => "local var",
            ScriptElementKind::Let => "let",
            ScriptElementKind::Const => "const",
            ScriptElementKind::Function => "function",
            ScriptElementKind::LocalFunction => "local function",
            ScriptElementKind::Method => "method",
            ScriptElementKind::Getter => "getter",
            ScriptElementKind::Setter => "setter",
            ScriptElementKind::Property => "property",
            ScriptElementKind::Constructor => "constructor",
            ScriptElementKind::Index => "index",
            ScriptElementKind::Parameter => "parameter",
            ScriptElementKind::TypeParameter => "type parameter",
            ScriptElementKind::Alias => "alias",
            ScriptElementKind::String => "string",
            ScriptElementKind::Directory => "directory",
            ScriptElementKind::ExternalModuleName => "external module name",
        }
    }

    /// Kinds quick info writes without parentheses.
    pub fn is_bare_prefix(self) -> bool {
        matches!(
            self,
            ScriptElementKind::Variable
                | ScriptElementKind::Let
                | ScriptElementKind::Const
                | ScriptElementKind::Function
        )
    }
}

impl std::fmt::Display for ScriptElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element kind of a symbol.
pub fn symbol_kind(checker: &TypeChecker<'_>, symbol: SymbolId) -> ScriptElementKind {
    let s = checker.symbol(symbol);
    let flags = s.flags;
    if flags.contains(SymbolFlags::CLASS) {
        let is_expression = s.declarations.iter().any(|d| {
            checker
                .source(d.file)
                .is_some_and(|f| f.arena.kind(d.node) == SyntaxKind::ClassExpression)
        });
        return if is_expression {
            ScriptElementKind::LocalClass
        } else {
            ScriptElementKind::Class
        };
    }
    if flags.intersects(SymbolFlags::ENUM) {
        return ScriptElementKind::Enum;
    }
    if flags.contains(SymbolFlags::TYPE_ALIAS) {
        return ScriptElementKind::TypeAlias;
    }
    if flags.contains(SymbolFlags::INTERFACE) {
        return ScriptElementKind::Interface;
    }
    if flags.contains(SymbolFlags::TYPE_PARAMETER) {
        return ScriptElementKind::TypeParameter;
    }
    if flags.contains(SymbolFlags::ENUM_MEMBER) {
        return ScriptElementKind::EnumMember;
    }
    if flags.contains(SymbolFlags::ALIAS) {
        return ScriptElementKind::Alias;
    }
    if flags.intersects(SymbolFlags::MODULE) {
        return ScriptElementKind::Module;
    }
    member_or_variable_kind(checker, symbol)
}

fn member_or_variable_kind(checker: &TypeChecker<'_>, symbol: SymbolId) -> ScriptElementKind {
    let s = checker.symbol(symbol);
    let flags = s.flags;
    if flags.intersects(SymbolFlags::VARIABLE) && !flags.contains(SymbolFlags::PROPERTY) {
        if flags.contains(SymbolFlags::PARAMETER) {
            return ScriptElementKind::Parameter;
        }
        let declaration_flags = s
            .first_declaration()
            .map(|d| combined_node_flags(checker, d.file, d.node))
            .unwrap_or_default();
        if declaration_flags.contains(NodeFlags::CONST) {
            return ScriptElementKind::Const;
        }
        if declaration_flags.contains(NodeFlags::LET) {
            return ScriptElementKind::Let;
        }
        return if is_local(checker, symbol) {
            ScriptElementKind::LocalVariable
        } else {
            ScriptElementKind::Variable
        };
    }
    if flags.contains(SymbolFlags::FUNCTION) {
        return if is_local(checker, symbol) {
            ScriptElementKind::LocalFunction
        } else {
            ScriptElementKind::Function
        };
    }
    if flags.contains(SymbolFlags::GET_ACCESSOR) {
        return ScriptElementKind::Getter;
    }
    if flags.contains(SymbolFlags::SET_ACCESSOR) {
        return ScriptElementKind::Setter;
    }
    if flags.contains(SymbolFlags::METHOD) {
        return ScriptElementKind::Method;
    }
    if flags.contains(SymbolFlags::CONSTRUCTOR) {
        return ScriptElementKind::Constructor;
    }
    if flags.contains(SymbolFlags::SIGNATURE) {
        return ScriptElementKind::Index;
    }
    if flags.contains(SymbolFlags::PROPERTY) {
        return ScriptElementKind::Property;
    }
    ScriptElementKind::Unknown
}

/// A variable or function declared inside a function body rather than at
/// file or namespace level.
fn is_local(checker: &TypeChecker<'_>, symbol: SymbolId) -> bool {
    let s = checker.symbol(symbol);
    if s.parent.is_some() {
        return false;
    }
    s.declarations.iter().any(|d| {
        let Some(source) = checker.source(d.file) else {
            return false;
        };
        let arena = &source.arena;
        match arena.kind(d.node) {
            SyntaxKind::FunctionExpression => true,
            SyntaxKind::VariableDeclaration | SyntaxKind::FunctionDeclaration => arena
                .ancestors(arena.parent(d.node))
                .take_while(|&a| {
                    !matches!(arena.kind(a), SyntaxKind::SourceFile | SyntaxKind::ModuleBlock)
                })
                .any(|a| arena.kind(a).is_function_like()),
            _ => false,
        }
    })
}

/// Flags of a declaration merged with those of its variable statement.
pub fn combined_node_flags(
    checker: &TypeChecker<'_>,
    file: tsq_checker::FileId,
    node: NodeIndex,
) -> NodeFlags {
    let Some(source) = checker.source(file) else {
        return NodeFlags::empty();
    };
    let arena = &source.arena;
    let mut flags = arena.flags(node);
    if arena.kind(node) == SyntaxKind::VariableDeclaration {
        flags |= arena.flags(arena.parent(node));
    }
    if source.is_declaration_file {
        flags |= NodeFlags::AMBIENT;
    }
    flags
}

pub fn is_deprecated(checker: &TypeChecker<'_>, symbol: SymbolId) -> bool {
    let Some(decl) = checker.symbol(symbol).first_declaration() else {
        return false;
    };
    checker
        .source(decl.file)
        .and_then(|source| jsdoc::docs_for_declaration(source, decl.node))
        .is_some_and(|doc| doc.is_deprecated())
}

/// Comma-joined modifiers of a symbol's first declaration, followed by
/// those of an alias target and `optional`.
pub fn symbol_kind_modifiers(checker: &TypeChecker<'_>, symbol: SymbolId) -> String {
    let mut modifiers: Vec<&'static str> = Vec::new();
    declaration_modifiers(checker, symbol, &mut modifiers);
    if checker.symbol(symbol).has(SymbolFlags::ALIAS) {
        let target = checker.resolve_alias(symbol);
        if target != symbol {
            declaration_modifiers(checker, target, &mut modifiers);
        }
    }
    if checker.symbol(symbol).has(SymbolFlags::OPTIONAL) {
        push_unique(&mut modifiers, "optional");
    }
    modifiers.join(",")
}

fn declaration_modifiers(checker: &TypeChecker<'_>, symbol: SymbolId, out: &mut Vec<&'static str>) {
    let s = checker.symbol(symbol);
    let Some(decl) = s.first_declaration() else {
        return;
    };
    let flags = combined_node_flags(checker, decl.file, decl.node);
    for (flag, text) in [
        (NodeFlags::PRIVATE, "private"),
        (NodeFlags::PROTECTED, "protected"),
        (NodeFlags::PUBLIC, "public"),
        (NodeFlags::STATIC, "static"),
        (NodeFlags::ABSTRACT, "abstract"),
        (NodeFlags::EXPORT, "export"),
    ] {
        if flags.contains(flag) {
            push_unique(out, text);
        }
    }
    if is_deprecated(checker, symbol) {
        push_unique(out, "deprecated");
    }
    if flags.intersects(NodeFlags::AMBIENT | NodeFlags::DECLARE) {
        push_unique(out, "declare");
    }
}

fn push_unique(out: &mut Vec<&'static str>, text: &'static str) {
    if !out.contains(&text) {
        out.push(text);
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod display_tests;
