//! Type and signature display.
//!
//! Output is a sequence of [`DisplayPart`]s so editors can colorize it;
//! [`DisplayParts::to_text`] concatenates the runs into the plain string
//! used by `type_to_string`.
//!
//! ```text
//! (a: number, b?: string) => void
//! { x: number; readonly y?: string; m(): void; }
//! typeof import("./mod")
//! ```

use serde::{Deserialize, Serialize};
use tsq_common::limits::MAX_TYPE_PRINT_DEPTH;
use tsq_syntax::kind::is_identifier_text;

use crate::checker::TypeChecker;
use crate::symbols::{SymbolFlags, SymbolId};
use crate::types::{Parameter, Signature, SignatureKind, TypeId, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayPartKind {
    Keyword,
    Punctuation,
    Space,
    Text,
    ClassName,
    InterfaceName,
    AliasName,
    EnumName,
    EnumMemberName,
    ModuleName,
    TypeParameterName,
    FunctionName,
    MethodName,
    PropertyName,
    ParameterName,
    LocalName,
    StringLiteral,
    NumericLiteral,
    LineBreak,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPart {
    pub text: String,
    pub kind: DisplayPartKind,
}

/// An append-only run of display parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayParts(Vec<DisplayPart>);

impl DisplayParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DisplayPartKind, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.0.push(DisplayPart { text, kind });
        }
        self
    }

    pub fn keyword(&mut self, text: &str) -> &mut Self {
        self.push(DisplayPartKind::Keyword, text)
    }

    pub fn punctuation(&mut self, text: &str) -> &mut Self {
        self.push(DisplayPartKind::Punctuation, text)
    }

    pub fn operator(&mut self, text: &str) -> &mut Self {
        self.push(DisplayPartKind::Operator, text)
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(DisplayPartKind::Space, " ")
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(DisplayPartKind::Text, text)
    }

    pub fn line_break(&mut self) -> &mut Self {
        self.push(DisplayPartKind::LineBreak, "\n")
    }

    pub fn extend(&mut self, other: DisplayParts) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[DisplayPart] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DisplayPart> {
        self.0
    }

    pub fn to_text(&self) -> String {
        self.0.iter().map(|p| p.text.as_str()).collect()
    }
}

/// How a signature's return type is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStyle {
    /// `(a: T) => R`, for function types.
    Arrow,
    /// `(a: T): R`, for declarations and members.
    Colon,
}

/// Display part kind for a symbol name.
pub fn part_kind_of_symbol(flags: SymbolFlags) -> DisplayPartKind {
    if flags.contains(SymbolFlags::CLASS) {
        DisplayPartKind::ClassName
    } else if flags.contains(SymbolFlags::INTERFACE) {
        DisplayPartKind::InterfaceName
    } else if flags.intersects(SymbolFlags::ENUM) {
        DisplayPartKind::EnumName
    } else if flags.contains(SymbolFlags::ENUM_MEMBER) {
        DisplayPartKind::EnumMemberName
    } else if flags.contains(SymbolFlags::TYPE_ALIAS) {
        DisplayPartKind::AliasName
    } else if flags.contains(SymbolFlags::TYPE_PARAMETER) {
        DisplayPartKind::TypeParameterName
    } else if flags.intersects(SymbolFlags::MODULE) {
        DisplayPartKind::ModuleName
    } else if flags.contains(SymbolFlags::FUNCTION) {
        DisplayPartKind::FunctionName
    } else if flags.contains(SymbolFlags::METHOD) {
        DisplayPartKind::MethodName
    } else if flags.intersects(SymbolFlags::PROPERTY | SymbolFlags::ACCESSOR) {
        DisplayPartKind::PropertyName
    } else if flags.contains(SymbolFlags::PARAMETER) {
        DisplayPartKind::ParameterName
    } else if flags.contains(SymbolFlags::ALIAS) {
        DisplayPartKind::AliasName
    } else {
        DisplayPartKind::LocalName
    }
}

/// Writes types, signatures and names into a [`DisplayParts`] buffer.
///
/// Re-entering a type that is already being printed, or nesting past
/// `MAX_TYPE_PRINT_DEPTH`, prints `...`.
pub struct TypePrinter<'c, 'p> {
    checker: &'c TypeChecker<'p>,
    parts: DisplayParts,
    active: Vec<TypeId>,
}

impl<'c, 'p> TypePrinter<'c, 'p> {
    pub fn new(checker: &'c TypeChecker<'p>) -> Self {
        TypePrinter {
            checker,
            parts: DisplayParts::new(),
            active: Vec::new(),
        }
    }

    pub fn parts_mut(&mut self) -> &mut DisplayParts {
        &mut self.parts
    }

    pub fn finish(self) -> DisplayParts {
        self.parts
    }

    pub fn type_to_string(mut self, ty: TypeId) -> String {
        self.write_type(ty);
        self.parts.to_text()
    }

    pub fn signature_to_string(mut self, signature: &Signature, style: SignatureStyle) -> String {
        self.write_signature(signature, style);
        self.parts.to_text()
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub fn write_type(&mut self, ty: TypeId) {
        if self.active.len() as u32 >= MAX_TYPE_PRINT_DEPTH || self.active.contains(&ty) {
            self.parts.punctuation("...");
            return;
        }
        self.active.push(ty);
        self.write_type_kind(ty);
        self.active.pop();
    }

    fn write_type_kind(&mut self, ty: TypeId) {
        let checker = self.checker;
        let kind = checker.types().get(ty);
        match &*kind {
            TypeKind::Intrinsic(intrinsic) => {
                self.parts.keyword(intrinsic.keyword());
            }
            TypeKind::StringLiteral(value) => {
                let quoted = serde_json::to_string(&**value).unwrap_or_else(|_| format!("\"{value}\""));
                self.parts.push(DisplayPartKind::StringLiteral, quoted);
            }
            TypeKind::NumberLiteral(text) => {
                self.parts.push(DisplayPartKind::NumericLiteral, &**text);
            }
            TypeKind::BigIntLiteral(text) => {
                self.parts
                    .push(DisplayPartKind::NumericLiteral, format!("{text}n"));
            }
            TypeKind::BooleanLiteral(value) => {
                self.parts.keyword(if *value { "true" } else { "false" });
            }
            TypeKind::Union(members) => self.write_union(members),
            TypeKind::Intersection(members) => {
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        self.parts.space().operator("&").space();
                    }
                    self.write_operand(member, true);
                }
            }
            TypeKind::Array(element) => {
                self.write_operand(*element, false);
                self.parts.punctuation("[]");
            }
            TypeKind::Tuple(elements) => {
                self.parts.punctuation("[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.parts.punctuation(",").space();
                    }
                    if element.rest {
                        self.parts.punctuation("...");
                    }
                    self.write_type(element.ty);
                    if element.optional {
                        self.parts.punctuation("?");
                    }
                }
                self.parts.punctuation("]");
            }
            TypeKind::Reference { target, args } => {
                self.write_qualified_name(*target);
                if !args.is_empty() {
                    self.write_type_arguments(args);
                }
            }
            TypeKind::Anonymous { symbol, .. } => self.write_anonymous(ty, *symbol),
            TypeKind::TypeParameter(symbol) => {
                self.parts.push(
                    DisplayPartKind::TypeParameterName,
                    checker.symbol(*symbol).name.as_str(),
                );
            }
            TypeKind::TemplateLiteral { texts, types } => {
                let mut text = String::from("`");
                for (i, chunk) in texts.iter().enumerate() {
                    text.push_str(chunk);
                    if let Some(&hole) = types.get(i) {
                        text.push_str("${");
                        text.push_str(&TypePrinter::new(checker).type_to_string(hole));
                        text.push('}');
                    }
                }
                text.push('`');
                self.parts.push(DisplayPartKind::StringLiteral, text);
            }
            TypeKind::KeyOf(operand) => {
                self.parts.keyword("keyof").space();
                self.write_operand(*operand, false);
            }
            TypeKind::IndexedAccess { object, index } => {
                self.write_operand(*object, false);
                self.parts.punctuation("[");
                self.write_type(*index);
                self.parts.punctuation("]");
            }
        }
    }

    fn write_union(&mut self, members: &[TypeId]) {
        let types = self.checker.types();
        for (i, &member) in members.iter().enumerate() {
            if i > 0 {
                self.parts.space().operator("|").space();
            }
            let wrap = matches!(&*types.get(member), TypeKind::Intersection(_))
                || self.is_function_like(member);
            self.write_wrapped(member, wrap);
        }
    }

    /// Write `ty` as an operand of `[]`, `keyof`, `&` or an indexed access,
    /// parenthesizing unions and function types.
    fn write_operand(&mut self, ty: TypeId, in_intersection: bool) {
        let wrap = match &*self.checker.types().get(ty) {
            TypeKind::Union(_) => true,
            TypeKind::Intersection(_) => !in_intersection,
            _ => self.is_function_like(ty),
        };
        self.write_wrapped(ty, wrap);
    }

    fn write_wrapped(&mut self, ty: TypeId, wrap: bool) {
        if wrap {
            self.parts.punctuation("(");
        }
        self.write_type(ty);
        if wrap {
            self.parts.punctuation(")");
        }
    }

    fn write_type_arguments(&mut self, args: &[TypeId]) {
        self.parts.punctuation("<");
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.parts.punctuation(",").space();
            }
            self.write_type(arg);
        }
        self.parts.punctuation(">");
    }

    /// Anonymous types printed as arrow signatures.
    fn is_function_like(&self, ty: TypeId) -> bool {
        matches!(self.object_shape(ty), ObjectShape::Arrow(_))
    }

    fn object_shape(&self, ty: TypeId) -> ObjectShape {
        let checker = self.checker;
        let TypeKind::Anonymous { symbol, .. } = &*checker.types().get(ty) else {
            return ObjectShape::Other;
        };
        let symbol = checker.symbol(*symbol);
        if symbol.has(SymbolFlags::CLASS | SymbolFlags::ENUM)
            || symbol.has(SymbolFlags::MODULE)
            || (symbol.has(SymbolFlags::FUNCTION | SymbolFlags::METHOD)
                && !symbol.exports.is_empty())
        {
            return ObjectShape::TypeOf;
        }
        let properties = checker.declared_properties_of_type(ty);
        let calls = checker.signatures_of_type(ty, SignatureKind::Call);
        let constructs = checker.signatures_of_type(ty, SignatureKind::Construct);
        let indexes = checker.index_signatures_of_type(ty);
        if properties.is_empty() && indexes.is_empty() {
            match (calls.len(), constructs.len()) {
                (1, 0) => return ObjectShape::Arrow(calls.into_iter().next()),
                (0, 1) => return ObjectShape::Arrow(constructs.into_iter().next()),
                _ => {}
            }
        }
        ObjectShape::Literal
    }

    fn write_anonymous(&mut self, ty: TypeId, symbol: SymbolId) {
        let checker = self.checker;
        match self.object_shape(ty) {
            ObjectShape::TypeOf => {
                self.parts.keyword("typeof").space();
                let s = checker.symbol(symbol);
                let module_path = if s.has(SymbolFlags::SOURCE_MODULE) {
                    s.name.strip_prefix('"').and_then(|n| n.strip_suffix('"'))
                } else if s.has(SymbolFlags::VALUE_MODULE) && !s.has(SymbolFlags::NAMESPACE_MODULE) {
                    Some(s.name.as_str())
                } else {
                    None
                };
                if let Some(path) = module_path {
                    self.parts
                        .keyword("import")
                        .punctuation("(")
                        .push(DisplayPartKind::StringLiteral, format!("\"{path}\""))
                        .punctuation(")");
                } else {
                    self.write_qualified_name(symbol);
                }
            }
            ObjectShape::Arrow(Some(signature)) => {
                if signature.kind == SignatureKind::Construct {
                    self.parts.keyword("new").space();
                }
                self.write_signature(&signature, SignatureStyle::Arrow);
            }
            ObjectShape::Arrow(None) | ObjectShape::Other | ObjectShape::Literal => {
                self.write_object_literal(ty)
            }
        }
    }

    fn write_object_literal(&mut self, ty: TypeId) {
        let checker = self.checker;
        let properties = checker.declared_properties_of_type(ty);
        let calls = checker.signatures_of_type(ty, SignatureKind::Call);
        let constructs = checker.signatures_of_type(ty, SignatureKind::Construct);
        let indexes = checker.index_signatures_of_type(ty);
        if properties.is_empty() && calls.is_empty() && constructs.is_empty() && indexes.is_empty() {
            self.parts.punctuation("{}");
            return;
        }
        self.parts.punctuation("{").space();
        for signature in &calls {
            self.write_signature(signature, SignatureStyle::Colon);
            self.parts.punctuation(";").space();
        }
        for signature in &constructs {
            self.parts.keyword("new").space();
            self.write_signature(signature, SignatureStyle::Colon);
            self.parts.punctuation(";").space();
        }
        for (key, value) in indexes {
            self.parts
                .punctuation("[")
                .push(DisplayPartKind::ParameterName, "x")
                .punctuation(":")
                .space();
            self.write_type(key);
            self.parts.punctuation("]").punctuation(":").space();
            self.write_type(value);
            self.parts.punctuation(";").space();
        }
        for property in properties {
            let member = checker.symbol(property.symbol);
            if member.has(SymbolFlags::READONLY) {
                self.parts.keyword("readonly").space();
            }
            let is_method = member.has(SymbolFlags::METHOD);
            let name = member.name.as_str();
            let kind = if is_method {
                DisplayPartKind::MethodName
            } else {
                DisplayPartKind::PropertyName
            };
            if is_identifier_text(name) || name.starts_with('#') {
                self.parts.push(kind, name);
            } else {
                let quoted = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""));
                self.parts.push(DisplayPartKind::StringLiteral, quoted);
            }
            if member.has(SymbolFlags::OPTIONAL) {
                self.parts.punctuation("?");
            }
            let member_type = checker.type_of_property(property);
            let signatures = if is_method {
                checker.signatures_of_type(member_type, SignatureKind::Call)
            } else {
                Vec::new()
            };
            if signatures.len() == 1 {
                self.write_signature(&signatures[0], SignatureStyle::Colon);
            } else {
                self.parts.punctuation(":").space();
                self.write_type(member_type);
            }
            self.parts.punctuation(";").space();
        }
        self.parts.punctuation("}");
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Write a symbol name qualified by its enclosing namespaces and enums,
    /// e.g. `NS.Inner.C` or `Color.Red`.
    pub fn write_qualified_name(&mut self, symbol: SymbolId) {
        let checker = self.checker;
        let mut chain = vec![symbol];
        let mut current = checker.symbol(symbol).parent;
        while let Some(parent) = current {
            let parent_symbol = checker.symbol(parent);
            let qualifies = parent_symbol.has(SymbolFlags::NAMESPACE_MODULE | SymbolFlags::ENUM)
                && !parent_symbol.has(SymbolFlags::SOURCE_MODULE);
            if !qualifies || chain.len() > 32 {
                break;
            }
            chain.push(parent);
            current = parent_symbol.parent;
        }
        for (i, &id) in chain.iter().rev().enumerate() {
            if i > 0 {
                self.parts.punctuation(".");
            }
            let s = checker.symbol(id);
            self.parts.push(part_kind_of_symbol(s.flags), s.name.as_str());
        }
    }

    pub fn write_type_parameters(&mut self, parameters: &[SymbolId]) {
        if parameters.is_empty() {
            return;
        }
        let checker = self.checker;
        self.parts.punctuation("<");
        for (i, &parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.parts.punctuation(",").space();
            }
            self.parts.push(
                DisplayPartKind::TypeParameterName,
                checker.symbol(parameter).name.as_str(),
            );
            if let Some(constraint) = checker.type_parameter_constraint(parameter) {
                self.parts.space().keyword("extends").space();
                self.write_type(constraint);
            }
            if let Some(default) = checker.type_parameter_default(parameter) {
                self.parts.space().operator("=").space();
                self.write_type(default);
            }
        }
        self.parts.punctuation(">");
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// Write `<T>(a: T, b?: string) => R` or `<T>(a: T, b?: string): R`.
    pub fn write_signature(&mut self, signature: &Signature, style: SignatureStyle) {
        self.write_type_parameters(&signature.type_parameters);
        self.parts.punctuation("(");
        for (i, parameter) in signature.parameters.iter().enumerate() {
            if i > 0 {
                self.parts.punctuation(",").space();
            }
            self.write_parameter(parameter);
        }
        self.parts.punctuation(")");
        self.write_return_type(signature, style);
    }

    pub fn write_return_type(&mut self, signature: &Signature, style: SignatureStyle) {
        match style {
            SignatureStyle::Arrow => {
                self.parts.space().punctuation("=>").space();
            }
            SignatureStyle::Colon => {
                self.parts.punctuation(":").space();
            }
        }
        self.write_type(signature.return_type);
    }

    /// Write `name?: T` or `...name: T[]`.
    pub fn write_parameter(&mut self, parameter: &Parameter) {
        if parameter.rest {
            self.parts.punctuation("...");
        }
        self.parts
            .push(DisplayPartKind::ParameterName, parameter.name.as_str());
        if parameter.optional {
            self.parts.punctuation("?");
        }
        self.parts.punctuation(":").space();
        self.write_type(parameter.ty);
    }
}

enum ObjectShape {
    /// `typeof C`, `typeof NS`, `typeof import("m")`.
    TypeOf,
    /// A lone call or construct signature.
    Arrow(Option<Signature>),
    Literal,
    Other,
}

#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
