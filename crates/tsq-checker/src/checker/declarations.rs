//! Types of declared symbols.

use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use super::{Resolution, TypeChecker};
use crate::symbols::{DeclRef, FileId, SymbolFlags, SymbolId};
use crate::types::{TypeId, TypeKind, TypeMapper};

/// Compile-time value of an enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Number(f64),
    String(String),
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::Number(n) => write!(f, "{n}"),
            ConstantValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl<'p> TypeChecker<'p> {
    pub(super) fn compute_type_of_symbol(&self, id: SymbolId) -> TypeId {
        let symbol = self.symbol(id);
        let types = self.types();

        if symbol.has(SymbolFlags::ALIAS) {
            let target = self.resolve_alias(id);
            if target != id {
                return self.type_of_symbol(target);
            }
            // `export default <expression>`
            return symbol
                .first_declaration()
                .filter(|d| {
                    self.arena(d.file)
                        .is_some_and(|a| a.kind(d.node) == SyntaxKind::ExportAssignment)
                })
                .and_then(|d| {
                    let arena = self.arena(d.file)?;
                    Some(self.type_of_expression(d.file, arena.expression(d.node)))
                })
                .unwrap_or(TypeId::ANY);
        }
        if symbol.is_synthetic() {
            return self.type_of_synthetic_member(id);
        }
        if symbol.has(SymbolFlags::ENUM_MEMBER) {
            return types.reference(id, Vec::new());
        }
        if symbol.has(SymbolFlags::ACCESSOR) {
            return self.type_of_accessor(id);
        }
        if symbol.has(SymbolFlags::VARIABLE | SymbolFlags::PROPERTY) {
            return symbol
                .declarations
                .iter()
                .map(|d| self.type_of_declaration(d.file, d.node))
                .find(|&t| t != TypeId::ANY)
                .unwrap_or(TypeId::ANY);
        }
        if symbol.has(
            SymbolFlags::FUNCTION
                | SymbolFlags::METHOD
                | SymbolFlags::CLASS
                | SymbolFlags::ENUM
                | SymbolFlags::VALUE_MODULE
                | SymbolFlags::OBJECT_LITERAL
                | SymbolFlags::TYPE_LITERAL,
        ) {
            return types.anonymous(id, TypeMapper::new());
        }
        TypeId::ANY
    }

    pub(super) fn compute_declared_type_of_symbol(&self, id: SymbolId) -> TypeId {
        let symbol = self.symbol(id);
        let types = self.types();
        if symbol.has(SymbolFlags::ALIAS) {
            let target = self.resolve_alias(id);
            return if target == id {
                TypeId::ANY
            } else {
                self.compute_declared_type_of_symbol(target)
            };
        }
        if symbol.has(SymbolFlags::CLASS | SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS) {
            let args = self
                .type_parameters_of_symbol(id)
                .into_iter()
                .map(|p| types.type_parameter(p))
                .collect();
            return types.reference(id, args);
        }
        if symbol.has(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) {
            return types.reference(id, Vec::new());
        }
        if symbol.has(SymbolFlags::TYPE_PARAMETER) {
            return types.type_parameter(id);
        }
        if symbol.has(SymbolFlags::TYPE_LITERAL) {
            return types.anonymous(id, TypeMapper::new());
        }
        TypeId::ANY
    }

    // =========================================================================
    // Variable-like declarations
    // =========================================================================

    /// Type of a variable, parameter, property or binding element
    /// declaration node.
    pub fn type_of_declaration(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        let kind = arena.kind(node);
        if kind == SyntaxKind::BindingElement {
            return self.binding_element_type(file, node);
        }
        if kind == SyntaxKind::ShorthandPropertyAssignment {
            return self
                .shorthand_value_symbol(file, node)
                .map_or(TypeId::ANY, |s| types.widen(self.type_of_symbol(s)));
        }
        if kind == SyntaxKind::PropertyAccessExpression {
            // Synthetic member assignment target.
            let assignment = arena.parent(node);
            return types.widen(self.type_of_expression(file, arena.right(assignment)));
        }
        if !kind.is_variable_like() {
            return TypeId::ANY;
        }
        let annotation = arena.type_node(node);
        if annotation.is_some() {
            return self.type_from_type_node(file, annotation);
        }
        let flags = arena.flags(node);
        let initializer = arena.initializer(node);
        match kind {
            SyntaxKind::Parameter => {
                if let Some(ty) = self.contextual_parameter_type(file, node) {
                    return ty;
                }
                if initializer.is_some() {
                    return types.widen(self.type_of_expression(file, initializer));
                }
                if flags.contains(NodeFlags::REST) {
                    return types.array(TypeId::ANY);
                }
                TypeId::ANY
            }
            SyntaxKind::VariableDeclaration => {
                let statement = arena.parent(node);
                let owner = arena.parent(statement);
                match arena.kind(owner) {
                    SyntaxKind::ForOfStatement if arena.child(owner, 0) == statement => {
                        let iterated = self.type_of_expression(file, arena.expression(owner));
                        return self.element_type_of(iterated);
                    }
                    SyntaxKind::ForInStatement if arena.child(owner, 0) == statement => {
                        return TypeId::STRING;
                    }
                    _ => {}
                }
                if arena.kind(statement) == SyntaxKind::CatchClause {
                    return TypeId::ANY;
                }
                if initializer.is_none() {
                    return TypeId::ANY;
                }
                let ty = self.type_of_expression(file, initializer);
                if flags.contains(NodeFlags::CONST) {
                    ty
                } else {
                    types.widen(ty)
                }
            }
            SyntaxKind::PropertyDeclaration => {
                if initializer.is_none() {
                    return TypeId::ANY;
                }
                let ty = self.type_of_expression(file, initializer);
                if flags.contains(NodeFlags::READONLY) {
                    ty
                } else {
                    types.widen(ty)
                }
            }
            SyntaxKind::PropertyAssignment => {
                if initializer.is_none() {
                    return TypeId::ANY;
                }
                types.widen(self.type_of_expression(file, initializer))
            }
            SyntaxKind::EnumMember => {
                let owner = arena.parent(node);
                self.declaration_symbol(file, owner)
                    .map_or(TypeId::NUMBER, |e| types.reference(e, Vec::new()))
            }
            _ => TypeId::ANY,
        }
    }

    /// Type a contextually typed function expression gives its parameter.
    fn contextual_parameter_type(&self, file: FileId, parameter: NodeIndex) -> Option<TypeId> {
        let arena = self.arena(file)?;
        let function = arena.parent(parameter);
        if !matches!(
            arena.kind(function),
            SyntaxKind::ArrowFunction | SyntaxKind::FunctionExpression | SyntaxKind::MethodDeclaration
        ) {
            return None;
        }
        let index = arena.parameters(function).iter().position(|&p| p == parameter)?;
        let contextual = self.contextual_type(file, function)?;
        let signature = self
            .signatures_of_type(contextual, crate::types::SignatureKind::Call)
            .into_iter()
            .next()?;
        let declared_rest = arena.flags(parameter).contains(NodeFlags::REST);
        match signature.parameters.get(index) {
            Some(p) if declared_rest || !p.rest => Some(p.ty),
            Some(p) => Some(self.element_type_of(p.ty)),
            None => {
                let last = signature.parameters.last().filter(|p| p.rest)?;
                Some(self.element_type_of(last.ty))
            }
        }
    }

    fn binding_element_type(&self, file: FileId, element: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        let pattern = arena.parent(element);
        let source = self.binding_pattern_source_type(file, pattern);
        let rest = arena.flags(element).contains(NodeFlags::REST);
        let ty = if arena.kind(pattern) == SyntaxKind::ObjectBindingPattern {
            if rest {
                source
            } else {
                let property = arena.property_name(element);
                let key = if property.is_some() {
                    property
                } else {
                    arena.name(element)
                };
                self.property_of_type(source, arena.text(key))
                    .map_or(TypeId::ANY, |p| self.type_of_property(p))
            }
        } else {
            let index = arena
                .elements(pattern)
                .iter()
                .position(|&e| e == element)
                .unwrap_or(0);
            let resolved = self.resolve_type(source);
            match &*types.get(resolved) {
                TypeKind::Tuple(elements) if !rest => {
                    elements.get(index).map_or(TypeId::UNDEFINED, |e| e.ty)
                }
                _ if rest => types.array(self.element_type_of(source)),
                _ => self.element_type_of(source),
            }
        };
        let initializer = arena.initializer(element);
        if ty == TypeId::ANY && initializer.is_some() {
            return types.widen(self.type_of_expression(file, initializer));
        }
        ty
    }

    /// Type destructured by a binding pattern.
    pub(crate) fn binding_pattern_source_type(&self, file: FileId, pattern: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let owner = arena.parent(pattern);
        match arena.kind(owner) {
            SyntaxKind::BindingElement => self.binding_element_type(file, owner),
            SyntaxKind::VariableDeclaration | SyntaxKind::Parameter => {
                let annotation = arena.type_node(owner);
                if annotation.is_some() {
                    return self.type_from_type_node(file, annotation);
                }
                if arena.kind(owner) == SyntaxKind::Parameter
                    && let Some(ty) = self.contextual_parameter_type(file, owner)
                {
                    return ty;
                }
                let initializer = arena.initializer(owner);
                if initializer.is_some() {
                    self.type_of_expression(file, initializer)
                } else {
                    self.type_of_declaration(file, owner)
                }
            }
            _ => TypeId::ANY,
        }
    }

    fn type_of_synthetic_member(&self, id: SymbolId) -> TypeId {
        let types = self.types();
        let members: Vec<TypeId> = self
            .symbol(id)
            .declarations
            .iter()
            .map(|d| self.type_of_declaration(d.file, d.node))
            .collect();
        types.union(members)
    }

    fn type_of_accessor(&self, id: SymbolId) -> TypeId {
        let symbol = self.symbol(id);
        let mut setter_type = None;
        for declaration in &symbol.declarations {
            let Some(arena) = self.arena(declaration.file) else {
                continue;
            };
            match arena.kind(declaration.node) {
                SyntaxKind::GetAccessor => {
                    return self.return_type_of_declaration(declaration.file, declaration.node);
                }
                SyntaxKind::SetAccessor if setter_type.is_none() => {
                    setter_type = arena.parameters(declaration.node).first().map(|&p| {
                        let annotation = arena.type_node(p);
                        if annotation.is_some() {
                            self.type_from_type_node(declaration.file, annotation)
                        } else {
                            TypeId::ANY
                        }
                    });
                }
                _ => {}
            }
        }
        setter_type.unwrap_or(TypeId::ANY)
    }

    // =========================================================================
    // Return types
    // =========================================================================

    /// Declared or inferred return type of a function-like declaration.
    pub fn return_type_of_declaration(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let annotation = arena.type_node(node);
        if annotation.is_some() {
            return self.type_from_type_node(file, annotation);
        }
        let kind = arena.kind(node);
        if kind == SyntaxKind::SetAccessor {
            return TypeId::VOID;
        }
        let key = Resolution::ReturnType(DeclRef::new(file, node));
        let inferred = self.guarded(key, TypeId::ANY, || self.infer_return_type(file, node));
        if arena.flags(node).contains(NodeFlags::ASYNC) {
            return self.promise_of(inferred);
        }
        inferred
    }

    fn infer_return_type(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        let body = arena.body(node);
        if body.is_none() {
            return TypeId::ANY;
        }
        if arena.kind(body) != SyntaxKind::Block {
            return types.widen(self.type_of_expression(file, body));
        }
        let mut returns = Vec::new();
        let mut stack: Vec<NodeIndex> = arena.children(body).collect();
        while let Some(current) = stack.pop() {
            let kind = arena.kind(current);
            if kind.is_function_like() || kind.is_class_like() {
                continue;
            }
            if kind == SyntaxKind::ReturnStatement {
                let expression = arena.expression(current);
                returns.push(if expression.is_some() {
                    types.widen(self.type_of_expression(file, expression))
                } else {
                    TypeId::VOID
                });
                continue;
            }
            stack.extend(arena.children(current));
        }
        if returns.is_empty() {
            return TypeId::VOID;
        }
        types.union(returns)
    }

    /// `Promise<T>`; `T` itself when no global `Promise` is declared.
    pub fn promise_of(&self, ty: TypeId) -> TypeId {
        match self.program.globals().get("Promise") {
            Some(&promise) => self.types().reference(promise, vec![ty]),
            None => ty,
        }
    }

    // =========================================================================
    // Enums
    // =========================================================================

    /// Constant value of an enum member: its literal initializer, or one
    /// more than the previous numeric member.
    pub fn enum_member_value(&self, member: SymbolId) -> Option<ConstantValue> {
        let declaration = self.symbol(member).first_declaration()?;
        let arena = self.arena(declaration.file)?;
        let enum_node = arena.parent(declaration.node);
        let mut next = Some(0.0);
        for &current in arena.members(enum_node) {
            let initializer = arena.initializer(current);
            let value = if initializer.is_none() {
                next.map(ConstantValue::Number)
            } else {
                self.constant_of_expression(declaration.file, initializer)
            };
            next = match &value {
                Some(ConstantValue::Number(n)) => Some(n + 1.0),
                _ => None,
            };
            if current == declaration.node {
                return value;
            }
        }
        None
    }

    fn constant_of_expression(&self, file: FileId, node: NodeIndex) -> Option<ConstantValue> {
        let arena = self.arena(file)?;
        match arena.kind(node) {
            SyntaxKind::NumericLiteral => crate::types::canonical_number(arena.text(node))
                .parse()
                .ok()
                .map(ConstantValue::Number),
            SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => {
                Some(ConstantValue::String(arena.text(node).to_string()))
            }
            SyntaxKind::PrefixUnaryExpression
                if arena.get(node).map(|n| n.op) == Some(SyntaxKind::Minus) =>
            {
                match self.constant_of_expression(file, arena.child(node, 0))? {
                    ConstantValue::Number(n) => Some(ConstantValue::Number(-n)),
                    ConstantValue::String(_) => None,
                }
            }
            SyntaxKind::ParenthesizedExpression => {
                self.constant_of_expression(file, arena.expression(node))
            }
            _ => None,
        }
    }
}
