//! Expression types, contextual types and `this`.

use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use super::names::{is_declaration_kind, meaning_of_identifier};
use super::{Resolution, TypeChecker};
use crate::symbols::{DeclRef, FileId, Meaning, SymbolFlags};
use crate::types::{Intrinsic, SignatureKind, TypeId, TypeKind, TypeMapper};

impl<'p> TypeChecker<'p> {
    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn type_of_expression(&self, file: FileId, node: NodeIndex) -> TypeId {
        if node.is_none() {
            return TypeId::ANY;
        }
        let key = Resolution::Expression(DeclRef::new(file, node));
        self.guarded(key, TypeId::ANY, || self.compute_type_of_expression(file, node))
    }

    fn compute_type_of_expression(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        match arena.kind(node) {
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.type_of_literal(file, node),
            SyntaxKind::RegularExpressionLiteral => self
                .global_interface_type("RegExp")
                .unwrap_or(TypeId::OBJECT),
            SyntaxKind::TemplateExpression => TypeId::STRING,
            SyntaxKind::Identifier => {
                if arena.flags(node).contains(NodeFlags::MISSING) {
                    return TypeId::ANY;
                }
                let text = arena.text(node);
                match self.resolve_name(file, node, text, Meaning::VALUE) {
                    Some(symbol) => self.type_of_symbol(self.resolve_alias(symbol)),
                    None if text == "arguments" => self
                        .global_interface_type("IArguments")
                        .unwrap_or(TypeId::ANY),
                    None => TypeId::ANY,
                }
            }
            SyntaxKind::ThisKeyword => self.this_type_at(file, node),
            SyntaxKind::SuperKeyword => {
                let class = arena.find_ancestor(node, |k| k.is_class_like());
                let Some(class) = self.declaration_symbol(file, class) else {
                    return TypeId::ANY;
                };
                let instance = self.declared_type_of_symbol(class);
                let args = match &*types.get(instance) {
                    TypeKind::Reference { args, .. } => args.to_vec(),
                    _ => Vec::new(),
                };
                self.base_types(class, &args)
                    .first()
                    .copied()
                    .unwrap_or(TypeId::ANY)
            }
            SyntaxKind::PropertyAccessExpression => self.type_of_property_access(file, node),
            SyntaxKind::ElementAccessExpression => {
                let mut object = self.type_of_expression(file, arena.expression(node));
                if arena.flags(node).contains(NodeFlags::OPTIONAL_CHAIN) {
                    object = types.non_nullable(object);
                }
                let index = self.type_of_expression(file, arena.argument_expression(node));
                match &*types.get(self.resolve_type(object)) {
                    TypeKind::Intrinsic(Intrinsic::Any) => TypeId::ANY,
                    _ => self.indexed_access_type(object, index),
                }
            }
            SyntaxKind::CallExpression => self.type_of_call(file, node),
            SyntaxKind::NewExpression => self.return_type_of_call(file, node),
            SyntaxKind::ParenthesizedExpression | SyntaxKind::SpreadElement => {
                self.type_of_expression(file, arena.expression(node))
            }
            SyntaxKind::NonNullExpression => {
                types.non_nullable(self.type_of_expression(file, arena.expression(node)))
            }
            SyntaxKind::AsExpression => {
                let target = arena.type_node(node);
                let is_const = arena.kind(target) == SyntaxKind::TypeReference
                    && arena.text(arena.child(target, 0)) == "const";
                if is_const {
                    self.type_of_expression(file, arena.expression(node))
                } else {
                    self.type_from_type_node(file, target)
                }
            }
            SyntaxKind::ObjectLiteralExpression
            | SyntaxKind::FunctionExpression
            | SyntaxKind::ArrowFunction
            | SyntaxKind::ClassExpression => match self.declaration_symbol(file, node) {
                Some(symbol) => types.anonymous(symbol, TypeMapper::new()),
                None => TypeId::ANY,
            },
            SyntaxKind::ArrayLiteralExpression => {
                let elements: Vec<TypeId> = arena
                    .elements(node)
                    .iter()
                    .map(|&e| match arena.kind(e) {
                        SyntaxKind::OmittedExpression => TypeId::UNDEFINED,
                        SyntaxKind::SpreadElement => self.element_type_of(
                            self.type_of_expression(file, arena.expression(e)),
                        ),
                        _ => types.widen(self.type_of_expression(file, e)),
                    })
                    .collect();
                if elements.is_empty() {
                    return types.array(TypeId::ANY);
                }
                types.array(types.union(elements))
            }
            SyntaxKind::PrefixUnaryExpression => {
                let operand = arena.child(node, 0);
                match arena.get(node).map(|n| n.op) {
                    Some(SyntaxKind::Exclamation) => TypeId::BOOLEAN,
                    Some(SyntaxKind::Minus) if arena.kind(operand) == SyntaxKind::NumericLiteral => {
                        self.type_of_literal(file, node)
                    }
                    _ => {
                        let operand = self.type_of_expression(file, operand);
                        if types.base_primitive(operand) == TypeId::BIGINT {
                            TypeId::BIGINT
                        } else {
                            TypeId::NUMBER
                        }
                    }
                }
            }
            SyntaxKind::PostfixUnaryExpression => TypeId::NUMBER,
            SyntaxKind::TypeOfExpression => TypeId::STRING,
            SyntaxKind::VoidExpression => TypeId::UNDEFINED,
            SyntaxKind::DeleteExpression => TypeId::BOOLEAN,
            SyntaxKind::AwaitExpression => {
                self.awaited_type(self.type_of_expression(file, arena.expression(node)))
            }
            SyntaxKind::BinaryExpression => self.type_of_binary(file, node),
            SyntaxKind::ConditionalExpression => types.union([
                self.type_of_expression(file, arena.child(node, 1)),
                self.type_of_expression(file, arena.child(node, 2)),
            ]),
            _ => TypeId::ANY,
        }
    }

    fn type_of_property_access(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        let name = arena.name(node);
        if arena.kind(name) == SyntaxKind::PrivateIdentifier {
            return self
                .symbol_at_location(file, name)
                .map_or(TypeId::ANY, |s| self.type_of_symbol(s));
        }
        let mut object = self.type_of_expression(file, arena.expression(node));
        if arena.flags(node).contains(NodeFlags::OPTIONAL_CHAIN) {
            object = types.non_nullable(object);
        }
        if let Some(property) = self.property_of_type_lenient(object, arena.text(name)) {
            return self.type_of_property(property);
        }
        self.index_signature_type(object, TypeId::STRING)
            .unwrap_or(TypeId::ANY)
    }

    fn type_of_call(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let callee = arena.expression(node);
        if arena.kind(callee) == SyntaxKind::Identifier
            && let Some(&specifier) = arena.arguments(node).first()
            && arena.kind(specifier).is_string_literal_like()
        {
            let module_type = || {
                self.program
                    .resolve_module_specifier(file, arena.text(specifier))
                    .map(|m| match self.export_equals_target(m) {
                        Some(target) => self.type_of_symbol(target),
                        None => self.type_of_symbol(m),
                    })
            };
            match arena.text(callee) {
                "require" if self.resolve_name(file, callee, "require", Meaning::VALUE).is_none_or(
                    |s| self.program.is_lib_file(self.symbol(s).first_declaration().map_or(file, |d| d.file)),
                ) => {
                    if let Some(ty) = module_type() {
                        return ty;
                    }
                }
                "import" => {
                    if let Some(ty) = module_type() {
                        return self.promise_of(ty);
                    }
                }
                _ => {}
            }
        }
        if arena.kind(callee) == SyntaxKind::SuperKeyword {
            return TypeId::VOID;
        }
        self.return_type_of_call(file, node)
    }

    fn type_of_binary(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        if arena.flags(node).contains(NodeFlags::KEYWORD_OPERATOR) {
            // `in` and `instanceof`
            return TypeId::BOOLEAN;
        }
        let left = arena.left(node);
        let right = arena.right(node);
        let op = arena.get(node).map_or(SyntaxKind::Unknown, |n| n.op);
        match op {
            SyntaxKind::Equals | SyntaxKind::Comma => self.type_of_expression(file, right),
            SyntaxKind::AmpersandAmpersand => self.type_of_expression(file, right),
            SyntaxKind::BarBar | SyntaxKind::QuestionQuestion => types.union([
                types.non_nullable(self.type_of_expression(file, left)),
                self.type_of_expression(file, right),
            ]),
            SyntaxKind::AmpersandAmpersandEquals
            | SyntaxKind::BarBarEquals
            | SyntaxKind::QuestionQuestionEquals => types.union([
                self.type_of_expression(file, left),
                self.type_of_expression(file, right),
            ]),
            SyntaxKind::LessThan
            | SyntaxKind::GreaterThan
            | SyntaxKind::LessThanEquals
            | SyntaxKind::GreaterThanEquals
            | SyntaxKind::EqualsEquals
            | SyntaxKind::ExclamationEquals
            | SyntaxKind::EqualsEqualsEquals
            | SyntaxKind::ExclamationEqualsEquals => TypeId::BOOLEAN,
            SyntaxKind::Plus | SyntaxKind::PlusEquals => {
                let l = types.base_primitive(self.type_of_expression(file, left));
                let r = types.base_primitive(self.type_of_expression(file, right));
                if l == TypeId::STRING || r == TypeId::STRING {
                    TypeId::STRING
                } else if l == TypeId::NUMBER && r == TypeId::NUMBER {
                    TypeId::NUMBER
                } else if l == TypeId::BIGINT && r == TypeId::BIGINT {
                    TypeId::BIGINT
                } else {
                    TypeId::ANY
                }
            }
            _ => {
                let l = types.base_primitive(self.type_of_expression(file, left));
                let r = types.base_primitive(self.type_of_expression(file, right));
                if l == TypeId::BIGINT && r == TypeId::BIGINT {
                    TypeId::BIGINT
                } else {
                    TypeId::NUMBER
                }
            }
        }
    }

    /// Type a `Promise<T>` resolves to; other types are returned as is.
    pub fn awaited_type(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..8 {
            let resolved = self.resolve_type(current);
            match &*self.types().get(resolved) {
                TypeKind::Reference { target, args }
                    if self.program.globals().get("Promise") == Some(target) && args.len() == 1 =>
                {
                    current = args[0];
                }
                _ => return current,
            }
        }
        current
    }

    // =========================================================================
    // `this`
    // =========================================================================

    /// Type of `this` at `node`: the class instance (or constructor in
    /// static members), the enclosing object literal, or a constructor
    /// function carrying `this.x` assignments.
    pub fn this_type_at(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        for ancestor in arena.ancestors(node).skip(1) {
            let kind = arena.kind(ancestor);
            if kind == SyntaxKind::ArrowFunction {
                continue;
            }
            if kind.is_class_like() {
                return self
                    .declaration_symbol(file, ancestor)
                    .map_or(TypeId::ANY, |c| self.declared_type_of_symbol(c));
            }
            if !kind.is_function_like() && kind != SyntaxKind::PropertyDeclaration {
                continue;
            }
            let parent = arena.parent(ancestor);
            let parent_kind = arena.kind(parent);
            if parent_kind.is_class_like() {
                let Some(class) = self.declaration_symbol(file, parent) else {
                    return TypeId::ANY;
                };
                return if arena.flags(ancestor).contains(NodeFlags::STATIC) {
                    self.type_of_symbol(class)
                } else {
                    self.declared_type_of_symbol(class)
                };
            }
            if parent_kind == SyntaxKind::ObjectLiteralExpression {
                return self
                    .declaration_symbol(file, parent)
                    .map_or(TypeId::ANY, |o| types.anonymous(o, TypeMapper::new()));
            }
            if matches!(
                kind,
                SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression
            ) && let Some(function) = self.declaration_symbol(file, ancestor)
                && !self.symbol(function).synthetic_members.is_empty()
            {
                return types.anonymous(function, TypeMapper::new());
            }
            return TypeId::ANY;
        }
        TypeId::ANY
    }

    // =========================================================================
    // Contextual types
    // =========================================================================

    /// Type an expression is expected to have from its position: the
    /// declared type it initializes, the parameter it is passed to, the
    /// return type it produces.
    pub fn contextual_type(&self, file: FileId, node: NodeIndex) -> Option<TypeId> {
        let arena = self.arena(file)?;
        let parent = arena.parent(node);
        match arena.kind(parent) {
            SyntaxKind::VariableDeclaration
            | SyntaxKind::PropertyDeclaration
            | SyntaxKind::Parameter
                if arena.initializer(parent) == node =>
            {
                let annotation = arena.type_node(parent);
                annotation
                    .is_some()
                    .then(|| self.type_from_type_node(file, annotation))
            }
            SyntaxKind::PropertyAssignment if arena.initializer(parent) == node => {
                self.contextual_member_type(file, parent)
            }
            SyntaxKind::ObjectLiteralExpression => self.contextual_member_type(file, node),
            SyntaxKind::ArgumentList => {
                let call = arena.parent(parent);
                let index = arena.slots(parent).iter().position(|&a| a == node)?;
                let candidates = self.call_candidates(file, call);
                let count = arena.slots(parent).len();
                let signature = candidates
                    .iter()
                    .find(|s| s.accepts_argument_count(count))
                    .or_else(|| candidates.first())?;
                let explicit = arena.type_arguments(call);
                let mapper: TypeMapper = signature
                    .type_parameters
                    .iter()
                    .zip(explicit)
                    .map(|(&p, &a)| (p, self.type_from_type_node(file, a)))
                    .collect();
                let signature = self.instantiate_signature(signature, &mapper);
                self.parameter_type_at(&signature, index)
            }
            SyntaxKind::ReturnStatement => {
                let function = arena.find_ancestor(parent, |k| k.is_function_like());
                self.contextual_return_type(file, function)
            }
            SyntaxKind::ArrowFunction if arena.body(parent) == node => {
                self.contextual_return_type(file, parent)
            }
            SyntaxKind::BinaryExpression => {
                let op = arena.get(parent).map_or(SyntaxKind::Unknown, |n| n.op);
                let left = arena.left(parent);
                match op {
                    SyntaxKind::Equals if arena.right(parent) == node => {
                        Some(self.type_of_expression(file, left))
                    }
                    SyntaxKind::EqualsEquals
                    | SyntaxKind::EqualsEqualsEquals
                    | SyntaxKind::ExclamationEquals
                    | SyntaxKind::ExclamationEqualsEquals => {
                        let other = if left == node { arena.right(parent) } else { left };
                        Some(self.type_of_expression(file, other))
                    }
                    SyntaxKind::BarBar | SyntaxKind::QuestionQuestion => {
                        self.contextual_type(file, parent)
                    }
                    _ => None,
                }
            }
            SyntaxKind::ArrayLiteralExpression => {
                let array = self.contextual_type(file, parent)?;
                let index = arena.elements(parent).iter().position(|&e| e == node)?;
                let resolved = self.resolve_type(array);
                match &*self.types().get(resolved) {
                    TypeKind::Tuple(elements) => elements.get(index).map(|e| e.ty),
                    _ => Some(self.element_type_of(array)),
                }
            }
            SyntaxKind::ParenthesizedExpression
            | SyntaxKind::ConditionalExpression
            | SyntaxKind::SpreadElement => self.contextual_type(file, parent),
            SyntaxKind::AsExpression => {
                let target = arena.type_node(parent);
                Some(self.type_from_type_node(file, target))
            }
            _ => None,
        }
    }

    /// Contextual type of an object literal member, from the literal's own
    /// contextual type.
    fn contextual_member_type(&self, file: FileId, member: NodeIndex) -> Option<TypeId> {
        let arena = self.arena(file)?;
        let literal = arena.parent(member);
        let object = self.contextual_type(file, literal)?;
        let name = arena.name(member);
        if name.is_none() {
            return None;
        }
        self.property_of_type_lenient(object, arena.text(name))
            .map(|p| self.type_of_property(p))
            .or_else(|| self.index_signature_type(object, TypeId::STRING))
    }

    fn contextual_return_type(&self, file: FileId, function: NodeIndex) -> Option<TypeId> {
        let arena = self.arena(file)?;
        let annotation = arena.type_node(function);
        let declared = if annotation.is_some() {
            self.type_from_type_node(file, annotation)
        } else {
            let contextual = self.contextual_type(file, function)?;
            self.signatures_of_type(contextual, SignatureKind::Call)
                .first()?
                .return_type
        };
        if arena.flags(function).contains(NodeFlags::ASYNC) {
            return Some(self.awaited_type(declared));
        }
        Some(declared)
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// Type shown for a name at a location: the declared type for names in
    /// type positions, the value type otherwise.
    pub fn type_at_location(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let parent = arena.parent(node);
        if arena.name(parent) == node && is_declaration_kind(arena.kind(parent)) {
            return match self.symbol_at_location(file, node).map(|s| self.resolve_alias(s)) {
                Some(symbol) if self.symbol(symbol).has(SymbolFlags::VALUE) => {
                    self.type_of_symbol(symbol)
                }
                Some(symbol) => self.declared_type_of_symbol(symbol),
                None => TypeId::ANY,
            };
        }
        if arena.kind(node) == SyntaxKind::Identifier
            && meaning_of_identifier(arena, node) == Meaning::TYPE
        {
            return self
                .symbol_at_location(file, node)
                .map_or(TypeId::ANY, |s| self.declared_type_of_symbol(s));
        }
        if arena.kind(parent) == SyntaxKind::PropertyAccessExpression && arena.name(parent) == node
        {
            return self.type_of_expression(file, parent);
        }
        match self.symbol_at_location(file, node) {
            Some(symbol) => self.type_of_symbol(self.resolve_alias(symbol)),
            None => self.type_of_expression(file, node),
        }
    }
}
