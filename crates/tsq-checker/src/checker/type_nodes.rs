//! Types written in source, alias expansion and instantiation.

use smallvec::SmallVec;
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use super::{Resolution, TypeChecker};
use crate::symbols::{FileId, Meaning, SymbolFlags, SymbolId};
use crate::types::{Intrinsic, TupleElement, TypeId, TypeKind, TypeMapper};

/// Expansion steps for chains of aliases such as `type A = B; type B = C`.
const MAX_ALIAS_EXPANSION: usize = 16;

impl<'p> TypeChecker<'p> {
    // =========================================================================
    // Type nodes
    // =========================================================================

    /// The type a type node denotes.
    pub fn type_from_type_node(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        if node.is_none() {
            return TypeId::ANY;
        }
        let types = self.types();
        match arena.kind(node) {
            SyntaxKind::KeywordType => Intrinsic::from_keyword(arena.text(node))
                .map(|i| types.intern(TypeKind::Intrinsic(i)))
                .unwrap_or(TypeId::ANY),
            SyntaxKind::ThisType => self.enclosing_this_type(file, node),
            SyntaxKind::TypeReference => self.type_from_type_reference(file, node),
            SyntaxKind::LiteralType => self.type_of_literal(file, arena.child(node, 0)),
            SyntaxKind::UnionType => {
                let members: Vec<TypeId> = arena
                    .elements(node)
                    .iter()
                    .map(|&m| self.type_from_type_node(file, m))
                    .collect();
                types.union(members)
            }
            SyntaxKind::IntersectionType => {
                let members: Vec<TypeId> = arena
                    .elements(node)
                    .iter()
                    .map(|&m| self.type_from_type_node(file, m))
                    .collect();
                types.intersection(members)
            }
            SyntaxKind::ArrayType => types.array(self.type_from_type_node(file, arena.child(node, 0))),
            SyntaxKind::TupleType => {
                let elements = arena
                    .elements(node)
                    .iter()
                    .map(|&e| {
                        let flags = arena.flags(e);
                        TupleElement {
                            ty: self.type_from_type_node(file, e),
                            optional: flags.contains(NodeFlags::OPTIONAL),
                            rest: flags.contains(NodeFlags::REST),
                        }
                    })
                    .collect();
                types.tuple(elements)
            }
            SyntaxKind::TypeLiteral | SyntaxKind::FunctionType | SyntaxKind::ConstructorType => {
                match self.declaration_symbol(file, node) {
                    Some(symbol) => types.anonymous(symbol, TypeMapper::new()),
                    None => TypeId::ANY,
                }
            }
            SyntaxKind::ParenthesizedType => self.type_from_type_node(file, arena.child(node, 0)),
            SyntaxKind::TypeQuery => {
                let entity = arena.expression(node);
                if arena.kind(entity) == SyntaxKind::ThisKeyword {
                    return self.this_type_at(file, entity);
                }
                match self.entity_symbol(file, entity, Meaning::VALUE | Meaning::NAMESPACE) {
                    Some(symbol) => self.type_of_symbol(self.resolve_alias(symbol)),
                    None => TypeId::ANY,
                }
            }
            SyntaxKind::TypeOperator => {
                let operand = self.type_from_type_node(file, arena.child(node, 0));
                match arena.text(node) {
                    "keyof" => self.keyof_type(operand),
                    "unique" => TypeId::SYMBOL,
                    _ => operand,
                }
            }
            SyntaxKind::IndexedAccessType => {
                let object = self.type_from_type_node(file, arena.child(node, 0));
                let index = self.type_from_type_node(file, arena.child(node, 1));
                self.indexed_access_type(object, index)
            }
            SyntaxKind::TemplateLiteralType => self.type_from_template_literal(file, node),
            _ => TypeId::ANY,
        }
    }

    fn type_from_type_reference(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let name = arena.child(node, 0);
        let Some(symbol) = self.entity_symbol(file, name, Meaning::TYPE) else {
            return TypeId::ANY;
        };
        let symbol = self.resolve_alias(symbol);
        let args: Vec<TypeId> = arena
            .type_arguments(node)
            .iter()
            .map(|&a| self.type_from_type_node(file, a))
            .collect();
        self.reference_to_symbol(symbol, args)
    }

    /// Type of a named type applied to `args`. Missing arguments take the
    /// parameter default, or `any`.
    pub(crate) fn reference_to_symbol(&self, symbol: SymbolId, mut args: Vec<TypeId>) -> TypeId {
        let types = self.types();
        let flags = self.symbol(symbol).flags;
        if flags.contains(SymbolFlags::TYPE_PARAMETER) {
            return types.type_parameter(symbol);
        }
        if flags.intersects(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) {
            return types.reference(symbol, Vec::new());
        }
        if !flags.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE | SymbolFlags::TYPE_ALIAS) {
            return TypeId::ANY;
        }
        let parameters = self.type_parameters_of_symbol(symbol);
        if args.len() < parameters.len() {
            for &parameter in &parameters[args.len()..] {
                args.push(self.type_parameter_default(parameter).unwrap_or(TypeId::ANY));
            }
        }
        args.truncate(parameters.len());
        if self.is_global_array(symbol) && args.len() == 1 {
            return types.array(args[0]);
        }
        types.reference(symbol, args)
    }

    fn is_global_array(&self, symbol: SymbolId) -> bool {
        self.program.globals().get("Array") == Some(&symbol)
    }

    pub(crate) fn type_of_literal(&self, file: FileId, literal: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let types = self.types();
        match arena.kind(literal) {
            SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => {
                types.string_literal(arena.text(literal))
            }
            SyntaxKind::NumericLiteral => types.number_literal(arena.text(literal)),
            SyntaxKind::BigIntLiteral => types.bigint_literal(arena.text(literal)),
            SyntaxKind::TrueKeyword => TypeId::TRUE,
            SyntaxKind::FalseKeyword => TypeId::FALSE,
            SyntaxKind::NullKeyword => TypeId::NULL,
            SyntaxKind::PrefixUnaryExpression => {
                let operand = arena.child(literal, 0);
                let op = arena.get(literal).map(|n| n.op);
                if op == Some(SyntaxKind::Minus) && arena.kind(operand) == SyntaxKind::NumericLiteral {
                    types.number_literal(&format!("-{}", arena.text(operand)))
                } else {
                    TypeId::NUMBER
                }
            }
            _ => TypeId::ANY,
        }
    }

    fn type_from_template_literal(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let slots = arena.slots(node);
        let Some((&head, spans)) = slots.split_first() else {
            return TypeId::STRING;
        };
        let mut texts: Vec<String> = vec![arena.text(head).to_string()];
        let mut holes: Vec<TypeId> = Vec::new();
        for &span in spans {
            let ty = self.type_from_type_node(file, arena.child(span, 0));
            let tail = arena.text(arena.child(span, 1));
            // Literal holes fold into the surrounding text.
            if let Some(value) = self.literal_text(ty) {
                if let Some(last) = texts.last_mut() {
                    last.push_str(&value);
                    last.push_str(tail);
                }
            } else {
                holes.push(ty);
                texts.push(tail.to_string());
            }
        }
        if holes.is_empty() {
            return self.types().string_literal(&texts[0]);
        }
        self.types().intern(TypeKind::TemplateLiteral {
            texts: texts.into_iter().map(Into::into).collect(),
            types: holes.into(),
        })
    }

    fn literal_text(&self, ty: TypeId) -> Option<String> {
        match &*self.types().get(ty) {
            TypeKind::StringLiteral(s) | TypeKind::NumberLiteral(s) => Some(s.to_string()),
            TypeKind::BooleanLiteral(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// `this` inside a class or interface body: its instance type.
    fn enclosing_this_type(&self, file: FileId, node: NodeIndex) -> TypeId {
        let Some(arena) = self.arena(file) else {
            return TypeId::ANY;
        };
        let owner = arena.find_ancestor(node, |k| k.is_class_or_interface());
        match self.declaration_symbol(file, owner) {
            Some(symbol) => self.declared_type_of_symbol(symbol),
            None => TypeId::ANY,
        }
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    /// Type parameters of the first declaration of a generic symbol.
    pub fn type_parameters_of_symbol(&self, symbol: SymbolId) -> Vec<SymbolId> {
        for declaration in &self.symbol(symbol).declarations {
            let parameters = self.type_parameters_of_declaration(declaration.file, declaration.node);
            if !parameters.is_empty() {
                return parameters;
            }
        }
        Vec::new()
    }

    pub(crate) fn type_parameters_of_declaration(
        &self,
        file: FileId,
        node: NodeIndex,
    ) -> Vec<SymbolId> {
        let Some(arena) = self.arena(file) else {
            return Vec::new();
        };
        arena
            .type_parameters(node)
            .iter()
            .filter_map(|&p| self.declaration_symbol(file, p))
            .collect()
    }

    pub fn type_parameter_constraint(&self, parameter: SymbolId) -> Option<TypeId> {
        let declaration = self.symbol(parameter).first_declaration()?;
        let arena = self.arena(declaration.file)?;
        let constraint = arena.constraint(declaration.node);
        constraint
            .is_some()
            .then(|| self.type_from_type_node(declaration.file, constraint))
    }

    pub fn type_parameter_default(&self, parameter: SymbolId) -> Option<TypeId> {
        let declaration = self.symbol(parameter).first_declaration()?;
        let arena = self.arena(declaration.file)?;
        let default = arena.child(declaration.node, 2);
        default
            .is_some()
            .then(|| self.type_from_type_node(declaration.file, default))
    }

    /// Substitution for a named type applied to `args`. Every declaration
    /// of a merged interface has its own parameter symbols; all of them map.
    pub(crate) fn mapper_for_reference(&self, target: SymbolId, args: &[TypeId]) -> TypeMapper {
        let mut mapper = TypeMapper::new();
        if args.is_empty() {
            return mapper;
        }
        for declaration in &self.symbol(target).declarations {
            let parameters = self.type_parameters_of_declaration(declaration.file, declaration.node);
            for (parameter, &arg) in parameters.into_iter().zip(args) {
                mapper.push((parameter, arg));
            }
        }
        mapper
    }

    /// Substitution carried by an instantiated type.
    pub(crate) fn mapper_of(&self, ty: TypeId) -> TypeMapper {
        match &*self.types().get(ty) {
            TypeKind::Reference { target, args } => self.mapper_for_reference(*target, args),
            TypeKind::Anonymous { mapper, .. } => mapper.clone(),
            TypeKind::Array(element) => match self.program.globals().get("Array") {
                Some(&array) => self.mapper_for_reference(array, &[*element]),
                None => TypeMapper::new(),
            },
            _ => TypeMapper::new(),
        }
    }

    // =========================================================================
    // Instantiation and expansion
    // =========================================================================

    /// Substitute type parameters according to `mapper`.
    pub fn instantiate(&self, ty: TypeId, mapper: &[(SymbolId, TypeId)]) -> TypeId {
        if mapper.is_empty() {
            return ty;
        }
        let types = self.types();
        let kind = types.get(ty);
        match &*kind {
            TypeKind::TypeParameter(symbol) => mapper
                .iter()
                .find(|(p, _)| p == symbol)
                .map_or(ty, |&(_, t)| t),
            TypeKind::Union(members) => {
                let members: Vec<TypeId> =
                    members.iter().map(|&m| self.instantiate(m, mapper)).collect();
                types.union(members)
            }
            TypeKind::Intersection(members) => {
                let members: Vec<TypeId> =
                    members.iter().map(|&m| self.instantiate(m, mapper)).collect();
                types.intersection(members)
            }
            TypeKind::Array(element) => types.array(self.instantiate(*element, mapper)),
            TypeKind::Tuple(elements) => types.tuple(
                elements
                    .iter()
                    .map(|e| TupleElement {
                        ty: self.instantiate(e.ty, mapper),
                        ..e.clone()
                    })
                    .collect(),
            ),
            TypeKind::Reference { target, args } => {
                if args.is_empty() {
                    return ty;
                }
                let args = args.iter().map(|&a| self.instantiate(a, mapper)).collect();
                types.reference(*target, args)
            }
            TypeKind::Anonymous {
                symbol,
                mapper: inner,
            } => {
                let mut composed: TypeMapper = inner
                    .iter()
                    .map(|&(p, t)| (p, self.instantiate(t, mapper)))
                    .collect();
                for &(p, t) in mapper {
                    if !composed.iter().any(|(q, _)| *q == p) {
                        composed.push((p, t));
                    }
                }
                types.anonymous(*symbol, composed)
            }
            TypeKind::TemplateLiteral {
                texts,
                types: holes,
            } => {
                let holes: Box<[TypeId]> =
                    holes.iter().map(|&h| self.instantiate(h, mapper)).collect();
                types.intern(TypeKind::TemplateLiteral {
                    texts: texts.clone(),
                    types: holes,
                })
            }
            TypeKind::KeyOf(operand) => self.keyof_type(self.instantiate(*operand, mapper)),
            TypeKind::IndexedAccess { object, index } => self.indexed_access_type(
                self.instantiate(*object, mapper),
                self.instantiate(*index, mapper),
            ),
            _ => ty,
        }
    }

    /// Expand type alias references until a structural type remains.
    pub fn resolve_type(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..MAX_ALIAS_EXPANSION {
            let kind = self.types().get(current);
            let TypeKind::Reference { target, args } = &*kind else {
                return current;
            };
            if !self.symbol(*target).has(SymbolFlags::TYPE_ALIAS) {
                return current;
            }
            let aliased = self.aliased_type(*target);
            let next = self.instantiate(aliased, &self.mapper_for_reference(*target, args));
            if next == current {
                return current;
            }
            current = next;
        }
        current
    }

    /// Right-hand side of a type alias declaration.
    pub fn aliased_type(&self, alias: SymbolId) -> TypeId {
        if let Some(cached) = self.program.declared_types.get(&alias) {
            return *cached;
        }
        let ty = self.guarded(Resolution::AliasedType(alias), TypeId::ANY, || {
            let Some(declaration) = self.symbol(alias).first_declaration() else {
                return TypeId::ANY;
            };
            let Some(arena) = self.arena(declaration.file) else {
                return TypeId::ANY;
            };
            self.type_from_type_node(declaration.file, arena.type_node(declaration.node))
        });
        self.program.declared_types.insert(alias, ty);
        ty
    }

    // =========================================================================
    // Type operators
    // =========================================================================

    /// `keyof T`: the union of property name literals, deferred for type
    /// parameters.
    pub fn keyof_type(&self, operand: TypeId) -> TypeId {
        let resolved = self.resolve_type(operand);
        let types = self.types();
        match &*types.get(resolved) {
            TypeKind::TypeParameter(_) | TypeKind::IndexedAccess { .. } => {
                types.intern(TypeKind::KeyOf(resolved))
            }
            TypeKind::Intrinsic(Intrinsic::Any) => {
                types.union([TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL])
            }
            _ => {
                let names: Vec<TypeId> = self
                    .properties_of_type(resolved)
                    .into_iter()
                    .map(|p| types.string_literal(self.symbol_name(p.symbol)))
                    .collect();
                types.union(names)
            }
        }
    }

    /// `T[K]`: property types for literal keys, element types for numeric
    /// access on arrays and tuples, deferred when either side is generic.
    pub fn indexed_access_type(&self, object: TypeId, index: TypeId) -> TypeId {
        let types = self.types();
        let object = self.resolve_type(object);
        let index = self.resolve_type(index);
        let generic = |t: TypeId| {
            matches!(
                &*types.get(t),
                TypeKind::TypeParameter(_) | TypeKind::KeyOf(_) | TypeKind::IndexedAccess { .. }
            )
        };
        if generic(object) || generic(index) {
            return types.intern(TypeKind::IndexedAccess { object, index });
        }
        let mut results = SmallVec::<[TypeId; 4]>::new();
        for key in types.union_members(index) {
            let ty = match &*types.get(key) {
                TypeKind::StringLiteral(name) => self
                    .property_of_type(object, name)
                    .map(|p| self.type_of_property(p))
                    .or_else(|| self.index_signature_type(object, TypeId::STRING)),
                TypeKind::NumberLiteral(n) => self
                    .tuple_element_type(object, n.parse().ok())
                    .or_else(|| self.index_signature_type(object, TypeId::NUMBER)),
                _ if key == TypeId::NUMBER => self.index_signature_type(object, TypeId::NUMBER),
                _ if key == TypeId::STRING => self.index_signature_type(object, TypeId::STRING),
                _ => None,
            };
            results.push(ty.unwrap_or(TypeId::ANY));
        }
        types.union(results)
    }

    fn tuple_element_type(&self, object: TypeId, index: Option<usize>) -> Option<TypeId> {
        let index = index?;
        match &*self.types().get(object) {
            TypeKind::Tuple(elements) => elements.get(index).map(|e| e.ty),
            _ => None,
        }
    }
}
