//! Properties, apparent types and index signatures.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tsq_syntax::SyntaxKind;

use super::{ConstantValue, TypeChecker};
use crate::symbols::{Meaning, SymbolFlags, SymbolId, SymbolTable};
use crate::types::{Intrinsic, TypeId, TypeKind};

/// Depth bound for base type and intersection walks.
const MAX_MEMBER_DEPTH: u32 = 32;

/// A property as seen through a particular type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub symbol: SymbolId,
    /// Instantiated type whose member table contributed the property; its
    /// substitution applies to the property's declared type.
    pub owner: TypeId,
}

type PropertyMap<'p> = IndexMap<&'p str, Property, FxBuildHasher>;

impl<'p> TypeChecker<'p> {
    // =========================================================================
    // Properties
    // =========================================================================

    /// Declared properties of a type, own members before inherited ones.
    pub fn properties_of_type(&self, ty: TypeId) -> Vec<Property> {
        self.property_map(ty).into_values().collect()
    }

    /// Properties an anonymous type declares itself, without the apparent
    /// members of `Function` or `Object`. Other types fall back to
    /// [`Self::properties_of_type`].
    pub fn declared_properties_of_type(&self, ty: TypeId) -> Vec<Property> {
        let resolved = self.resolve_type(ty);
        let TypeKind::Anonymous { symbol, .. } = &*self.types().get(resolved) else {
            return self.properties_of_type(ty);
        };
        let owner = self.symbol(*symbol);
        let mut out: PropertyMap<'p> = IndexMap::default();
        if owner.has(SymbolFlags::TYPE_LITERAL | SymbolFlags::OBJECT_LITERAL) {
            add_members(&owner.members, resolved, &mut out);
        } else if owner.name.starts_with('"') {
            return self.properties_of_type(ty);
        } else {
            self.add_value_exports(&owner.exports, resolved, &mut out);
        }
        out.into_values().collect()
    }

    /// Members created by `this.x = ...` and `obj.x = ...` assignments that
    /// no declaration of the type already covers.
    pub fn synthetic_properties_of_type(&self, ty: TypeId) -> Vec<Property> {
        let declared = self.property_map(ty);
        let mut result: PropertyMap<'p> = IndexMap::default();
        self.collect_synthetic(ty, &mut result, 0);
        result
            .into_iter()
            .filter(|(name, _)| !declared.contains_key(name))
            .map(|(_, p)| p)
            .collect()
    }

    pub fn property_of_type(&self, ty: TypeId, name: &str) -> Option<Property> {
        if let Some(&property) = self.property_map(ty).get(name) {
            return Some(property);
        }
        self.synthetic_properties_of_type(ty)
            .into_iter()
            .find(|p| self.symbol(p.symbol).name == name)
    }

    /// Like [`Self::property_of_type`], but a union member declaring the
    /// property is enough.
    pub fn property_of_type_lenient(&self, ty: TypeId, name: &str) -> Option<Property> {
        if let Some(property) = self.property_of_type(ty, name) {
            return Some(property);
        }
        let resolved = self.resolve_type(ty);
        if let TypeKind::Union(members) = &*self.types().get(resolved) {
            return members
                .iter()
                .find_map(|&m| self.property_of_type(m, name));
        }
        None
    }

    /// Type of a property with the owner's substitution applied. Union
    /// properties combine the member property types.
    pub fn type_of_property(&self, property: Property) -> TypeId {
        let types = self.types();
        let owner = self.resolve_type(property.owner);
        if let TypeKind::Union(members) = &*types.get(owner) {
            let name = self.symbol_name(property.symbol);
            let member_types: Vec<TypeId> = members
                .iter()
                .filter_map(|&m| self.property_of_type(m, name))
                .map(|p| self.type_of_property(p))
                .collect();
            return types.union(member_types);
        }
        let declared = self.type_of_symbol(property.symbol);
        self.instantiate(declared, &self.mapper_of(owner))
    }

    fn property_map(&self, ty: TypeId) -> PropertyMap<'p> {
        let mut map = IndexMap::default();
        self.collect_properties(ty, &mut map, 0);
        map
    }

    fn collect_properties(&self, ty: TypeId, out: &mut PropertyMap<'p>, depth: u32) {
        if depth > MAX_MEMBER_DEPTH {
            return;
        }
        let resolved = self.resolve_type(ty);
        let kind = self.types().get(resolved);
        match &*kind {
            TypeKind::Reference { target, args } => {
                let symbol = self.symbol(*target);
                if symbol.has(SymbolFlags::CLASS | SymbolFlags::INTERFACE) {
                    add_members(&symbol.members, resolved, out);
                    for base in self.base_types(*target, args) {
                        self.collect_properties(base, out, depth + 1);
                    }
                } else {
                    let apparent = self.apparent_type(resolved);
                    if apparent != resolved {
                        self.collect_properties(apparent, out, depth + 1);
                    }
                }
            }
            TypeKind::Anonymous { symbol, .. } => {
                let owner = self.symbol(*symbol);
                if owner.has(SymbolFlags::TYPE_LITERAL | SymbolFlags::OBJECT_LITERAL) {
                    add_members(&owner.members, resolved, out);
                } else if owner.has(SymbolFlags::CLASS) {
                    self.add_value_exports(&owner.exports, resolved, out);
                    if let Some(base) = self.base_constructor_type(*symbol) {
                        self.collect_properties(base, out, depth + 1);
                    }
                    self.collect_global_members("Function", out, depth);
                } else if owner.has(SymbolFlags::FUNCTION | SymbolFlags::METHOD) {
                    self.add_value_exports(&owner.exports, resolved, out);
                    self.collect_global_members("Function", out, depth);
                } else if owner.name.starts_with('"') {
                    for (name, id) in self.exports_of_module(*symbol) {
                        if self.symbol_has_meaning(id, Meaning::VALUE) {
                            out.entry(name).or_insert(Property {
                                symbol: id,
                                owner: resolved,
                            });
                        }
                    }
                } else {
                    self.add_value_exports(&owner.exports, resolved, out);
                }
            }
            TypeKind::Union(members) => {
                let maps: Vec<PropertyMap<'p>> =
                    members.iter().map(|&m| self.property_map(m)).collect();
                let Some((first, rest)) = maps.split_first() else {
                    return;
                };
                for (name, property) in first {
                    if rest.iter().all(|m| m.contains_key(name)) {
                        out.entry(*name).or_insert(Property {
                            symbol: property.symbol,
                            owner: resolved,
                        });
                    }
                }
            }
            TypeKind::Intersection(members) => {
                for &member in members.iter() {
                    self.collect_properties(member, out, depth + 1);
                }
            }
            _ => {
                let apparent = self.apparent_type(resolved);
                if apparent != resolved {
                    self.collect_properties(apparent, out, depth + 1);
                }
            }
        }
    }

    fn add_value_exports(&self, table: &'p SymbolTable, owner: TypeId, out: &mut PropertyMap<'p>) {
        for (name, &id) in table {
            if name.starts_with("__") || !self.symbol_has_meaning(id, Meaning::VALUE) {
                continue;
            }
            out.entry(name.as_str())
                .or_insert(Property { symbol: id, owner });
        }
    }

    fn collect_global_members(&self, name: &str, out: &mut PropertyMap<'p>, depth: u32) {
        if let Some(global) = self.global_interface_type(name) {
            self.collect_properties(global, out, depth + 1);
        }
    }

    fn collect_synthetic(&self, ty: TypeId, out: &mut PropertyMap<'p>, depth: u32) {
        if depth > MAX_MEMBER_DEPTH {
            return;
        }
        let resolved = self.resolve_type(ty);
        match &*self.types().get(resolved) {
            TypeKind::Reference { target, args } => {
                if self.symbol(*target).has(SymbolFlags::CLASS) {
                    add_members(&self.symbol(*target).synthetic_members, resolved, out);
                    for base in self.base_types(*target, args) {
                        self.collect_synthetic(base, out, depth + 1);
                    }
                }
            }
            TypeKind::Anonymous { symbol, .. } => {
                add_members(&self.symbol(*symbol).synthetic_members, resolved, out);
            }
            TypeKind::Intersection(members) => {
                for &member in members.iter() {
                    self.collect_synthetic(member, out, depth + 1);
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Base types
    // =========================================================================

    /// Instantiated `extends` targets of a class or interface.
    pub fn base_types(&self, target: SymbolId, args: &[TypeId]) -> Vec<TypeId> {
        let mapper = self.mapper_for_reference(target, args);
        let mut bases = Vec::new();
        for declaration in &self.symbol(target).declarations {
            let Some(arena) = self.arena(declaration.file) else {
                continue;
            };
            if !arena.kind(declaration.node).is_class_or_interface() {
                continue;
            }
            let clause = arena.extends_clause(declaration.node);
            for &base in arena.elements(clause) {
                let ty = self.type_from_type_node(declaration.file, base);
                if ty != TypeId::ANY {
                    bases.push(self.instantiate(ty, &mapper));
                }
            }
        }
        bases
    }

    /// Constructor type of a class's base class.
    pub fn base_constructor_type(&self, class: SymbolId) -> Option<TypeId> {
        let declaration = self.symbol(class).declarations.iter().find(|d| {
            self.arena(d.file)
                .is_some_and(|a| a.kind(d.node).is_class_like())
        })?;
        let arena = self.arena(declaration.file)?;
        let clause = arena.extends_clause(declaration.node);
        let &base = arena.elements(clause).first()?;
        let entity = if arena.kind(base) == SyntaxKind::TypeReference {
            arena.child(base, 0)
        } else {
            base
        };
        let symbol = self.entity_symbol(declaration.file, entity, Meaning::VALUE)?;
        Some(self.type_of_symbol(self.resolve_alias(symbol)))
    }

    // =========================================================================
    // Apparent types
    // =========================================================================

    /// The object type whose members a value of `ty` exposes: wrapper
    /// interfaces for primitives, `Array<T>` for arrays and tuples, the
    /// constraint of a type parameter.
    pub fn apparent_type(&self, ty: TypeId) -> TypeId {
        let mut current = self.resolve_type(ty);
        for _ in 0..MAX_MEMBER_DEPTH {
            let types = self.types();
            let next = match &*types.get(current) {
                TypeKind::Intrinsic(Intrinsic::String)
                | TypeKind::StringLiteral(_)
                | TypeKind::TemplateLiteral { .. }
                | TypeKind::KeyOf(_) => self.global_interface_type("String"),
                TypeKind::Intrinsic(Intrinsic::Number) | TypeKind::NumberLiteral(_) => {
                    self.global_interface_type("Number")
                }
                TypeKind::Intrinsic(Intrinsic::Boolean) | TypeKind::BooleanLiteral(_) => {
                    self.global_interface_type("Boolean")
                }
                TypeKind::Intrinsic(Intrinsic::BigInt) | TypeKind::BigIntLiteral(_) => {
                    self.global_interface_type("BigInt")
                }
                TypeKind::Intrinsic(Intrinsic::Symbol) => self.global_interface_type("Symbol"),
                TypeKind::Intrinsic(Intrinsic::Object) => self.global_interface_type("Object"),
                TypeKind::Array(element) => self.global_array_type(*element),
                TypeKind::Tuple(elements) => {
                    let element = types.union(elements.iter().map(|e| e.ty));
                    self.global_array_type(element)
                }
                TypeKind::Reference { target, .. }
                    if self
                        .symbol(*target)
                        .has(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER) =>
                {
                    if self.is_string_enum(*target) {
                        self.global_interface_type("String")
                    } else {
                        self.global_interface_type("Number")
                    }
                }
                TypeKind::TypeParameter(parameter) => Some(
                    self.type_parameter_constraint(*parameter)
                        .map_or(TypeId::UNKNOWN, |c| self.resolve_type(c)),
                ),
                _ => None,
            };
            match next {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
        current
    }

    fn is_string_enum(&self, symbol: SymbolId) -> bool {
        let member = if self.symbol(symbol).has(SymbolFlags::ENUM_MEMBER) {
            Some(symbol)
        } else {
            self.symbol(symbol).exports.values().next().copied()
        };
        member
            .and_then(|m| self.enum_member_value(m))
            .is_some_and(|v| matches!(v, ConstantValue::String(_)))
    }

    /// Instance type of a non-generic global interface such as `String`.
    pub fn global_interface_type(&self, name: &str) -> Option<TypeId> {
        let &symbol = self.program.globals().get(name)?;
        self.symbol(symbol)
            .has(SymbolFlags::INTERFACE)
            .then(|| self.types().reference(symbol, Vec::new()))
    }

    fn global_array_type(&self, element: TypeId) -> Option<TypeId> {
        let &array = self.program.globals().get("Array")?;
        Some(self.types().reference(array, vec![element]))
    }

    // =========================================================================
    // Elements and index signatures
    // =========================================================================

    /// Type produced by iterating or numerically indexing `ty`.
    pub fn element_type_of(&self, ty: TypeId) -> TypeId {
        let types = self.types();
        let resolved = self.resolve_type(ty);
        match &*types.get(resolved) {
            TypeKind::Array(element) => *element,
            TypeKind::Tuple(elements) => types.union(elements.iter().map(|e| e.ty)),
            TypeKind::Union(members) => {
                let elements: Vec<TypeId> =
                    members.iter().map(|&m| self.element_type_of(m)).collect();
                types.union(elements)
            }
            TypeKind::Intrinsic(Intrinsic::String) | TypeKind::StringLiteral(_) => TypeId::STRING,
            _ => self
                .index_signature_type(resolved, TypeId::NUMBER)
                .unwrap_or(TypeId::ANY),
        }
    }

    /// Value type of the index signature accepting `key` (`string` or
    /// `number`); numeric keys fall back to string signatures.
    pub fn index_signature_type(&self, ty: TypeId, key: TypeId) -> Option<TypeId> {
        let types = self.types();
        let resolved = self.resolve_type(ty);
        match &*types.get(resolved) {
            TypeKind::Array(element) if key == TypeId::NUMBER => return Some(*element),
            TypeKind::Tuple(elements) if key == TypeId::NUMBER => {
                return Some(types.union(elements.iter().map(|e| e.ty)));
            }
            TypeKind::Intrinsic(Intrinsic::String) | TypeKind::StringLiteral(_)
                if key == TypeId::NUMBER =>
            {
                return Some(TypeId::STRING);
            }
            _ => {}
        }
        let mut signatures = Vec::new();
        self.collect_index_signatures(resolved, &mut signatures, 0);
        signatures
            .iter()
            .find(|(k, _)| *k == key)
            .or_else(|| signatures.iter().find(|(k, _)| *k == TypeId::STRING))
            .map(|&(_, value)| value)
    }

    /// `(key, value)` pairs of the index signatures of a type.
    pub fn index_signatures_of_type(&self, ty: TypeId) -> Vec<(TypeId, TypeId)> {
        let mut signatures = Vec::new();
        self.collect_index_signatures(self.resolve_type(ty), &mut signatures, 0);
        signatures
    }

    fn collect_index_signatures(&self, ty: TypeId, out: &mut Vec<(TypeId, TypeId)>, depth: u32) {
        if depth > MAX_MEMBER_DEPTH {
            return;
        }
        let (owner, bases) = match &*self.types().get(ty) {
            TypeKind::Reference { target, args }
                if self
                    .symbol(*target)
                    .has(SymbolFlags::CLASS | SymbolFlags::INTERFACE) =>
            {
                (*target, self.base_types(*target, args))
            }
            TypeKind::Anonymous { symbol, .. }
                if self.symbol(*symbol).has(SymbolFlags::TYPE_LITERAL) =>
            {
                (*symbol, Vec::new())
            }
            TypeKind::Intersection(members) => {
                for &member in members.iter() {
                    self.collect_index_signatures(self.resolve_type(member), out, depth + 1);
                }
                return;
            }
            _ => return,
        };
        let mapper = self.mapper_of(ty);
        if let Some(&index) = self.symbol(owner).members.get("__index") {
            for declaration in &self.symbol(index).declarations {
                let Some(arena) = self.arena(declaration.file) else {
                    continue;
                };
                let Some(&parameter) = arena.parameters(declaration.node).first() else {
                    continue;
                };
                let key = self.type_from_type_node(declaration.file, arena.type_node(parameter));
                let value =
                    self.type_from_type_node(declaration.file, arena.type_node(declaration.node));
                out.push((key, self.instantiate(value, &mapper)));
            }
        }
        for base in bases {
            self.collect_index_signatures(self.resolve_type(base), out, depth + 1);
        }
    }
}

fn add_members<'p>(table: &'p SymbolTable, owner: TypeId, out: &mut PropertyMap<'p>) {
    for (name, &id) in table {
        if name.starts_with("__") {
            continue;
        }
        out.entry(name.as_str())
            .or_insert(Property { symbol: id, owner });
    }
}
