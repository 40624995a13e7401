//! Interned types and signatures.
//!
//! Types are stored once per structural shape in a [`TypeInterner`] and
//! referred to by [`TypeId`]. Identical shapes always produce the same id,
//! so equality of ids is structural equality. Recursive types never embed
//! themselves: object-like types point at the declaring symbol and are
//! expanded lazily by the checker.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::symbols::{DeclRef, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const OBJECT: TypeId = TypeId(11);
    pub const TRUE: TypeId = TypeId(12);
    pub const FALSE: TypeId = TypeId(13);

    const FIRST_USER: u32 = 14;

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
}

impl Intrinsic {
    pub const fn keyword(self) -> &'static str {
        match self {
            Intrinsic::Any => "any",
            Intrinsic::Unknown => "unknown",
            Intrinsic::Never => "never",
            Intrinsic::Void => "void",
            Intrinsic::Undefined => "undefined",
            Intrinsic::Null => "null",
            Intrinsic::String => "string",
            Intrinsic::Number => "number",
            Intrinsic::Boolean => "boolean",
            Intrinsic::BigInt => "bigint",
            Intrinsic::Symbol => "symbol",
            Intrinsic::Object => "object",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Intrinsic> {
        Some(match keyword {
            "any" => Intrinsic::Any,
            "unknown" => Intrinsic::Unknown,
            "never" => Intrinsic::Never,
            "void" => Intrinsic::Void,
            "undefined" => Intrinsic::Undefined,
            "null" => Intrinsic::Null,
            "string" => Intrinsic::String,
            "number" => Intrinsic::Number,
            "boolean" => Intrinsic::Boolean,
            "bigint" => Intrinsic::BigInt,
            "symbol" => Intrinsic::Symbol,
            "object" => Intrinsic::Object,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// Type parameter substitution carried by instantiated anonymous types.
pub type TypeMapper = SmallVec<[(SymbolId, TypeId); 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Intrinsic(Intrinsic),
    StringLiteral(Box<str>),
    /// Canonical source text of the number.
    NumberLiteral(Box<str>),
    BigIntLiteral(Box<str>),
    BooleanLiteral(bool),
    Union(Box<[TypeId]>),
    Intersection(Box<[TypeId]>),
    Array(TypeId),
    Tuple(Box<[TupleElement]>),
    /// A named type: class or interface instance, type alias, enum or enum
    /// member, applied to `args`.
    Reference { target: SymbolId, args: Box<[TypeId]> },
    /// Structure of a type literal, object literal, function or the value
    /// side of a class, namespace, enum or module.
    Anonymous { symbol: SymbolId, mapper: TypeMapper },
    TypeParameter(SymbolId),
    TemplateLiteral { texts: Box<[Box<str>]>, types: Box<[TypeId]> },
    KeyOf(TypeId),
    IndexedAccess { object: TypeId, index: TypeId },
}

impl TypeKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TypeKind::StringLiteral(_)
                | TypeKind::NumberLiteral(_)
                | TypeKind::BigIntLiteral(_)
                | TypeKind::BooleanLiteral(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureKind {
    Call,
    Construct,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
    pub declaration: Option<DeclRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub declaration: Option<DeclRef>,
    pub kind: SignatureKind,
    pub type_parameters: Vec<SymbolId>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
}

impl Signature {
    /// Number of arguments the signature requires.
    pub fn min_argument_count(&self) -> usize {
        self.parameters
            .iter()
            .take_while(|p| !p.optional && !p.rest)
            .count()
    }

    pub fn has_rest_parameter(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.rest)
    }

    /// Whether `count` arguments can be passed.
    pub fn accepts_argument_count(&self, count: usize) -> bool {
        count >= self.min_argument_count()
            && (self.has_rest_parameter() || count <= self.parameters.len())
    }
}

/// Concurrent structural interner for types and signatures.
///
/// Readers never block each other; the arena lock is only taken for
/// writing when a new shape is inserted.
pub struct TypeInterner {
    types: RwLock<Vec<Arc<TypeKind>>>,
    type_keys: DashMap<Arc<TypeKind>, TypeId, FxBuildHasher>,
    signatures: RwLock<Vec<Arc<Signature>>>,
    signature_keys: DashMap<Arc<Signature>, SignatureId, FxBuildHasher>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            types: RwLock::new(Vec::new()),
            type_keys: DashMap::with_hasher(FxBuildHasher),
            signatures: RwLock::new(Vec::new()),
            signature_keys: DashMap::with_hasher(FxBuildHasher),
        };
        for intrinsic in [
            Intrinsic::Any,
            Intrinsic::Unknown,
            Intrinsic::Never,
            Intrinsic::Void,
            Intrinsic::Undefined,
            Intrinsic::Null,
            Intrinsic::String,
            Intrinsic::Number,
            Intrinsic::Boolean,
            Intrinsic::BigInt,
            Intrinsic::Symbol,
            Intrinsic::Object,
        ] {
            interner.intern(TypeKind::Intrinsic(intrinsic));
        }
        interner.intern(TypeKind::BooleanLiteral(true));
        interner.intern(TypeKind::BooleanLiteral(false));
        debug_assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
        interner
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn intern(&self, kind: TypeKind) -> TypeId {
        if let Some(id) = self.type_keys.get(&kind) {
            return *id;
        }
        let kind = Arc::new(kind);
        // The entry lock serializes racing inserts of the same shape.
        *self.type_keys.entry(kind.clone()).or_insert_with(|| {
            let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
            let id = TypeId(types.len() as u32);
            types.push(kind);
            id
        })
    }

    /// The shape behind `id`. Unknown ids read as `any`.
    pub fn get(&self, id: TypeId) -> Arc<TypeKind> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        match types.get(id.index()) {
            Some(kind) => kind.clone(),
            None => types[TypeId::ANY.index()].clone(),
        }
    }

    pub fn intern_signature(&self, signature: Signature) -> SignatureId {
        if let Some(id) = self.signature_keys.get(&signature) {
            return *id;
        }
        let signature = Arc::new(signature);
        *self
            .signature_keys
            .entry(signature.clone())
            .or_insert_with(|| {
                let mut signatures = self
                    .signatures
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                let id = SignatureId(signatures.len() as u32);
                signatures.push(signature);
                id
            })
    }

    pub fn signature(&self, id: SignatureId) -> Option<Arc<Signature>> {
        self.signatures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0 as usize)
            .cloned()
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn string_literal(&self, value: &str) -> TypeId {
        self.intern(TypeKind::StringLiteral(value.into()))
    }

    pub fn number_literal(&self, text: &str) -> TypeId {
        self.intern(TypeKind::NumberLiteral(canonical_number(text).into()))
    }

    pub fn bigint_literal(&self, text: &str) -> TypeId {
        self.intern(TypeKind::BigIntLiteral(text.into()))
    }

    pub fn boolean_literal(&self, value: bool) -> TypeId {
        if value { TypeId::TRUE } else { TypeId::FALSE }
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeKind::Array(element))
    }

    pub fn tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        self.intern(TypeKind::Tuple(elements.into()))
    }

    pub fn reference(&self, target: SymbolId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Reference {
            target,
            args: args.into(),
        })
    }

    pub fn anonymous(&self, symbol: SymbolId, mapper: TypeMapper) -> TypeId {
        self.intern(TypeKind::Anonymous { symbol, mapper })
    }

    pub fn type_parameter(&self, symbol: SymbolId) -> TypeId {
        self.intern(TypeKind::TypeParameter(symbol))
    }

    /// Normalized union: nested unions are flattened, duplicates removed,
    /// `never` dropped, `any` absorbs everything, `true | false` becomes
    /// `boolean` and literals whose base primitive is present are dropped.
    /// Constituents are ordered by id, so member order never changes the
    /// resulting id.
    pub fn union(&self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::new();
        for member in members {
            match &*self.get(member) {
                TypeKind::Union(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(member),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        flat.retain(|&t| t != TypeId::NEVER);
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        if flat.contains(&TypeId::TRUE) && flat.contains(&TypeId::FALSE) {
            flat.retain(|&x| x != TypeId::TRUE && x != TypeId::FALSE);
            if let Err(slot) = flat.binary_search(&TypeId::BOOLEAN) {
                flat.insert(slot, TypeId::BOOLEAN);
            }
        }
        let snapshot = flat.clone();
        flat.retain(|&t| {
            let base = self.base_primitive(t);
            base == t || snapshot.binary_search(&base).is_err()
        });
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intern(TypeKind::Union(flat.into())),
        }
    }

    pub fn intersection(&self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::new();
        for member in members {
            match &*self.get(member) {
                TypeKind::Intersection(inner) => {
                    for &t in inner.iter() {
                        if !flat.contains(&t) {
                            flat.push(t);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => self.intern(TypeKind::Intersection(flat.into())),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Primitive a literal type widens to; other types map to themselves.
    pub fn base_primitive(&self, id: TypeId) -> TypeId {
        match &*self.get(id) {
            TypeKind::StringLiteral(_) | TypeKind::TemplateLiteral { .. } => TypeId::STRING,
            TypeKind::NumberLiteral(_) => TypeId::NUMBER,
            TypeKind::BigIntLiteral(_) => TypeId::BIGINT,
            TypeKind::BooleanLiteral(_) => TypeId::BOOLEAN,
            _ => id,
        }
    }

    /// Widening of literal types in mutable positions.
    pub fn widen(&self, id: TypeId) -> TypeId {
        match &*self.get(id) {
            TypeKind::Union(members) => {
                let widened: Vec<TypeId> = members.iter().map(|&m| self.widen(m)).collect();
                self.union(widened)
            }
            TypeKind::StringLiteral(_)
            | TypeKind::NumberLiteral(_)
            | TypeKind::BigIntLiteral(_)
            | TypeKind::BooleanLiteral(_) => self.base_primitive(id),
            _ => id,
        }
    }

    pub fn union_members(&self, id: TypeId) -> Vec<TypeId> {
        match &*self.get(id) {
            TypeKind::Union(members) => members.to_vec(),
            _ => vec![id],
        }
    }

    pub fn is_union(&self, id: TypeId) -> bool {
        matches!(&*self.get(id), TypeKind::Union(_))
    }

    /// Drop `null` and `undefined` from a union.
    pub fn non_nullable(&self, id: TypeId) -> TypeId {
        if !self.is_union(id) {
            return if id == TypeId::NULL || id == TypeId::UNDEFINED {
                TypeId::NEVER
            } else {
                id
            };
        }
        let members = self
            .union_members(id)
            .into_iter()
            .filter(|&m| m != TypeId::NULL && m != TypeId::UNDEFINED);
        self.union(members)
    }

    pub fn string_literal_value(&self, id: TypeId) -> Option<Box<str>> {
        match &*self.get(id) {
            TypeKind::StringLiteral(value) => Some(value.clone()),
            _ => None,
        }
    }
}

/// Canonical text of a numeric literal: `0x10` and `16.0` both become `16`.
pub fn canonical_number(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok().map(|v| v as f64)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u64::from_str_radix(oct, 8).ok().map(|v| v as f64)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok().map(|v| v as f64)
    } else {
        lower.parse::<f64>().ok()
    };
    match parsed {
        Some(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 => {
            format!("{}", value as i128)
        }
        Some(value) if value.is_finite() => format!("{value}"),
        _ => cleaned,
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod types_tests;
