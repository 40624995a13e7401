//! Assignability, as far as overload selection needs it.
//!
//! The relation is permissive where the checker cannot decide
//! cheaply: type parameters, enums and anything past the depth bound relate
//! to everything. It rejects clear mismatches such as a string argument for a
//! number parameter or an object missing a required property.

use super::TypeChecker;
use crate::symbols::{SymbolFlags, SymbolId};
use crate::types::{Intrinsic, TypeId, TypeKind};

const MAX_RELATION_DEPTH: u32 = 8;

impl TypeChecker<'_> {
    /// Whether a value of type `source` may be passed where `target` is
    /// expected.
    pub fn is_type_assignable_to(&self, source: TypeId, target: TypeId) -> bool {
        self.is_assignable_at(source, target, 0)
    }

    fn is_assignable_at(&self, source: TypeId, target: TypeId, depth: u32) -> bool {
        if depth > MAX_RELATION_DEPTH {
            return true;
        }
        let source = self.resolve_type(source);
        let target = self.resolve_type(target);
        if source == target
            || matches!(target, TypeId::ANY | TypeId::UNKNOWN)
            || matches!(source, TypeId::ANY | TypeId::NEVER | TypeId::UNDEFINED | TypeId::NULL)
        {
            return true;
        }
        let types = self.types();
        let source_kind = types.get(source);
        let target_kind = types.get(target);
        match (&*source_kind, &*target_kind) {
            (TypeKind::Union(members), _) => members
                .iter()
                .all(|&m| self.is_assignable_at(m, target, depth + 1)),
            (_, TypeKind::Union(members)) => members
                .iter()
                .any(|&m| self.is_assignable_at(source, m, depth + 1)),
            (_, TypeKind::Intersection(members)) => members
                .iter()
                .all(|&m| self.is_assignable_at(source, m, depth + 1)),
            (TypeKind::Intersection(members), _) => members
                .iter()
                .any(|&m| self.is_assignable_at(m, target, depth + 1)),
            (TypeKind::TypeParameter(_), _)
            | (_, TypeKind::TypeParameter(_))
            | (TypeKind::KeyOf(_) | TypeKind::IndexedAccess { .. }, _)
            | (_, TypeKind::KeyOf(_) | TypeKind::IndexedAccess { .. }) => true,
            (TypeKind::Reference { target: s, .. }, _) if self.is_enum_like(*s) => true,
            (_, TypeKind::Reference { target: t, .. }) if self.is_enum_like(*t) => true,
            (TypeKind::StringLiteral(value), TypeKind::TemplateLiteral { texts, types: holes }) => {
                self.template_accepts(value, texts, holes)
            }
            (_, TypeKind::TemplateLiteral { .. }) => {
                types.base_primitive(source) == TypeId::STRING
            }
            (_, kind) if kind.is_literal() => false,
            (_, TypeKind::Intrinsic(Intrinsic::Object)) => !self.is_primitive(source),
            (_, TypeKind::Intrinsic(_)) => types.base_primitive(source) == target,
            (_, TypeKind::Array(target_element)) => match &*source_kind {
                TypeKind::Array(source_element) => {
                    self.is_assignable_at(*source_element, *target_element, depth + 1)
                }
                TypeKind::Tuple(elements) => elements
                    .iter()
                    .all(|e| self.is_assignable_at(e.ty, *target_element, depth + 1)),
                _ => !self.is_primitive(source),
            },
            _ => self.has_required_properties(source, target, depth),
        }
    }

    /// Whether `value` spells an instance of the template literal type made
    /// of `texts` around `holes`.
    pub fn template_accepts(&self, value: &str, texts: &[Box<str>], holes: &[TypeId]) -> bool {
        let Some((head, tails)) = texts.split_first() else {
            return holes.is_empty() && value.is_empty();
        };
        value
            .strip_prefix(&**head)
            .is_some_and(|rest| self.holes_accept(rest, tails, holes))
    }

    fn holes_accept(&self, value: &str, tails: &[Box<str>], holes: &[TypeId]) -> bool {
        let Some((&hole, rest_holes)) = holes.split_first() else {
            return value.is_empty();
        };
        let tail = tails.first().map_or("", |t| &**t);
        let rest_tails = tails.get(1..).unwrap_or(&[]);
        (0..=value.len())
            .filter(|&i| value.is_char_boundary(i))
            .any(|i| {
                let (piece, after) = value.split_at(i);
                after.strip_prefix(tail).is_some_and(|after| {
                    self.hole_accepts(hole, piece) && self.holes_accept(after, rest_tails, rest_holes)
                })
            })
    }

    fn hole_accepts(&self, hole: TypeId, piece: &str) -> bool {
        let types = self.types();
        let hole = self.resolve_type(hole);
        match &*types.get(hole) {
            TypeKind::Intrinsic(Intrinsic::String | Intrinsic::Any | Intrinsic::Unknown) => true,
            TypeKind::Intrinsic(Intrinsic::Number) => {
                !piece.trim().is_empty() && piece.trim() == piece && piece.parse::<f64>().is_ok()
            }
            TypeKind::Intrinsic(Intrinsic::BigInt) => piece.parse::<i128>().is_ok(),
            TypeKind::Intrinsic(Intrinsic::Boolean) => matches!(piece, "true" | "false"),
            TypeKind::Intrinsic(Intrinsic::Null) => piece == "null",
            TypeKind::Intrinsic(Intrinsic::Undefined) => piece == "undefined",
            TypeKind::StringLiteral(v) | TypeKind::NumberLiteral(v) | TypeKind::BigIntLiteral(v) => {
                &**v == piece
            }
            TypeKind::BooleanLiteral(b) => piece == if *b { "true" } else { "false" },
            TypeKind::Union(members) => members.iter().any(|&m| self.hole_accepts(m, piece)),
            TypeKind::TemplateLiteral { texts, types: holes } => {
                self.template_accepts(piece, texts, holes)
            }
            _ => false,
        }
    }

    /// Every required property of `target` exists on `source` with a
    /// related type.
    fn has_required_properties(&self, source: TypeId, target: TypeId, depth: u32) -> bool {
        for property in self.properties_of_type(target) {
            let symbol = self.symbol(property.symbol);
            let Some(other) = self.property_of_type(source, &symbol.name) else {
                if symbol.has(SymbolFlags::OPTIONAL) {
                    continue;
                }
                return false;
            };
            if !self.is_assignable_at(
                self.type_of_property(other),
                self.type_of_property(property),
                depth + 1,
            ) {
                return false;
            }
        }
        true
    }

    fn is_primitive(&self, ty: TypeId) -> bool {
        let types = self.types();
        match &*types.get(ty) {
            TypeKind::Intrinsic(intrinsic) => !matches!(
                intrinsic,
                Intrinsic::Object | Intrinsic::Any | Intrinsic::Unknown | Intrinsic::Never
            ),
            TypeKind::TemplateLiteral { .. } => true,
            kind => kind.is_literal(),
        }
    }

    fn is_enum_like(&self, symbol: SymbolId) -> bool {
        self.symbol(symbol)
            .has(SymbolFlags::ENUM | SymbolFlags::ENUM_MEMBER)
    }
}
