//! Completions inside the quotes of a string literal.

use super::*;

use rustc_hash::FxHashSet;
use tsq_checker::{Property, SymbolFlags, TypeId, TypeKind};
use tsq_syntax::{NodeIndex, SyntaxKind};

/// Template literal types expand to at most this many strings.
const MAX_TEMPLATE_EXPANSION: usize = 100;

/// Bound on constraint and intersection nesting when collecting values.
const MAX_LITERAL_SOURCE_DEPTH: u32 = 8;

/// Where the literal's candidate values come from.
enum StringSource {
    /// Literal constituents of an expected type.
    Literals {
        ty: TypeId,
        /// Values already spelled out elsewhere in the same union type.
        used: FxHashSet<String>,
    },
    /// `obj["|"]`, `T["|"]`: property names of the object type.
    PropertyNames { ty: TypeId },
    /// `{ "|": ... }` under a contextual type.
    ObjectKey { literal: NodeIndex, editing: NodeIndex },
    ModuleSpecifier,
}

impl<'q, 'a> Completions<'q, 'a> {
    /// `false` when the string is not a completable literal.
    pub(super) fn add_string_literal_completions(
        &mut self,
        literal: NodeIndex,
    ) -> Result<bool, Cancelled> {
        let Some(source) = self.string_source(literal) else {
            return Ok(false);
        };
        let contents = self.string_contents_span(literal);
        match source {
            StringSource::ModuleSpecifier => return self.add_path_completions(literal, contents),
            StringSource::Literals { ty, used } => {
                for value in self.literal_values(ty) {
                    self.tick()?;
                    if used.contains(&value) {
                        continue;
                    }
                    let entry = self.string_entry(value, ScriptElementKind::String, contents, literal);
                    self.add_entry(entry);
                }
            }
            StringSource::PropertyNames { ty } => {
                let q = self.q;
                let checker = &q.checker;
                let ty = checker.types().non_nullable(checker.resolve_type(ty));
                for property in checker.properties_of_type(ty) {
                    self.tick()?;
                    if !self.is_offered_member(property.symbol) {
                        continue;
                    }
                    self.add_property_name_entry(property, SortTier::LocationPriority, contents, literal);
                }
            }
            StringSource::ObjectKey { literal: object, editing } => {
                let q = self.q;
                let checker = &q.checker;
                let Some(contextual) = checker.contextual_type(q.file, object) else {
                    return Ok(false);
                };
                let contextual = checker.types().non_nullable(checker.resolve_type(contextual));
                let present = self.present_member_names(object, Some(editing));
                for property in checker.properties_of_type(contextual) {
                    self.tick()?;
                    let symbol = property.symbol;
                    if present.contains(checker.symbol_name(symbol)) || !self.is_offered_member(symbol) {
                        continue;
                    }
                    let tier = if checker.symbol(symbol).has(SymbolFlags::OPTIONAL) {
                        SortTier::OptionalMember
                    } else {
                        SortTier::LocationPriority
                    };
                    self.add_property_name_entry(property, tier, contents, literal);
                }
            }
        }
        Ok(true)
    }

    fn string_source(&self, literal: NodeIndex) -> Option<StringSource> {
        let q = self.q;
        let checker = &q.checker;
        let arena = q.arena();
        let parent = arena.parent(literal);
        if tsq_checker::checker::is_module_specifier(arena, literal) {
            return (arena.kind(parent) != SyntaxKind::ModuleDeclaration)
                .then_some(StringSource::ModuleSpecifier);
        }
        match arena.kind(parent) {
            SyntaxKind::LiteralType => self.type_position_source(parent),
            SyntaxKind::ElementAccessExpression if arena.argument_expression(parent) == literal => {
                let object = checker.type_of_expression(q.file, arena.expression(parent));
                Some(StringSource::PropertyNames { ty: object })
            }
            SyntaxKind::PropertyAssignment | SyntaxKind::MethodDeclaration
                if arena.child(parent, 0) == literal
                    && arena.kind(arena.parent(parent)) == SyntaxKind::ObjectLiteralExpression =>
            {
                Some(StringSource::ObjectKey {
                    literal: arena.parent(parent),
                    editing: parent,
                })
            }
            _ => {
                let ty = checker.contextual_type(q.file, literal)?;
                Some(StringSource::Literals {
                    ty,
                    used: FxHashSet::default(),
                })
            }
        }
    }

    /// A string literal type: an indexed access key, or a type argument
    /// checked against its parameter's constraint.
    fn type_position_source(&self, literal_type: NodeIndex) -> Option<StringSource> {
        let q = self.q;
        let checker = &q.checker;
        let arena = q.arena();
        let mut position = literal_type;
        let mut used = FxHashSet::default();
        if arena.kind(arena.parent(position)) == SyntaxKind::UnionType {
            let union = arena.parent(position);
            for &sibling in arena.elements(union) {
                if sibling != literal_type && arena.kind(sibling) == SyntaxKind::LiteralType {
                    let value = arena.child(sibling, 0);
                    if arena.kind(value).is_string_literal_like() {
                        used.insert(arena.text(value).to_string());
                    }
                }
            }
            position = union;
        }
        let parent = arena.parent(position);
        match arena.kind(parent) {
            SyntaxKind::IndexedAccessType if arena.child(parent, 1) == position => {
                let object = checker.type_from_type_node(q.file, arena.child(parent, 0));
                Some(StringSource::PropertyNames { ty: object })
            }
            SyntaxKind::TypeReference => {
                let index = arena.type_arguments(parent).iter().position(|&a| a == position)?;
                let target = checker.symbol_at_location(q.file, arena.child(parent, 0))?;
                let target = crate::symbol_resolver::alias_target(checker, target);
                let parameter = *checker.type_parameters_of_symbol(target).get(index)?;
                let constraint = checker.type_parameter_constraint(parameter)?;
                Some(StringSource::Literals {
                    ty: constraint,
                    used,
                })
            }
            _ => None,
        }
    }

    /// String values a type admits: its string literal constituents, with
    /// template literal types expanded where every hole is a literal union.
    /// Under an intersection with template literal types only the values
    /// fitting every template's pattern remain.
    fn literal_values(&self, ty: TypeId) -> Vec<String> {
        self.literal_values_at(ty, 0)
    }

    fn literal_values_at(&self, ty: TypeId, depth: u32) -> Vec<String> {
        let checker = &self.q.checker;
        let types = checker.types();
        let mut values: Vec<String> = Vec::new();
        if depth > MAX_LITERAL_SOURCE_DEPTH {
            return values;
        }
        let resolved = checker.resolve_type(ty);
        for member in types.union_members(resolved) {
            let member = checker.resolve_type(member);
            let expanded = match &*types.get(member) {
                TypeKind::StringLiteral(value) => vec![value.to_string()],
                TypeKind::TemplateLiteral { texts, types: holes } => {
                    self.expand_template(texts, holes)
                }
                TypeKind::TypeParameter(parameter) => checker
                    .type_parameter_constraint(*parameter)
                    .map(|c| self.literal_values_at(c, depth + 1))
                    .unwrap_or_default(),
                TypeKind::Intersection(parts) => self.intersection_values(parts, depth),
                _ => Vec::new(),
            };
            for value in expanded {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Literal values of the non-template parts, kept when they match the
    /// prefix, suffix and holes of every template part.
    fn intersection_values(&self, parts: &[TypeId], depth: u32) -> Vec<String> {
        let checker = &self.q.checker;
        let types = checker.types();
        let (templates, others): (Vec<TypeId>, Vec<TypeId>) = parts
            .iter()
            .map(|&p| checker.resolve_type(p))
            .partition(|&p| matches!(&*types.get(p), TypeKind::TemplateLiteral { .. }));
        if others.is_empty() {
            return templates
                .first()
                .map(|&t| self.literal_values_at(t, depth + 1))
                .unwrap_or_default();
        }
        let mut values: Vec<String> = Vec::new();
        for &other in &others {
            for value in self.literal_values_at(other, depth + 1) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values.retain(|value| {
            templates.iter().all(|&template| match &*types.get(template) {
                TypeKind::TemplateLiteral { texts, types: holes } => {
                    checker.template_accepts(value, texts, holes)
                }
                _ => true,
            })
        });
        values
    }

    fn expand_template(&self, texts: &[Box<str>], holes: &[TypeId]) -> Vec<String> {
        let checker = &self.q.checker;
        let types = checker.types();
        let mut results = vec![texts.first().map_or(String::new(), |t| t.to_string())];
        for (i, &hole) in holes.iter().enumerate() {
            let mut options = Vec::new();
            for member in types.union_members(checker.resolve_type(hole)) {
                match &*types.get(member) {
                    TypeKind::StringLiteral(v) | TypeKind::NumberLiteral(v) => {
                        options.push(v.to_string());
                    }
                    TypeKind::BooleanLiteral(b) => options.push(b.to_string()),
                    _ => return Vec::new(),
                }
            }
            let tail = texts.get(i + 1).map_or("", |t| &**t);
            let mut next = Vec::new();
            for prefix in &results {
                for option in &options {
                    if next.len() >= MAX_TEMPLATE_EXPANSION {
                        break;
                    }
                    next.push(format!("{prefix}{option}{tail}"));
                }
            }
            results = next;
        }
        results
    }

    fn add_property_name_entry(
        &mut self,
        property: Property,
        tier: SortTier,
        contents: TextSpan,
        literal: NodeIndex,
    ) {
        let symbol = property.symbol;
        let name = self.q.checker.symbol_name(symbol);
        if name.starts_with('#') {
            return;
        }
        let mut entry = self.symbol_entry(symbol, tier);
        let template = self.string_entry(name.to_string(), entry.kind, contents, literal);
        entry.insert_text = template.insert_text;
        entry.replacement = template.replacement;
        self.add_entry(entry);
    }

    /// An entry replacing the literal's contents with `value`, escaped for
    /// the literal's quote character.
    fn string_entry(
        &self,
        value: String,
        kind: ScriptElementKind,
        contents: TextSpan,
        literal: NodeIndex,
    ) -> Entry {
        let quote = self.q.node_text(literal).chars().next().unwrap_or('"');
        let needs_escape = value.contains(quote) || value.contains('\\') || value.contains('\n');
        let mut entry = Entry::new(value.clone(), kind, SortTier::LocationPriority).with_replacement(contents);
        if needs_escape {
            let mut escaped = String::with_capacity(value.len());
            for ch in value.chars() {
                match ch {
                    '\\' => escaped.push_str("\\\\"),
                    '\n' => escaped.push_str("\\n"),
                    c if c == quote => {
                        escaped.push('\\');
                        escaped.push(c);
                    }
                    c => escaped.push(c),
                }
            }
            entry = entry.with_insert_text(escaped);
        }
        entry
    }

    /// Between the quotes; up to the cursor when the literal is
    /// unterminated.
    pub(super) fn string_contents_span(&self, literal: NodeIndex) -> TextSpan {
        let span = self.q.span(literal);
        let text = self.q.node_text(literal);
        let start = span.start + 1;
        let terminated = text.len() >= 2 && text.chars().last() == text.chars().next();
        let end = if terminated {
            span.end() - 1
        } else {
            self.loc.offset.max(start)
        };
        TextSpan::from_bounds(start, end.max(start))
    }
}
