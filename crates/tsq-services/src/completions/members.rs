//! Member lists: property access, qualified names, object literal keys,
//! object binding patterns and class bodies.

use super::*;

use rustc_hash::FxHashSet;
use tsq_checker::{Meaning, Property, SymbolFlags, TypeId, TypeKind};
use tsq_syntax::kind::is_identifier_text;
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

use crate::symbol_resolver::alias_target;

impl<'q, 'a> Completions<'q, 'a> {
    // =========================================================================
    // `a.|` and `N.|`
    // =========================================================================

    pub(super) fn add_member_completions(
        &mut self,
        access: NodeIndex,
        object: NodeIndex,
        optional_chain: bool,
        meaning: Meaning,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let file = self.q.file;
        if self.q.arena().kind(access) == SyntaxKind::QualifiedName {
            return self.add_qualified_name_completions(object, meaning);
        }

        let object_type = checker.type_of_expression(file, object);
        let ty = checker.types().non_nullable(checker.resolve_type(object_type));
        if ty == TypeId::ANY {
            if self.q.source.is_js {
                self.add_javascript_identifiers()?;
            }
            return Ok(());
        }
        let properties = if optional_chain && checker.types().is_union(ty) {
            self.union_properties(ty, false)
        } else {
            checker.properties_of_type(ty)
        };
        for property in properties {
            self.tick()?;
            if !self.is_offered_member(property.symbol) {
                continue;
            }
            let tier = if checker.symbol(property.symbol).has(SymbolFlags::STATIC) {
                SortTier::LocalDeclarationPriority
            } else {
                SortTier::LocationPriority
            };
            self.add_member_entry(property.symbol, tier, optional_chain);
        }
        for property in checker.synthetic_properties_of_type(ty) {
            self.tick()?;
            if self.is_offered_member(property.symbol) {
                self.add_member_entry(
                    property.symbol,
                    SortTier::LocalDeclarationPriority,
                    optional_chain,
                );
            }
        }
        Ok(())
    }

    /// `N.|` in a type or `import x = N.|`: the namespace's exports in the
    /// requested declaration spaces.
    fn add_qualified_name_completions(
        &mut self,
        object: NodeIndex,
        meaning: Meaning,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let Some(symbol) = checker.symbol_at_location(self.q.file, object) else {
            return Ok(());
        };
        let namespace = alias_target(checker, symbol);
        for (name, export) in checker.exports_of_module(namespace) {
            self.tick()?;
            if name == "export=" || checker.symbol(export).is_internal_name() {
                continue;
            }
            if !checker.symbol_has_meaning(export, meaning) {
                continue;
            }
            let entry = Entry {
                name: name.to_string(),
                ..self.symbol_entry(export, SortTier::LocationPriority)
            };
            self.add_entry(entry);
        }
        Ok(())
    }

    /// Every property of any union constituent, first occurrence winning.
    /// `objects_only` drops primitive constituents first.
    fn union_properties(&self, ty: TypeId, objects_only: bool) -> Vec<Property> {
        let q = self.q;
        let checker = &q.checker;
        let types = checker.types();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut result = Vec::new();
        for member in types.union_members(ty) {
            let member = checker.resolve_type(member);
            if objects_only && !is_object_like(&types.get(member)) {
                continue;
            }
            for property in checker.properties_of_type(member) {
                if seen.insert(checker.symbol_name(property.symbol)) {
                    result.push(property);
                }
            }
        }
        result
    }

    /// Member entry for `symbol`, bracketed when its name cannot follow a
    /// dot.
    fn add_member_entry(&mut self, symbol: SymbolId, tier: SortTier, optional_chain: bool) {
        let entry = self.symbol_entry(symbol, tier);
        let name = entry.name.as_str();
        if name.starts_with('#') || is_identifier_text(name) {
            self.add_entry(entry);
            return;
        }
        if !self.q.options.include_completions_with_insert_text {
            return;
        }
        let Some(dot) = self.loc.context_token else {
            return;
        };
        let chain = if optional_chain { "?." } else { "" };
        let is_index = !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit());
        let (insert, filter) = if is_index {
            (format!("{chain}[{name}]"), Some(format!(".{name}")))
        } else {
            let quoted = self.q.options.quote_preference.quote_text(name);
            (format!("{chain}[{quoted}]"), None)
        };
        let replacement = TextSpan::from_bounds(dot.pos, self.loc.replacement.end().max(self.loc.offset));
        let mut entry = entry.with_insert_text(insert).with_replacement(replacement);
        entry.commit_characters = Some(Vec::new());
        if let Some(filter) = filter {
            entry = entry.with_filter_text(filter);
        }
        self.add_entry(entry);
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    /// Members of the literal's contextual type that it does not yet
    /// declare. `false` when there is no contextual type to draw from.
    pub(super) fn add_object_literal_completions(
        &mut self,
        literal: NodeIndex,
        editing: Option<NodeIndex>,
    ) -> Result<bool, Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let file = self.q.file;
        let Some(contextual) = checker.contextual_type(file, literal) else {
            return Ok(false);
        };
        let contextual = checker.types().non_nullable(checker.resolve_type(contextual));
        if contextual == TypeId::ANY || contextual == TypeId::UNKNOWN {
            return Ok(false);
        }
        let present = self.present_member_names(literal, editing);
        let spread = self.spread_member_names(literal);
        let properties = if checker.types().is_union(contextual) {
            self.union_properties(contextual, true)
        } else {
            checker.properties_of_type(contextual)
        };
        if properties.is_empty() {
            return Ok(false);
        }
        for property in properties {
            self.tick()?;
            let symbol = property.symbol;
            let name = checker.symbol_name(symbol);
            if present.contains(name) || !self.is_offered_member(symbol) {
                continue;
            }
            let tier = if spread.contains(name) {
                SortTier::MemberDeclaredBySpread
            } else if checker.symbol(symbol).has(SymbolFlags::OPTIONAL) {
                SortTier::OptionalMember
            } else {
                SortTier::LocationPriority
            };
            let mut entry = self.symbol_entry(symbol, tier);
            if !is_identifier_text(name) {
                entry.name = self.q.options.quote_preference.quote_text(name);
            }
            self.add_entry(entry);
        }
        Ok(true)
    }

    /// Property names a `...spread` inside the literal contributes.
    fn spread_member_names(&self, literal: NodeIndex) -> FxHashSet<&'a str> {
        let q = self.q;
        let checker = &q.checker;
        let arena = self.q.arena();
        let mut names = FxHashSet::default();
        for &member in arena.members(literal) {
            if arena.kind(member) != SyntaxKind::SpreadAssignment {
                continue;
            }
            let spread = checker.type_of_expression(self.q.file, arena.expression(member));
            for property in checker.properties_of_type(spread) {
                names.insert(checker.symbol_name(property.symbol));
            }
        }
        names
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// `const { | } = value`: properties of the destructured type not yet
    /// bound by the pattern.
    pub(super) fn add_binding_pattern_completions(
        &mut self,
        pattern: NodeIndex,
        editing: Option<NodeIndex>,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let declaration = self.q.arena().parent(pattern);
        let ty = checker.type_of_declaration(self.q.file, declaration);
        let ty = checker.types().non_nullable(checker.resolve_type(ty));
        if ty == TypeId::ANY {
            return Ok(());
        }
        let bound = self.present_member_names(pattern, editing);
        for property in checker.properties_of_type(ty) {
            self.tick()?;
            let symbol = property.symbol;
            let name = checker.symbol_name(symbol);
            if bound.contains(name) || !self.is_offered_member(symbol) {
                continue;
            }
            let mut entry = self.symbol_entry(symbol, SortTier::LocationPriority);
            if !is_identifier_text(name) {
                entry.name = self.q.options.quote_preference.quote_text(name);
            }
            self.add_entry(entry);
        }
        Ok(())
    }

    // =========================================================================
    // Class bodies
    // =========================================================================

    /// Inherited and implemented members the class does not declare yet.
    /// With `static` already written, the base constructor's statics.
    pub(super) fn add_class_member_completions(
        &mut self,
        class: NodeIndex,
        modifiers: NodeFlags,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let file = self.q.file;
        let arena = self.q.arena();
        let Some(class_symbol) = checker.declaration_symbol(file, class) else {
            return Ok(());
        };
        let declared = self.declared_class_member_names(class);

        let mut sources: Vec<TypeId> = Vec::new();
        if modifiers.contains(NodeFlags::STATIC) {
            sources.extend(checker.base_constructor_type(class_symbol));
        } else {
            let instance = checker.declared_type_of_symbol(class_symbol);
            if let TypeKind::Reference { target, args } = &*checker.types().get(instance) {
                sources.extend(checker.base_types(*target, args));
            }
            let implements = arena.implements_clause(class);
            for &heritage in arena.elements(implements) {
                sources.push(checker.type_from_type_node(file, heritage));
            }
        }

        for source in sources {
            for property in checker.properties_of_type(source) {
                self.tick()?;
                let symbol = property.symbol;
                let s = checker.symbol(symbol);
                if declared.contains(s.name.as_str())
                    || s.is_internal_name()
                    || s.name == "prototype"
                    || s.name.starts_with('#')
                    || s.has(SymbolFlags::PRIVATE | SymbolFlags::CONSTRUCTOR | SymbolFlags::SIGNATURE)
                    || !is_identifier_text(&s.name)
                {
                    continue;
                }
                self.add_entry(self.symbol_entry(symbol, SortTier::LocationPriority));
            }
        }
        Ok(())
    }

    fn declared_class_member_names(&self, class: NodeIndex) -> FxHashSet<&'a str> {
        let source = self.q.source;
        let arena = &source.arena;
        arena
            .members(class)
            .iter()
            .map(|&member| arena.child(member, 0))
            .filter(|&name| name.is_some() && name != self.loc.word_node)
            .map(|name| source.name_text(name))
            .filter(|text| !text.is_empty())
            .collect()
    }
}

fn is_object_like(kind: &TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Reference { .. }
            | TypeKind::Anonymous { .. }
            | TypeKind::Intersection(_)
            | TypeKind::Array(_)
            | TypeKind::Tuple(_)
    )
}
