//! Name resolution, alias chasing and module exports.

use rustc_hash::FxHashSet;
use tracing::trace;
use tsq_common::limits::MAX_ALIAS_CHAIN;
use tsq_syntax::{NodeArena, NodeFlags, NodeIndex, SyntaxKind};

use super::TypeChecker;
use crate::symbols::{DeclRef, FileId, Meaning, SymbolFlags, SymbolId};

impl<'p> TypeChecker<'p> {
    // =========================================================================
    // Lexical lookup
    // =========================================================================

    /// Resolve `name` as seen from `location`, innermost scope first, then
    /// the global table.
    pub fn resolve_name(
        &self,
        file: FileId,
        location: NodeIndex,
        name: &str,
        meaning: Meaning,
    ) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let binding = self.binding(file)?;
        for ancestor in arena.ancestors(location) {
            if let Some(&id) = binding.locals_of(ancestor).and_then(|t| t.get(name))
                && self.symbol_has_meaning(id, meaning)
            {
                return Some(id);
            }
            if arena.kind(ancestor) == SyntaxKind::ModuleDeclaration
                && let Some(namespace) = binding.symbol_of_declaration(ancestor)
                && let Some(&id) = self.symbol(namespace).exports.get(name)
                && self.symbol_has_meaning(id, meaning)
            {
                return Some(id);
            }
        }
        self.program
            .globals()
            .get(name)
            .copied()
            .filter(|&id| self.symbol_has_meaning(id, meaning))
    }

    /// Whether a symbol (or the target of an alias) lives in one of the
    /// declaration spaces of `meaning`. Unresolvable aliases match anything.
    pub fn symbol_has_meaning(&self, id: SymbolId, meaning: Meaning) -> bool {
        let symbol = self.symbol(id);
        if symbol.has(SymbolFlags::ALIAS) {
            let target = self.resolve_alias(id);
            return target == id || self.symbol(target).flags.meaning().intersects(meaning);
        }
        symbol.flags.meaning().intersects(meaning)
    }

    /// Every symbol visible at `location` in the declaration spaces of
    /// `meaning`. Inner declarations shadow outer ones of the same name.
    pub fn symbols_in_scope(
        &self,
        file: FileId,
        location: NodeIndex,
        meaning: Meaning,
    ) -> Vec<SymbolId> {
        let (Some(arena), Some(binding)) = (self.arena(file), self.binding(file)) else {
            return Vec::new();
        };
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut result = Vec::new();
        let mut visit = |name: &'p str, id: SymbolId, result: &mut Vec<SymbolId>| {
            if name.starts_with("__") || name == "default" || name == "export=" {
                return;
            }
            if seen.contains(name) {
                return;
            }
            if self.symbol_has_meaning(id, meaning) {
                seen.insert(name);
                result.push(id);
            }
        };
        for ancestor in arena.ancestors(location) {
            if let Some(table) = binding.locals_of(ancestor) {
                for (name, &id) in table {
                    visit(name.as_str(), id, &mut result);
                }
            }
            if arena.kind(ancestor) == SyntaxKind::ModuleDeclaration
                && let Some(namespace) = binding.symbol_of_declaration(ancestor)
            {
                for &id in self.symbol(namespace).exports.values() {
                    visit(name_of(self, id), id, &mut result);
                }
            }
        }
        for &id in self.program.globals().values() {
            visit(name_of(self, id), id, &mut result);
        }
        result
    }

    // =========================================================================
    // Symbol at a location
    // =========================================================================

    /// Symbol a name-like node denotes: the declared symbol for declaration
    /// names, the referenced symbol otherwise. Aliases are not chased.
    pub fn symbol_at_location(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let binding = self.binding(file)?;
        let kind = arena.kind(node);
        if !matches!(
            kind,
            SyntaxKind::Identifier
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::NumericLiteral
        ) || arena.flags(node).contains(NodeFlags::MISSING)
        {
            return None;
        }
        let parent = arena.parent(node);
        let parent_kind = arena.kind(parent);

        if kind.is_string_literal_like() && is_module_specifier(arena, node) {
            return self
                .program
                .resolve_module_specifier(file, arena.text(node));
        }

        match parent_kind {
            SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier
                if arena.property_name(parent) == node =>
            {
                return self.specifier_target(file, parent);
            }
            SyntaxKind::ExportSpecifier if arena.property_name(parent).is_none() => {
                // `export { x }` names both the export and the local.
                return binding.symbol_of_declaration(parent);
            }
            SyntaxKind::BindingElement if arena.property_name(parent) == node => {
                return self.binding_element_property(file, parent);
            }
            SyntaxKind::PropertyAccessExpression if arena.name(parent) == node => {
                return self.property_access_symbol(file, parent);
            }
            SyntaxKind::QualifiedName if arena.right(parent) == node => {
                let left = self.entity_symbol(file, arena.left(parent), Meaning::NAMESPACE)?;
                let left = self.resolve_alias(left);
                return self.export_of_symbol(left, arena.text(node));
            }
            SyntaxKind::ElementAccessExpression
                if arena.argument_expression(parent) == node && kind.is_string_literal_like() =>
            {
                let object = self.type_of_expression(file, arena.expression(parent));
                return self
                    .property_of_type_lenient(object, arena.text(node))
                    .map(|p| p.symbol);
            }
            SyntaxKind::ComputedPropertyName => {
                let member = arena.parent(parent);
                return binding.symbol_of_declaration(member);
            }
            _ => {}
        }

        if arena.name(parent) == node && is_declaration_kind(parent_kind) {
            if let Some(id) = binding.symbol_of_declaration(parent) {
                return Some(id);
            }
            if kind == SyntaxKind::PrivateIdentifier {
                return self.private_name_symbol(file, node, arena.text(node));
            }
        }
        if kind == SyntaxKind::PrivateIdentifier {
            return self.private_name_symbol(file, node, arena.text(node));
        }
        if kind != SyntaxKind::Identifier {
            return None;
        }
        let meaning = meaning_of_identifier(arena, node);
        self.resolve_name(file, node, arena.text(node), meaning)
    }

    /// For `{ a }` in an object literal: the local value named `a`.
    pub fn shorthand_value_symbol(&self, file: FileId, assignment: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        if arena.kind(assignment) != SyntaxKind::ShorthandPropertyAssignment {
            return None;
        }
        let name = arena.name(assignment);
        self.resolve_name(file, assignment, arena.text(name), Meaning::VALUE)
    }

    /// Symbol of an entity name (identifier, qualified name or property
    /// access chain) in the given declaration spaces.
    pub(crate) fn entity_symbol(
        &self,
        file: FileId,
        node: NodeIndex,
        meaning: Meaning,
    ) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        match arena.kind(node) {
            SyntaxKind::Identifier => {
                if arena.flags(node).contains(NodeFlags::MISSING) {
                    return None;
                }
                self.resolve_name(file, node, arena.text(node), meaning)
            }
            SyntaxKind::QualifiedName | SyntaxKind::PropertyAccessExpression => {
                let (left, right) = if arena.kind(node) == SyntaxKind::QualifiedName {
                    (arena.left(node), arena.right(node))
                } else {
                    (arena.expression(node), arena.name(node))
                };
                let namespace =
                    self.entity_symbol(file, left, Meaning::NAMESPACE | Meaning::VALUE)?;
                let namespace = self.resolve_alias(namespace);
                self.export_of_symbol(namespace, arena.text(right))
            }
            _ => None,
        }
    }

    fn private_name_symbol(&self, file: FileId, node: NodeIndex, name: &str) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let binding = self.binding(file)?;
        arena
            .ancestors(node)
            .filter(|&a| arena.kind(a).is_class_like())
            .filter_map(|class| binding.symbol_of_declaration(class))
            .find_map(|class| {
                let class = self.symbol(class);
                class
                    .members
                    .get(name)
                    .or_else(|| class.exports.get(name))
                    .copied()
            })
    }

    fn property_access_symbol(&self, file: FileId, access: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let name = arena.text(arena.name(access));
        if arena.kind(arena.name(access)) == SyntaxKind::PrivateIdentifier {
            return self.private_name_symbol(file, access, name);
        }
        let object = self.type_of_expression(file, arena.expression(access));
        if let Some(property) = self.property_of_type_lenient(object, name) {
            return Some(property.symbol);
        }
        self.declaration_symbol(file, access)
    }

    /// Property of the destructured type named by a binding element's
    /// property name, e.g. `a` in `const { a: b } = obj`.
    fn binding_element_property(&self, file: FileId, element: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let pattern = arena.parent(element);
        let source = self.binding_pattern_source_type(file, pattern);
        let name = arena.text(arena.property_name(element));
        self.property_of_type_lenient(source, name).map(|p| p.symbol)
    }

    // =========================================================================
    // Aliases and modules
    // =========================================================================

    /// Follow import/export aliases to the symbol they ultimately denote.
    /// Unresolvable aliases resolve to themselves.
    pub fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        for _ in 0..MAX_ALIAS_CHAIN {
            if !self.symbol(current).has(SymbolFlags::ALIAS) {
                return current;
            }
            let next = self.guarded(super::Resolution::AliasTarget(current), None, || {
                self.immediate_alias_target(current)
            });
            match next {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
        trace!(symbol = id.0, "alias chain too long");
        current
    }

    /// One step of alias resolution.
    pub fn immediate_alias_target(&self, alias: SymbolId) -> Option<SymbolId> {
        let DeclRef { file, node } = self.symbol(alias).first_declaration()?;
        let arena = self.arena(file)?;
        match arena.kind(node) {
            SyntaxKind::ImportClause => {
                let module = self.module_of_declaration(file, arena.parent(node))?;
                self.export_of_module(module, "default")
                    .or_else(|| self.export_equals_target(module))
            }
            SyntaxKind::NamespaceImport => {
                let declaration = arena.parent(arena.parent(node));
                let module = self.module_of_declaration(file, declaration)?;
                Some(self.export_equals_target(module).unwrap_or(module))
            }
            SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier => {
                self.specifier_target(file, node)
            }
            SyntaxKind::NamespaceExport => self.module_of_declaration(file, arena.parent(node)),
            SyntaxKind::ImportEqualsDeclaration => {
                let reference = arena.module_reference(node);
                if arena.kind(reference) == SyntaxKind::ExternalModuleReference {
                    let module = self.module_of_declaration(file, node)?;
                    Some(self.export_equals_target(module).unwrap_or(module))
                } else {
                    self.entity_symbol(file, reference, Meaning::ALL)
                }
            }
            SyntaxKind::ExportAssignment => {
                let expression = arena.expression(node);
                match arena.kind(expression) {
                    SyntaxKind::Identifier | SyntaxKind::PropertyAccessExpression => {
                        self.entity_symbol(file, expression, Meaning::ALL)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Module symbol named by the specifier of an import or export
    /// declaration.
    pub(crate) fn module_of_declaration(
        &self,
        file: FileId,
        declaration: NodeIndex,
    ) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let specifier = arena.module_specifier(declaration);
        if specifier.is_none() || !arena.kind(specifier).is_string_literal_like() {
            return None;
        }
        self.program
            .resolve_module_specifier(file, arena.text(specifier))
    }

    /// Target of `import { a as b }` / `export { a as b }`: the export `a`
    /// of the source module, or the local `a` without a module.
    fn specifier_target(&self, file: FileId, specifier: NodeIndex) -> Option<SymbolId> {
        let arena = self.arena(file)?;
        let property = arena.property_name(specifier);
        let source_name = if property.is_some() && !arena.flags(property).contains(NodeFlags::MISSING)
        {
            property
        } else {
            arena.name(specifier)
        };
        let name = arena.text(source_name);
        let declaration = arena.parent(arena.parent(specifier));
        let declaration = if arena.kind(declaration) == SyntaxKind::ImportClause {
            arena.parent(declaration)
        } else {
            declaration
        };
        if arena.module_specifier(declaration).is_some() {
            let module = self.module_of_declaration(file, declaration)?;
            self.export_of_module(module, name)
        } else {
            self.resolve_name(file, declaration, name, Meaning::ALL)
        }
    }

    /// Target of a module's `export =`.
    pub fn export_equals_target(&self, module: SymbolId) -> Option<SymbolId> {
        let &assignment = self.symbol(module).exports.get("export=")?;
        Some(self.resolve_alias(assignment))
    }

    /// Look up one export of a module, through `export *` and `export =`.
    pub fn export_of_module(&self, module: SymbolId, name: &str) -> Option<SymbolId> {
        self.exports_of_module(module)
            .into_iter()
            .find_map(|(n, id)| (n == name).then_some(id))
    }

    /// Named member of a namespace-like symbol: module exports, namespace
    /// and enum members, or class statics.
    pub(crate) fn export_of_symbol(&self, symbol: SymbolId, name: &str) -> Option<SymbolId> {
        if self
            .symbol(symbol)
            .has(SymbolFlags::SOURCE_MODULE | SymbolFlags::AMBIENT)
            && self.symbol(symbol).name.starts_with('"')
        {
            return self.export_of_module(symbol, name);
        }
        self.symbol(symbol).exports.get(name).copied()
    }

    /// Every export of a module in declaration order, excluding `export=`.
    /// Star re-exports contribute their names except `default`; a module
    /// with `export =` exposes the members of its target instead.
    pub fn exports_of_module(&self, module: SymbolId) -> Vec<(&'p str, SymbolId)> {
        let mut visited = FxHashSet::default();
        let mut result = Vec::new();
        self.collect_module_exports(module, &mut visited, &mut result, true);
        result
    }

    fn collect_module_exports(
        &self,
        module: SymbolId,
        visited: &mut FxHashSet<SymbolId>,
        result: &mut Vec<(&'p str, SymbolId)>,
        include_default: bool,
    ) {
        if !visited.insert(module) {
            return;
        }
        let symbol = self.symbol(module);
        if let Some(target) = self.export_equals_target(module)
            && target != module
        {
            for (name, &id) in &self.symbol(target).exports {
                result.push((name.as_str(), id));
            }
            return;
        }
        for (name, &id) in &symbol.exports {
            if name == "export=" || (!include_default && name == "default") {
                continue;
            }
            if result.iter().any(|(n, _)| *n == name.as_str()) {
                continue;
            }
            result.push((name.as_str(), id));
        }
        for star in &symbol.export_stars {
            if let Some(source) = self.module_of_declaration(star.file, star.node) {
                let mut nested = Vec::new();
                self.collect_module_exports(source, visited, &mut nested, false);
                for (name, id) in nested {
                    if !result.iter().any(|(n, _)| *n == name) {
                        result.push((name, id));
                    }
                }
            }
        }
    }

    pub fn symbol_name(&self, id: SymbolId) -> &'p str {
        name_of(self, id)
    }
}

fn name_of<'p>(checker: &TypeChecker<'p>, id: SymbolId) -> &'p str {
    checker.symbol(id).name.as_str()
}

/// Whether a string literal is the module specifier of an import, export,
/// `import x = require(...)`, `require(...)` call or ambient module name.
pub fn is_module_specifier(arena: &NodeArena, node: NodeIndex) -> bool {
    let parent = arena.parent(node);
    match arena.kind(parent) {
        SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration => {
            arena.module_specifier(parent) == node
        }
        SyntaxKind::ExternalModuleReference => true,
        SyntaxKind::ModuleDeclaration => arena.name(parent) == node,
        SyntaxKind::ArgumentList => {
            let call = arena.parent(parent);
            if arena.kind(call) != SyntaxKind::CallExpression || arena.slots(parent).first() != Some(&node) {
                return false;
            }
            let callee = arena.expression(call);
            arena.kind(callee) == SyntaxKind::Identifier
                && matches!(arena.text(callee), "require" | "import")
        }
        _ => false,
    }
}

/// Kinds whose name slot declares a symbol.
pub fn is_declaration_kind(kind: SyntaxKind) -> bool {
    kind.is_function_like()
        || kind.is_class_or_interface()
        || kind.is_variable_like()
        || matches!(
            kind,
            SyntaxKind::BindingElement
                | SyntaxKind::ShorthandPropertyAssignment
                | SyntaxKind::TypeAliasDeclaration
                | SyntaxKind::EnumDeclaration
                | SyntaxKind::ModuleDeclaration
                | SyntaxKind::TypeParameter
                | SyntaxKind::ImportClause
                | SyntaxKind::NamespaceImport
                | SyntaxKind::NamespaceExport
                | SyntaxKind::ImportSpecifier
                | SyntaxKind::ExportSpecifier
                | SyntaxKind::ImportEqualsDeclaration
        )
}

/// Declaration spaces an identifier reference looks in.
pub fn meaning_of_identifier(arena: &NodeArena, node: NodeIndex) -> Meaning {
    let parent = arena.parent(node);
    match arena.kind(parent) {
        SyntaxKind::TypeReference => Meaning::TYPE,
        SyntaxKind::QualifiedName if arena.left(parent) == node => {
            if arena
                .ancestors(parent)
                .any(|a| arena.kind(a) == SyntaxKind::TypeQuery)
            {
                Meaning::VALUE | Meaning::NAMESPACE
            } else {
                Meaning::NAMESPACE
            }
        }
        SyntaxKind::ExportSpecifier | SyntaxKind::ExportAssignment => Meaning::ALL,
        SyntaxKind::ImportEqualsDeclaration => Meaning::ALL,
        SyntaxKind::HeritageClause => Meaning::VALUE | Meaning::TYPE,
        _ => Meaning::VALUE | Meaning::NAMESPACE,
    }
}
