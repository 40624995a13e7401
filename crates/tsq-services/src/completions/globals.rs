//! Identifier positions resolved through scope.

use super::*;

use rustc_hash::FxHashSet;
use tsq_checker::{Meaning, SymbolFlags, TypeId, TypeKind};
use tsq_syntax::kind::{is_identifier_text, is_reserved_word};
use tsq_syntax::{NodeFlags, NodeIndex, SyntaxKind};

impl<'q, 'a> Completions<'q, 'a> {
    /// Scope symbols, `this.` members, keywords, then (in JavaScript files)
    /// the file's bare identifiers.
    pub(super) fn add_global_completions(
        &mut self,
        type_only: bool,
        filter: KeywordFilter,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let meaning = if type_only {
            Meaning::TYPE | Meaning::NAMESPACE
        } else {
            Meaning::VALUE
        };
        for symbol in checker.symbols_in_scope(q.file, self.loc.node, meaning) {
            self.tick()?;
            let name = checker.symbol_name(symbol);
            if !is_identifier_text(name) {
                continue;
            }
            let tier = if self.is_declared_here(symbol) {
                SortTier::LocationPriority
            } else {
                SortTier::GlobalsOrKeywords
            };
            self.add_entry(self.symbol_entry(symbol, tier));
        }
        if !type_only {
            self.add_this_member_suggestions()?;
        }
        self.add_keywords(filter);
        if q.source.is_js && !type_only {
            self.add_javascript_identifiers()?;
        }
        Ok(())
    }

    /// Inside class code, instance members offered as `this.name`.
    fn add_this_member_suggestions(&mut self) -> Result<(), Cancelled> {
        let q = self.q;
        if !q.options.include_completions_with_insert_text {
            return Ok(());
        }
        let checker = &q.checker;
        let this_type = checker.this_type_at(q.file, self.loc.node);
        if this_type == TypeId::ANY {
            return Ok(());
        }
        if let TypeKind::Anonymous { symbol, .. } = &*checker.types().get(this_type)
            && checker.symbol(*symbol).has(SymbolFlags::CLASS)
        {
            // Static blocks and methods: `this` is the constructor.
            return Ok(());
        }
        for property in checker.properties_of_type(this_type) {
            self.tick()?;
            let symbol = property.symbol;
            let name = checker.symbol_name(symbol);
            if self.has_entry(name) || !is_identifier_text(name) || !self.is_offered_member(symbol) {
                continue;
            }
            let entry = self
                .symbol_entry(symbol, SortTier::SuggestedClassMembers)
                .with_insert_text(format!("this.{name}"));
            self.add_entry(entry);
        }
        Ok(())
    }

    /// Every identifier written in this file that is not offered yet,
    /// except the word under the cursor.
    pub(super) fn add_javascript_identifiers(&mut self) -> Result<(), Cancelled> {
        let source = self.q.source;
        let arena = &source.arena;
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut names: Vec<&str> = Vec::new();
        for index in 0..arena.len() {
            self.tick()?;
            let node = NodeIndex(index as u32);
            if node == self.loc.word_node
                || arena.kind(node) != SyntaxKind::Identifier
                || arena.flags(node).contains(NodeFlags::MISSING)
            {
                continue;
            }
            let text = arena.text(node);
            if text.is_empty() || is_reserved_word(text) || !seen.insert(text) {
                continue;
            }
            names.push(text);
        }
        for name in names {
            if !self.has_entry(name) {
                self.add_entry(Entry::new(
                    name,
                    ScriptElementKind::Warning,
                    SortTier::JavascriptIdentifiers,
                ));
            }
        }
        Ok(())
    }

    /// `export { | }`: top-level declarations of this file that the list
    /// does not name yet.
    pub(super) fn add_local_export_completions(
        &mut self,
        list: NodeIndex,
        editing: Option<NodeIndex>,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let Some(binding) = checker.binding(q.file) else {
            return Ok(());
        };
        let listed = self.listed_specifier_names(list, editing);
        let exported: FxHashSet<&str> = binding
            .module_symbol
            .map(|module| {
                checker
                    .symbol(module)
                    .exports
                    .keys()
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default();
        let Some(locals) = binding.locals_of(q.root()) else {
            return Ok(());
        };
        for (name, &symbol) in locals {
            self.tick()?;
            if listed.contains(name.as_str())
                || exported.contains(name.as_str())
                || !is_identifier_text(name)
            {
                continue;
            }
            self.add_entry(self.symbol_entry(symbol, SortTier::LocationPriority));
        }
        Ok(())
    }

    /// Source-side names already written in a named import or export list.
    pub(super) fn listed_specifier_names(
        &self,
        list: NodeIndex,
        editing: Option<NodeIndex>,
    ) -> FxHashSet<&'a str> {
        let source = self.q.source;
        let arena = &source.arena;
        arena
            .elements(list)
            .iter()
            .filter(|&&specifier| Some(specifier) != editing)
            .map(|&specifier| {
                let property = arena.property_name(specifier);
                if property.is_some() {
                    property
                } else {
                    arena.name(specifier)
                }
            })
            .filter(|&name| name.is_some() && name != self.loc.word_node)
            .map(|name| source.name_text(name))
            .filter(|text| !text.is_empty())
            .collect()
    }
}
