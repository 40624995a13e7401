//! `import { | } from "m"` and `export { | } from "m"`.

use super::*;

use tsq_checker::Meaning;
use tsq_syntax::NodeIndex;
use tsq_syntax::kind::{is_identifier_part, is_identifier_start, is_identifier_text, is_reserved_word};

impl<'q, 'a> Completions<'q, 'a> {
    /// Exports of the named module that the list does not mention yet.
    /// Exports whose names are not identifiers are imported under a
    /// generated alias.
    pub(super) fn add_module_specifier_completions(
        &mut self,
        declaration: NodeIndex,
        list: NodeIndex,
        editing: Option<NodeIndex>,
        type_only: bool,
    ) -> Result<(), Cancelled> {
        let q = self.q;
        let checker = &q.checker;
        let specifier = q.arena().module_specifier(declaration);
        if specifier.is_none() {
            return Ok(());
        }
        let Some(module) = q.program.resolve_module_specifier(q.file, q.source.name_text(specifier)) else {
            tracing::debug!("module specifier does not resolve");
            return Ok(());
        };
        let listed = self.listed_specifier_names(list, editing);
        for (name, export) in checker.exports_of_module(module) {
            self.tick()?;
            if name == "default" || listed.contains(name) || checker.symbol(export).is_internal_name() {
                continue;
            }
            if type_only && !checker.symbol_has_meaning(export, Meaning::TYPE | Meaning::NAMESPACE) {
                continue;
            }
            let mut entry = Entry {
                name: name.to_string(),
                ..self.symbol_entry(export, SortTier::LocationPriority)
            };
            if !is_identifier_text(name) {
                if !q.options.include_completions_with_insert_text {
                    continue;
                }
                let quoted = q.options.quote_preference.quote_text(name);
                entry = entry.with_insert_text(format!("{quoted} as {}", import_alias(name)));
            }
            self.add_entry(entry);
        }
        Ok(())
    }
}

/// A local binding name derived from an arbitrary export name.
pub(super) fn import_alias(name: &str) -> String {
    let mut alias: String = name
        .chars()
        .map(|c| if is_identifier_part(c) { c } else { '_' })
        .collect();
    if !alias.chars().next().is_some_and(is_identifier_start) {
        alias.insert(0, '_');
    }
    if is_reserved_word(&alias) {
        alias.push('_');
    }
    alias
}

