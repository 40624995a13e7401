//! Module specifier strings: files, folders and packages.

use super::*;

use tsq_syntax::NodeIndex;

use crate::module_host::{PathEntry, PathEntryKind};

impl<'q, 'a> Completions<'q, 'a> {
    /// Entries that may follow the last `/` typed so far. Only the segment
    /// after that slash is replaced.
    pub(super) fn add_path_completions(
        &mut self,
        literal: NodeIndex,
        contents: TextSpan,
    ) -> Result<bool, Cancelled> {
        let q = self.q;
        let end = self.loc.offset.clamp(contents.start, contents.end());
        let prefix = q.source.slice(TextSpan::from_bounds(contents.start, end));
        let segment_start = prefix.rfind('/').map_or(0, |slash| slash + 1);
        let after_cursor = q.source.slice(TextSpan::from_bounds(end, contents.end()));
        let segment_end = end + after_cursor.find('/').unwrap_or(after_cursor.len()) as u32;
        let replacement = TextSpan::from_bounds(contents.start + segment_start as u32, segment_end);

        let listed = q.host.list_sibling_entries(&q.source.file_name, prefix, q.cancel)?;
        for entry in listed {
            self.tick()?;
            self.add_entry(path_entry(entry, replacement));
        }
        if !is_relative_prefix(prefix) {
            self.add_ambient_module_names(&prefix[..segment_start], replacement)?;
        }
        tracing::trace!(?literal, prefix, count = self.entries.len(), "path completions");
        Ok(true)
    }

    /// `declare module "name"` declarations whose names extend `directory`.
    fn add_ambient_module_names(
        &mut self,
        directory: &str,
        replacement: TextSpan,
    ) -> Result<(), Cancelled> {
        let program = self.q.program;
        for name in program.ambient_modules().keys() {
            self.tick()?;
            let Some(rest) = name.strip_prefix(directory) else {
                continue;
            };
            if rest.is_empty() || rest.contains('*') {
                continue;
            }
            let (segment, is_folder) = match rest.split_once('/') {
                Some((segment, _)) => (segment, true),
                None => (rest, false),
            };
            let kind = if is_folder {
                ScriptElementKind::Directory
            } else {
                ScriptElementKind::ExternalModuleName
            };
            self.add_entry(Entry::new(segment, kind, SortTier::LocationPriority).with_replacement(replacement));
        }
        Ok(())
    }
}

fn path_entry(entry: PathEntry, replacement: TextSpan) -> Entry {
    let kind = match entry.kind {
        PathEntryKind::File => ScriptElementKind::Script,
        PathEntryKind::Folder => ScriptElementKind::Directory,
        PathEntryKind::Package => ScriptElementKind::ExternalModuleName,
    };
    let modifiers = entry.extension.unwrap_or_default();
    Entry::new(entry.name, kind, SortTier::LocationPriority)
        .with_kind_modifiers(modifiers)
        .with_replacement(replacement)
}

fn is_relative_prefix(prefix: &str) -> bool {
    prefix.starts_with('.') || prefix.starts_with('/') || prefix.starts_with('#')
}
