//! Details for one entry of a completion list.

use super::*;

use tsq_checker::DisplayParts;

use crate::jsdoc::TagInfo;
use crate::quick_info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntryDetails {
    pub name: String,
    pub kind: ScriptElementKind,
    pub kind_modifiers: String,
    pub display_parts: DisplayParts,
    pub documentation: DisplayParts,
    pub tags: Vec<TagInfo>,
}

impl CompletionEntryDetails {
    pub fn display_string(&self) -> String {
        self.display_parts.to_text()
    }
}

/// Details of the entry labelled `name` in the list offered at `offset`.
/// The list is gathered again, so the entry must still be offered there.
/// Symbol entries describe their declaration the way quick info does;
/// keywords and literal values describe themselves.
#[instrument(skip_all, fields(file = %q.source.file_name, offset, name))]
pub fn completion_details_at(
    q: &FileQuery<'_>,
    offset: u32,
    name: &str,
) -> Result<Option<CompletionEntryDetails>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    let loc = CompletionLocation::resolve(q.source, offset);
    let Some(context) = context::classify(q.source, &loc) else {
        debug!("position is not completable");
        return Ok(None);
    };
    let mut completions = Completions::new(q, loc);
    if !completions.collect(&context)? {
        return Ok(None);
    }
    let Some(entry) = completions.entries.swap_remove(name) else {
        debug!("no entry with that label");
        return Ok(None);
    };
    let (display_parts, documentation, tags) = match entry.symbol {
        Some(symbol) => quick_info::symbol_description(q, symbol),
        None => {
            let mut parts = DisplayParts::new();
            if entry.kind == ScriptElementKind::Keyword {
                parts.keyword(&entry.name);
            } else {
                parts.text(entry.name.clone());
            }
            (parts, DisplayParts::new(), Vec::new())
        }
    };
    Ok(Some(CompletionEntryDetails {
        name: entry.name,
        kind: entry.kind,
        kind_modifiers: entry.kind_modifiers,
        display_parts,
        documentation,
        tags,
    }))
}
