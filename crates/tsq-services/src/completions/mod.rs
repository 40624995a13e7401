//! Completion lists.
//!
//! Given a position in a file, classify the syntactic situation, gather the
//! candidate entries that situation admits, and render them in a stable
//! order. Entries are keyed by label; the first entry added under a label
//! wins, so collectors run from the most specific source to the least
//! specific one.

mod details;
mod filters;
mod globals;
mod imports;
mod jsdoc_tags;
pub mod keywords;
mod members;
mod paths;
mod string_literals;

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use tsq_checker::SymbolId;
use tsq_common::{Cancelled, Checkpoint, Range, TextSpan};

use crate::context::{self, CompletionContext};
use crate::display::{self, ScriptElementKind};
use crate::position::CompletionLocation;
use crate::query::FileQuery;
use keywords::KeywordFilter;

pub use details::{CompletionEntryDetails, completion_details_at};

// =============================================================================
// Sort tiers
// =============================================================================

/// Primary ordering bucket of a completion entry, first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortTier {
    LocationPriority,
    LocalDeclarationPriority,
    OptionalMember,
    MemberDeclaredBySpread,
    SuggestedClassMembers,
    GlobalsOrKeywords,
    AutoImportSuggestions,
    ClassMemberSnippets,
    JavascriptIdentifiers,
}

impl SortTier {
    pub const fn code(self) -> &'static str {
        match self {
            SortTier::LocationPriority => "10",
            SortTier::LocalDeclarationPriority => "11",
            SortTier::OptionalMember => "12",
            SortTier::MemberDeclaredBySpread => "13",
            SortTier::SuggestedClassMembers => "14",
            SortTier::GlobalsOrKeywords => "15",
            SortTier::AutoImportSuggestions => "16",
            SortTier::ClassMemberSnippets => "17",
            SortTier::JavascriptIdentifiers => "18",
        }
    }

    /// Rendered sort text. Deprecated entries stay inside their tier and
    /// sort after its other entries.
    pub fn sort_text(self, deprecated: bool) -> String {
        if deprecated {
            format!("{}z", self.code())
        } else {
            self.code().to_string()
        }
    }
}

/// Label order inside one tier: case-insensitive first, digit runs compared
/// numerically, shorter strings first, and the first case difference
/// (lowercase first) breaking remaining ties.
pub fn compare_case_sensitive_ui(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    let mut case_order = Ordering::Equal;
    loop {
        let (l, r) = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return case_order,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (l, r),
        };
        if l.is_ascii_digit() && r.is_ascii_digit() {
            match digit_run(&mut left).cmp(&digit_run(&mut right)) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        left.next();
        right.next();
        let (fl, fr) = (fold_case(l), fold_case(r));
        if fl != fr {
            return fl.cmp(&fr);
        }
        if case_order == Ordering::Equal && l != r {
            if l.is_lowercase() && r.is_uppercase() {
                case_order = Ordering::Less;
            } else if l.is_uppercase() && r.is_lowercase() {
                case_order = Ordering::Greater;
            }
        }
    }
}

fn digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
        chars.next();
    }
    value
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItemLabelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of a completion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: ScriptElementKind,
    /// Comma-joined modifiers such as `export,declare` or a file extension.
    #[serde(default)]
    pub kind_modifiers: String,
    pub sort_text: String,
    /// Text inserted on accept when it differs from `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    /// Byte span the insertion replaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_span: Option<TextSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_edit: Option<TextEdit>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_snippet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_details: Option<CompletionItemLabelDetails>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: ScriptElementKind, sort_text: String) -> Self {
        CompletionItem {
            label: label.into(),
            kind,
            kind_modifiers: String::new(),
            sort_text,
            insert_text: None,
            filter_text: None,
            replacement_span: None,
            text_edit: None,
            is_snippet: false,
            label_details: None,
            deprecated: false,
            commit_characters: None,
            data: None,
        }
    }

    pub fn with_kind_modifiers(mut self, modifiers: String) -> Self {
        self.kind_modifiers = modifiers;
        self
    }

    pub fn with_insert_text(mut self, insert_text: Option<String>) -> Self {
        self.insert_text = insert_text;
        self
    }

    pub fn with_filter_text(mut self, filter_text: Option<String>) -> Self {
        self.filter_text = filter_text;
        self
    }

    /// Set the replaced span together with the equivalent line/column edit.
    pub fn with_text_edit(mut self, span: TextSpan, edit: TextEdit) -> Self {
        self.replacement_span = Some(span);
        self.text_edit = Some(edit);
        self
    }

    pub fn with_label_details(mut self, details: Option<CompletionItemLabelDetails>) -> Self {
        self.label_details = details;
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_commit_characters(mut self, characters: Option<Vec<String>>) -> Self {
        self.commit_characters = characters;
        self
    }

    pub fn with_data(mut self, data: Option<Value>) -> Self {
        self.data = data;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub is_incomplete: bool,
    pub is_member_completion: bool,
    /// The user may be typing a brand new name; editors should not commit
    /// an entry on space or punctuation.
    pub is_new_identifier_location: bool,
    pub default_commit_characters: Vec<String>,
    pub items: Vec<CompletionItem>,
}

impl CompletionResponse {
    pub fn item(&self, label: &str) -> Option<&CompletionItem> {
        self.items.iter().find(|i| i.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }
}

const DEFAULT_COMMIT_CHARACTERS: &[&str] = &[".", ",", ";"];

// =============================================================================
// Entries
// =============================================================================

/// A candidate before rendering.
#[derive(Debug, Clone)]
struct Entry {
    name: String,
    kind: ScriptElementKind,
    kind_modifiers: String,
    tier: SortTier,
    deprecated: bool,
    insert_text: Option<String>,
    filter_text: Option<String>,
    /// Overrides the location's replacement span.
    replacement: Option<TextSpan>,
    label_details: Option<CompletionItemLabelDetails>,
    commit_characters: Option<Vec<String>>,
    data: Option<Value>,
    /// The declaration the entry stands for; keywords and literals have none.
    symbol: Option<SymbolId>,
}

impl Entry {
    fn new(name: impl Into<String>, kind: ScriptElementKind, tier: SortTier) -> Self {
        Entry {
            name: name.into(),
            kind,
            kind_modifiers: String::new(),
            tier,
            deprecated: false,
            insert_text: None,
            filter_text: None,
            replacement: None,
            label_details: None,
            commit_characters: None,
            data: None,
            symbol: None,
        }
    }

    fn keyword(word: &str) -> Self {
        Entry::new(word, ScriptElementKind::Keyword, SortTier::GlobalsOrKeywords)
    }

    fn with_insert_text(mut self, text: String) -> Self {
        self.insert_text = Some(text);
        self
    }

    fn with_filter_text(mut self, text: String) -> Self {
        self.filter_text = Some(text);
        self
    }

    fn with_replacement(mut self, span: TextSpan) -> Self {
        self.replacement = Some(span);
        self
    }

    fn with_kind_modifiers(mut self, modifiers: impl Into<String>) -> Self {
        self.kind_modifiers = modifiers.into();
        self
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Completion state for one request.
struct Completions<'q, 'a> {
    q: &'q FileQuery<'a>,
    loc: CompletionLocation,
    checkpoint: Checkpoint<'q>,
    entries: IndexMap<String, Entry, FxBuildHasher>,
    is_member_completion: bool,
    is_new_identifier_location: bool,
    /// String and path lists commit nothing by default.
    is_string_location: bool,
}

/// Completions at `offset`, or `None` where nothing can be completed.
#[instrument(skip_all, fields(file = %q.source.file_name, offset, trigger = ?trigger))]
pub fn completions_at(
    q: &FileQuery<'_>,
    offset: u32,
    trigger: Option<char>,
) -> Result<Option<CompletionResponse>, Cancelled> {
    q.cancel.check()?;
    let offset = q.clamp_offset(offset);
    let loc = CompletionLocation::resolve(q.source, offset);
    let Some(context) = context::classify(q.source, &loc) else {
        debug!("position is not completable");
        return Ok(None);
    };
    if let Some(trigger) = trigger
        && !context::accepts_trigger(q.source, &loc, &context, trigger)
    {
        debug!(?context, "trigger character does not fit the context");
        return Ok(None);
    }
    debug!(?context, "classified completion context");

    let mut completions = Completions::new(q, loc);
    if !completions.collect(&context)? {
        return Ok(None);
    }
    let response = completions.finish();
    debug!(items = response.items.len(), "completions ready");
    Ok(Some(response))
}

impl<'q, 'a> Completions<'q, 'a> {
    fn new(q: &'q FileQuery<'a>, loc: CompletionLocation) -> Self {
        Completions {
            q,
            loc,
            checkpoint: q.cancel.checkpoint(),
            entries: IndexMap::default(),
            is_member_completion: false,
            is_new_identifier_location: false,
            is_string_location: false,
        }
    }

    fn tick(&mut self) -> Result<(), Cancelled> {
        self.checkpoint.tick()
    }

    /// Add `entry` unless an entry with the same label exists.
    fn add_entry(&mut self, entry: Entry) {
        self.entries.entry(entry.name.clone()).or_insert(entry);
    }

    fn has_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// An entry describing `symbol` under its own name.
    fn symbol_entry(&self, symbol: SymbolId, tier: SortTier) -> Entry {
        let checker = &self.q.checker;
        let mut entry = Entry::new(
            checker.symbol_name(symbol),
            display::symbol_kind(checker, symbol),
            tier,
        )
        .with_kind_modifiers(display::symbol_kind_modifiers(checker, symbol));
        entry.deprecated = display::is_deprecated(checker, symbol);
        entry.symbol = Some(symbol);
        entry
    }

    /// Gather entries for `context`. `false` means the position has no
    /// completion list at all.
    fn collect(&mut self, context: &CompletionContext) -> Result<bool, Cancelled> {
        self.is_new_identifier_location = context.is_new_identifier_location();
        match *context {
            CompletionContext::Member {
                access,
                object,
                optional_chain,
                meaning,
            } => {
                self.is_member_completion = true;
                self.add_member_completions(access, object, optional_chain, meaning)?;
            }
            CompletionContext::ObjectLiteral { literal, editing } => {
                self.is_member_completion = true;
                if !self.add_object_literal_completions(literal, editing)? {
                    self.is_member_completion = false;
                    self.is_new_identifier_location = true;
                    self.add_global_completions(false, KeywordFilter::None)?;
                }
            }
            CompletionContext::BindingPattern { pattern, editing } => {
                self.is_member_completion = true;
                self.add_binding_pattern_completions(pattern, editing)?;
            }
            CompletionContext::ModuleSpecifiers {
                declaration,
                list,
                editing,
                type_only,
            } => {
                self.is_member_completion = true;
                self.add_module_specifier_completions(declaration, list, editing, type_only)?;
                if !type_only {
                    self.add_keywords(KeywordFilter::TypeKeyword);
                }
            }
            CompletionContext::LocalExport { list, editing } => {
                self.add_local_export_completions(list, editing)?;
                self.add_keywords(KeywordFilter::TypeKeyword);
            }
            CompletionContext::StringLiteral { literal } => {
                self.is_string_location = true;
                return self.add_string_literal_completions(literal);
            }
            CompletionContext::JsDocTag {
                comment,
                replacement,
            } => {
                self.loc.replacement = replacement;
                self.add_jsdoc_tag_completions(&comment);
            }
            CompletionContext::JsDocParamName {
                comment,
                replacement,
            } => {
                self.loc.replacement = replacement;
                self.add_jsdoc_param_completions(&comment);
            }
            CompletionContext::JsDocType { replacement } => {
                self.loc.replacement = replacement;
                self.add_global_completions(true, KeywordFilter::TypeKeywords)?;
            }
            CompletionContext::ClassBody { class, modifiers } => {
                self.add_class_member_completions(class, modifiers)?;
                self.add_keywords(KeywordFilter::ClassElementKeywords);
            }
            CompletionContext::Keywords { filter } => self.add_keywords(filter),
            CompletionContext::Global {
                type_only,
                keyword_filter,
                ..
            } => self.add_global_completions(type_only, keyword_filter)?,
        }
        Ok(!self.entries.is_empty() || self.is_new_identifier_location || self.q.source.is_js)
    }

    fn finish(self) -> CompletionResponse {
        let Completions {
            q,
            loc,
            entries,
            is_member_completion,
            is_new_identifier_location,
            is_string_location,
            ..
        } = self;
        let mut ranked: Vec<Entry> = entries.into_values().collect();
        // Stable: true ties keep insertion order.
        ranked.sort_by(|a, b| {
            a.tier
                .cmp(&b.tier)
                .then(a.deprecated.cmp(&b.deprecated))
                .then_with(|| compare_case_sensitive_ui(&a.name, &b.name))
        });
        let default_commit_characters = if is_string_location || is_new_identifier_location {
            Vec::new()
        } else {
            DEFAULT_COMMIT_CHARACTERS.iter().map(|c| c.to_string()).collect()
        };
        let items = ranked
            .into_iter()
            .map(|entry| render_entry(q, &loc, entry))
            .collect();
        CompletionResponse {
            is_incomplete: false,
            is_member_completion,
            is_new_identifier_location,
            default_commit_characters,
            items,
        }
    }
}

fn render_entry(q: &FileQuery<'_>, loc: &CompletionLocation, entry: Entry) -> CompletionItem {
    let replacement = entry
        .replacement
        .or_else(|| (!loc.replacement.is_empty()).then_some(loc.replacement));
    let mut item = CompletionItem::new(entry.name.clone(), entry.kind, entry.tier.sort_text(entry.deprecated))
        .with_kind_modifiers(entry.kind_modifiers)
        .with_filter_text(entry.filter_text)
        .with_label_details(entry.label_details)
        .with_deprecated(entry.deprecated)
        .with_commit_characters(entry.commit_characters)
        .with_data(entry.data);
    if let Some(span) = replacement {
        let edit = TextEdit {
            range: q.source.line_map.span_to_range(span, q.text()),
            new_text: entry.insert_text.clone().unwrap_or_else(|| entry.name.clone()),
        };
        item = item.with_text_edit(span, edit);
    }
    item.with_insert_text(entry.insert_text)
}

#[cfg(test)]
#[path = "../tests/completions_tests.rs"]
mod completions_tests;
