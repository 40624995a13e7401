//! User preferences that shape query results.

use serde::{Deserialize, Serialize};

/// Quote character used when a completion has to insert a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuotePreference {
    #[default]
    Double,
    Single,
}

impl QuotePreference {
    pub fn quote(self) -> char {
        match self {
            QuotePreference::Double => '"',
            QuotePreference::Single => '\'',
        }
    }

    /// `text` as a quoted string literal with the quote and backslashes
    /// escaped.
    pub fn quote_text(self, text: &str) -> String {
        let quote = self.quote();
        let mut out = String::with_capacity(text.len() + 2);
        out.push(quote);
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOptions {
    pub quote_preference: QuotePreference,
    /// Reserved; auto-import candidates are not produced.
    pub include_completions_for_module_exports: bool,
    /// Allows entries whose insertion differs from the label (bracketed
    /// member access, `this.` member suggestions).
    pub include_completions_with_insert_text: bool,
    pub allow_incomplete_completions: bool,
    /// Truncate reference results after this many entries.
    pub max_reference_results: Option<usize>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        ServiceOptions {
            quote_preference: QuotePreference::Double,
            include_completions_for_module_exports: false,
            include_completions_with_insert_text: true,
            allow_incomplete_completions: false,
            max_reference_results: None,
        }
    }
}
