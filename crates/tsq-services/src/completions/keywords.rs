//! Keyword completion vocabularies.

use super::*;

/// Which keywords a position admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordFilter {
    None,
    /// Top level: everything a statement or declaration can start with.
    All,
    /// Statements and expressions inside a function body.
    FunctionLikeBody,
    ClassElementKeywords,
    InterfaceElementKeywords,
    ConstructorParameterKeywords,
    /// After `as` or `satisfies`.
    TypeAssertionKeywords,
    TypeKeywords,
    /// Only `type`, as the first word of an import or export clause.
    TypeKeyword,
}

const FUNCTION_LIKE_BODY_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "return", "satisfies", "super", "switch", "this", "throw", "true", "try", "type",
    "typeof", "using", "var", "void", "while", "with", "yield",
];

/// Declaration keywords only meaningful outside function bodies.
const TOP_LEVEL_ONLY_KEYWORDS: &[&str] = &["abstract", "declare", "module", "namespace"];

const TYPE_KEYWORDS: &[&str] = &[
    "any", "asserts", "bigint", "boolean", "false", "infer", "keyof", "never", "null", "number",
    "object", "readonly", "string", "symbol", "true", "typeof", "undefined", "unique", "unknown",
    "void",
];

const CLASS_ELEMENT_KEYWORDS: &[&str] = &[
    "abstract", "accessor", "async", "constructor", "declare", "get", "override", "private",
    "protected", "public", "readonly", "set", "static",
];

const CONSTRUCTOR_PARAMETER_KEYWORDS: &[&str] =
    &["override", "private", "protected", "public", "readonly"];

/// TypeScript-only keywords removed in JavaScript files.
const TYPESCRIPT_ONLY_KEYWORDS: &[&str] = &[
    "abstract", "any", "bigint", "boolean", "declare", "enum", "global", "implements", "infer",
    "interface", "is", "keyof", "module", "namespace", "never", "number", "object", "override",
    "private", "protected", "public", "readonly", "string", "symbol", "type", "unique", "unknown",
];

impl KeywordFilter {
    /// Keywords admitted by this filter, sorted and without duplicates.
    pub fn keywords(self, is_js: bool) -> Vec<&'static str> {
        let mut words: Vec<&'static str> = match self {
            KeywordFilter::None => Vec::new(),
            KeywordFilter::All => FUNCTION_LIKE_BODY_KEYWORDS
                .iter()
                .chain(TOP_LEVEL_ONLY_KEYWORDS)
                .chain(TYPE_KEYWORDS.iter().filter(|&&k| k != "undefined"))
                .copied()
                .collect(),
            KeywordFilter::FunctionLikeBody => FUNCTION_LIKE_BODY_KEYWORDS.to_vec(),
            KeywordFilter::ClassElementKeywords => CLASS_ELEMENT_KEYWORDS.to_vec(),
            KeywordFilter::InterfaceElementKeywords => vec!["readonly"],
            KeywordFilter::ConstructorParameterKeywords => CONSTRUCTOR_PARAMETER_KEYWORDS.to_vec(),
            KeywordFilter::TypeAssertionKeywords => {
                TYPE_KEYWORDS.iter().copied().chain(["const"]).collect()
            }
            KeywordFilter::TypeKeywords => TYPE_KEYWORDS.to_vec(),
            KeywordFilter::TypeKeyword => vec!["type"],
        };
        if is_js {
            words.retain(|w| !TYPESCRIPT_ONLY_KEYWORDS.contains(w));
        }
        words.sort_unstable();
        words.dedup();
        words
    }
}

impl<'q, 'a> Completions<'q, 'a> {
    /// Add the keywords `filter` admits at GlobalsOrKeywords priority.
    pub(super) fn add_keywords(&mut self, filter: KeywordFilter) {
        for word in filter.keywords(self.q.source.is_js) {
            self.add_entry(Entry::keyword(word));
        }
    }
}
