//! Documentation comment parsing.
//!
//! A `/** ... */` comment is split into a free-text description and block
//! tags. Leading `*` gutters are removed together with the single space
//! that aligns text after them; deeper indentation is content and is kept.
//! `@example` bodies are kept verbatim, fenced or not.

use serde::{Deserialize, Serialize};
use tsq_common::TextSpan;
use tsq_syntax::{CommentRange, NodeArena, NodeIndex, SourceFile, SyntaxKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDoc {
    pub description: String,
    pub tags: Vec<JsDocTag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsDocTag {
    pub name: String,
    /// Contents of a `{...}` type slot, without the braces.
    pub type_expression: Option<String>,
    /// Documented name for `@param`, `@property`, `@template` and friends.
    pub parameter_name: Option<String>,
    pub text: String,
}

/// A tag as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Tags whose first word after the type slot is a name.
const NAMED_TAGS: &[&str] = &[
    "param",
    "arg",
    "argument",
    "property",
    "prop",
    "template",
    "typedef",
    "callback",
];

impl JsDoc {
    pub fn tag(&self, name: &str) -> Option<&JsDocTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    pub fn is_deprecated(&self) -> bool {
        self.has_tag("deprecated")
    }

    /// The `@param` tag documenting `name`.
    pub fn param(&self, name: &str) -> Option<&JsDocTag> {
        self.tags.iter().find(|t| {
            matches!(t.name.as_str(), "param" | "arg" | "argument")
                && t.parameter_name.as_deref() == Some(name)
        })
    }

    /// Description with inline tags rendered.
    pub fn documentation(&self) -> String {
        render_inline_tags(&self.description)
    }

    pub fn tag_infos(&self) -> Vec<TagInfo> {
        self.tags.iter().map(JsDocTag::info).collect()
    }
}

impl JsDocTag {
    pub fn info(&self) -> TagInfo {
        let body = if self.name == "example" {
            self.text.clone()
        } else {
            render_inline_tags(&self.text)
        };
        let text = match &self.parameter_name {
            Some(name) if body.is_empty() => name.clone(),
            Some(name) => format!("{name} {body}"),
            None => body,
        };
        TagInfo {
            name: self.name.clone(),
            text: (!text.is_empty()).then_some(text),
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse the full text of a documentation comment, delimiters included.
pub fn parse(comment: &str) -> JsDoc {
    let body = comment.strip_prefix("/**").unwrap_or(comment);
    let body = body.strip_suffix("*/").unwrap_or(body);
    let lines = strip_gutters(body);

    let mut doc = JsDoc::default();
    let mut description: Vec<&str> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;
    let mut in_fence = false;

    for line in &lines {
        let trimmed = line.trim_start();
        let example = current.as_ref().is_some_and(|(name, _)| name == "example");
        if example && trimmed.starts_with("```") {
            in_fence = !in_fence;
        }
        let starts_tag = !in_fence && trimmed.starts_with('@') && tag_name_len(&trimmed[1..]) > 0;
        if starts_tag {
            if let Some((name, body)) = current.take() {
                doc.tags.push(build_tag(name, &body));
            }
            let name_len = tag_name_len(&trimmed[1..]);
            let name = trimmed[1..1 + name_len].to_string();
            let rest = trimmed[1 + name_len..].strip_prefix(' ').unwrap_or(&trimmed[1 + name_len..]);
            current = Some((name, vec![rest.to_string()]));
            continue;
        }
        match current.as_mut() {
            Some((_, body)) => body.push((*line).to_string()),
            None => description.push(*line),
        }
    }
    if let Some((name, body)) = current.take() {
        doc.tags.push(build_tag(name, &body));
    }
    doc.description = trim_blank_lines(&description.join("\n"));
    doc
}

/// Remove `*` gutters and the alignment column.
fn strip_gutters(body: &str) -> Vec<&str> {
    let raw: Vec<&str> = body.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    // Lines without a gutter share their smallest indentation as margin.
    let margin = raw
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('*'))
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    raw.iter()
        .enumerate()
        .map(|(i, &line)| {
            if i == 0 {
                return line.strip_prefix(' ').unwrap_or(line);
            }
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(after) => after.strip_prefix(' ').unwrap_or(after),
                None if line.trim().is_empty() => "",
                None => &line[margin.min(line.len() - trimmed.len())..],
            }
        })
        .collect()
}

fn tag_name_len(text: &str) -> usize {
    text.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count()
}

fn build_tag(name: String, body: &[String]) -> JsDocTag {
    if name == "example" {
        let text = body.join("\n");
        return JsDocTag {
            name,
            type_expression: None,
            parameter_name: None,
            text: trim_blank_lines(&text),
        };
    }
    let joined = body.join("\n");
    let mut rest = joined.trim_start();
    let mut type_expression = None;
    if rest.starts_with('{')
        && let Some(close) = matching_brace(rest)
    {
        type_expression = Some(rest[1..close].trim().to_string());
        rest = rest[close + 1..].trim_start();
    }
    let mut parameter_name = None;
    if NAMED_TAGS.contains(&name.as_str()) {
        let (word, after) = split_name(rest);
        if !word.is_empty() {
            parameter_name = Some(word);
            rest = after.trim_start();
            if name != "template" {
                rest = rest.strip_prefix("- ").unwrap_or(rest);
            }
        }
    }
    JsDocTag {
        name,
        type_expression,
        parameter_name,
        text: rest.trim_end().to_string(),
    }
}

/// A tag's name word; `[name=default]` yields `name`.
fn split_name(text: &str) -> (String, &str) {
    if let Some(inner) = text.strip_prefix('[') {
        let close = inner.find(']').unwrap_or(inner.len());
        let name = inner[..close].split('=').next().unwrap_or("").trim();
        let after = inner.get(close + 1..).unwrap_or("");
        return (name.to_string(), after);
    }
    let end = text
        .find(|c: char| c.is_whitespace())
        .unwrap_or(text.len());
    (text[..end].to_string(), &text[end..])
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last]
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

/// Render `{@link Target}` as `` `Target` `` and `{@link Target text}` or
/// `{@link Target | text}` as `text`. `@linkcode` and `@linkplain` behave
/// the same.
pub fn render_inline_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{@link") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let inner = &after[..close];
        let inner = inner
            .strip_prefix("@linkcode")
            .or_else(|| inner.strip_prefix("@linkplain"))
            .or_else(|| inner.strip_prefix("@link"))
            .unwrap_or(inner)
            .trim();
        let split = inner.find('|').or_else(|| inner.find(char::is_whitespace));
        let (target, label) = match split {
            Some(split) => (inner[..split].trim(), inner[split + 1..].trim()),
            None => (inner, ""),
        };
        if label.is_empty() {
            out.push('`');
            out.push_str(target);
            out.push('`');
        } else {
            out.push_str(label);
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

// =============================================================================
// Attachment
// =============================================================================

/// The node whose leading documentation comment describes `declaration`.
pub fn doc_host(arena: &NodeArena, declaration: NodeIndex) -> NodeIndex {
    match arena.kind(declaration) {
        SyntaxKind::VariableDeclaration => {
            let parent = arena.parent(declaration);
            if arena.kind(parent) == SyntaxKind::VariableStatement {
                parent
            } else {
                declaration
            }
        }
        SyntaxKind::PropertyAccessExpression | SyntaxKind::BinaryExpression => arena
            .ancestors(declaration)
            .find(|&a| arena.kind(a) == SyntaxKind::ExpressionStatement)
            .unwrap_or(declaration),
        _ => declaration,
    }
}

/// The last documentation comment attached to `declaration`.
pub fn comment_for_declaration(source: &SourceFile, declaration: NodeIndex) -> Option<CommentRange> {
    let host = doc_host(&source.arena, declaration);
    source.doc_comments_before(host).last().copied()
}

pub fn docs_for_declaration(source: &SourceFile, declaration: NodeIndex) -> Option<JsDoc> {
    let comment = comment_for_declaration(source, declaration)?;
    Some(parse(source.slice(TextSpan::from_bounds(comment.pos, comment.end))))
}

#[cfg(test)]
#[path = "tests/jsdoc_tests.rs"]
mod jsdoc_tests;
