use super::*;
use crate::fixture::strip_markers;

fn parse(annotated: &str) -> (SourceFile, Vec<(String, u32)>) {
    let (text, markers) = strip_markers(annotated);
    (SourceFile::parse("/test.ts", text), markers)
}

fn offset(markers: &[(String, u32)], name: &str) -> u32 {
    markers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, o)| *o)
        .expect("marker exists")
}

#[test]
fn test_token_at_prefers_containing_token() {
    let (source, m) = parse("let abc/*a*/= 1;");
    let at = offset(&m, "a");
    let containing = token_at(&source, at).expect("token after the name");
    assert_eq!(token_text(&source, &containing), "=");
    let touching = touching_token(&source, at).expect("name ends at offset");
    assert_eq!(token_text(&source, &touching), "abc");
}

#[test]
fn test_node_at_offset_between_name_and_punctuation() {
    // Hover at the end of a name still sees the name.
    let (source, m) = parse("foo/*a*/(1);");
    let node = node_at_offset(&source, offset(&m, "a"));
    assert_eq!(source.arena.kind(node), SyntaxKind::Identifier);
    assert_eq!(source.node_text(node), "foo");
}

#[test]
fn test_node_at_offset_inside_literal() {
    let (source, m) = parse("let s = \"ab/*a*/c\";");
    let node = node_at_offset(&source, offset(&m, "a"));
    assert_eq!(source.arena.kind(node), SyntaxKind::StringLiteral);
}

#[test]
fn test_completion_location_after_dot_has_no_word() {
    let (source, m) = parse("a./*a*/");
    let loc = CompletionLocation::resolve(&source, offset(&m, "a"));
    assert!(loc.word.is_none());
    assert_eq!(loc.context_kind(), Some(SyntaxKind::Dot));
    assert_eq!(loc.prefix(&source), "");
    assert!(loc.replacement.is_empty());
}

#[test]
fn test_completion_location_splits_partial_word() {
    let (source, m) = parse("a.fo/*a*/o");
    let loc = CompletionLocation::resolve(&source, offset(&m, "a"));
    let word = loc.word.expect("cursor is inside a name");
    assert_eq!(token_text(&source, &word), "foo");
    assert_eq!(loc.prefix(&source), "fo");
    assert_eq!(loc.context_text(&source), ".");
    assert_eq!(source.slice(loc.replacement), "foo");
}

#[test]
fn test_completion_location_on_truncated_input() {
    let (source, m) = parse("function f(a: number) {\n  a./*a*/");
    let loc = CompletionLocation::resolve(&source, offset(&m, "a"));
    assert_eq!(loc.context_kind(), Some(SyntaxKind::Dot));
    assert!(loc.node.is_some());
}
