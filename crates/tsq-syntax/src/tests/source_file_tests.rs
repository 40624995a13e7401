use crate::{CommentKind, SourceFile, SyntaxKind};

#[test]
fn test_token_lookup() {
    let file = SourceFile::parse("a.ts", "foo.bar(1)");
    let before = file.token_before(4).map(|t| t.kind);
    assert_eq!(before, Some(SyntaxKind::Dot));
    let idx = file.token_index_after(4);
    assert_eq!(file.tokens[idx].kind, SyntaxKind::Identifier);
    assert_eq!(file.tokens[idx].pos, 4);
    assert!(file.token_before(0).is_none());
}

#[test]
fn test_token_before_at_end_of_file_skips_eof_token() {
    let source = "o.";
    let file = SourceFile::parse("a.ts", source);
    let before = file.token_before(source.len() as u32).map(|t| t.kind);
    assert_eq!(before, Some(SyntaxKind::Dot));
}

#[test]
fn test_comment_containing() {
    let source = "let a = 1; // note\n/* block */ a;";
    let file = SourceFile::parse("a.ts", source);
    let line_end = source.find('\n').unwrap_or(0) as u32;
    let comment = file.comment_containing(line_end).map(|c| c.kind);
    assert_eq!(comment, Some(CommentKind::Line));
    // The start of a comment is outside it.
    assert!(file.comment_containing(11).is_none());
    let inside_block = source.find("block").unwrap_or(0) as u32;
    assert_eq!(
        file.comment_containing(inside_block).map(|c| c.kind),
        Some(CommentKind::Block)
    );
    let after_block = source.find("*/").unwrap_or(0) as u32 + 2;
    assert!(file.comment_containing(after_block).is_none());
}

#[test]
fn test_doc_comments_attach_to_following_declaration() {
    let source = "/** first */\n// plain\n/** second */\nfunction f() {}\n/** detached */ let x; function g() {}";
    let file = SourceFile::parse("a.ts", source);
    let statements = file.arena.statements(file.root).to_vec();
    let docs: Vec<_> = file
        .doc_comments_before(statements[0])
        .iter()
        .map(|c| &source[c.pos as usize..c.end as usize])
        .collect();
    assert_eq!(docs, vec!["/** first */", "/** second */"]);
    assert!(file.doc_comments_before(statements[2]).is_empty());
}

#[test]
fn test_file_kinds() {
    let decl = SourceFile::parse("lib.d.ts", "declare var x: number;");
    assert!(decl.is_declaration_file);
    assert!(!decl.is_external_module());
    let js = SourceFile::parse("app.js", "export const y = 1;");
    assert!(js.is_js);
    assert!(js.is_external_module());
}

#[test]
fn test_slice_is_clamped() {
    let file = SourceFile::parse("a.ts", "abc");
    assert_eq!(file.slice(tsq_common::TextSpan::new(1, 10)), "bc");
    assert_eq!(file.slice(tsq_common::TextSpan::new(10, 1)), "");
}
