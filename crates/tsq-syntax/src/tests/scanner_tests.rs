use crate::kind::SyntaxKind;
use crate::scanner::{CommentKind, Scanner, TokenFlags};

fn kinds(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = Scanner::new(source);
    let mut kinds = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFile {
            return kinds;
        }
        kinds.push(kind);
    }
}

#[test]
fn test_greater_than_is_split_until_rescanned() {
    let mut scanner = Scanner::new("a >>= b");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::GreaterThan);
    assert_eq!(scanner.token_end(), 3);
    assert_eq!(
        scanner.rescan_greater_token(),
        SyntaxKind::GreaterThanGreaterThanEquals
    );
    assert_eq!(scanner.token_end(), 5);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_punctuation_longest_match() {
    assert_eq!(
        kinds("a?.b ?? c ...d === e"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDot,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionQuestion,
            SyntaxKind::Identifier,
            SyntaxKind::DotDotDot,
            SyntaxKind::Identifier,
            SyntaxKind::EqualsEqualsEquals,
            SyntaxKind::Identifier,
        ]
    );
    // `?.` followed by a digit is a conditional
    assert_eq!(
        kinds("a?.5:1"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Question,
            SyntaxKind::NumericLiteral,
            SyntaxKind::Colon,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn test_string_escapes_are_cooked() {
    let mut scanner = Scanner::new(r#""a\nbA\x42\u{43}""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "a\nbABC");
    assert!(!scanner.token_flags().contains(TokenFlags::UNTERMINATED));
}

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let mut scanner = Scanner::new("'abc\nnext");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "abc");
    assert_eq!(scanner.token_end(), 4);
    let flags = scanner.token_flags();
    assert!(flags.contains(TokenFlags::UNTERMINATED));
    assert!(flags.contains(TokenFlags::SINGLE_QUOTE));
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_template_continuation() {
    let mut scanner = Scanner::new("`a${x}b${y}c`");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.token_value(), "a");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBrace);
    assert_eq!(
        scanner.rescan_template_continuation(),
        SyntaxKind::TemplateMiddle
    );
    assert_eq!(scanner.token_value(), "b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBrace);
    assert_eq!(scanner.rescan_template_continuation(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.token_value(), "c");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFile);
}

#[test]
fn test_regex_rescan() {
    let mut scanner = Scanner::new("/a[/]b+/gi;");
    assert_eq!(scanner.scan(), SyntaxKind::Slash);
    assert_eq!(
        scanner.rescan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.token_value(), "/a[/]b+/gi");
    assert_eq!(scanner.scan(), SyntaxKind::Semicolon);
}

#[test]
fn test_comments_are_collected() {
    let source = "// line\n/** doc */ /* block */ x";
    let mut scanner = Scanner::new(source);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    let comments = scanner.take_comments();
    let kinds: Vec<_> = comments.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![CommentKind::Line, CommentKind::Doc, CommentKind::Block]
    );
    assert_eq!(&source[comments[1].pos as usize..comments[1].end as usize], "/** doc */");
}

#[test]
fn test_empty_block_comment_is_not_doc() {
    let mut scanner = Scanner::new("/**/ x");
    scanner.scan();
    let comments = scanner.take_comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].kind, CommentKind::Block);
}

#[test]
fn test_private_identifiers() {
    let mut scanner = Scanner::new("#foo #");
    assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
    assert_eq!(scanner.token_value(), "#foo");
    assert_eq!(scanner.scan(), SyntaxKind::PrivateIdentifier);
    assert_eq!(scanner.token_value(), "#");
}

#[test]
fn test_numeric_literals() {
    let mut scanner = Scanner::new("1_000n 0x1F 1.5e3 .5");
    assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
    assert_eq!(scanner.token_value(), "1000n");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.token_value(), "0x1F");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.token_value(), "1.5e3");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.token_value(), ".5");
}

#[test]
fn test_identifier_with_unicode_escape() {
    let mut scanner = Scanner::new(r"\u0061bc");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "abc");
    assert!(scanner.token_flags().contains(TokenFlags::ESCAPED));
}

#[test]
fn test_save_and_restore() {
    let mut scanner = Scanner::new("a /* c */ b c");
    scanner.scan();
    let state = scanner.save();
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.token_value(), "c");
    scanner.restore(state);
    assert_eq!(scanner.token_value(), "a");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "b");
    assert_eq!(scanner.take_comments().len(), 1);
}

#[test]
fn test_shebang_is_skipped() {
    assert_eq!(kinds("#!/usr/bin/env node\nx"), vec![SyntaxKind::Identifier]);
}
