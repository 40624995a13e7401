use super::*;
use crate::fixture::strip_markers;
use crate::position::node_at_offset;

#[test]
fn test_parse_description_and_param_tags() {
    let doc = parse(
        "/**\n * Adds numbers.\n * @param a - first\n * @param {number} [b=2] second\n * @returns the sum\n */",
    );
    assert_eq!(doc.description, "Adds numbers.");
    assert_eq!(doc.tags.len(), 3);

    let a = doc.param("a").expect("a is documented");
    assert_eq!(a.text, "first");
    assert_eq!(a.type_expression, None);

    let b = doc.param("b").expect("optional b is documented");
    assert_eq!(b.type_expression.as_deref(), Some("number"));
    assert_eq!(b.text, "second");

    assert_eq!(doc.tag("returns").map(|t| t.text.as_str()), Some("the sum"));
}

#[test]
fn test_tag_info_joins_name_and_text() {
    let doc = parse("/**\n * @param a - first\n * @deprecated\n */");
    let infos = doc.tag_infos();
    assert_eq!(
        infos,
        vec![
            TagInfo {
                name: "param".to_string(),
                text: Some("a first".to_string()),
            },
            TagInfo {
                name: "deprecated".to_string(),
                text: None,
            },
        ]
    );
}

#[test]
fn test_single_line_comment() {
    let doc = parse("/** @deprecated use b */");
    assert!(doc.is_deprecated());
    assert_eq!(doc.tag("deprecated").map(|t| t.text.as_str()), Some("use b"));
    assert!(doc.description.is_empty());
}

#[test]
fn test_example_keeps_indentation() {
    let doc = parse("/**\n * @example\n *     indented();\n * done\n */");
    let example = doc.tag("example").expect("example tag");
    assert_eq!(example.text, "    indented();\ndone");
}

#[test]
fn test_fenced_example_is_not_split_on_at_signs() {
    let doc = parse("/**\n * @example\n * ```\n * @decorator\n * ```\n */");
    assert_eq!(doc.tags.len(), 1);
    assert_eq!(doc.tags[0].text, "```\n@decorator\n```");
}

#[test]
fn test_description_keeps_indentation_past_the_gutter() {
    let doc = parse("/**\n * Lines:\n *   nested\n */");
    assert_eq!(doc.description, "Lines:\n  nested");
}

#[test]
fn test_render_inline_links() {
    assert_eq!(
        render_inline_tags("See {@link Foo} and {@link Bar | the bar}."),
        "See `Foo` and the bar."
    );
    assert_eq!(render_inline_tags("{@linkcode baz}"), "`baz`");
    assert_eq!(render_inline_tags("broken {@link"), "broken {@link");
}

#[test]
fn test_render_inline_link_label_after_bar_or_whitespace() {
    assert_eq!(render_inline_tags("{@link Bar|the bar}"), "the bar");
    assert_eq!(render_inline_tags("{@link Bar | the bar}"), "the bar");
    assert_eq!(render_inline_tags("{@link Bar the bar}"), "the bar");
    assert_eq!(render_inline_tags("{@link Bar\tlabel}"), "label");
    assert_eq!(render_inline_tags("{@linkplain  Bar  }"), "`Bar`");
}

#[test]
fn test_docs_attach_to_variable_statement() {
    let (text, markers) = strip_markers("/** The answer. */\nconst /*x*/x = 42;");
    let source = SourceFile::parse("/test.ts", text);
    let name = node_at_offset(&source, markers[0].1);
    let declaration = source.arena.parent(name);
    assert_eq!(source.arena.kind(declaration), SyntaxKind::VariableDeclaration);
    let doc = docs_for_declaration(&source, declaration).expect("statement is documented");
    assert_eq!(doc.documentation(), "The answer.");
}
