use super::*;
use crate::fixture::Fixture;

fn hover(annotated: &str, marker: &str) -> Option<QuickInfo> {
    let fixture = Fixture::new(annotated);
    let (file, offset) = fixture.marker(marker);
    fixture
        .project
        .snapshot()
        .quick_info(&file, offset, &fixture.cancel)
        .expect("hover request succeeds")
}

fn display(annotated: &str, marker: &str) -> String {
    hover(annotated, marker)
        .unwrap_or_else(|| panic!("marker {marker} has quick info"))
        .display_string()
}

#[test]
fn test_private_name_property() {
    assert_eq!(
        display("class A {\n  #foo = 1;\n  m() { return this./*f*/#foo; }\n}", "f"),
        "(property) A.#foo: number"
    );
}

#[test]
fn test_function_declaration() {
    let text = "function /*d*/foo(a: number): string { return \"\"; }\n/*c*/foo(1);";
    assert_eq!(display(text, "d"), "function foo(a: number): string");
    assert_eq!(display(text, "c"), "function foo(a: number): string");
}

#[test]
fn test_overloads_show_selected_signature_and_count() {
    let text = "function f(a: number): void;\nfunction f(a: string): void;\nfunction f(a: any) {}\n\
                /*n*/f(1);\n/*s*/f(\"x\");";
    assert_eq!(display(text, "n"), "function f(a: number): void (+1 overload)");
    assert_eq!(display(text, "s"), "function f(a: string): void (+1 overload)");
}

#[test]
fn test_variable_declarations() {
    assert_eq!(display("let /*x*/x = 1;", "x"), "let x: number");
    assert_eq!(display("const /*c*/c: string = \"a\";", "c"), "const c: string");
    assert_eq!(
        display("function f() { var /*v*/v: boolean = true; }", "v"),
        "(local var) v: boolean"
    );
}

#[test]
fn test_type_declarations() {
    assert_eq!(display("interface /*i*/Box<T> { value: T }", "i"), "interface Box<T>");
    assert_eq!(display("type /*t*/Id = string;", "t"), "type Id = string");
    assert_eq!(display("enum E { /*a*/A = 1 }", "a"), "(enum member) E.A = 1");
}

#[test]
fn test_class_members() {
    let text = "class A {\n  /*m*/m(x: string): number { return 1; }\n  /*p*/p?: boolean;\n}";
    assert_eq!(display(text, "m"), "(method) A.m(x: string): number");
    assert_eq!(display(text, "p"), "(property) A.p?: boolean");
}

#[test]
fn test_constructor_keyword() {
    let info = hover("class K { /*k*/constructor(a: number) {} }", "k").expect("constructor info");
    assert_eq!(info.display_string(), "constructor K(a: number): K");
    assert_eq!(info.kind, ScriptElementKind::Constructor);
    assert_eq!(info.text_span.length, "constructor".len() as u32);
}

#[test]
fn test_merged_class_and_namespace_show_both_lines() {
    assert_eq!(
        display("class M {}\nnamespace M { export const v = 1; }\n/*m*/M;", "m"),
        "class M\nnamespace M"
    );
}

#[test]
fn test_imported_alias() {
    let text = "// @filename: /a.ts\nexport class Foo {}\n\
                // @filename: /b.ts\nimport { Foo } from \"./a\";\nlet v: /*u*/Foo;";
    assert_eq!(display(text, "u"), "(alias) class Foo\nimport Foo");
}

#[test]
fn test_documentation_and_deprecation() {
    let info = hover(
        "/**\n * Greets.\n * @deprecated use hi\n */\nfunction /*g*/greet() {}",
        "g",
    )
    .expect("documented function");
    assert_eq!(info.documentation_string(), "Greets.");
    assert!(info.deprecated);
    assert_eq!(info.kind_modifiers, "deprecated");
    assert_eq!(
        info.tags,
        vec![TagInfo {
            name: "deprecated".to_string(),
            text: Some("use hi".to_string()),
        }]
    );
}

#[test]
fn test_parameter_documented_by_param_tag() {
    let info = hover(
        "/** @param a the {@link Other} value */\nfunction f(/*a*/a: number) {}",
        "a",
    )
    .expect("parameter info");
    assert_eq!(info.display_string(), "(parameter) a: number");
    assert_eq!(info.documentation_string(), "the `Other` value");
    assert!(info.tags.is_empty());
}

#[test]
fn test_this_keyword() {
    let info = hover("class C { m() { return /*t*/this; } }", "t").expect("this info");
    assert!(info.display_string().starts_with("this: "));
}

#[test]
fn test_text_span_covers_the_name() {
    let info = hover("let /*x*/value = 1;", "x").expect("variable info");
    assert_eq!(info.text_span, TextSpan::new(4, 5));
}

#[test]
fn test_literals_and_keywords_have_no_info() {
    assert_eq!(hover("let x = /*n*/1;", "n"), None);
    assert_eq!(hover("/*k*/return;", "k"), None);
}
