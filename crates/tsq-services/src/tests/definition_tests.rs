use super::*;
use crate::fixture::Fixture;

fn definitions(annotated: &str, marker: &str) -> (Fixture, Vec<DefinitionInfo>) {
    let fixture = Fixture::new(annotated);
    let (file, offset) = fixture.marker(marker);
    let found = fixture
        .project
        .snapshot()
        .definition(&file, offset, &fixture.cancel)
        .expect("definition request succeeds");
    (fixture, found)
}

#[test]
fn test_local_variable() {
    let (fixture, found) = definitions("const /*d*/value = 1;\nconsole.log(/*u*/value);", "u");
    assert_eq!(found.len(), 1);
    let (_, name_at) = fixture.marker("d");
    assert_eq!(found[0].text_span, TextSpan::new(name_at, "value".len() as u32));
    assert_eq!(found[0].kind, ScriptElementKind::Const);
    assert_eq!(found[0].name, "value");
    assert_eq!(found[0].container_name, "");
    // The whole statement is the context.
    assert_eq!(found[0].context_span, Some(TextSpan::new(0, "const value = 1;".len() as u32)));
}

#[test]
fn test_overload_signatures_hide_implementation() {
    let text = "function f(a: number): void;\nfunction f(a: string): void;\nfunction f(a: any) {}\n/*u*/f(1);";
    let (_, found) = definitions(text, "u");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.kind == ScriptElementKind::Function));
    assert!(found[0].text_span.start < found[1].text_span.start);
    let implementation_at = text.find("function f(a: any)").expect("implementation") as u32;
    assert!(found.iter().all(|d| d.text_span.start < implementation_at));
}

#[test]
fn test_lone_implementation_is_reported() {
    let (_, found) = definitions("function g() {}\n/*u*/g();", "u");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text_span.start, "function ".len() as u32);
}

#[test]
fn test_merged_interface_reports_every_declaration() {
    let (_, found) = definitions(
        "interface I { a: number }\ninterface I { b: number }\nlet v: /*u*/I;",
        "u",
    );
    assert_eq!(found.len(), 2);
}

#[test]
fn test_member_container_name() {
    let (_, found) = definitions(
        "class Shape { area() { return 0; } }\nnew Shape()./*u*/area();",
        "u",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].container_name, "Shape");
    assert_eq!(found[0].kind, ScriptElementKind::Method);
}

#[test]
fn test_import_goes_to_exported_declaration() {
    let (_, found) = definitions(
        "// @filename: /a.ts\nexport function greet() {}\n\
         // @filename: /b.ts\nimport { greet } from \"./a\";\n/*u*/greet();",
        "u",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file_name, "/a.ts");
    assert_eq!(found[0].name, "greet");
}

#[test]
fn test_renamed_import_name_stays_on_the_alias() {
    let (_, found) = definitions(
        "// @filename: /a.ts\nexport function greet() {}\n\
         // @filename: /b.ts\nimport { greet as /*local*/hello } from \"./a\";",
        "local",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file_name, "/b.ts");
    assert_eq!(found[0].name, "hello");
}

#[test]
fn test_module_specifier_goes_to_file_start() {
    let (_, found) = definitions(
        "// @filename: /a.ts\nexport const x = 1;\n\
         // @filename: /b.ts\nimport { x } from \"./a/*s*/\";",
        "s",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file_name, "/a.ts");
    assert_eq!(found[0].text_span, TextSpan::new(0, 0));
    assert_eq!(found[0].kind, ScriptElementKind::Script);
}

#[test]
fn test_super_goes_to_base_class() {
    let (_, found) = definitions(
        "class Base {}\nclass Derived extends Base {\n  constructor() { /*s*/super(); }\n}",
        "s",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Base");
    assert_eq!(found[0].kind, ScriptElementKind::Class);
}

#[test]
fn test_private_name_resolves_in_declaring_class() {
    let (_, found) = definitions(
        "class A {\n  #x = 1;\n  m() { return this./*u*/#x; }\n}\nclass B extends A {\n  #x = 2;\n}",
        "u",
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].container_name, "A");
}

#[test]
fn test_nothing_at_keyword_or_literal() {
    assert!(definitions("let v = /*n*/42;", "n").1.is_empty());
    assert!(definitions("/*k*/return;", "k").1.is_empty());
}
