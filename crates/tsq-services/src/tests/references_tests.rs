use super::*;
use crate::fixture::Fixture;
use crate::options::ServiceOptions;

fn references_with(fixture: &Fixture, marker: &str) -> Vec<ReferenceEntry> {
    let (file, offset) = fixture.marker(marker);
    fixture
        .project
        .snapshot()
        .references(&file, offset, &fixture.cancel)
        .expect("references request succeeds")
}

/// `(file, start, is_definition, is_write_access)` of each entry.
fn summary(entries: &[ReferenceEntry]) -> Vec<(String, u32, bool, bool)> {
    entries
        .iter()
        .map(|e| (e.file_name.clone(), e.text_span.start, e.is_definition, e.is_write_access))
        .collect()
}

#[test]
fn test_results_are_identical_from_every_occurrence() {
    let fixture = Fixture::new(
        "let /*a*/count = 0;\n/*b*/count = /*c*/count + 1;\nfunction show() { return /*d*/count; }",
    );
    let from_declaration = references_with(&fixture, "a");
    assert_eq!(from_declaration.len(), 4);
    for marker in ["b", "c", "d"] {
        assert_eq!(references_with(&fixture, marker), from_declaration, "from marker {marker}");
    }
}

#[test]
fn test_shorthand_property_links_local_and_property() {
    let fixture = Fixture::new(
        "const /*local*/count = 1; const o = { /*short*/count }; o./*prop*/count;",
    );
    let starts = |marker: &str| -> Vec<u32> {
        references_with(&fixture, marker)
            .iter()
            .map(|e| e.text_span.start)
            .collect()
    };
    let expected = vec![
        fixture.marker("local").1,
        fixture.marker("short").1,
        fixture.marker("prop").1,
    ];
    assert_eq!(expected, vec![6, 29, 40]);
    for marker in ["local", "short", "prop"] {
        assert_eq!(starts(marker), expected, "from marker {marker}");
    }
}

#[test]
fn test_definition_and_write_flags() {
    let fixture = Fixture::new(
        "let /*a*/count = 0;\n/*b*/count = 1;\n/*c*/count++;\nconsole.log(/*d*/count);\n[/*e*/count] = [2];",
    );
    let entries = references_with(&fixture, "a");
    let at = |marker: &str| fixture.marker(marker).1;
    assert_eq!(
        summary(&entries),
        vec![
            ("/test.ts".to_string(), at("a"), true, true),
            ("/test.ts".to_string(), at("b"), false, true),
            ("/test.ts".to_string(), at("c"), false, true),
            ("/test.ts".to_string(), at("d"), false, false),
            ("/test.ts".to_string(), at("e"), false, true),
        ]
    );
    assert_eq!(entries[1].line_text, "count = 1;");
}

#[test]
fn test_declaration_without_value_is_not_a_write() {
    let fixture = Fixture::new("let /*a*/later: number;\n/*b*/later = 3;");
    let entries = references_with(&fixture, "a");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_definition && !entries[0].is_write_access);
    assert!(entries[1].is_write_access);
}

#[test]
fn test_imports_and_exports_link_across_files() {
    let fixture = Fixture::new(
        "// @filename: /a.ts\nexport function /*def*/greet() {}\n\
         // @filename: /b.ts\nimport { /*imp*/greet } from \"./a\";\n/*call*/greet();\n\
         // @filename: /c.ts\nimport { greet as hello } from \"./a\";\nhello();\n",
    );
    let from_definition = references_with(&fixture, "def");
    let files: Vec<&str> = from_definition.iter().map(|e| e.file_name.as_str()).collect();
    assert!(files.contains(&"/a.ts"));
    assert!(files.contains(&"/b.ts"));
    assert!(files.contains(&"/c.ts"));
    assert_eq!(references_with(&fixture, "call"), from_definition);
    assert_eq!(references_with(&fixture, "imp"), from_definition);
}

#[test]
fn test_private_names_stay_in_their_class() {
    let fixture = Fixture::new(
        "class A {\n  /*a*/#x = 1;\n  m() { return this.#x; }\n}\n\
         class B extends A {\n  /*b*/#x = 2;\n  n() { return this.#x; }\n}",
    );
    let in_a = references_with(&fixture, "a");
    let in_b = references_with(&fixture, "b");
    assert_eq!(in_a.len(), 2);
    assert_eq!(in_b.len(), 2);
    assert!(in_a.iter().all(|e| !in_b.contains(e)));
}

#[test]
fn test_renamed_binding_element_splits_property_and_local() {
    let fixture = Fixture::new(
        "const source = { /*prop*/size: 1 };\n\
         const { /*key*/size: /*local*/n } = source;\n\
         source./*use*/size;\n/*nuse*/n;",
    );
    let property = references_with(&fixture, "prop");
    let local = references_with(&fixture, "local");
    assert_eq!(property.len(), 3);
    assert_eq!(local.len(), 2);
    assert_eq!(references_with(&fixture, "key"), property);
    assert_eq!(references_with(&fixture, "nuse"), local);
}

#[test]
fn test_merged_declarations_share_results() {
    let fixture = Fixture::new(
        "interface /*a*/Box { a: number }\ninterface /*b*/Box { b: number }\nlet v: /*c*/Box;",
    );
    let entries = references_with(&fixture, "c");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries.iter().filter(|e| e.is_definition).count(), 2);
    assert_eq!(references_with(&fixture, "b"), entries);
}

#[test]
fn test_result_cap() {
    let options = ServiceOptions {
        max_reference_results: Some(2),
        ..ServiceOptions::default()
    };
    let fixture = Fixture::with_options("let /*a*/x = 1;\nx;\nx;\nx;", options);
    assert_eq!(references_with(&fixture, "a").len(), 2);
}

#[test]
fn test_no_references_for_keywords() {
    let fixture = Fixture::new("/*k*/return;");
    assert!(references_with(&fixture, "k").is_empty());
}

#[test]
fn test_cancelled_request() {
    let fixture = Fixture::new("let /*a*/x = 1;");
    fixture.cancel.cancel();
    let (file, offset) = fixture.marker("a");
    let result = fixture.project.snapshot().references(&file, offset, &fixture.cancel);
    assert!(matches!(result, Err(crate::RequestError::Cancelled)));
}

#[test]
fn test_write_access_on_raw_syntax() {
    let source = tsq_syntax::SourceFile::parse("/t.ts", "let a = 1;\na += 2;\nf(a);".to_string());
    let arena = &source.arena;
    let identifiers: Vec<NodeIndex> = (0..arena.len() as u32)
        .map(NodeIndex)
        .filter(|&n| arena.kind(n) == SyntaxKind::Identifier && source.node_text(n) == "a")
        .collect();
    assert_eq!(identifiers.len(), 3);
    let writes: Vec<bool> = identifiers.iter().map(|&n| is_write_access(arena, n, false)).collect();
    assert_eq!(writes, vec![true, true, false]);
    assert!(is_definition(arena, identifiers[0]));
    assert!(!is_definition(arena, identifiers[1]));
    assert!(!is_write_access(arena, identifiers[0], true));
}
