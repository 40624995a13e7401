use super::*;
use crate::fixture::Fixture;
use crate::position::node_at_offset;

/// Kind and modifiers of the symbol named at each marker.
fn kinds(annotated: &str, markers: &[&str]) -> Vec<(ScriptElementKind, String)> {
    let fixture = Fixture::new(annotated);
    let snapshot = fixture.project.snapshot();
    markers
        .iter()
        .map(|name| {
            let (file, offset) = fixture.marker(name);
            let q = snapshot.query(&file, &fixture.cancel).expect("file exists");
            let node = node_at_offset(q.source, offset);
            let symbol = q
                .checker
                .symbol_at_location(q.file, node)
                .unwrap_or_else(|| panic!("marker {name} names a symbol"));
            (
                symbol_kind(&q.checker, symbol),
                symbol_kind_modifiers(&q.checker, symbol),
            )
        })
        .collect()
}

#[test]
fn test_variable_kinds() {
    let result = kinds(
        "var /*v*/v = 1;\nlet /*l*/l = 2;\nconst /*c*/c = 3;\nfunction f(/*p*/p: number) { var /*lv*/lv = p; }",
        &["v", "l", "c", "p", "lv"],
    );
    let kinds: Vec<ScriptElementKind> = result.into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            ScriptElementKind::Variable,
            ScriptElementKind::Let,
            ScriptElementKind::Const,
            ScriptElementKind::Parameter,
            ScriptElementKind::LocalVariable,
        ]
    );
}

#[test]
fn test_declaration_kinds() {
    let result = kinds(
        "class /*c*/C { /*m*/m() {} /*p*/p = 1; get /*g*/g() { return 1; } }\n\
         interface /*i*/I {}\n\
         type /*t*/T = string;\n\
         enum /*e*/E { /*em*/A }\n\
         namespace /*n*/N {}\n\
         function /*f*/f</*tp*/U>() { function /*lf*/inner() {} }",
        &["c", "m", "p", "g", "i", "t", "e", "em", "n", "f", "tp", "lf"],
    );
    let kinds: Vec<&str> = result.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            "class",
            "method",
            "property",
            "getter",
            "interface",
            "type",
            "enum",
            "enum member",
            "module",
            "function",
            "type parameter",
            "local function",
        ]
    );
}

#[test]
fn test_member_modifiers() {
    let result = kinds(
        "class C {\n  private /*a*/a = 1;\n  static protected /*b*/b = 2;\n  /*c*/c?: number;\n}\ndeclare const /*d*/d: number;",
        &["a", "b", "c", "d"],
    );
    assert_eq!(result[0].1, "private");
    assert_eq!(result[1].1, "protected,static");
    assert_eq!(result[2].1, "optional");
    assert_eq!(result[3].1, "declare");
}

#[test]
fn test_deprecated_modifier() {
    let result = kinds("/** @deprecated */\nfunction /*old*/old() {}", &["old"]);
    assert_eq!(result[0], (ScriptElementKind::Function, "deprecated".to_string()));
}

#[test]
fn test_kind_serializes_as_editor_string() {
    let json = serde_json::to_string(&ScriptElementKind::LocalVariable).expect("serializes");
    assert_eq!(json, "\"local var\"");
    assert_eq!(ScriptElementKind::TypeAlias.to_string(), "type");
    assert!(ScriptElementKind::Const.is_bare_prefix());
    assert!(!ScriptElementKind::Property.is_bare_prefix());
}
