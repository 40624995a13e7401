//! Definition, references, hover and signature help scenarios.

mod support;

use support::Scenario;
use tsq_common::TextSpan;
use tsq_services::ScriptElementKind;

// =============================================================================
// Definition
// =============================================================================

#[test]
fn overloads_resolve_to_their_signatures() {
    let s = Scenario::new(
        "function [|over|](a: number): void;\nfunction [|over|](a: string): void;\n\
         function over(a: any) {}\n/*call*/over(1);",
    );
    let found = s.definition("call");
    let spans: Vec<TextSpan> = found.iter().map(|d| d.text_span).collect();
    let expected: Vec<TextSpan> = s.ranges().iter().map(|(_, span)| *span).collect();
    assert_eq!(spans, expected);
    assert!(found.iter().all(|d| d.kind == ScriptElementKind::Function));
}

#[test]
fn definition_through_an_import_lands_in_the_exporting_file() {
    let s = Scenario::new(
        "// @filename: /lib.ts\nexport class [|Widget|] {}\n\
         // @filename: /app.ts\nimport { Widget } from \"./lib\";\nnew /*use*/Widget();",
    );
    let found = s.definition("use");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].file_name, "/lib.ts");
    assert_eq!(found[0].text_span, s.ranges()[0].1);
    assert_eq!(found[0].kind, ScriptElementKind::Class);
}

#[test]
fn member_definition_names_its_container() {
    let s = Scenario::new(
        "class Counter {\n  [|tick|]() {}\n}\nnew Counter()./*use*/tick();",
    );
    let found = s.definition("use");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].container_name, "Counter");
    assert_eq!(found[0].name, "tick");
}

#[test]
fn nothing_to_define_inside_a_string() {
    let s = Scenario::new("let a = \"te/*m*/xt\";");
    assert!(s.definition("m").is_empty());
}

// =============================================================================
// References
// =============================================================================

#[test]
fn references_are_symmetric_within_a_file() {
    let s = Scenario::new(
        "let [|/*a*/total|] = 0;\nfunction add(n: number) { [|/*b*/total|] += n; }\n\
         add([|/*c*/total|]);",
    );
    s.verify_references_are_ranges(&["a", "b", "c"]);
}

#[test]
fn references_are_symmetric_across_files() {
    let s = Scenario::new(
        "// @filename: /a.ts\nexport const [|/*def*/limit|] = 10;\n\
         // @filename: /b.ts\nimport { [|/*imp*/limit|] } from \"./a\";\nconsole.log([|/*use*/limit|]);",
    );
    s.verify_references_are_ranges(&["def", "imp", "use"]);
}

#[test]
fn private_names_in_sibling_classes_are_separate() {
    let s = Scenario::new(
        "class A {\n  [|/*a*/#id|] = 1;\n  get() { return this.[|#id|]; }\n}\n\
         class B {\n  #id = 2;\n  get() { return this.#id; }\n}",
    );
    s.verify_references_are_ranges(&["a"]);
}

#[test]
fn renamed_destructuring_keeps_property_and_local_apart() {
    let s = Scenario::new(
        "const options = { verbose: true };\nconst { verbose: [|/*local*/loud|] } = options;\n\
         if ([|loud|]) {}\noptions.verbose;",
    );
    s.verify_references_are_ranges(&["local"]);
}

#[test]
fn method_references_follow_the_declaring_class() {
    let s = Scenario::new(
        "class Shape {\n  [|/*decl*/area|]() { return 0; }\n}\n\
         class Other {\n  area() { return 1; }\n}\n\
         new Shape().[|/*use*/area|]();\nnew Other().area();",
    );
    s.verify_references_are_ranges(&["decl", "use"]);
}

// =============================================================================
// Hover
// =============================================================================

#[test]
fn hover_on_declarations_and_uses() {
    let s = Scenario::new(
        "interface Point { x: number; y: number }\n\
         function /*fn*/distance(p: Point): number { return p./*prop*/x; }\n\
         const /*origin*/origin: Point = { x: 0, y: 0 };\n\
         class Vec {\n  /*ctor*/constructor(public x: number) {}\n}\n\
         /*call*/distance(origin);",
    );
    s.verify_quick_info("fn", "function distance(p: Point): number");
    s.verify_quick_info("call", "function distance(p: Point): number");
    s.verify_quick_info("prop", "(property) Point.x: number");
    s.verify_quick_info("origin", "const origin: Point");
    s.verify_quick_info("ctor", "constructor Vec(x: number): Vec");
}

#[test]
fn hover_on_an_imported_function() {
    let s = Scenario::new(
        "// @filename: /math.ts\nexport function double(n: number): number { return n * 2; }\n\
         // @filename: /main.ts\nimport { double } from \"./math\";\n/*use*/double(2);",
    );
    s.verify_quick_info("use", "(alias) function double(n: number): number\nimport double");
}

#[test]
fn hover_has_nothing_inside_a_string() {
    let s = Scenario::new("let a = \"te/*m*/xt\";");
    assert_eq!(s.hover("m"), None);
}

// =============================================================================
// Signature help
// =============================================================================

#[test]
fn signature_help_tracks_the_active_argument() {
    let s = Scenario::new(
        "function paint(color: string, width: number, dashed?: boolean) {}\n\
         paint(/*first*/\"red\", /*second*/3, /*third*/);",
    );
    let first = s.signature_help("first", Some("(")).expect("help at the first argument");
    assert_eq!(first.argument_index, 0);
    assert_eq!(first.argument_count, 3);
    assert_eq!(
        first.items[0].label(),
        "paint(color: string, width: number, dashed?: boolean): void"
    );
    let second = s.signature_help("second", Some(",")).expect("help at the second argument");
    assert_eq!(second.argument_index, 1);
    let third = s.signature_help("third", None).expect("help at the third argument");
    assert_eq!(third.argument_index, 2);
}

#[test]
fn signature_help_picks_an_overload_that_fits() {
    let s = Scenario::new(
        "function pick(a: string): void;\nfunction pick(a: string, b: number): void;\n\
         function pick(a: any, b?: any) {}\npick(\"x\", /*m*/);",
    );
    let help = s.signature_help("m", Some(",")).expect("overload help");
    let labels: Vec<String> = help.items.iter().map(|item| item.label()).collect();
    assert_eq!(labels, vec!["pick(a: string, b: number): void".to_string()]);
    assert_eq!(help.selected_item_index, 0);
}

#[test]
fn signature_help_is_absent_outside_a_call() {
    let s = Scenario::new("const value = /*m*/1;");
    assert_eq!(s.signature_help("m", None), None);
}
