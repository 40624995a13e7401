use super::*;
use crate::fixture::{Fixture, strip_markers};

fn help(annotated: &str, trigger: Option<&str>) -> Option<SignatureHelpItems> {
    let fixture = Fixture::new(annotated);
    let (file, offset) = fixture.marker("");
    fixture
        .project
        .snapshot()
        .signature_help(&file, offset, trigger, &fixture.cancel)
        .expect("signature help request succeeds")
}

fn list_info(annotated: &str) -> Option<ArgumentListInfo> {
    let (text, markers) = strip_markers(annotated);
    let source = SourceFile::parse("/test.ts", text);
    containing_argument_list(&source, markers[0].1)
}

#[test]
fn test_argument_index_counts_top_level_commas() {
    let info = list_info("f(a, [b, c], /**/d)").expect("inside the list");
    assert_eq!(info.argument_index, 2);
    assert_eq!(info.argument_count, 3);
    assert_eq!(info.applicable_span, TextSpan::new(2, "a, [b, c], d".len() as u32));
}

#[test]
fn test_empty_list_has_no_arguments() {
    let info = list_info("f(/**/)").expect("inside the list");
    assert_eq!(info.argument_index, 0);
    assert_eq!(info.argument_count, 0);
}

#[test]
fn test_unterminated_list_reaches_the_cursor() {
    let info = list_info("f(1, /**/").expect("open list");
    assert_eq!(info.argument_index, 1);
    assert_eq!(info.argument_count, 2);
}

#[test]
fn test_closed_list_does_not_contain_following_text() {
    assert!(list_info("f(1)/**/;").is_none());
    assert!(list_info("/**/f(1);").is_none());
}

#[test]
fn test_innermost_list_wins() {
    let info = list_info("outer(1, inner(/**/))").expect("inside inner");
    assert_eq!(info.argument_index, 0);
    let outer = list_info("outer(1, inner(2), /**/)").expect("inside outer");
    assert_eq!(outer.argument_index, 2);
}

#[test]
fn test_single_signature_label() {
    let items = help(
        "function add(a: number, b?: number): number { return a; }\nadd(1, /**/",
        Some(","),
    )
    .expect("help at the second argument");
    assert_eq!(items.items.len(), 1);
    assert_eq!(items.argument_index, 1);
    let item = &items.items[0];
    assert_eq!(item.label(), "add(a: number, b?: number): number");
    assert!(item.parameters[1].is_optional);
    assert!(!item.is_variadic);
}

#[test]
fn test_rest_parameter_is_variadic() {
    let items = help("function log(...parts: string[]): void {}\nlog(\"a\", /**/)", None).expect("help");
    let item = &items.items[0];
    assert!(item.is_variadic);
    assert!(item.parameters[0].is_rest);
    assert_eq!(item.label(), "log(...parts: string[]): void");
}

#[test]
fn test_overloads_filtered_by_arity_and_selected_by_resolution() {
    let items = help(
        "declare function f(a: string): void;\n\
         declare function f(a: number, b: number): void;\n\
         declare function f(a: number, b: number, c: number): void;\n\
         f(1, /**/",
        Some(","),
    )
    .expect("help");
    let labels: Vec<String> = items.items.iter().map(SignatureHelpItem::label).collect();
    assert_eq!(
        labels,
        vec![
            "f(a: number, b: number): void".to_string(),
            "f(a: number, b: number, c: number): void".to_string(),
        ]
    );
    assert_eq!(items.selected_item_index, 0);
}

#[test]
fn test_generic_signature_is_instantiated_when_selected() {
    let items = help("declare function id<T>(value: T): T;\nid(42/**/)", None).expect("help");
    assert_eq!(items.items[0].label(), "id(value: number): number");
}

#[test]
fn test_parameter_documentation_from_param_tags() {
    let items = help(
        "/**\n * Scales a value.\n * @param factor how much\n * @returns scaled\n */\n\
         function scale(factor: number) {}\nscale(/**/",
        Some("("),
    )
    .expect("help");
    let item = &items.items[0];
    assert_eq!(item.documentation.to_text(), "Scales a value.");
    assert_eq!(item.parameters[0].documentation.to_text(), "how much");
    assert_eq!(item.tags.len(), 1);
    assert_eq!(item.tags[0].name, "returns");
}

#[test]
fn test_method_and_constructor_calls() {
    let method = help(
        "class Greeter { greet(name: string): string { return name; } }\nnew Greeter().greet(/**/",
        None,
    )
    .expect("method help");
    assert_eq!(method.items[0].label(), "greet(name: string): string");

    let construct = help(
        "class Point { constructor(x: number, y: number) {} }\nnew Point(1, /**/",
        None,
    )
    .expect("constructor help");
    assert_eq!(construct.items[0].label(), "Point(x: number, y: number): Point");
    assert_eq!(construct.argument_index, 1);
}

#[test]
fn test_unknown_trigger_and_non_callable_give_nothing() {
    let text = "function add(a: number) {}\nadd(/**/";
    assert!(help(text, Some("x")).is_none());
    assert!(help(text, Some(")")).is_some());
    assert!(help("const n = 1;\nn(/**/", None).is_none());
    assert!(help("let a = [1, /**/];", None).is_none());
}
