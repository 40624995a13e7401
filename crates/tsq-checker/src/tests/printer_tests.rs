use std::sync::Arc;

use super::*;
use crate::program::Program;
use crate::vfs::Vfs;

fn program(source: &str) -> Program {
    let mut vfs = Vfs::new();
    vfs.insert("/test.ts", source);
    Program::new(Arc::new(vfs))
}

/// Printed type of a global variable.
fn printed(program: &Program, name: &str) -> String {
    let checker = program.checker();
    let symbol = *program.globals().get(name).expect("global is declared");
    checker.type_to_string(checker.type_of_symbol(symbol))
}

#[test]
fn test_print_literal_unions_and_arrays() {
    let p = program("");
    let checker = p.checker();
    let types = checker.types();
    let union = types.union([types.string_literal("a"), types.number_literal("1")]);
    assert_eq!(checker.type_to_string(union), "\"a\" | 1");
    let array = types.array(types.union([TypeId::STRING, TypeId::NUMBER]));
    assert_eq!(checker.type_to_string(array), "(string | number)[]");
    let quoted = types.string_literal("say \"hi\"");
    assert_eq!(checker.type_to_string(quoted), "\"say \\\"hi\\\"\"");
}

#[test]
fn test_print_function_type_as_arrow() {
    let p = program("declare let f: (a: number, b?: string, ...rest: boolean[]) => void;");
    assert_eq!(
        printed(&p, "f"),
        "(a: number, b?: string, ...rest: boolean[]) => void"
    );
}

#[test]
fn test_print_function_values_as_arrows_despite_function_members() {
    let p = program(
        "interface Function { apply(this: Function, thisArg: any): any; call(thisArg: any): any; }\n\
         const f = (a: number): string => \"\";\n\
         function g(a: number): string { return \"\"; }\n\
         let h = g;",
    );
    assert_eq!(printed(&p, "f"), "(a: number) => string");
    assert_eq!(printed(&p, "h"), "(a: number) => string");
    let checker = p.checker();
    let f = *p.globals().get("f").expect("f is declared");
    let f_type = checker.type_of_symbol(f);
    assert!(checker.property_of_type(f_type, "call").is_some());
    assert!(checker.declared_properties_of_type(f_type).is_empty());
}

#[test]
fn test_print_type_literal_members() {
    let p = program("declare let o: { x: number; readonly y?: string; m(): void; \"a b\": 1 };");
    assert_eq!(
        printed(&p, "o"),
        "{ x: number; readonly y?: string; m(): void; \"a b\": 1; }"
    );
}

#[test]
fn test_print_qualified_names_and_typeof() {
    let p = program(
        "namespace NS { export namespace Inner { export class C {} } }\n\
         enum Color { Red, Green }\n\
         declare let c: NS.Inner.C;\n\
         declare let red: Color.Red;\n\
         let ctor = NS.Inner.C;\n\
         let ns = NS;",
    );
    assert_eq!(printed(&p, "c"), "NS.Inner.C");
    assert_eq!(printed(&p, "red"), "Color.Red");
    assert_eq!(printed(&p, "ctor"), "typeof NS.Inner.C");
    assert_eq!(printed(&p, "ns"), "typeof NS");
}

#[test]
fn test_print_recursive_alias_by_name() {
    let p = program("type List = { value: number; next: List | undefined };\ndeclare let l: List;");
    assert_eq!(printed(&p, "l"), "List");
}

#[test]
fn test_print_generic_reference_and_type_parameters() {
    let p = program(
        "interface Box<T> { value: T }\n\
         declare function wrap<T extends string, U = number>(x: T): Box<U>;",
    );
    let checker = p.checker();
    let wrap = *p.globals().get("wrap").expect("wrap is declared");
    let signatures = checker.signatures_of_type(checker.type_of_symbol(wrap), SignatureKind::Call);
    assert_eq!(signatures.len(), 1);
    let text = checker
        .printer()
        .signature_to_string(&signatures[0], SignatureStyle::Colon);
    assert_eq!(text, "<T extends string, U = number>(x: T): Box<U>");
}

#[test]
fn test_display_parts_serialize_with_camel_case_kinds() {
    let mut parts = DisplayParts::new();
    parts
        .keyword("class")
        .space()
        .push(DisplayPartKind::ClassName, "Foo");
    assert_eq!(parts.to_text(), "class Foo");
    let json = serde_json::to_string(&parts).expect("parts serialize");
    assert_eq!(
        json,
        r#"[{"text":"class","kind":"keyword"},{"text":" ","kind":"space"},{"text":"Foo","kind":"className"}]"#
    );
}
