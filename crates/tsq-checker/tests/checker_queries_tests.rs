//! Checker boundary queries over small multi-file programs.

use std::sync::Arc;

use tsq_checker::{FileId, Program, SignatureKind, SymbolFlags, TypeId, Vfs};
use tsq_syntax::NodeIndex;

fn program(files: &[(&str, &str)]) -> Program {
    let mut vfs = Vfs::new();
    for (path, text) in files {
        vfs.insert(path, *text);
    }
    Program::new(Arc::new(vfs))
}

/// The innermost node spanning the `occurrence`-th match of `needle`.
fn node_at(program: &Program, file: &str, needle: &str, occurrence: usize) -> (FileId, NodeIndex) {
    let id = program.file_id(file).expect("file is loaded");
    let source = program.file(id).expect("file is parsed");
    let start = source
        .text()
        .match_indices(needle)
        .nth(occurrence)
        .map(|(i, _)| i as u32)
        .unwrap_or_else(|| panic!("{needle:?} #{occurrence} not found in {file}"));
    let node = source
        .arena
        .covering_node(source.root, start, start + needle.len() as u32);
    (id, node)
}

fn type_text_at(program: &Program, file: &str, needle: &str, occurrence: usize) -> String {
    let (id, node) = node_at(program, file, needle, occurrence);
    let checker = program.checker();
    checker.type_to_string(checker.type_at_location(id, node))
}

#[test]
fn test_import_alias_resolves_to_exported_declaration() {
    let p = program(&[
        ("/a.ts", "export function greet(name: string): string { return name; }"),
        ("/b.ts", "import { greet as hello } from \"./a\";\nhello(\"x\");"),
    ]);
    let checker = p.checker();
    let (file, node) = node_at(&p, "/b.ts", "hello", 1);
    let alias = checker.symbol_at_location(file, node).expect("alias symbol");
    assert!(checker.symbol(alias).has(SymbolFlags::ALIAS));
    let target = checker.resolve_alias(alias);
    assert_eq!(checker.symbol(target).name, "greet");
    assert!(checker.symbol(target).has(SymbolFlags::FUNCTION));
    assert_eq!(
        type_text_at(&p, "/b.ts", "hello", 1),
        "(name: string) => string"
    );
}

#[test]
fn test_export_star_and_export_equals_exports() {
    let p = program(&[
        ("/a.ts", "export const a = 1;\nexport default 2;"),
        ("/b.ts", "export * from \"./a\";\nexport const b = \"b\";"),
        ("/c.ts", "declare const impl: { run(): void };\nexport = impl;"),
        ("/main.ts", "import * as b from \"./b\";\nimport c = require(\"./c\");"),
    ]);
    let checker = p.checker();
    let main = p.file_id("/main.ts").expect("main is loaded");
    let b = p
        .resolve_module_specifier(main, "./b")
        .expect("./b resolves");
    let names: Vec<&str> = checker.exports_of_module(b).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["b", "a"], "star exports skip default");

    assert_eq!(type_text_at(&p, "/main.ts", "c", 0), "{ run(): void; }");
}

#[test]
fn test_class_namespace_merge_exposes_statics_and_exports() {
    let p = program(&[(
        "/a.ts",
        "class Foo { static staticMethod() {} }\nnamespace Foo { export var x: number; }\nFoo;",
    )]);
    let checker = p.checker();
    let foo = *p.globals().get("Foo").expect("Foo is global");
    let names: Vec<&str> = checker
        .properties_of_type(checker.type_of_symbol(foo))
        .into_iter()
        .map(|prop| checker.symbol(prop.symbol).name.as_str())
        .filter(|name| matches!(*name, "x" | "staticMethod"))
        .collect();
    assert_eq!(names, vec!["staticMethod", "x"]);
}

#[test]
fn test_apparent_members_of_primitives_and_arrays() {
    let p = program(&[("/a.ts", "let s = \"abc\";\nlet n = [1, 2];\ns;\nn;")]);
    let checker = p.checker();
    let (file, s) = node_at(&p, "/a.ts", "s", 1);
    let string_type = checker.type_at_location(file, s);
    assert_eq!(string_type, TypeId::STRING);
    assert!(checker.property_of_type(string_type, "toUpperCase").is_some());

    let (file, n) = node_at(&p, "/a.ts", "n", 1);
    let array_type = checker.type_at_location(file, n);
    assert_eq!(checker.type_to_string(array_type), "number[]");
    let push = checker.property_of_type(array_type, "push").expect("arrays have push");
    assert_eq!(
        checker.type_to_string(checker.type_of_property(push)),
        "(...items: number[]) => number"
    );
}

#[test]
fn test_union_properties_are_common_members() {
    let p = program(&[(
        "/a.ts",
        "interface A { kind: \"a\"; a: number }\n\
         interface B { kind: \"b\"; b: string }\n\
         declare let u: A | B;",
    )]);
    let checker = p.checker();
    let u = *p.globals().get("u").expect("u is global");
    let names: Vec<&str> = checker
        .properties_of_type(checker.type_of_symbol(u))
        .into_iter()
        .map(|prop| checker.symbol(prop.symbol).name.as_str())
        .collect();
    assert_eq!(names, vec!["kind"]);
    let lenient = checker.property_of_type_lenient(checker.type_of_symbol(u), "b");
    assert!(lenient.is_some(), "lenient lookup finds members of some constituents");
}

#[test]
fn test_contextual_type_of_object_literal_argument() {
    let p = program(&[(
        "/a.ts",
        "interface Options { mode: \"fast\" | \"slow\"; retries?: number }\n\
         declare function run(options: Options): void;\n\
         run({ mode: \"fast\" });",
    )]);
    let checker = p.checker();
    let (file, literal) = node_at(&p, "/a.ts", "{ mode: \"fast\" }", 0);
    let contextual = checker
        .contextual_type(file, literal)
        .expect("argument has a contextual type");
    assert_eq!(checker.type_to_string(contextual), "Options");

    let (file, value) = node_at(&p, "/a.ts", "\"fast\"", 1);
    let member = checker
        .contextual_type(file, value)
        .expect("property initializer has a contextual type");
    assert_eq!(checker.type_to_string(member), "\"fast\" | \"slow\"");
}

#[test]
fn test_overload_declarations_hide_implementation_signature() {
    let p = program(&[(
        "/a.ts",
        "function f(a: number): number;\n\
         function f(a: string): string;\n\
         function f(a: any): any { return a; }",
    )]);
    let checker = p.checker();
    let f = *p.globals().get("f").expect("f is global");
    let signatures = checker.signatures_of_type(checker.type_of_symbol(f), SignatureKind::Call);
    let texts: Vec<String> = signatures
        .iter()
        .map(|s| checker.type_to_string(s.return_type))
        .collect();
    assert_eq!(texts, vec!["number", "string"]);
}

#[test]
fn test_generic_call_infers_type_argument() {
    let p = program(&[(
        "/a.ts",
        "declare function first<T>(items: T[]): T;\n\
         declare const names: string[];\n\
         const head = first(names);",
    )]);
    assert_eq!(type_text_at(&p, "/a.ts", "head", 0), "string");
}

#[test]
fn test_literal_arguments_infer_widened_type_arguments() {
    let p = program(&[(
        "/a.ts",
        "declare function id<T>(value: T): T;\n\
         const n = id(42);\n\
         const s = id(\"a\");",
    )]);
    assert_eq!(type_text_at(&p, "/a.ts", "n", 0), "number");
    assert_eq!(type_text_at(&p, "/a.ts", "s", 0), "string");
}

#[test]
fn test_overload_selected_by_argument_type() {
    let p = program(&[(
        "/a.ts",
        "function f(a: number): number;\n\
         function f(a: string): string;\n\
         function f(a: any): any { return a; }\n\
         const byNumber = f(1);\n\
         const byString = f(\"x\");",
    )]);
    assert_eq!(type_text_at(&p, "/a.ts", "byNumber", 0), "number");
    assert_eq!(type_text_at(&p, "/a.ts", "byString", 0), "string");
}

#[test]
fn test_assignability_rejects_primitive_and_shape_mismatches() {
    let p = program(&[(
        "/a.ts",
        "interface Named { name: string; nick?: string }\n\
         declare const named: { name: string; age: number };\n\
         declare const anonymous: { age: number };\n\
         declare let target: Named;",
    )]);
    let checker = p.checker();
    let types = checker.types();
    let global_type = |name: &str| {
        let symbol = *p.globals().get(name).expect("global is declared");
        checker.type_of_symbol(symbol)
    };
    assert!(checker.is_type_assignable_to(types.string_literal("x"), TypeId::STRING));
    assert!(!checker.is_type_assignable_to(types.string_literal("x"), TypeId::NUMBER));
    assert!(checker.is_type_assignable_to(TypeId::NUMBER, types.union([TypeId::STRING, TypeId::NUMBER])));
    assert!(checker.is_type_assignable_to(global_type("named"), global_type("target")));
    assert!(!checker.is_type_assignable_to(global_type("anonymous"), global_type("target")));
}

#[test]
fn test_template_literal_patterns_accept_matching_strings() {
    let p = program(&[("/a.ts", "")]);
    let checker = p.checker();
    let texts: Vec<Box<str>> = vec!["v".into(), ".".into(), "".into()];
    let holes = vec![TypeId::NUMBER, TypeId::NUMBER];
    assert!(checker.template_accepts("v1.2", &texts, &holes));
    assert!(!checker.template_accepts("v1.x", &texts, &holes));
    assert!(!checker.template_accepts("1.2", &texts, &holes));
    let suffixed: Vec<Box<str>> = vec!["on".into(), "Up".into()];
    assert!(checker.template_accepts("onKeyUp", &suffixed, &[TypeId::STRING]));
    assert!(!checker.template_accepts("onKeyDown", &suffixed, &[TypeId::STRING]));
}

#[test]
fn test_this_type_inside_class_and_static_member() {
    let p = program(&[(
        "/a.ts",
        "class Counter {\n  count = 0;\n  inc() { return this; }\n  static make() { return this; }\n}",
    )]);
    assert_eq!(type_text_at(&p, "/a.ts", "this", 0), "Counter");
    assert_eq!(type_text_at(&p, "/a.ts", "this", 1), "typeof Counter");
}

#[test]
fn test_synthetic_members_are_visible_through_lookup() {
    let p = program(&[(
        "/a.js",
        "function Point() { this.x = 1; }",
    )]);
    let checker = p.checker();
    let point = *p.globals().get("Point").expect("Point is global");
    let synthetic = checker.synthetic_properties_of_type(checker.type_of_symbol(point));
    let names: Vec<&str> = synthetic
        .iter()
        .map(|prop| checker.symbol(prop.symbol).name.as_str())
        .collect();
    assert_eq!(names, vec!["x"]);
    assert_eq!(type_text_at(&p, "/a.js", "x", 0), "number");
}

#[test]
fn test_enum_members_have_constant_values() {
    let p = program(&[("/a.ts", "enum E { A = 1, B, C = \"c\" }")]);
    let checker = p.checker();
    let e = *p.globals().get("E").expect("E is global");
    let exports = &checker.symbol(e).exports;
    let value = |name: &str| {
        checker
            .enum_member_value(exports[name])
            .map(|v| v.to_string())
    };
    assert_eq!(value("A").as_deref(), Some("1"));
    assert_eq!(value("B").as_deref(), Some("2"));
    assert_eq!(value("C").as_deref(), Some("\"c\""));
}
