use std::sync::Arc;

use super::*;
use crate::program::Program;
use crate::vfs::Vfs;

fn program(files: &[(&str, &str)]) -> Program {
    let mut vfs = Vfs::new();
    for (path, text) in files {
        vfs.insert(path, *text);
    }
    Program::new(Arc::new(vfs))
}

fn global(program: &Program, name: &str) -> SymbolId {
    *program
        .globals()
        .get(name)
        .unwrap_or_else(|| panic!("global {name} should be bound"))
}

#[test]
fn test_class_and_namespace_merge_into_one_symbol() {
    let p = program(&[(
        "/a.ts",
        "class Foo { static staticMethod() {} }\nnamespace Foo { export var x; }",
    )]);
    let foo = &p.symbols()[global(&p, "Foo")];
    assert!(foo.has(SymbolFlags::CLASS));
    assert!(foo.has(SymbolFlags::VALUE_MODULE));
    assert_eq!(foo.declarations.len(), 2);
    let exports: Vec<&str> = foo.exports.keys().map(String::as_str).collect();
    assert_eq!(exports, vec!["staticMethod", "x"]);
}

#[test]
fn test_interfaces_merge_across_script_files() {
    let p = program(&[
        ("/a.ts", "interface Shape { width: number }"),
        ("/b.ts", "interface Shape { height?: number }"),
    ]);
    let shape = &p.symbols()[global(&p, "Shape")];
    assert_eq!(shape.declarations.len(), 2);
    assert_ne!(shape.declarations[0].file, shape.declarations[1].file);
    let height = shape.members["height"];
    assert!(p.symbols()[height].has(SymbolFlags::OPTIONAL));
}

#[test]
fn test_this_assignment_creates_synthetic_member() {
    let p = program(&[(
        "/a.js",
        "function Point() { this.x = 1; }\nclass C { constructor() { this.y = 2; } }",
    )]);
    let point = &p.symbols()[global(&p, "Point")];
    let x = point.synthetic_members["x"];
    assert!(p.symbols()[x].is_synthetic());

    let c = &p.symbols()[global(&p, "C")];
    assert!(c.members.get("y").is_none(), "synthetic members stay out of members");
    assert!(c.synthetic_members.contains_key("y"));
}

#[test]
fn test_module_file_gets_quoted_module_symbol() {
    let p = program(&[("/src/util.ts", "export const answer = 42;\nexport default answer;")]);
    let file = p.file_id("/src/util.ts").expect("file is part of the program");
    let module = p.module_symbol(file).expect("module files get a symbol");
    let symbol = &p.symbols()[module];
    assert_eq!(symbol.name, "\"/src/util\"");
    assert!(symbol.has(SymbolFlags::SOURCE_MODULE));
    assert!(symbol.exports.contains_key("answer"));
    assert!(symbol.exports.contains_key("default"));
    assert!(p.globals().get("answer").is_none(), "module declarations are not global");
}

#[test]
fn test_imports_bind_aliases_in_file_locals() {
    let p = program(&[
        ("/a.ts", "export function f() {}"),
        ("/b.ts", "import { f as g } from \"./a\";\nimport * as ns from \"./a\";"),
    ]);
    let file = p.file_id("/b.ts").expect("file is part of the program");
    let root = p.file(file).expect("file exists").root;
    let locals = p
        .binding(file)
        .and_then(|b| b.locals_of(root))
        .expect("file scope has locals");
    for name in ["g", "ns"] {
        let id = locals[name];
        assert!(p.symbols()[id].has(SymbolFlags::ALIAS), "{name} should be an alias");
    }
    assert!(locals.get("f").is_none());
}

#[test]
fn test_string_named_module_is_ambient() {
    let p = program(&[("/types.d.ts", "declare module \"lib\" { export function g(): void; }")]);
    let lib = *p.ambient_modules().get("lib").expect("ambient module is recorded");
    assert!(p.symbols()[lib].has(SymbolFlags::AMBIENT));
    assert!(p.symbols()[lib].exports.contains_key("g"));
}

#[test]
fn test_module_name_of_path_strips_source_extensions() {
    assert_eq!(module_name_of_path("/a/b.d.ts"), "/a/b");
    assert_eq!(module_name_of_path("/a/b.mts"), "/a/b");
    assert_eq!(module_name_of_path("/a/b.json"), "/a/b.json");
}
