use std::sync::Arc;

use super::*;

fn vfs(files: &[(&str, &str)]) -> Vfs {
    let mut vfs = Vfs::new();
    for (path, text) in files {
        vfs.insert(path, *text);
    }
    vfs
}

#[test]
fn test_project_files_exclude_embedded_libs() {
    let program = Program::new(Arc::new(vfs(&[("/a.ts", "let a = 1;"), ("/readme.md", "")])));
    let names: Vec<&str> = program
        .project_files()
        .map(|(_, f)| f.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["/a.ts"]);
    assert!(program.file_by_name(program.lib_file_name()).is_some());
    assert!(program.globals().contains_key("Array"));
}

#[test]
fn test_relative_specifier_resolves_to_module_symbol() {
    let program = Program::new(Arc::new(vfs(&[
        ("/src/a.ts", "import { b } from \"./lib/b\";"),
        ("/src/lib/b.ts", "export const b = 1;"),
    ])));
    let a = program.file_id("/src/a.ts").expect("a.ts is loaded");
    let b = program.file_id("/src/lib/b.ts").expect("b.ts is loaded");
    assert_eq!(program.resolve_module_file(a, "./lib/b"), Some(b));
    assert_eq!(
        program.resolve_module_specifier(a, "./lib/b"),
        program.module_symbol(b)
    );
    assert_eq!(program.resolve_module_specifier(a, "./missing"), None);
}

#[test]
fn test_ambient_module_wins_over_node_modules() {
    let program = Program::new(Arc::new(vfs(&[
        ("/a.ts", "import x from \"pkg\";"),
        ("/decl.d.ts", "declare module \"pkg\" { const x: number; export default x; }"),
        ("/node_modules/pkg/index.d.ts", "export declare const y: string;"),
    ])));
    let a = program.file_id("/a.ts").expect("a.ts is loaded");
    let module = program
        .resolve_module_specifier(a, "pkg")
        .expect("pkg resolves");
    assert_eq!(Some(&module), program.ambient_modules().get("pkg"));
    let decl = program.file_id("/decl.d.ts");
    assert_eq!(program.module_file(module), decl);
}

#[test]
fn test_with_previous_reuses_unchanged_files() {
    let mut files = vfs(&[("/a.ts", "export const a = 1;"), ("/b.ts", "export const b = 2;")]);
    let first = Program::new(Arc::new(files.clone()));
    files.insert("/b.ts", "export const b = 3;");
    let second = Program::with_previous(Arc::new(files), Some(&first));

    let old_a = first.file_by_name("/a.ts").expect("a.ts in first program");
    let new_a = second.file_by_name("/a.ts").expect("a.ts in second program");
    assert!(Arc::ptr_eq(old_a, new_a), "unchanged file should be reused");

    let old_b = first.file_by_name("/b.ts").expect("b.ts in first program");
    let new_b = second.file_by_name("/b.ts").expect("b.ts in second program");
    assert!(!Arc::ptr_eq(old_b, new_b));
    assert_eq!(new_b.text(), "export const b = 3;");
}
