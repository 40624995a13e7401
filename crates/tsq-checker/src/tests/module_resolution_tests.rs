use super::*;
use serde_json::json;

fn vfs_with(files: &[(&str, &str)]) -> Vfs {
    let mut vfs = Vfs::new();
    for (path, text) in files {
        vfs.insert(path, *text);
    }
    vfs
}

#[test]
fn test_relative_resolution_tries_extensions_in_order() {
    let vfs = vfs_with(&[("/src/a.ts", ""), ("/src/b.d.ts", ""), ("/src/c.js", "")]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(resolver.resolve("/src/main.ts", "./a").as_deref(), Some("/src/a.ts"));
    assert_eq!(resolver.resolve("/src/main.ts", "./b").as_deref(), Some("/src/b.d.ts"));
    assert_eq!(resolver.resolve("/src/main.ts", "./c").as_deref(), Some("/src/c.js"));
    assert_eq!(resolver.resolve("/src/main.ts", "./missing"), None);
}

#[test]
fn test_js_extension_maps_to_ts_source() {
    let vfs = vfs_with(&[("/src/a.ts", "")]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(resolver.resolve("/src/main.ts", "./a.js").as_deref(), Some("/src/a.ts"));
}

#[test]
fn test_directory_index_and_parent_paths() {
    let vfs = vfs_with(&[("/lib/index.ts", ""), ("/src/deep/x.ts", "")]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(
        resolver.resolve("/src/deep/x.ts", "../../lib").as_deref(),
        Some("/lib/index.ts")
    );
}

#[test]
fn test_bare_specifier_uses_package_types() {
    let vfs = vfs_with(&[
        ("/node_modules/pkg/package.json", r#"{ "types": "./out/main.d.ts" }"#),
        ("/node_modules/pkg/out/main.d.ts", ""),
        ("/src/main.ts", ""),
    ]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(
        resolver.resolve("/src/main.ts", "pkg").as_deref(),
        Some("/node_modules/pkg/out/main.d.ts")
    );
}

#[test]
fn test_bare_specifier_falls_back_to_types_package() {
    let vfs = vfs_with(&[("/node_modules/@types/lodash/index.d.ts", "")]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(
        resolver.resolve("/a.ts", "lodash").as_deref(),
        Some("/node_modules/@types/lodash/index.d.ts")
    );
}

#[test]
fn test_exports_wildcard_subpath() {
    let vfs = vfs_with(&[
        (
            "/node_modules/pkg/package.json",
            r#"{ "exports": { "./*": "./dist/*.js" } }"#,
        ),
        ("/node_modules/pkg/dist/blah.d.ts", ""),
    ]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(
        resolver.resolve("/a.ts", "pkg/blah").as_deref(),
        Some("/node_modules/pkg/dist/blah.d.ts")
    );
}

#[test]
fn test_match_subpath_precedence() {
    let map = vec![
        ("./sub/".to_string(), json!("./dir/")),
        ("./sub/*".to_string(), json!("./wild/*.js")),
        ("./sub/exact".to_string(), json!("./exact.js")),
    ];
    let (key, _, matched) = match_subpath(&map, "./sub/exact").unwrap();
    assert_eq!((key, matched), ("./sub/exact", SubpathMatch::Exact));
    let (key, _, matched) = match_subpath(&map, "./sub/other").unwrap();
    assert_eq!(
        (key, matched),
        ("./sub/*", SubpathMatch::Wildcard("other".to_string()))
    );
}

#[test]
fn test_export_target_prefers_types_condition() {
    let target = json!({ "default": "./index.js", "types": "./index.d.ts" });
    assert_eq!(export_target_path(&target).as_deref(), Some("./index.d.ts"));
    let target = json!([{ "import": "./a.mjs" }, "./b.js"]);
    assert_eq!(export_target_path(&target).as_deref(), Some("./a.mjs"));
}

#[test]
fn test_package_imports_map() {
    let vfs = vfs_with(&[
        ("/package.json", r##"{ "imports": { "#util/*": "./src/util/*.ts" } }"##),
        ("/src/util/strings.ts", ""),
    ]);
    let resolver = ModuleResolver::new(&vfs);
    assert_eq!(
        resolver.resolve("/src/main.ts", "#util/strings").as_deref(),
        Some("/src/util/strings.ts")
    );
}

#[test]
fn test_split_package_specifier() {
    assert_eq!(split_package_specifier("pkg"), ("pkg", ""));
    assert_eq!(split_package_specifier("pkg/a/b"), ("pkg", "a/b"));
    assert_eq!(split_package_specifier("@s/pkg/a"), ("@s/pkg", "a"));
}
