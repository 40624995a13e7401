use super::*;
use tempfile::TempDir;
use tsq_services::QuotePreference;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn loaded_paths(root: &Path) -> Vec<String> {
    let loaded = load_project(root).unwrap();
    let mut paths: Vec<String> = loaded.vfs.paths().map(str::to_string).collect();
    paths.sort();
    paths
}

#[test]
fn test_walk_collects_source_files_and_package_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.ts", "");
    write(dir.path(), "src/types.d.ts", "");
    write(dir.path(), "src/view.tsx", "");
    write(dir.path(), "lib/legacy.mjs", "");
    write(dir.path(), "node_modules/pkg/package.json", "{}");
    write(dir.path(), "notes.md", "");
    assert_eq!(
        loaded_paths(dir.path()),
        vec![
            "/lib/legacy.mjs",
            "/node_modules/pkg/package.json",
            "/src/main.ts",
            "/src/types.d.ts",
            "/src/view.tsx",
        ]
    );
}

#[test]
fn test_default_excludes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.ts", "");
    write(dir.path(), ".git/hooks/x.js", "");
    write(dir.path(), "node_modules/.cache/tool/out.js", "");
    assert_eq!(loaded_paths(dir.path()), vec!["/a.ts"]);
}

#[test]
fn test_config_excludes_and_options() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        CONFIG_FILE,
        r#"{ "exclude": ["dist/**"], "options": { "quotePreference": "single", "maxReferenceResults": 5 } }"#,
    );
    write(dir.path(), "src/a.ts", "");
    write(dir.path(), "dist/a.js", "");
    let loaded = load_project(dir.path()).unwrap();
    assert_eq!(loaded.vfs.paths().collect::<Vec<_>>(), vec!["/src/a.ts"]);
    assert_eq!(loaded.options.quote_preference, QuotePreference::Single);
    assert_eq!(loaded.options.max_reference_results, Some(5));
    assert!(loaded.options.include_completions_with_insert_text);
}

#[test]
fn test_config_file_list() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), CONFIG_FILE, r#"{ "files": ["src/keep.ts"] }"#);
    write(dir.path(), "src/keep.ts", "");
    write(dir.path(), "src/skip.ts", "");
    assert_eq!(loaded_paths(dir.path()), vec!["/src/keep.ts"]);
}

#[test]
fn test_config_file_list_with_missing_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), CONFIG_FILE, r#"{ "files": ["gone.ts"] }"#);
    let error = load_project(dir.path()).unwrap_err();
    assert!(error.to_string().contains("gone.ts"));
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), CONFIG_FILE, "{ not json");
    let error = read_config(dir.path()).unwrap_err();
    assert!(format!("{error:#}").contains(CONFIG_FILE));
}

#[test]
fn test_virtual_paths() {
    assert_eq!(virtual_path("src/a.ts"), "/src/a.ts");
    assert_eq!(virtual_path("./src/../a.ts"), "/a.ts");
    assert_eq!(virtual_path("/already/there.ts"), "/already/there.ts");
    assert_eq!(virtual_path("win\\style.ts"), "/win/style.ts");
}
