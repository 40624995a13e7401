use super::*;

#[test]
fn test_normalize_path_collapses_segments() {
    assert_eq!(normalize_path("a/./b/../c.ts"), "/a/c.ts");
    assert_eq!(normalize_path("\\src\\x.ts"), "/src/x.ts");
    assert_eq!(normalize_path("/"), "/");
    assert_eq!(normalize_path("/../a"), "/a");
}

#[test]
fn test_dirname_and_join() {
    assert_eq!(dirname("/src/a.ts"), "/src");
    assert_eq!(dirname("/a.ts"), "/");
    assert_eq!(join_path("/src", "../lib/b"), "/lib/b");
    assert_eq!(join_path("/src", "/abs.ts"), "/abs.ts");
    assert_eq!(basename("/src/a.ts"), "a.ts");
}

#[test]
fn test_read_dir_lists_files_and_folders_once() {
    let mut vfs = Vfs::new();
    vfs.insert("/p/a.ts", "");
    vfs.insert("/p/sub/b.ts", "");
    vfs.insert("/p/sub/c.ts", "");
    vfs.insert("/p/sub.ts", "");
    vfs.insert("/q/d.ts", "");

    let entries = vfs.read_dir("/p");
    let names: Vec<(&str, bool)> = entries.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
    assert_eq!(names, vec![("a.ts", false), ("sub.ts", false), ("sub", true)]);
}

#[test]
fn test_directory_exists() {
    let mut vfs = Vfs::new();
    vfs.insert("/node_modules/pkg/index.d.ts", "");
    assert!(vfs.directory_exists("/node_modules"));
    assert!(vfs.directory_exists("/node_modules/pkg/"));
    assert!(!vfs.directory_exists("/node_modules/pk"));
    assert!(vfs.file_exists("/node_modules/pkg/index.d.ts"));
}

#[test]
fn test_insert_replaces_and_remove() {
    let mut vfs = Vfs::new();
    let path = vfs.insert("a.ts", "1");
    assert_eq!(path, "/a.ts");
    vfs.insert("/a.ts", "2");
    assert_eq!(vfs.read("/a.ts").map(|t| t.as_ref()), Some("2"));
    assert!(vfs.remove("a.ts"));
    assert!(vfs.is_empty());
}
