//! Module specifier completions over a virtual file tree.

mod support;

use support::Scenario;
use tsq_common::TextSpan;
use tsq_services::ScriptElementKind;

fn sorted_labels(s: &Scenario, marker: &str) -> Vec<String> {
    let response = s
        .completions(marker)
        .unwrap_or_else(|| panic!("no completions at {marker:?}"));
    let mut labels: Vec<String> = response.items.iter().map(|i| i.label.clone()).collect();
    labels.sort();
    labels
}

#[test]
fn wildcard_export_map_lists_only_mapped_files() {
    let s = Scenario::new(
        "// @filename: /node_modules/pkg/package.json\n\
         { \"name\": \"pkg\", \"exports\": { \"./*\": \"./dist/*.js\" } }\n\
         // @filename: /node_modules/pkg/dist/blah.js\nexport {};\n\
         // @filename: /node_modules/pkg/dist/index.js\nexport {};\n\
         // @filename: /node_modules/pkg/readme.js\nexport {};\n\
         // @filename: /main.ts\nimport {} from \"pkg//*m*/\";",
    );
    assert_eq!(sorted_labels(&s, "m"), vec!["blah.js", "index.js"]);
}

#[test]
fn relative_paths_list_siblings_and_folders() {
    let s = Scenario::new(
        "// @filename: /src/util.ts\nexport const u = 1;\n\
         // @filename: /src/types.d.ts\nexport type T = 1;\n\
         // @filename: /src/views/home.tsx\nexport {};\n\
         // @filename: /src/main.ts\nimport { u } from \"./u/*m*/\";",
    );
    let response = s.completions("m").expect("path completions");
    let util = response.item("util").expect("sibling file");
    assert_eq!(util.kind, ScriptElementKind::Script);
    assert_eq!(util.kind_modifiers, ".ts");
    let views = response.item("views").expect("sibling folder");
    assert_eq!(views.kind, ScriptElementKind::Directory);
    assert!(response.item("main").is_none());
    // The segment after the last slash is replaced.
    let m = s.marker("m").offset;
    assert_eq!(util.replacement_span, Some(TextSpan::from_bounds(m - 1, m)));
}

#[test]
fn nested_relative_path_replaces_last_segment_only() {
    let s = Scenario::new(
        "// @filename: /src/views/home.tsx\nexport {};\n\
         // @filename: /src/views/list.ts\nexport {};\n\
         // @filename: /src/main.ts\nimport \"./views//*m*/\";",
    );
    let response = s.completions("m").expect("path completions");
    assert_eq!(sorted_labels(&s, "m"), vec!["home", "list"]);
    let m = s.marker("m").offset;
    let home = response.item("home").expect("listed");
    assert_eq!(home.replacement_span, Some(TextSpan::new(m, 0)));
}

#[test]
fn bare_specifiers_offer_packages_and_ambient_modules() {
    let s = Scenario::new(
        "// @filename: /node_modules/lodash/index.d.ts\nexport {};\n\
         // @filename: /node_modules/@types/node/index.d.ts\nexport {};\n\
         // @filename: /ambient.d.ts\ndeclare module \"virtual-config\" {}\ndeclare module \"tools/format\" {}\n\
         // @filename: /main.ts\nimport x from \"/*m*/\";",
    );
    let response = s.completions("m").expect("path completions");
    assert_eq!(
        response.item("lodash").map(|i| i.kind),
        Some(ScriptElementKind::ExternalModuleName)
    );
    assert_eq!(
        response.item("virtual-config").map(|i| i.kind),
        Some(ScriptElementKind::ExternalModuleName)
    );
    assert_eq!(
        response.item("tools").map(|i| i.kind),
        Some(ScriptElementKind::Directory)
    );
}

#[test]
fn ambient_module_subpaths_follow_the_typed_directory() {
    let s = Scenario::new(
        "// @filename: /ambient.d.ts\ndeclare module \"tools/format\" {}\ndeclare module \"tools/parse\" {}\n\
         // @filename: /main.ts\nimport \"tools//*m*/\";",
    );
    assert_eq!(sorted_labels(&s, "m"), vec!["format", "parse"]);
}

#[test]
fn path_completions_have_no_commit_characters() {
    let s = Scenario::new(
        "// @filename: /src/a.ts\nexport {};\n// @filename: /src/main.ts\nimport \".//*m*/\";",
    );
    let response = s.completions("m").expect("path completions");
    assert!(response.default_commit_characters.is_empty());
    assert!(response.item("a").is_some());
}
