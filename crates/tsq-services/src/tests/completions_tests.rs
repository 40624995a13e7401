use super::*;
use crate::fixture::Fixture;
use crate::options::ServiceOptions;

fn complete_with(annotated: &str, trigger: Option<char>) -> Option<CompletionResponse> {
    let fixture = Fixture::new(annotated);
    let (file, offset) = fixture.marker("");
    fixture
        .project
        .snapshot()
        .completions(&file, offset, trigger, &fixture.cancel)
        .expect("completion request succeeds")
}

fn complete(annotated: &str) -> CompletionResponse {
    complete_with(annotated, None).expect("position has completions")
}

// =============================================================================
// Ordering helpers
// =============================================================================

#[test]
fn test_sort_tier_codes() {
    assert_eq!(SortTier::LocationPriority.sort_text(false), "10");
    assert_eq!(SortTier::GlobalsOrKeywords.sort_text(false), "15");
    assert_eq!(SortTier::LocalDeclarationPriority.sort_text(true), "11z");
    assert!(SortTier::LocationPriority < SortTier::JavascriptIdentifiers);
}

#[test]
fn test_compare_case_sensitive_ui() {
    assert_eq!(compare_case_sensitive_ui("apple", "Banana"), Ordering::Less);
    assert_eq!(compare_case_sensitive_ui("a", "A"), Ordering::Less);
    assert_eq!(compare_case_sensitive_ui("Abc", "abd"), Ordering::Less);
    assert_eq!(compare_case_sensitive_ui("item2", "item10"), Ordering::Less);
    assert_eq!(compare_case_sensitive_ui("ab", "abc"), Ordering::Less);
    assert_eq!(compare_case_sensitive_ui("same", "same"), Ordering::Equal);
}

#[test]
fn test_import_alias() {
    assert_eq!(imports::import_alias("my-name"), "my_name");
    assert_eq!(imports::import_alias("1st"), "_1st");
    assert_eq!(imports::import_alias("class"), "class_");
}

// =============================================================================
// Member lists
// =============================================================================

#[test]
fn test_namespace_exports_rank_ahead_of_statics() {
    let response = complete(
        "class Foo { static staticMethod(){} }\nmodule Foo { export var x; }\nFoo./**/",
    );
    assert!(response.is_member_completion);
    let x = response.item("x").expect("namespace export listed");
    let method = response.item("staticMethod").expect("static member listed");
    assert_eq!(x.sort_text, "10");
    assert_eq!(method.sort_text, "11");
    let labels = response.labels();
    let x_at = labels.iter().position(|l| *l == "x");
    let method_at = labels.iter().position(|l| *l == "staticMethod");
    assert!(x_at < method_at);
}

#[test]
fn test_private_members_hidden_outside_class() {
    let response = complete(
        "class C { private secret = 1; visible = 2; }\ndeclare const c: C;\nc./**/",
    );
    assert!(response.item("visible").is_some());
    assert!(response.item("secret").is_none());
}

#[test]
fn test_non_identifier_member_is_bracketed() {
    let response = complete("declare const o: { \"a-b\": number; ok: string };\no./**/");
    let item = response.item("a-b").expect("quoted member listed");
    assert_eq!(item.insert_text.as_deref(), Some("[\"a-b\"]"));
    assert_eq!(item.commit_characters.as_deref(), Some(&[][..]));
    assert!(item.replacement_span.is_some());
    assert!(response.item("ok").is_some_and(|i| i.insert_text.is_none()));
}

#[test]
fn test_bracketed_members_need_insert_text_option() {
    let options = ServiceOptions {
        include_completions_with_insert_text: false,
        ..ServiceOptions::default()
    };
    let fixture = Fixture::with_options("declare const o: { \"a-b\": number; ok: string };\no./**/", options);
    let (file, offset) = fixture.marker("");
    let response = fixture
        .project
        .snapshot()
        .completions(&file, offset, None, &fixture.cancel)
        .expect("request succeeds")
        .expect("completions");
    assert!(response.item("a-b").is_none());
    assert!(response.item("ok").is_some());
}

// =============================================================================
// Object literals
// =============================================================================

#[test]
fn test_object_literal_offers_missing_properties() {
    let response = complete(
        "interface Opts { name: string; size?: number; done: boolean }\n\
         const o: Opts = { done: true, /**/ };",
    );
    assert!(response.is_member_completion);
    assert_eq!(response.labels(), vec!["name", "size"]);
    assert_eq!(response.item("name").map(|i| i.sort_text.as_str()), Some("10"));
    assert_eq!(response.item("size").map(|i| i.sort_text.as_str()), Some("12"));
}

#[test]
fn test_object_literal_without_contextual_type_falls_back_to_scope() {
    let response = complete("const local = 1;\nconst o = { /**/ };");
    assert!(!response.is_member_completion);
    assert!(response.is_new_identifier_location);
    assert!(response.item("local").is_some());
}

// =============================================================================
// Identifier positions
// =============================================================================

#[test]
fn test_locals_before_keywords() {
    let response = complete("const local = 1;\nfunction helper() {}\n/**/");
    let local = response.item("local").expect("local listed");
    assert_eq!(local.sort_text, "10");
    let keyword = response.item("const").expect("keyword listed");
    assert_eq!(keyword.kind, ScriptElementKind::Keyword);
    assert_eq!(keyword.sort_text, "15");
    let labels = response.labels();
    let local_at = labels.iter().position(|l| *l == "local");
    let keyword_at = labels.iter().position(|l| *l == "const");
    assert!(local_at < keyword_at);
    assert_eq!(response.default_commit_characters, vec![".", ",", ";"]);
}

#[test]
fn test_deprecated_entries_sort_last_within_tier() {
    let response = complete(
        "/** @deprecated */\nfunction aOld() {}\nfunction bNew() {}\n/**/",
    );
    let old = response.item("aOld").expect("deprecated function listed");
    assert!(old.deprecated);
    assert_eq!(old.sort_text, "10z");
    let labels = response.labels();
    assert!(
        labels.iter().position(|l| *l == "bNew") < labels.iter().position(|l| *l == "aOld")
    );
}

#[test]
fn test_this_members_suggested_inside_methods() {
    let response = complete("class C {\n  value = 1;\n  m() {\n    /**/\n  }\n}");
    let item = response.item("value").expect("member suggested");
    assert_eq!(item.insert_text.as_deref(), Some("this.value"));
    assert_eq!(item.sort_text, SortTier::SuggestedClassMembers.sort_text(false));
}

#[test]
fn test_type_position_offers_types_only() {
    let response = complete("interface Shape {}\nconst value = 1;\nlet s: /**/");
    assert!(response.item("Shape").is_some());
    assert!(response.item("value").is_none());
    assert!(response.item("string").is_some());
    assert!(response.item("const").is_none());
}

#[test]
fn test_new_identifier_location_has_no_commit_characters() {
    let response = complete("const a = 1;\nlet b = /**/");
    assert!(response.is_new_identifier_location);
    assert!(response.default_commit_characters.is_empty());
}

#[test]
fn test_no_completions_inside_comment_or_declaration_name() {
    assert_eq!(complete_with("// hello /**/", None), None);
    assert_eq!(complete_with("let na/**/ = 1;", None), None);
}

#[test]
fn test_dot_trigger_outside_member_access_is_ignored() {
    assert_eq!(complete_with("const a = 1;\nlet b = /**/", Some('.')), None);
}

#[test]
fn test_replacement_span_covers_the_word() {
    let response = complete("const counter = 1;\ncou/**/nt");
    let item = response.item("counter").expect("listed");
    let span = item.replacement_span.expect("word is replaced");
    assert_eq!(span.length, "count".len() as u32);
    let edit = item.text_edit.as_ref().expect("edit mirrors span");
    assert_eq!(edit.new_text, "counter");
    assert_eq!(edit.range.start.line, 1);
}

// =============================================================================
// Import clauses and JSDoc
// =============================================================================

#[test]
fn test_import_specifiers_skip_listed_names() {
    let response = complete(
        "// @filename: /m.ts\nexport const a = 1;\nexport function b() {}\nexport interface T {}\n\
         // @filename: /test.ts\nimport { a, /**/ } from \"./m\";",
    );
    let labels = response.labels();
    assert!(labels.contains(&"b"));
    assert!(labels.contains(&"T"));
    assert!(!labels.contains(&"a"));
    assert!(labels.contains(&"type"));
}

#[test]
fn test_type_only_import_offers_types() {
    let response = complete(
        "// @filename: /m.ts\nexport const a = 1;\nexport interface T {}\n\
         // @filename: /test.ts\nimport type { /**/ } from \"./m\";",
    );
    assert_eq!(response.labels(), vec!["T"]);
}

#[test]
fn test_jsdoc_tags_depend_on_documented_declaration() {
    let on_function = complete("/**\n * @/**/\n */\nfunction f(a: number) {}");
    assert!(on_function.item("param").is_some());
    assert!(on_function.item("returns").is_some());
    assert!(on_function.item("augments").is_none());

    let on_class = complete("/**\n * @/**/\n */\nclass K {}");
    assert!(on_class.item("augments").is_some());
    assert!(on_class.item("param").is_none());
}

#[test]
fn test_jsdoc_param_names_skip_documented_parameters() {
    let response = complete(
        "/**\n * @param first the first\n * @param /**/\n */\nfunction f(first: number, second: string) {}",
    );
    assert_eq!(response.labels(), vec!["second"]);
    assert_eq!(
        response.item("second").map(|i| i.kind),
        Some(ScriptElementKind::Parameter)
    );
}

#[test]
fn test_javascript_file_adds_bare_identifiers() {
    let response = complete(
        "// @filename: /app.js\nconst obj = {};\nobj.foo = 1;\nsomething.bar();\n/**/",
    );
    let bare = response.item("something").expect("identifier from the file");
    assert_eq!(bare.sort_text, SortTier::JavascriptIdentifiers.sort_text(false));
    assert_eq!(bare.kind, ScriptElementKind::Warning);
}
