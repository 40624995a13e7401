//! Completion scenarios run through the request boundary.

mod support;

use support::{Scenario, position_of};
use tsq_services::{ScriptElementKind, ServiceOptions, SortTier};

#[test]
fn merged_class_and_namespace_rank_exports_first() {
    let s = Scenario::new(
        "class Foo { static staticMethod(){} }\nmodule Foo { export var x; }\nFoo./*m*/",
    );
    let response = s.verify_completions_include("m", &["x", "staticMethod"]);
    assert!(position_of(&response, "x") < position_of(&response, "staticMethod"));
}

#[test]
fn object_literal_orders_required_then_optional_then_spread() {
    let s = Scenario::new(
        "interface Config { zeta: number; alpha: string; beta?: boolean; gamma?: number; delta: number }\n\
         const base = { delta: 1 };\n\
         const c: Config = { ...base, zeta: 1, /*m*/ };",
    );
    let response = s.completions("m").expect("object literal completions");
    assert_eq!(response.labels(), vec!["alpha", "beta", "gamma", "delta"]);
    let tiers: Vec<&str> = response.items.iter().map(|i| i.sort_text.as_str()).collect();
    assert_eq!(
        tiers,
        vec![
            SortTier::LocationPriority.code(),
            SortTier::OptionalMember.code(),
            SortTier::OptionalMember.code(),
            SortTier::MemberDeclaredBySpread.code(),
        ]
    );
}

#[test]
fn binding_pattern_skips_bound_names() {
    let s = Scenario::new(
        "declare const point: { x: number; y: number; z: number };\nconst { x, /*m*/ } = point;",
    );
    let response = s.completions("m").expect("binding pattern completions");
    assert_eq!(response.labels(), vec!["y", "z"]);
}

#[test]
fn union_members_through_optional_chain() {
    let s = Scenario::new(
        "interface A { shared: number; onlyA: string }\ninterface B { shared: number; onlyB: string }\n\
         declare const both: A | B;\ndeclare const maybe: A | B | undefined;\n\
         both./*plain*/;\nmaybe?./*chain*/;",
    );
    s.verify_completions_include("plain", &["shared"]);
    s.verify_completions_exclude("plain", &["onlyA", "onlyB"]);
    s.verify_completions_include("chain", &["shared", "onlyA", "onlyB"]);
}

#[test]
fn string_literal_union_members() {
    let s = Scenario::new(
        "type Mode = \"read\" | \"write\" | 42;\nfunction open(mode: Mode) {}\nopen(\"/*m*/\");",
    );
    let response = s.completions("m").expect("literal completions");
    assert_eq!(response.labels(), vec!["read", "write"]);
    let item = response.item("read").expect("listed");
    assert_eq!(item.kind, ScriptElementKind::String);
    // Only the contents between the quotes are replaced.
    let span = item.replacement_span.expect("contents replaced");
    assert_eq!(span.start, s.marker("m").offset);
    assert_eq!(span.length, 0);
}

#[test]
fn template_literal_target_filters_literal_values() {
    let s = Scenario::new(
        "declare function pick(key: (\"ab\" | \"xb\") & `a${string}`): void;\npick(\"/*m*/\");",
    );
    let response = s.completions("m").expect("string literal completions");
    assert_eq!(response.labels(), vec!["ab"]);
}

#[test]
fn template_literal_constraint_checks_prefix_and_suffix() {
    let s = Scenario::new(
        "type Event = \"onClick\" | \"onKeyUp\" | \"clickHandler\" | \"onLoaded\";\n\
         type Handler<K extends Event & `on${string}Up` | Event & `on${string}ed`> = K;\n\
         type H = Handler<\"/*m*/\">;",
    );
    let response = s.completions("m").expect("type argument completions");
    assert_eq!(response.labels(), vec!["onKeyUp", "onLoaded"]);
}

#[test]
fn template_literal_with_literal_holes_expands() {
    let s = Scenario::new(
        "type Size = `${\"sm\" | \"lg\"}-${1 | 2}`;\nlet size: Size = \"/*m*/\";",
    );
    let response = s.completions("m").expect("template expansion completions");
    assert_eq!(response.labels(), vec!["lg-1", "lg-2", "sm-1", "sm-2"]);
}

#[test]
fn element_access_offers_property_names() {
    let s = Scenario::new("declare const o: { first: 1; second: 2 };\no[\"/*m*/\"];");
    s.verify_completions_include("m", &["first", "second"]);
}

#[test]
fn private_and_protected_members_respect_their_scope() {
    let s = Scenario::new(
        "class Base {\n  private hidden = 1;\n  protected shared = 2;\n  #secret = 3;\n  m() { this./*inside*/; }\n}\n\
         class Derived extends Base { n() { this./*derived*/; } }\n\
         new Base()./*outside*/;",
    );
    s.verify_completions_include("inside", &["hidden", "shared", "#secret"]);
    s.verify_completions_include("derived", &["shared"]);
    s.verify_completions_exclude("derived", &["hidden", "#secret"]);
    s.verify_completions_exclude("outside", &["hidden", "shared", "#secret"]);
}

#[test]
fn quoted_member_insertion_follows_quote_preference() {
    let options = ServiceOptions {
        quote_preference: tsq_services::QuotePreference::Single,
        ..ServiceOptions::default()
    };
    let s = Scenario::with_options(
        "declare const headers: { \"content-type\": string; 0: number };\nheaders./*m*/",
        options,
    );
    let response = s.completions("m").expect("member completions");
    let quoted = response.item("content-type").expect("quoted member");
    assert_eq!(quoted.insert_text.as_deref(), Some("['content-type']"));
    let index = response.item("0").expect("numeric member");
    assert_eq!(index.insert_text.as_deref(), Some("[0]"));
    assert_eq!(index.filter_text.as_deref(), Some(".0"));
}

#[test]
fn import_specifiers_alias_non_identifier_exports() {
    let s = Scenario::new(
        "// @filename: /m.ts\nconst v = 1;\nexport { v as \"my value\" };\nexport const plain = 2;\n\
         // @filename: /test.ts\nimport { /*m*/ } from \"./m\";",
    );
    let response = s.verify_completions_include("m", &["plain", "my value"]);
    let aliased = response.item("my value").expect("listed");
    assert_eq!(aliased.insert_text.as_deref(), Some("\"my value\" as my_value"));
}

#[test]
fn jsdoc_type_slot_offers_types() {
    let s = Scenario::new(
        "interface Shape {}\n/**\n * @param {/*m*/} s\n */\nfunction draw(s) {}",
    );
    s.verify_completions_include("m", &["Shape", "string"]);
}

#[test]
fn regular_expressions_and_comments_take_no_completions() {
    let s = Scenario::new("const re = /ab/*r*/c/;\n// note /*c*/\nlet t = 1;");
    s.verify_no_completions("r");
    s.verify_no_completions("c");
}

#[test]
fn dangling_dot_in_unterminated_source() {
    let s = Scenario::new("const value = { length: 1 };\nfunction f() {\n  value./*m*/");
    s.verify_completions_include("m", &["length"]);
}

#[test]
fn member_access_at_end_of_file() {
    let s = Scenario::new("const o = { x: 1 };\no./*m*/");
    let response = s.completions("m").expect("member completions at end of file");
    assert!(response.is_member_completion);
    assert_eq!(response.labels(), vec!["x"]);
}

#[test]
fn unterminated_string_still_completes() {
    let s = Scenario::new("type Mode = \"on\" | \"off\";\nlet m: Mode = \"o/*m*/");
    s.verify_completions_include("m", &["on", "off"]);
}

#[test]
fn class_body_offers_inherited_members_and_modifiers() {
    let s = Scenario::new(
        "class Base { greet() {} protected count = 0; private hidden = 1; }\n\
         class Derived extends Base {\n  greet() {}\n  /*m*/\n}",
    );
    let response = s.verify_completions_include("m", &["count", "private", "static"]);
    assert!(response.item("greet").is_none());
    assert!(response.item("hidden").is_none());
    assert!(response.is_new_identifier_location);
}

#[test]
fn completion_then_edit_is_reproducible_from_a_fresh_project() {
    let s = Scenario::new("const counter = 1;\ncou/*m*/");
    let response = s.completions("m").expect("completions");
    let item = response.item("counter").expect("listed");
    let span = item.replacement_span.expect("word replaced");

    let snapshot = s.project.snapshot();
    let mut edited = snapshot.vfs().read("/test.ts").expect("file exists").to_string();
    edited.replace_range(span.start as usize..span.end() as usize, &item.label);
    edited.push('.');

    let after_edit = s.project.update_file("/test.ts", &edited);
    let fresh = Scenario::new(&format!("{edited}/*m*/"));
    let offset = edited.len() as u32;
    let from_edit = after_edit
        .completions("/test.ts", offset, None, &s.cancel)
        .expect("request succeeds");
    let from_fresh = fresh.completions("m");
    assert_eq!(from_edit, from_fresh);
}
