use super::*;
use crate::fixture::strip_markers;

fn classify_at(annotated: &str) -> Option<CompletionContext> {
    let (text, markers) = strip_markers(annotated);
    let source = SourceFile::parse("/test.ts", text);
    let loc = CompletionLocation::resolve(&source, markers[0].1);
    classify(&source, &loc)
}

fn classify_js_at(annotated: &str) -> Option<CompletionContext> {
    let (text, markers) = strip_markers(annotated);
    let source = SourceFile::parse("/test.js", text);
    let loc = CompletionLocation::resolve(&source, markers[0].1);
    classify(&source, &loc)
}

#[test]
fn test_member_access_after_dot() {
    let context = classify_at("declare const a: { b: number };\na./**/");
    assert!(matches!(
        context,
        Some(CompletionContext::Member {
            optional_chain: false,
            meaning: Meaning::VALUE,
            ..
        })
    ));
}

#[test]
fn test_optional_chain_member_access() {
    let context = classify_at("declare const a: { b: number } | undefined;\na?./**/");
    assert!(matches!(
        context,
        Some(CompletionContext::Member {
            optional_chain: true,
            ..
        })
    ));
}

#[test]
fn test_qualified_name_in_type_uses_type_meaning() {
    let context = classify_at("namespace N { export interface I {} }\nlet x: N./**/");
    let Some(CompletionContext::Member { meaning, .. }) = context else {
        panic!("expected a member context, got {context:?}");
    };
    assert!(meaning.contains(Meaning::TYPE));
    assert!(!meaning.contains(Meaning::VALUE));
}

#[test]
fn test_plain_comment_blocks_completions() {
    assert_eq!(classify_at("// note /**/\nlet a = 1;"), None);
    assert_eq!(classify_at("/* block /**/ */"), None);
}

#[test]
fn test_jsdoc_tag_after_at_sign() {
    let context = classify_at("/**\n * @/*x*/\n */\nfunction f() {}");
    assert!(matches!(context, Some(CompletionContext::JsDocTag { .. })));
}

#[test]
fn test_at_sign_inside_a_word_is_not_a_tag() {
    assert_eq!(classify_at("/** user@/*x*/ */\nfunction f() {}"), None);
}

#[test]
fn test_jsdoc_param_name_and_type_slot() {
    let name = classify_at("/**\n * @param /*x*/\n */\nfunction f(a: number) {}");
    assert!(matches!(name, Some(CompletionContext::JsDocParamName { .. })));

    let typed = classify_at("/**\n * @param {/*x*/\n */\nfunction f(a) {}");
    assert!(matches!(typed, Some(CompletionContext::JsDocType { .. })));
}

#[test]
fn test_inline_link_is_not_a_type_slot() {
    assert_eq!(classify_at("/** see {@link /*x*/ */\nfunction f() {}"), None);
}

#[test]
fn test_string_literal_context() {
    let context = classify_at("let s: \"a\" | \"b\" = \"/*x*/\";");
    assert!(matches!(context, Some(CompletionContext::StringLiteral { .. })));
}

#[test]
fn test_numeric_literal_blocks_completions() {
    assert_eq!(classify_at("let n = 12/*x*/;"), None);
}

#[test]
fn test_declaration_name_blocks_completions() {
    assert_eq!(classify_at("let ab/*x*/ = 1;"), None);
    assert_eq!(classify_at("function fo/*x*/() {}"), None);
    assert_eq!(classify_at("class Bo/*x*/ {}"), None);
}

#[test]
fn test_object_literal_positions() {
    let open = classify_at("let o: { a: number } = { /*x*/ };");
    assert!(matches!(
        open,
        Some(CompletionContext::ObjectLiteral { editing: None, .. })
    ));

    let editing = classify_at("let o: { abc: number } = { ab/*x*/ };");
    assert!(matches!(
        editing,
        Some(CompletionContext::ObjectLiteral {
            editing: Some(_),
            ..
        })
    ));
}

#[test]
fn test_binding_pattern_position() {
    let context = classify_at("declare const v: { a: number };\nconst { /*x*/ } = v;");
    assert!(matches!(context, Some(CompletionContext::BindingPattern { .. })));
}

#[test]
fn test_import_clause_positions() {
    let named = classify_at("import { /*x*/ } from \"./m\";");
    assert!(matches!(
        named,
        Some(CompletionContext::ModuleSpecifiers {
            type_only: false,
            ..
        })
    ));

    let local = classify_at("const a = 1;\nexport { /*x*/ };");
    assert!(matches!(local, Some(CompletionContext::LocalExport { .. })));
}

#[test]
fn test_class_body_position() {
    let context = classify_at("class A {}\nclass B extends A {\n  /*x*/\n}");
    assert!(matches!(context, Some(CompletionContext::ClassBody { .. })));
    assert!(context.is_some_and(|c| c.is_new_identifier_location()));
}

#[test]
fn test_modifiers_before_cursor() {
    let (text, markers) = strip_markers("class A { private static /*x*/ }");
    let source = SourceFile::parse("/test.ts", text);
    let flags = modifiers_before(&source, markers[0].1);
    assert!(flags.contains(NodeFlags::PRIVATE | NodeFlags::STATIC));
    assert!(!flags.contains(NodeFlags::READONLY));
}

#[test]
fn test_type_annotation_is_type_only() {
    let context = classify_at("let x: /*x*/");
    assert!(matches!(
        context,
        Some(CompletionContext::Global {
            type_only: true,
            keyword_filter: KeywordFilter::TypeKeywords,
            ..
        })
    ));
}

#[test]
fn test_function_body_keyword_filter() {
    let context = classify_at("function f() {\n  /*x*/\n}");
    assert!(matches!(
        context,
        Some(CompletionContext::Global {
            type_only: false,
            keyword_filter: KeywordFilter::FunctionLikeBody,
            ..
        })
    ));
    let top = classify_at("/*x*/");
    assert!(matches!(
        top,
        Some(CompletionContext::Global {
            keyword_filter: KeywordFilter::All,
            ..
        })
    ));
}

#[test]
fn test_new_identifier_after_open_paren_of_call() {
    let context = classify_at("declare function f(a: number): void;\nf(/*x*/");
    assert!(context.is_some_and(|c| c.is_new_identifier_location()));
    let after_assignment = classify_at("let v = /*x*/");
    assert!(after_assignment.is_some_and(|c| c.is_new_identifier_location()));
}

#[test]
fn test_javascript_file_classifies_like_typescript() {
    let context = classify_js_at("const a = { b: 1 };\na./**/");
    assert!(matches!(context, Some(CompletionContext::Member { .. })));
}

#[test]
fn test_trigger_characters_match_their_contexts() {
    let (text, markers) = strip_markers("import x from \"./di/*x*/\";");
    let source = SourceFile::parse("/test.ts", text);
    let loc = CompletionLocation::resolve(&source, markers[0].1);
    let context = classify(&source, &loc).expect("inside a module specifier");
    assert!(accepts_trigger(&source, &loc, &context, '/'));
    assert!(accepts_trigger(&source, &loc, &context, '"'));
    assert!(!accepts_trigger(&source, &loc, &context, '.'));
    assert!(!accepts_trigger(&source, &loc, &context, '<'));
}
