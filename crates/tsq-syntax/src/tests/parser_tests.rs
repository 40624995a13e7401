use crate::{NodeFlags, NodeIndex, SourceFile, SyntaxKind};

fn parse(source: &str) -> SourceFile {
    SourceFile::parse("test.ts", source)
}

/// First node of `kind` in source order.
fn first_of(file: &SourceFile, kind: SyntaxKind) -> NodeIndex {
    let mut stack = vec![file.root];
    while let Some(idx) = stack.pop() {
        if file.arena.kind(idx) == kind {
            return idx;
        }
        let children: Vec<_> = file.arena.children(idx).collect();
        stack.extend(children.into_iter().rev());
    }
    NodeIndex::NONE
}

fn statement(file: &SourceFile, index: usize) -> NodeIndex {
    file.arena.statements(file.root)[index]
}

#[test]
fn test_variable_statement_layout() {
    let file = parse("const x: number = 1;");
    let arena = &file.arena;
    let stmt = statement(&file, 0);
    assert_eq!(arena.kind(stmt), SyntaxKind::VariableStatement);
    assert!(arena.flags(stmt).contains(NodeFlags::CONST));
    let decl = arena.declarations(stmt)[0];
    assert_eq!(arena.text(arena.name(decl)), "x");
    let type_node = arena.type_node(decl);
    assert_eq!(arena.kind(type_node), SyntaxKind::KeywordType);
    assert_eq!(arena.text(type_node), "number");
    assert_eq!(arena.kind(arena.initializer(decl)), SyntaxKind::NumericLiteral);
    assert_eq!(arena.parent(arena.name(decl)), decl);
    assert_eq!(file.node_text(stmt), "const x: number = 1;");
}

#[test]
fn test_function_declaration_signature() {
    let file = parse("function foo<T>(a: number, b?: string): void {}");
    let arena = &file.arena;
    let func = statement(&file, 0);
    assert_eq!(arena.kind(func), SyntaxKind::FunctionDeclaration);
    assert_eq!(arena.type_parameters(func).len(), 1);
    let params = arena.parameters(func);
    assert_eq!(params.len(), 2);
    assert!(arena.flags(params[1]).contains(NodeFlags::OPTIONAL));
    assert_eq!(arena.text(arena.type_node(func)), "void");
    assert_eq!(arena.kind(arena.body(func)), SyntaxKind::Block);
}

#[test]
fn test_class_members() {
    let file = parse(
        "class Foo extends Base implements I {
            static bar() {}
            x = 1;
            #secret?: string;
            constructor(public y: number) {}
            get z() { return 1; }
        }",
    );
    let arena = &file.arena;
    let class = statement(&file, 0);
    let kinds: Vec<_> = arena.members(class).iter().map(|&m| arena.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::MethodDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::Constructor,
            SyntaxKind::GetAccessor,
        ]
    );
    let members = arena.members(class);
    assert!(arena.flags(members[0]).contains(NodeFlags::STATIC));
    assert_eq!(arena.kind(arena.name(members[2])), SyntaxKind::PrivateIdentifier);
    assert!(arena.flags(members[2]).contains(NodeFlags::OPTIONAL));
    let ctor_param = arena.parameters(members[3])[0];
    assert!(arena.flags(ctor_param).contains(NodeFlags::PUBLIC));
    assert_eq!(arena.kind(arena.extends_clause(class)), SyntaxKind::HeritageClause);
    assert_eq!(arena.kind(arena.implements_clause(class)), SyntaxKind::HeritageClause);
}

#[test]
fn test_modifier_words_as_member_names() {
    let file = parse("class C { static: number; get() {} readonly = 1; }");
    let arena = &file.arena;
    let members = arena.members(statement(&file, 0));
    assert_eq!(members.len(), 3);
    assert_eq!(arena.text(arena.name(members[0])), "static");
    assert_eq!(arena.kind(members[1]), SyntaxKind::MethodDeclaration);
    assert_eq!(arena.text(arena.name(members[1])), "get");
    assert_eq!(arena.text(arena.name(members[2])), "readonly");
}

#[test]
fn test_interface_members() {
    let file = parse(
        "interface I<T> extends J {
            (x: T): void;
            new (): I<T>;
            [key: string]: any;
            readonly name?: string;
            method(): T
        }",
    );
    let arena = &file.arena;
    let iface = statement(&file, 0);
    let kinds: Vec<_> = arena.members(iface).iter().map(|&m| arena.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::CallSignature,
            SyntaxKind::ConstructSignature,
            SyntaxKind::IndexSignature,
            SyntaxKind::PropertySignature,
            SyntaxKind::MethodSignature,
        ]
    );
    let property = arena.members(iface)[3];
    assert!(arena.flags(property).contains(NodeFlags::READONLY | NodeFlags::OPTIONAL));
}

#[test]
fn test_import_forms() {
    let file = parse(r#"import d, { a as b, type C } from "./m";"#);
    let arena = &file.arena;
    let import = statement(&file, 0);
    let clause = arena.import_clause(import);
    assert_eq!(arena.text(arena.name(clause)), "d");
    let specifiers = arena.elements(arena.named_bindings(clause));
    assert_eq!(specifiers.len(), 2);
    assert_eq!(arena.text(arena.name(specifiers[0])), "b");
    assert_eq!(arena.text(arena.property_name(specifiers[0])), "a");
    assert!(arena.flags(specifiers[1]).contains(NodeFlags::TYPE_ONLY));
    assert_eq!(arena.text(arena.name(specifiers[1])), "C");
    assert_eq!(arena.text(arena.module_specifier(import)), "./m");
}

#[test]
fn test_type_keyword_as_specifier_name() {
    let file = parse(r#"import { type } from "m"; import type { T } from "m";"#);
    let arena = &file.arena;
    let first = arena.import_clause(statement(&file, 0));
    let specifier = arena.elements(arena.named_bindings(first))[0];
    assert_eq!(arena.text(arena.name(specifier)), "type");
    assert!(!arena.flags(specifier).contains(NodeFlags::TYPE_ONLY));
    let second = arena.import_clause(statement(&file, 1));
    assert!(arena.flags(second).contains(NodeFlags::TYPE_ONLY));
}

#[test]
fn test_import_equals_and_namespace_import() {
    let file = parse(r#"import fs = require("fs"); import * as path from "path"; import A = N.M;"#);
    let arena = &file.arena;
    let equals = statement(&file, 0);
    assert_eq!(arena.kind(equals), SyntaxKind::ImportEqualsDeclaration);
    assert_eq!(arena.text(arena.module_specifier(equals)), "fs");
    let ns = arena.named_bindings(arena.import_clause(statement(&file, 1)));
    assert_eq!(arena.kind(ns), SyntaxKind::NamespaceImport);
    assert_eq!(arena.text(arena.name(ns)), "path");
    let alias = statement(&file, 2);
    assert_eq!(arena.kind(arena.module_reference(alias)), SyntaxKind::QualifiedName);
}

#[test]
fn test_export_forms() {
    let file = parse(
        r#"export default class {}
export = foo;
export * as ns from "x";
export { a as b };
export const c = 1;"#,
    );
    let arena = &file.arena;
    let class = statement(&file, 0);
    assert_eq!(arena.kind(class), SyntaxKind::ClassDeclaration);
    assert!(arena.flags(class).contains(NodeFlags::EXPORT | NodeFlags::DEFAULT));
    assert!(arena.name(class).is_none());
    assert!(arena.flags(statement(&file, 1)).contains(NodeFlags::EXPORT_EQUALS));
    let star = statement(&file, 2);
    assert_eq!(arena.kind(arena.export_clause(star)), SyntaxKind::NamespaceExport);
    let named = statement(&file, 3);
    assert_eq!(arena.kind(arena.export_clause(named)), SyntaxKind::NamedExports);
    let var = statement(&file, 4);
    assert!(arena.flags(var).contains(NodeFlags::EXPORT));
    assert!(arena.flags(arena.declarations(var)[0]).contains(NodeFlags::EXPORT));
    assert!(file.is_external_module());
}

#[test]
fn test_arrow_functions() {
    let file = parse("const f = async (a, b: number) => a; const g = x => x * 2;");
    let arena = &file.arena;
    let f = arena.initializer(arena.declarations(statement(&file, 0))[0]);
    assert_eq!(arena.kind(f), SyntaxKind::ArrowFunction);
    assert!(arena.flags(f).contains(NodeFlags::ASYNC));
    assert_eq!(arena.parameters(f).len(), 2);
    let g = arena.initializer(arena.declarations(statement(&file, 1))[0]);
    assert_eq!(arena.kind(g), SyntaxKind::ArrowFunction);
    assert_eq!(arena.kind(arena.body(g)), SyntaxKind::BinaryExpression);
}

#[test]
fn test_parenthesized_expression_is_not_an_arrow() {
    let file = parse("const v = (a + b) * c;");
    let arena = &file.arena;
    let init = arena.initializer(arena.declarations(statement(&file, 0))[0]);
    assert_eq!(arena.kind(init), SyntaxKind::BinaryExpression);
    assert_eq!(arena.kind(arena.left(init)), SyntaxKind::ParenthesizedExpression);
}

#[test]
fn test_generic_call_and_new() {
    let file = parse("foo<string>(1); new Bar<number>(2, 3); a < b;");
    let arena = &file.arena;
    let call = first_of(&file, SyntaxKind::CallExpression);
    assert_eq!(arena.type_arguments(call).len(), 1);
    assert_eq!(arena.arguments(call).len(), 1);
    let new = first_of(&file, SyntaxKind::NewExpression);
    assert_eq!(arena.arguments(new).len(), 2);
    let compare = arena.expression(statement(&file, 2));
    assert_eq!(arena.kind(compare), SyntaxKind::BinaryExpression);
    assert_eq!(arena.get(compare).map(|n| n.op), Some(SyntaxKind::LessThan));
}

#[test]
fn test_binary_precedence() {
    let file = parse("1 + 2 * 3; a >> b; x = y ?? z;");
    let arena = &file.arena;
    let sum = arena.expression(statement(&file, 0));
    assert_eq!(arena.get(sum).map(|n| n.op), Some(SyntaxKind::Plus));
    let product = arena.right(sum);
    assert_eq!(arena.get(product).map(|n| n.op), Some(SyntaxKind::Asterisk));
    let shift = arena.expression(statement(&file, 1));
    assert_eq!(arena.get(shift).map(|n| n.op), Some(SyntaxKind::GreaterThanGreaterThan));
    let assign = arena.expression(statement(&file, 2));
    assert_eq!(arena.get(assign).map(|n| n.op), Some(SyntaxKind::Equals));
}

#[test]
fn test_template_and_regex() {
    let file = parse("const t = `a${x}b${y}c`; const r = /ab+c/g;");
    let arena = &file.arena;
    let template = first_of(&file, SyntaxKind::TemplateExpression);
    let children: Vec<_> = arena.children(template).collect();
    assert_eq!(children.len(), 3);
    let last_literal = arena.child(children[2], 1);
    assert_eq!(arena.kind(last_literal), SyntaxKind::TemplateTail);
    assert_eq!(arena.text(last_literal), "c");
    assert!(first_of(&file, SyntaxKind::RegularExpressionLiteral).is_some());
}

#[test]
fn test_optional_chain_and_element_access() {
    let file = parse("a?.b; c[\"d\"];");
    let arena = &file.arena;
    let access = first_of(&file, SyntaxKind::PropertyAccessExpression);
    assert!(arena.flags(access).contains(NodeFlags::OPTIONAL_CHAIN));
    let element = first_of(&file, SyntaxKind::ElementAccessExpression);
    assert_eq!(arena.text(arena.argument_expression(element)), "d");
}

#[test]
fn test_object_literal_members() {
    let file = parse("const o = { a: 1, b, ...c, m() {}, get g() { return 1; }, 'q': 2 };");
    let arena = &file.arena;
    let literal = first_of(&file, SyntaxKind::ObjectLiteralExpression);
    let kinds: Vec<_> = arena.members(literal).iter().map(|&m| arena.kind(m)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PropertyAssignment,
            SyntaxKind::ShorthandPropertyAssignment,
            SyntaxKind::SpreadAssignment,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::GetAccessor,
            SyntaxKind::PropertyAssignment,
        ]
    );
}

#[test]
fn test_binding_patterns() {
    let file = parse("const { a, b: [c, , d], ...rest } = obj;");
    let arena = &file.arena;
    let pattern = first_of(&file, SyntaxKind::ObjectBindingPattern);
    let elements = arena.elements(pattern);
    assert_eq!(elements.len(), 3);
    assert_eq!(arena.text(arena.property_name(elements[1])), "b");
    let inner = arena.name(elements[1]);
    assert_eq!(arena.kind(inner), SyntaxKind::ArrayBindingPattern);
    assert_eq!(arena.elements(inner).len(), 3);
    assert!(arena.flags(elements[2]).contains(NodeFlags::REST));
}

#[test]
fn test_nested_namespace() {
    let file = parse("namespace A.B { export const x = 1; }");
    let arena = &file.arena;
    let outer = statement(&file, 0);
    let inner = arena.body(outer);
    assert_eq!(arena.kind(inner), SyntaxKind::ModuleDeclaration);
    assert!(arena.flags(inner).contains(NodeFlags::EXPORT));
    assert_eq!(arena.text(arena.name(inner)), "B");
    assert_eq!(arena.kind(arena.body(inner)), SyntaxKind::ModuleBlock);
}

#[test]
fn test_types() {
    let file = parse(
        "type T = keyof A | B[] | [string, number?] | (x: number) => void | { a: 1 } | `p${string}` | -1;",
    );
    let arena = &file.arena;
    let alias = statement(&file, 0);
    let union = arena.type_node(alias);
    assert_eq!(arena.kind(union), SyntaxKind::UnionType);
    let kinds: Vec<_> = arena.elements(union).iter().map(|&t| arena.kind(t)).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::TypeOperator,
            SyntaxKind::ArrayType,
            SyntaxKind::TupleType,
            SyntaxKind::FunctionType,
        ]
    );
}

#[test]
fn test_statement_tokens_are_recorded() {
    let file = parse("let a = 1;");
    let kinds: Vec<_> = file.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::Equals,
            SyntaxKind::NumericLiteral,
            SyntaxKind::Semicolon,
            SyntaxKind::EndOfFile,
        ]
    );
}

#[test]
fn test_control_flow_statements() {
    let file = parse(
        "if (a) { b(); } else c();
for (const x of xs) {}
for (let i = 0; i < 1; i++) {}
while (x) break;
try { } catch (e) { } finally { }
switch (k) { case 1: f(); break; default: g(); }",
    );
    let arena = &file.arena;
    let kinds: Vec<_> = arena
        .statements(file.root)
        .iter()
        .map(|&s| arena.kind(s))
        .collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::IfStatement,
            SyntaxKind::ForOfStatement,
            SyntaxKind::ForStatement,
            SyntaxKind::WhileStatement,
            SyntaxKind::TryStatement,
            SyntaxKind::Block,
        ]
    );
}
