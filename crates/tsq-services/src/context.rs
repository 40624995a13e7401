//! Completion context classification.
//!
//! A completion request is first placed into exactly one syntactic
//! situation. The checks run in a fixed order: comments, literal tokens,
//! member access, definition locations, object literals and binding
//! patterns, import/export clauses, type member bodies, and finally the
//! general identifier position. Incomplete source (a dangling dot, an
//! unterminated string or list) is an ordinary input for every branch.

use tsq_checker::Meaning;
use tsq_common::TextSpan;
use tsq_common::limits::MAX_ANCESTOR_WALK;
use tsq_syntax::{CommentKind, CommentRange, NodeArena, NodeFlags, NodeIndex, SourceFile, SyntaxKind, Token, TokenFlags};

use crate::completions::keywords::KeywordFilter;
use crate::position::{CompletionLocation, node_of_token, previous_token, token_at, token_text};

/// The situation a completion request sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// `a.|`, `a?.|` or `N.|` in a type.
    Member {
        access: NodeIndex,
        object: NodeIndex,
        optional_chain: bool,
        /// Declaration spaces the member must live in.
        meaning: Meaning,
    },
    /// A property name position inside an object literal.
    ObjectLiteral {
        literal: NodeIndex,
        /// Member whose name is being typed, excluded from "already present".
        editing: Option<NodeIndex>,
    },
    /// `const { | } = value`.
    BindingPattern {
        pattern: NodeIndex,
        editing: Option<NodeIndex>,
    },
    /// `import { | } from "m"` or `export { | } from "m"`.
    ModuleSpecifiers {
        declaration: NodeIndex,
        list: NodeIndex,
        editing: Option<NodeIndex>,
        type_only: bool,
    },
    /// `export { | }` without a module specifier.
    LocalExport {
        list: NodeIndex,
        editing: Option<NodeIndex>,
    },
    /// Inside the quotes of a string literal or no-substitution template.
    StringLiteral { literal: NodeIndex },
    /// `@|` inside a documentation comment.
    JsDocTag {
        comment: CommentRange,
        replacement: TextSpan,
    },
    /// `@param |` inside a documentation comment.
    JsDocParamName {
        comment: CommentRange,
        replacement: TextSpan,
    },
    /// Inside the `{...}` type slot of a documentation tag.
    JsDocType { replacement: TextSpan },
    /// Between the members of a class body.
    ClassBody {
        class: NodeIndex,
        /// Modifiers already written before the cursor.
        modifiers: NodeFlags,
    },
    /// Positions that only offer a fixed keyword set: interface and type
    /// literal members, constructor parameters.
    Keywords { filter: KeywordFilter },
    /// An identifier position resolved through scope.
    Global {
        type_only: bool,
        keyword_filter: KeywordFilter,
        new_identifier: bool,
    },
}

impl CompletionContext {
    pub fn is_new_identifier_location(&self) -> bool {
        match self {
            CompletionContext::Global { new_identifier, .. } => *new_identifier,
            CompletionContext::ClassBody { .. }
            | CompletionContext::Keywords { .. }
            | CompletionContext::JsDocParamName { .. } => true,
            _ => false,
        }
    }
}

const CLASS_MEMBER_MODIFIERS: &[(&str, NodeFlags)] = &[
    ("public", NodeFlags::PUBLIC),
    ("private", NodeFlags::PRIVATE),
    ("protected", NodeFlags::PROTECTED),
    ("static", NodeFlags::STATIC),
    ("readonly", NodeFlags::READONLY),
    ("abstract", NodeFlags::ABSTRACT),
    ("override", NodeFlags::OVERRIDE),
    ("async", NodeFlags::ASYNC),
    ("declare", NodeFlags::AMBIENT),
    ("accessor", NodeFlags::empty()),
];

/// Keywords after which the next word names a new declaration.
const DECLARATION_KEYWORDS: &[&str] = &[
    "var", "let", "const", "function", "class", "interface", "enum", "namespace", "module", "type",
];

/// Classify `loc`. `None` marks a position where completions must not be
/// offered at all.
pub fn classify(source: &SourceFile, loc: &CompletionLocation) -> Option<CompletionContext> {
    let offset = loc.offset;
    if let Some(comment) = source.comment_containing(offset) {
        return classify_comment(source, comment, offset);
    }
    if let Some(context) = classify_literal_token(source, offset) {
        return context;
    }
    if let Some(context) = classify_member_access(source, loc) {
        return context;
    }
    if is_definition_location(source, loc) {
        return None;
    }
    if let Some(context) = classify_object_like(source, loc) {
        return Some(context);
    }
    if let Some(context) = classify_module_clause(source, loc) {
        return Some(context);
    }
    if let Some(context) = classify_member_body(source, loc) {
        return Some(context);
    }
    Some(classify_global(source, loc))
}

/// Whether a completion request triggered by `trigger` makes sense in
/// `context`.
pub fn accepts_trigger(
    source: &SourceFile,
    loc: &CompletionLocation,
    context: &CompletionContext,
    trigger: char,
) -> bool {
    match trigger {
        '.' => matches!(context, CompletionContext::Member { .. }),
        '"' | '\'' | '`' => matches!(context, CompletionContext::StringLiteral { .. }),
        '/' => match context {
            CompletionContext::StringLiteral { literal } => {
                tsq_checker::checker::is_module_specifier(&source.arena, *literal)
            }
            _ => false,
        },
        '@' => matches!(context, CompletionContext::JsDocTag { .. }),
        '#' => match context {
            CompletionContext::Member { .. } | CompletionContext::ClassBody { .. } => true,
            _ => loc.word.is_some_and(|w| w.kind == SyntaxKind::PrivateIdentifier),
        },
        ' ' => {
            matches!(context, CompletionContext::JsDocParamName { .. })
                || matches!(
                    loc.context_text(source),
                    "import" | "new" | "extends" | "implements" | "from" | "type"
                )
        }
        '<' => false,
        _ => true,
    }
}

// =============================================================================
// Comments and literal tokens
// =============================================================================

fn classify_comment(
    source: &SourceFile,
    comment: &CommentRange,
    offset: u32,
) -> Option<CompletionContext> {
    if comment.kind != CommentKind::Doc {
        return None;
    }
    let before = source.slice(TextSpan::from_bounds(comment.pos, offset));
    let word_len = before
        .chars()
        .rev()
        .take_while(|&c| tsq_syntax::kind::is_identifier_part(c))
        .map(char::len_utf8)
        .sum::<usize>();
    let word_start = offset - word_len as u32;
    let replacement = TextSpan::from_bounds(word_start, offset);
    let head = &before[..before.len() - word_len];

    if let Some(open) = head.rfind('{')
        && !head[open..].contains('}')
    {
        // `{@link ...}` is inline text, not a type slot.
        if head[open + 1..].starts_with('@') {
            return None;
        }
        return Some(CompletionContext::JsDocType { replacement });
    }

    if let Some(at_head) = head.strip_suffix('@') {
        let preceded_by_gutter = at_head
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || c == '*');
        return preceded_by_gutter.then_some(CompletionContext::JsDocTag {
            comment: *comment,
            replacement,
        });
    }

    let line = head.rsplit('\n').next().unwrap_or(head);
    let line = line.trim_start().trim_start_matches('*').trim_start();
    let after_tag = ["@param", "@arg", "@argument"]
        .iter()
        .find_map(|tag| line.strip_prefix(tag))?;
    if !after_tag.starts_with(char::is_whitespace) {
        return None;
    }
    let mut rest = after_tag.trim_start();
    if rest.starts_with('{') {
        let close = rest.find('}')?;
        rest = rest[close + 1..].trim_start();
    }
    rest.is_empty().then_some(CompletionContext::JsDocParamName {
        comment: *comment,
        replacement,
    })
}

/// `Some(ctx)` when the offset is inside a literal token: a completable
/// string, or `Some(None)` for literal text that takes no completions.
fn classify_literal_token(source: &SourceFile, offset: u32) -> Option<Option<CompletionContext>> {
    let token = literal_token_at(source, offset)?;
    match token.kind {
        SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => {
            let literal = node_of_token(source, &token);
            Some(Some(CompletionContext::StringLiteral { literal }))
        }
        _ => Some(None),
    }
}

fn literal_token_at(source: &SourceFile, offset: u32) -> Option<Token> {
    if let Some(token) = token_at(source, offset)
        && token.pos < offset
        && is_literal_text_token(token.kind)
    {
        return Some(token);
    }
    let previous = previous_token(source, offset).filter(|t| t.end == offset)?;
    let at_open_end = previous.flags.contains(TokenFlags::UNTERMINATED)
        && is_literal_text_token(previous.kind);
    let numeric = matches!(
        previous.kind,
        SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral | SyntaxKind::RegularExpressionLiteral
    );
    (at_open_end || numeric).then_some(previous)
}

fn is_literal_text_token(kind: SyntaxKind) -> bool {
    kind.is_string_literal_like()
        || kind.is_template_part()
        || matches!(
            kind,
            SyntaxKind::RegularExpressionLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
        )
}

// =============================================================================
// Member access
// =============================================================================

fn classify_member_access(
    source: &SourceFile,
    loc: &CompletionLocation,
) -> Option<Option<CompletionContext>> {
    let dot = loc
        .context_token
        .filter(|t| matches!(t.kind, SyntaxKind::Dot | SyntaxKind::QuestionDot))?;
    let arena = &source.arena;
    let access = loc.context_node;
    let context = match arena.kind(access) {
        SyntaxKind::PropertyAccessExpression => CompletionContext::Member {
            access,
            object: arena.expression(access),
            optional_chain: dot.kind == SyntaxKind::QuestionDot,
            meaning: Meaning::VALUE,
        },
        SyntaxKind::QualifiedName => {
            let in_type_query = bounded_ancestors(arena, access)
                .any(|a| arena.kind(a) == SyntaxKind::TypeQuery);
            let in_import_equals = bounded_ancestors(arena, access)
                .any(|a| arena.kind(a) == SyntaxKind::ImportEqualsDeclaration);
            let meaning = if in_type_query {
                Meaning::VALUE | Meaning::NAMESPACE
            } else if in_import_equals {
                Meaning::ALL
            } else {
                Meaning::TYPE | Meaning::NAMESPACE
            };
            CompletionContext::Member {
                access,
                object: arena.left(access),
                optional_chain: false,
                meaning,
            }
        }
        _ => return Some(None),
    };
    Some(Some(context))
}

// =============================================================================
// Definition locations
// =============================================================================

/// The cursor names a new declaration, so nothing existing can be offered.
fn is_definition_location(source: &SourceFile, loc: &CompletionLocation) -> bool {
    let arena = &source.arena;
    if loc.word_node.is_some() {
        let parent = arena.parent(loc.word_node);
        if arena.name(parent) == loc.word_node && declares_with_name(arena, parent) {
            return true;
        }
        if arena.kind(parent) == SyntaxKind::BindingElement
            && arena.name(parent) == loc.word_node
            && (arena.property_name(parent).is_some()
                || arena.kind(arena.parent(parent)) == SyntaxKind::ArrayBindingPattern)
        {
            return true;
        }
    }
    let Some(context) = loc.context_token else {
        return false;
    };
    let context_node = loc.context_node;
    let context_kind = arena.kind(context_node);
    match context.kind {
        SyntaxKind::Identifier => {
            let text = token_text(source, &context);
            if DECLARATION_KEYWORDS.contains(&text) && context_kind != SyntaxKind::Identifier {
                return true;
            }
            text == "as"
                && matches!(
                    context_kind,
                    SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier | SyntaxKind::NamespaceImport
                )
        }
        SyntaxKind::OpenParen | SyntaxKind::Comma => {
            (context_kind.is_function_like() && context_kind != SyntaxKind::Constructor)
                || matches!(
                    context_kind,
                    SyntaxKind::TypeParameterList
                        | SyntaxKind::EnumDeclaration
                        | SyntaxKind::CatchClause
                        | SyntaxKind::ArrayBindingPattern
                )
        }
        SyntaxKind::LessThan => context_kind == SyntaxKind::TypeParameterList,
        SyntaxKind::OpenBrace => context_kind == SyntaxKind::EnumDeclaration,
        SyntaxKind::OpenBracket => context_kind == SyntaxKind::ArrayBindingPattern,
        SyntaxKind::DotDotDot => {
            context_kind == SyntaxKind::Parameter
                && arena.kind(arena.parent(context_node)) != SyntaxKind::Constructor
        }
        _ => false,
    }
}

fn declares_with_name(arena: &NodeArena, declaration: NodeIndex) -> bool {
    match arena.kind(declaration) {
        SyntaxKind::VariableDeclaration
        | SyntaxKind::FunctionDeclaration
        | SyntaxKind::FunctionExpression
        | SyntaxKind::ClassDeclaration
        | SyntaxKind::ClassExpression
        | SyntaxKind::InterfaceDeclaration
        | SyntaxKind::TypeAliasDeclaration
        | SyntaxKind::EnumDeclaration
        | SyntaxKind::EnumMember
        | SyntaxKind::ModuleDeclaration
        | SyntaxKind::TypeParameter
        | SyntaxKind::ImportClause
        | SyntaxKind::NamespaceImport
        | SyntaxKind::NamespaceExport
        | SyntaxKind::ImportEqualsDeclaration => true,
        SyntaxKind::Parameter => arena.kind(arena.parent(declaration)) != SyntaxKind::Constructor,
        SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier => {
            arena.property_name(declaration).is_some()
        }
        _ => false,
    }
}

// =============================================================================
// Object literals and binding patterns
// =============================================================================

fn classify_object_like(source: &SourceFile, loc: &CompletionLocation) -> Option<CompletionContext> {
    let arena = &source.arena;
    if loc.word_node.is_some() {
        let member = arena.parent(loc.word_node);
        let container = arena.parent(member);
        match arena.kind(member) {
            SyntaxKind::ShorthandPropertyAssignment
            | SyntaxKind::PropertyAssignment
            | SyntaxKind::MethodDeclaration
                if arena.name(member) == loc.word_node
                    && arena.kind(container) == SyntaxKind::ObjectLiteralExpression =>
            {
                return Some(CompletionContext::ObjectLiteral {
                    literal: container,
                    editing: Some(member),
                });
            }
            SyntaxKind::BindingElement
                if arena.kind(container) == SyntaxKind::ObjectBindingPattern
                    && (arena.name(member) == loc.word_node
                        || arena.property_name(member) == loc.word_node) =>
            {
                return Some(CompletionContext::BindingPattern {
                    pattern: container,
                    editing: Some(member),
                });
            }
            _ => {}
        }
        return None;
    }
    let context = loc.context_token?;
    if !matches!(context.kind, SyntaxKind::OpenBrace | SyntaxKind::Comma) {
        return None;
    }
    match arena.kind(loc.context_node) {
        SyntaxKind::ObjectLiteralExpression => Some(CompletionContext::ObjectLiteral {
            literal: loc.context_node,
            editing: None,
        }),
        SyntaxKind::ObjectBindingPattern => Some(CompletionContext::BindingPattern {
            pattern: loc.context_node,
            editing: None,
        }),
        _ => None,
    }
}

// =============================================================================
// Import and export clauses
// =============================================================================

fn classify_module_clause(source: &SourceFile, loc: &CompletionLocation) -> Option<CompletionContext> {
    let arena = &source.arena;
    let (list, editing, mut type_only) = if loc.word_node.is_some() {
        let specifier = arena.parent(loc.word_node);
        if !is_specifier(arena.kind(specifier))
            || (arena.name(specifier) != loc.word_node
                && arena.property_name(specifier) != loc.word_node)
        {
            return None;
        }
        let type_only = arena.flags(specifier).contains(NodeFlags::TYPE_ONLY);
        (arena.parent(specifier), Some(specifier), type_only)
    } else {
        let context = loc.context_token?;
        let context_node = loc.context_node;
        let parent = arena.parent(context_node);
        if matches!(context.kind, SyntaxKind::OpenBrace | SyntaxKind::Comma)
            && matches!(
                arena.kind(context_node),
                SyntaxKind::NamedImports | SyntaxKind::NamedExports
            )
        {
            (context_node, None, false)
        } else if token_text(source, &context) == "type"
            && arena.kind(context_node) == SyntaxKind::Identifier
            && is_specifier(arena.kind(parent))
            && arena.name(parent) == context_node
            && arena.property_name(parent).is_none()
        {
            (arena.parent(parent), Some(parent), true)
        } else {
            return None;
        }
    };

    match arena.kind(list) {
        SyntaxKind::NamedImports => {
            let clause = arena.parent(list);
            type_only |= arena.flags(clause).contains(NodeFlags::TYPE_ONLY);
            let declaration = arena.parent(clause);
            (arena.kind(declaration) == SyntaxKind::ImportDeclaration).then_some(
                CompletionContext::ModuleSpecifiers {
                    declaration,
                    list,
                    editing,
                    type_only,
                },
            )
        }
        SyntaxKind::NamedExports => {
            let declaration = arena.parent(list);
            type_only |= arena.flags(declaration).contains(NodeFlags::TYPE_ONLY);
            if arena.module_specifier(declaration).is_some() {
                Some(CompletionContext::ModuleSpecifiers {
                    declaration,
                    list,
                    editing,
                    type_only,
                })
            } else {
                Some(CompletionContext::LocalExport { list, editing })
            }
        }
        _ => None,
    }
}

fn is_specifier(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::ImportSpecifier | SyntaxKind::ExportSpecifier)
}

// =============================================================================
// Class, interface and constructor bodies
// =============================================================================

fn classify_member_body(source: &SourceFile, loc: &CompletionLocation) -> Option<CompletionContext> {
    let arena = &source.arena;
    if loc.word_node.is_some() {
        let member = arena.parent(loc.word_node);
        if arena.name(member) != loc.word_node {
            return None;
        }
        let container = arena.parent(member);
        return match arena.kind(member) {
            SyntaxKind::PropertyDeclaration
            | SyntaxKind::MethodDeclaration
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor
                if arena.kind(container).is_class_like() =>
            {
                Some(CompletionContext::ClassBody {
                    class: container,
                    modifiers: modifiers_before(source, loc.word.map_or(loc.offset, |w| w.pos)),
                })
            }
            SyntaxKind::PropertySignature | SyntaxKind::MethodSignature
                if is_type_member_container(arena.kind(container)) =>
            {
                Some(CompletionContext::Keywords {
                    filter: KeywordFilter::InterfaceElementKeywords,
                })
            }
            SyntaxKind::Parameter if arena.kind(container) == SyntaxKind::Constructor => {
                Some(CompletionContext::Keywords {
                    filter: KeywordFilter::ConstructorParameterKeywords,
                })
            }
            _ => None,
        };
    }

    let context = loc.context_token?;
    let context_node = loc.context_node;
    if is_constructor_parameter_start(source, &context, context_node) {
        return Some(CompletionContext::Keywords {
            filter: KeywordFilter::ConstructorParameterKeywords,
        });
    }

    let container = loc.node;
    let container_kind = arena.kind(container);
    if !container_kind.is_class_like() && !is_type_member_container(container_kind) {
        return None;
    }
    let brace = body_open_brace(source, container)?;
    if context.pos < brace || !ends_member_position(source, &context, loc.offset) {
        return None;
    }
    if container_kind.is_class_like() {
        Some(CompletionContext::ClassBody {
            class: container,
            modifiers: modifiers_before(source, loc.offset),
        })
    } else {
        Some(CompletionContext::Keywords {
            filter: KeywordFilter::InterfaceElementKeywords,
        })
    }
}

fn is_type_member_container(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::InterfaceDeclaration | SyntaxKind::TypeLiteral)
}

fn is_constructor_parameter_start(source: &SourceFile, context: &Token, context_node: NodeIndex) -> bool {
    let arena = &source.arena;
    match context.kind {
        SyntaxKind::OpenParen | SyntaxKind::Comma => {
            arena.kind(context_node) == SyntaxKind::Constructor
        }
        SyntaxKind::Identifier => {
            let parameter = if arena.kind(context_node) == SyntaxKind::Parameter {
                context_node
            } else {
                arena.parent(context_node)
            };
            matches!(
                token_text(source, context),
                "public" | "private" | "protected" | "readonly" | "override"
            ) && arena.kind(parameter) == SyntaxKind::Parameter
                && arena.kind(arena.parent(parameter)) == SyntaxKind::Constructor
        }
        _ => false,
    }
}

/// Position of the `{` opening a class, interface or type literal body.
fn body_open_brace(source: &SourceFile, container: NodeIndex) -> Option<u32> {
    let arena = &source.arena;
    let span = arena.span(container);
    if arena.kind(container) == SyntaxKind::TypeLiteral {
        return Some(span.start);
    }
    let header_end = [
        arena.name(container),
        arena.child(container, 1),
        arena.extends_clause(container),
        arena.implements_clause(container),
    ]
    .into_iter()
    .filter(|n| n.is_some())
    .map(|n| arena.span(n).end())
    .max()
    .unwrap_or(span.start);
    source.tokens[source.token_index_after(header_end)..]
        .iter()
        .take_while(|t| t.pos < span.end())
        .find(|t| t.kind == SyntaxKind::OpenBrace)
        .map(|t| t.pos)
}

/// Whether `context` closes off a previous member (or opens the body), so
/// the cursor starts a new one.
fn ends_member_position(source: &SourceFile, context: &Token, offset: u32) -> bool {
    match context.kind {
        SyntaxKind::OpenBrace | SyntaxKind::CloseBrace | SyntaxKind::Semicolon => return true,
        SyntaxKind::Identifier
            if CLASS_MEMBER_MODIFIERS
                .iter()
                .any(|(text, _)| *text == token_text(source, context)) =>
        {
            return true;
        }
        _ => {}
    }
    let gap = source.slice(TextSpan::from_bounds(context.end, offset));
    gap.contains('\n')
        && (context.kind.is_literal_token()
            || matches!(
                context.kind,
                SyntaxKind::Identifier
                    | SyntaxKind::CloseParen
                    | SyntaxKind::CloseBracket
                    | SyntaxKind::GreaterThan
            ))
}

/// Member modifiers written immediately before `offset`.
fn modifiers_before(source: &SourceFile, offset: u32) -> NodeFlags {
    let end = source.tokens.partition_point(|t| t.end <= offset);
    let mut flags = NodeFlags::empty();
    for token in source.tokens[..end].iter().rev() {
        if token.kind != SyntaxKind::Identifier {
            break;
        }
        let text = token_text(source, token);
        match CLASS_MEMBER_MODIFIERS.iter().find(|(m, _)| *m == text) {
            Some((_, flag)) => flags |= *flag,
            None => break,
        }
    }
    flags
}

// =============================================================================
// Identifier positions
// =============================================================================

fn classify_global(source: &SourceFile, loc: &CompletionLocation) -> CompletionContext {
    let arena = &source.arena;
    let context = loc.context_token;
    let context_text = loc.context_text(source);
    let after_assertion = matches!(context_text, "as" | "satisfies")
        && arena.kind(loc.context_node) == SyntaxKind::AsExpression;
    let type_only = after_assertion || is_type_position(source, loc);
    let keyword_filter = if after_assertion {
        KeywordFilter::TypeAssertionKeywords
    } else if type_only {
        KeywordFilter::TypeKeywords
    } else if is_inside_function_body(arena, loc.node, loc.offset) {
        KeywordFilter::FunctionLikeBody
    } else {
        KeywordFilter::All
    };
    let new_identifier = context.is_some_and(|t| is_new_identifier_token(source, &t, loc.context_node));
    CompletionContext::Global {
        type_only,
        keyword_filter,
        new_identifier,
    }
}

fn is_type_position(source: &SourceFile, loc: &CompletionLocation) -> bool {
    let arena = &source.arena;
    if loc.word_node.is_some() {
        return is_in_type(arena, loc.word_node);
    }
    let Some(context) = loc.context_token else {
        return false;
    };
    let node = loc.context_node;
    let kind = arena.kind(node);
    match context.kind {
        SyntaxKind::Colon => {
            (kind.is_variable_like()
                && !matches!(kind, SyntaxKind::PropertyAssignment | SyntaxKind::EnumMember))
                || kind.is_function_like()
                || is_in_type(arena, node)
        }
        SyntaxKind::Equals => {
            matches!(kind, SyntaxKind::TypeAliasDeclaration | SyntaxKind::TypeParameter)
        }
        SyntaxKind::LessThan => matches!(
            kind,
            SyntaxKind::TypeArgumentList | SyntaxKind::TypeReference
        ),
        SyntaxKind::Identifier => match token_text(source, &context) {
            "extends" | "implements" => match kind {
                SyntaxKind::HeritageClause => !is_class_extends(arena, node),
                SyntaxKind::TypeParameter => true,
                _ => false,
            },
            "keyof" | "readonly" | "unique" => kind == SyntaxKind::TypeOperator,
            _ => is_in_type(arena, node),
        },
        _ => is_in_type(arena, node),
    }
}

/// Whether `node` sits inside a type annotation (and not inside `typeof`).
fn is_in_type(arena: &NodeArena, node: NodeIndex) -> bool {
    for ancestor in bounded_ancestors(arena, node) {
        let kind = arena.kind(ancestor);
        match kind {
            SyntaxKind::TypeQuery => return false,
            SyntaxKind::TypeReference if is_class_extends(arena, arena.parent(ancestor)) => {
                return false;
            }
            SyntaxKind::TypeArgumentList | SyntaxKind::HeritageClause => return true,
            k if k.is_type_node() => return true,
            SyntaxKind::Identifier | SyntaxKind::QualifiedName => continue,
            _ => return false,
        }
    }
    false
}

fn is_class_extends(arena: &NodeArena, clause: NodeIndex) -> bool {
    if arena.kind(clause) != SyntaxKind::HeritageClause {
        return false;
    }
    let owner = arena.parent(clause);
    arena.kind(owner).is_class_like() && arena.extends_clause(owner) == clause
}

fn is_inside_function_body(arena: &NodeArena, node: NodeIndex, offset: u32) -> bool {
    bounded_ancestors(arena, node).any(|a| {
        let body = arena.body(a);
        arena.kind(a).is_function_like() && body.is_some() && arena.span(body).start < offset
    })
}

/// Tokens after which a brand new name is a plausible continuation.
fn is_new_identifier_token(source: &SourceFile, context: &Token, context_node: NodeIndex) -> bool {
    let arena = &source.arena;
    let kind = arena.kind(context_node);
    match context.kind {
        SyntaxKind::Comma => matches!(
            kind,
            SyntaxKind::CallExpression
                | SyntaxKind::NewExpression
                | SyntaxKind::ArgumentList
                | SyntaxKind::ArrayLiteralExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::FunctionType
        ),
        SyntaxKind::OpenParen => matches!(
            kind,
            SyntaxKind::CallExpression
                | SyntaxKind::NewExpression
                | SyntaxKind::ArgumentList
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::ParenthesizedType
        ),
        SyntaxKind::OpenBracket => true,
        SyntaxKind::Equals => {
            kind == SyntaxKind::VariableDeclaration
                || (kind == SyntaxKind::BinaryExpression
                    && arena.get(context_node).is_some_and(|n| n.op.is_assignment_operator()))
        }
        SyntaxKind::TemplateHead | SyntaxKind::TemplateMiddle => true,
        SyntaxKind::Identifier => matches!(
            token_text(source, context),
            "public" | "private" | "protected"
        ),
        _ => false,
    }
}

fn bounded_ancestors(arena: &NodeArena, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    arena.ancestors(node).take(MAX_ANCESTOR_WALK)
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod context_tests;
