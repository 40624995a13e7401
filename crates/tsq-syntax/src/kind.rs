//! Syntax kinds shared by tokens and nodes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFile,

    // Literal and name tokens
    Identifier,
    PrivateIdentifier,
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,

    // Punctuation
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Dot,
    DotDotDot,
    Semicolon,
    Comma,
    QuestionDot,
    At,
    LessThan,
    GreaterThan,
    LessThanEquals,
    GreaterThanEquals,
    EqualsEquals,
    ExclamationEquals,
    EqualsEqualsEquals,
    ExclamationEqualsEquals,
    EqualsGreaterThan,
    Plus,
    Minus,
    Asterisk,
    AsteriskAsterisk,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LessThanLessThan,
    GreaterThanGreaterThan,
    GreaterThanGreaterThanGreaterThan,
    Ampersand,
    Bar,
    Caret,
    Exclamation,
    Tilde,
    AmpersandAmpersand,
    BarBar,
    QuestionQuestion,
    Question,
    Colon,
    Equals,
    PlusEquals,
    MinusEquals,
    AsteriskEquals,
    AsteriskAsteriskEquals,
    SlashEquals,
    PercentEquals,
    LessThanLessThanEquals,
    GreaterThanGreaterThanEquals,
    GreaterThanGreaterThanGreaterThanEquals,
    AmpersandEquals,
    BarEquals,
    CaretEquals,
    AmpersandAmpersandEquals,
    BarBarEquals,
    QuestionQuestionEquals,
    Backtick,

    // Keyword expressions
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    SuperKeyword,

    // Names
    QualifiedName,
    ComputedPropertyName,

    // Types
    KeywordType,
    ThisType,
    TypeReference,
    LiteralType,
    UnionType,
    IntersectionType,
    ArrayType,
    TupleType,
    TypeLiteral,
    FunctionType,
    ConstructorType,
    ParenthesizedType,
    TypeQuery,
    TypeOperator,
    IndexedAccessType,
    TemplateLiteralType,
    TemplateLiteralTypeSpan,
    TypeParameter,
    TypeParameterList,
    TypeArgumentList,
    HeritageClause,

    // Type and class members
    PropertySignature,
    MethodSignature,
    CallSignature,
    ConstructSignature,
    IndexSignature,
    PropertyDeclaration,
    MethodDeclaration,
    Constructor,
    GetAccessor,
    SetAccessor,
    Parameter,

    // Binding patterns
    ObjectBindingPattern,
    ArrayBindingPattern,
    BindingElement,
    OmittedExpression,

    // Expressions
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    SpreadAssignment,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    NewExpression,
    ArgumentList,
    ParenthesizedExpression,
    FunctionExpression,
    ArrowFunction,
    ClassExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    BinaryExpression,
    ConditionalExpression,
    TemplateExpression,
    TemplateSpan,
    TypeOfExpression,
    VoidExpression,
    DeleteExpression,
    AwaitExpression,
    AsExpression,
    NonNullExpression,
    SpreadElement,

    // Statements and declarations
    Block,
    EmptyStatement,
    VariableStatement,
    VariableDeclaration,
    ExpressionStatement,
    IfStatement,
    ForStatement,
    ForOfStatement,
    ForInStatement,
    WhileStatement,
    ReturnStatement,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    TryStatement,
    CatchClause,
    FunctionDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    EnumMember,
    ModuleDeclaration,
    ModuleBlock,
    ImportDeclaration,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ImportEqualsDeclaration,
    ExternalModuleReference,
    ExportDeclaration,
    NamedExports,
    NamespaceExport,
    ExportSpecifier,
    ExportAssignment,
    SourceFile,
}

impl SyntaxKind {
    pub const fn is_string_literal_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral
        )
    }

    pub const fn is_template_part(self) -> bool {
        matches!(
            self,
            SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::TemplateMiddle
                | SyntaxKind::TemplateTail
        )
    }

    pub const fn is_literal_token(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
        ) || self.is_template_part()
    }

    /// Declarations that introduce a callable body or signature.
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
                | SyntaxKind::ArrowFunction
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::MethodSignature
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor
                | SyntaxKind::CallSignature
                | SyntaxKind::ConstructSignature
                | SyntaxKind::IndexSignature
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
        )
    }

    pub const fn is_class_like(self) -> bool {
        matches!(self, SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression)
    }

    pub const fn is_class_or_interface(self) -> bool {
        self.is_class_like() || matches!(self, SyntaxKind::InterfaceDeclaration)
    }

    /// Nodes with the `[name, type, initializer]` layout.
    pub const fn is_variable_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::VariableDeclaration
                | SyntaxKind::Parameter
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::PropertySignature
                | SyntaxKind::PropertyAssignment
                | SyntaxKind::EnumMember
        )
    }

    pub const fn is_type_node(self) -> bool {
        matches!(
            self,
            SyntaxKind::KeywordType
                | SyntaxKind::ThisType
                | SyntaxKind::TypeReference
                | SyntaxKind::LiteralType
                | SyntaxKind::UnionType
                | SyntaxKind::IntersectionType
                | SyntaxKind::ArrayType
                | SyntaxKind::TupleType
                | SyntaxKind::TypeLiteral
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
                | SyntaxKind::ParenthesizedType
                | SyntaxKind::TypeQuery
                | SyntaxKind::TypeOperator
                | SyntaxKind::IndexedAccessType
                | SyntaxKind::TemplateLiteralType
        )
    }

    pub const fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Equals
                | SyntaxKind::PlusEquals
                | SyntaxKind::MinusEquals
                | SyntaxKind::AsteriskEquals
                | SyntaxKind::AsteriskAsteriskEquals
                | SyntaxKind::SlashEquals
                | SyntaxKind::PercentEquals
                | SyntaxKind::LessThanLessThanEquals
                | SyntaxKind::GreaterThanGreaterThanEquals
                | SyntaxKind::GreaterThanGreaterThanGreaterThanEquals
                | SyntaxKind::AmpersandEquals
                | SyntaxKind::BarEquals
                | SyntaxKind::CaretEquals
                | SyntaxKind::AmpersandAmpersandEquals
                | SyntaxKind::BarBarEquals
                | SyntaxKind::QuestionQuestionEquals
        )
    }

    /// Binary operator precedence, or `None` for non-binary tokens.
    /// `in` and `instanceof` are keywords and handled by the parser.
    pub const fn binary_precedence(self) -> Option<u8> {
        Some(match self {
            SyntaxKind::QuestionQuestion => 1,
            SyntaxKind::BarBar => 2,
            SyntaxKind::AmpersandAmpersand => 3,
            SyntaxKind::Bar => 4,
            SyntaxKind::Caret => 5,
            SyntaxKind::Ampersand => 6,
            SyntaxKind::EqualsEquals
            | SyntaxKind::ExclamationEquals
            | SyntaxKind::EqualsEqualsEquals
            | SyntaxKind::ExclamationEqualsEquals => 7,
            SyntaxKind::LessThan
            | SyntaxKind::GreaterThan
            | SyntaxKind::LessThanEquals
            | SyntaxKind::GreaterThanEquals => 8,
            SyntaxKind::LessThanLessThan
            | SyntaxKind::GreaterThanGreaterThan
            | SyntaxKind::GreaterThanGreaterThanGreaterThan => 9,
            SyntaxKind::Plus | SyntaxKind::Minus => 10,
            SyntaxKind::Asterisk | SyntaxKind::Slash | SyntaxKind::Percent => 11,
            SyntaxKind::AsteriskAsterisk => 12,
            _ => return None,
        })
    }

    /// Source text of a punctuation token.
    pub const fn punctuation_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::OpenBrace => "{",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::OpenParen => "(",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::OpenBracket => "[",
            SyntaxKind::CloseBracket => "]",
            SyntaxKind::Dot => ".",
            SyntaxKind::DotDotDot => "...",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::QuestionDot => "?.",
            SyntaxKind::At => "@",
            SyntaxKind::LessThan => "<",
            SyntaxKind::GreaterThan => ">",
            SyntaxKind::LessThanEquals => "<=",
            SyntaxKind::GreaterThanEquals => ">=",
            SyntaxKind::EqualsEquals => "==",
            SyntaxKind::ExclamationEquals => "!=",
            SyntaxKind::EqualsEqualsEquals => "===",
            SyntaxKind::ExclamationEqualsEquals => "!==",
            SyntaxKind::EqualsGreaterThan => "=>",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Asterisk => "*",
            SyntaxKind::AsteriskAsterisk => "**",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::LessThanLessThan => "<<",
            SyntaxKind::GreaterThanGreaterThan => ">>",
            SyntaxKind::GreaterThanGreaterThanGreaterThan => ">>>",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::Bar => "|",
            SyntaxKind::Caret => "^",
            SyntaxKind::Exclamation => "!",
            SyntaxKind::Tilde => "~",
            SyntaxKind::AmpersandAmpersand => "&&",
            SyntaxKind::BarBar => "||",
            SyntaxKind::QuestionQuestion => "??",
            SyntaxKind::Question => "?",
            SyntaxKind::Colon => ":",
            SyntaxKind::Equals => "=",
            SyntaxKind::PlusEquals => "+=",
            SyntaxKind::MinusEquals => "-=",
            SyntaxKind::AsteriskEquals => "*=",
            SyntaxKind::AsteriskAsteriskEquals => "**=",
            SyntaxKind::SlashEquals => "/=",
            SyntaxKind::PercentEquals => "%=",
            SyntaxKind::LessThanLessThanEquals => "<<=",
            SyntaxKind::GreaterThanGreaterThanEquals => ">>=",
            SyntaxKind::GreaterThanGreaterThanGreaterThanEquals => ">>>=",
            SyntaxKind::AmpersandEquals => "&=",
            SyntaxKind::BarEquals => "|=",
            SyntaxKind::CaretEquals => "^=",
            SyntaxKind::AmpersandAmpersandEquals => "&&=",
            SyntaxKind::BarBarEquals => "||=",
            SyntaxKind::QuestionQuestionEquals => "??=",
            SyntaxKind::Backtick => "`",
            _ => return None,
        })
    }
}

/// Words that cannot be used as plain identifiers in expression position.
pub const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

pub fn is_reserved_word(text: &str) -> bool {
    RESERVED_WORDS.contains(&text)
}

/// Keywords that name intrinsic types.
pub const TYPE_KEYWORDS: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
    "unknown", "void",
];

pub fn is_type_keyword(text: &str) -> bool {
    TYPE_KEYWORDS.contains(&text)
}

pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

pub fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch == '\u{200C}' || ch == '\u{200D}' || ch.is_alphanumeric()
}

/// Whether `text` can be written as a bare identifier name (property names
/// may be reserved words).
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}
