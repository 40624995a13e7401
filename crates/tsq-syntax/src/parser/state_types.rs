//! Type annotations.

use super::ParserState;
use crate::kind::{SyntaxKind, is_type_keyword};
use crate::node::{NodeFlags, NodeIndex};

impl ParserState<'_> {
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_identifier();
        }
        let start = self.token_pos();
        let mut result = self.parse_union_type();
        if self.is_word("extends") && !self.has_preceding_line_break() {
            // Conditional types keep only their two branches as a union.
            self.next_token();
            self.parse_union_type();
            self.parse_expected(SyntaxKind::Question);
            let when_true = self.parse_type();
            self.parse_expected(SyntaxKind::Colon);
            let when_false = self.parse_type();
            let node = self.start_node(SyntaxKind::UnionType, start);
            result = self.finish_node(node, &[when_true, when_false]);
        }
        self.exit_recursion();
        result
    }

    /// Return type position, where `x is T` and `asserts x` are accepted.
    pub(crate) fn parse_return_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let is_predicate = (self.is_identifier_or_keyword()
            && self.look_ahead_next_is(|p| p.is_word("is") && !p.has_preceding_line_break()))
            || (self.is_word("asserts") && self.look_ahead_next_is(|p| p.is_identifier_or_keyword()));
        if !is_predicate {
            return self.parse_type();
        }
        let asserts = self.is_word("asserts");
        self.next_token();
        if asserts {
            self.next_token();
        }
        if self.parse_optional_word("is") {
            self.parse_type();
        }
        let node = self.start_node(SyntaxKind::KeywordType, start);
        self.arena
            .set_text(node, if asserts { "void" } else { "boolean" });
        self.finish_node(node, &[])
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        self.parse_type_list(SyntaxKind::Bar, SyntaxKind::UnionType)
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        self.parse_type_list(SyntaxKind::Ampersand, SyntaxKind::IntersectionType)
    }

    fn parse_type_list(&mut self, separator: SyntaxKind, kind: SyntaxKind) -> NodeIndex {
        let start = self.token_pos();
        let leading = self.parse_optional(separator);
        let first = if kind == SyntaxKind::UnionType {
            self.parse_intersection_type()
        } else {
            self.parse_type_operator()
        };
        if !self.is(separator) && !leading {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(separator) {
            types.push(if kind == SyntaxKind::UnionType {
                self.parse_intersection_type()
            } else {
                self.parse_type_operator()
            });
        }
        if types.len() == 1 {
            return first;
        }
        let node = self.start_node(kind, start);
        self.finish_node(node, &types)
    }

    fn parse_type_operator(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if (self.is_word("keyof") || self.is_word("unique") || self.is_word("readonly"))
            && self.look_ahead_next_is(|p| p.is_start_of_type())
        {
            let operator = self.token_value().to_owned();
            let node = self.start_node(SyntaxKind::TypeOperator, start);
            self.next_token();
            let operand = self.parse_type_operator();
            self.arena.set_text(node, &operator);
            self.add_flags(node, NodeFlags::KEYWORD_OPERATOR);
            return self.finish_node(node, &[operand]);
        }
        if self.is_word("infer") && self.look_ahead_next_is(|p| p.is_identifier()) {
            self.next_token();
            return self.parse_type_reference();
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut result = self.parse_non_array_type();
        while self.is(SyntaxKind::OpenBracket) && !self.has_preceding_line_break() {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracket) {
                let node = self.start_node(SyntaxKind::ArrayType, start);
                result = self.finish_node(node, &[result]);
            } else {
                let index = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracket);
                let node = self.start_node(SyntaxKind::IndexedAccessType, start);
                result = self.finish_node(node, &[result, index]);
            }
        }
        result
    }

    pub(crate) fn is_start_of_type(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::Identifier
                | SyntaxKind::StringLiteral
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::OpenParen
                | SyntaxKind::OpenBracket
                | SyntaxKind::OpenBrace
                | SyntaxKind::LessThan
                | SyntaxKind::Minus
                | SyntaxKind::Bar
                | SyntaxKind::Ampersand
        )
    }

    fn parse_non_array_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => {
                let node = self.start_node(SyntaxKind::LiteralType, start);
                let literal = self.parse_literal_node();
                self.finish_node(node, &[literal])
            }
            SyntaxKind::Minus
                if self.look_ahead_next_is(|p| {
                    matches!(p.token(), SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral)
                }) =>
            {
                let node = self.start_node(SyntaxKind::LiteralType, start);
                let negation = self.start_node(SyntaxKind::PrefixUnaryExpression, start);
                self.set_op(negation, SyntaxKind::Minus);
                self.next_token();
                let literal = self.parse_literal_node();
                let negation = self.finish_node(negation, &[literal]);
                self.finish_node(node, &[negation])
            }
            SyntaxKind::TemplateHead => self.parse_template_literal_type(),
            SyntaxKind::OpenParen if self.look_ahead_is_start_of_function_type() => {
                self.parse_function_type(SyntaxKind::FunctionType, start)
            }
            SyntaxKind::LessThan => self.parse_function_type(SyntaxKind::FunctionType, start),
            SyntaxKind::OpenParen => {
                let node = self.start_node(SyntaxKind::ParenthesizedType, start);
                self.next_token();
                let inner = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParen);
                self.finish_node(node, &[inner])
            }
            SyntaxKind::OpenBrace => {
                let node = self.start_node(SyntaxKind::TypeLiteral, start);
                let (members, terminated) = self.parse_type_members();
                if !terminated {
                    self.add_flags(node, NodeFlags::UNTERMINATED);
                }
                self.finish_node(node, &members)
            }
            SyntaxKind::OpenBracket => self.parse_tuple_type(),
            SyntaxKind::Identifier => self.parse_keyword_or_reference_type(),
            _ => {
                let node = self.start_node(SyntaxKind::TypeReference, start);
                let name = self.create_missing_identifier();
                self.finish_node(node, &[name])
            }
        }
    }

    fn parse_keyword_or_reference_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let word = self.token_value().to_owned();
        let followed_by_dot = self.look_ahead_next_is(|p| p.is(SyntaxKind::Dot));
        match word.as_str() {
            "null" => self.parse_keyword_type(start, "null"),
            w if is_type_keyword(w) && !followed_by_dot => self.parse_keyword_type(start, w),
            "this" => {
                let node = self.start_node(SyntaxKind::ThisType, start);
                self.next_token();
                self.finish_node(node, &[])
            }
            "true" | "false" => {
                let node = self.start_node(SyntaxKind::LiteralType, start);
                let literal = self.start_node(
                    if word == "true" {
                        SyntaxKind::TrueKeyword
                    } else {
                        SyntaxKind::FalseKeyword
                    },
                    start,
                );
                self.next_token();
                let literal = self.finish_node(literal, &[]);
                self.finish_node(node, &[literal])
            }
            "typeof" => {
                let node = self.start_node(SyntaxKind::TypeQuery, start);
                self.next_token();
                let expr = self.parse_entity_name_expression();
                self.finish_node(node, &[expr])
            }
            "new" if self.look_ahead_next_is(|p| {
                matches!(p.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan)
            }) =>
            {
                self.next_token();
                self.parse_function_type(SyntaxKind::ConstructorType, start)
            }
            _ => self.parse_type_reference(),
        }
    }

    fn parse_keyword_type(&mut self, start: u32, keyword: &str) -> NodeIndex {
        let node = self.start_node(SyntaxKind::KeywordType, start);
        self.arena.set_text(node, keyword);
        self.next_token();
        self.finish_node(node, &[])
    }

    /// `(`...`) =>` or `(a: ...` style lookahead.
    fn look_ahead_is_start_of_function_type(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if matches!(p.token(), SyntaxKind::CloseParen | SyntaxKind::DotDotDot) {
                return true;
            }
            let skipped = match p.token() {
                SyntaxKind::Identifier => {
                    p.next_token();
                    true
                }
                SyntaxKind::OpenBrace | SyntaxKind::OpenBracket => {
                    // Destructured parameter; assume a function type.
                    return true;
                }
                _ => false,
            };
            if !skipped {
                return false;
            }
            match p.token() {
                SyntaxKind::Colon | SyntaxKind::Comma | SyntaxKind::Question | SyntaxKind::Equals => {
                    true
                }
                SyntaxKind::CloseParen => {
                    p.next_token();
                    p.is(SyntaxKind::EqualsGreaterThan)
                }
                _ => false,
            }
        })
    }

    fn parse_function_type(&mut self, kind: SyntaxKind, start: u32) -> NodeIndex {
        let node = self.start_node(kind, start);
        let (type_parameters, parameters, return_type) =
            self.parse_signature(SyntaxKind::EqualsGreaterThan);
        let mut children = vec![NodeIndex::NONE, type_parameters, return_type, NodeIndex::NONE];
        children.extend(parameters);
        self.finish_node(node, &children)
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TupleType, self.token_pos());
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBracket | SyntaxKind::EndOfFile) {
            let consumed = self.tokens.len();
            let rest = self.parse_optional(SyntaxKind::DotDotDot);
            let mut optional = false;
            // Labeled element `name: T` or `name?: T`; the label is dropped.
            if self.is_identifier_or_keyword() && self.look_ahead_is_tuple_label() {
                self.next_token();
                optional = self.parse_optional(SyntaxKind::Question);
                self.parse_expected(SyntaxKind::Colon);
            }
            let element = self.parse_type();
            if self.parse_optional(SyntaxKind::Question) {
                optional = true;
            }
            if self.tokens.len() == consumed {
                break;
            }
            if rest {
                self.add_flags(element, NodeFlags::REST);
            }
            if optional {
                self.add_flags(element, NodeFlags::OPTIONAL);
            }
            elements.push(element);
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseBracket) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &elements)
    }

    /// `name:` or `name?:` at the start of a tuple element.
    fn look_ahead_is_tuple_label(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.parse_optional(SyntaxKind::Question) {
                return p.is(SyntaxKind::Colon);
            }
            p.is(SyntaxKind::Colon)
        })
    }

    fn parse_template_literal_type(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TemplateLiteralType, self.token_pos());
        let head = self.parse_literal_node();
        let mut children = vec![head];
        loop {
            let span = self.start_node(SyntaxKind::TemplateLiteralTypeSpan, self.token_pos());
            let inner = self.parse_type();
            if self.is(SyntaxKind::CloseBrace) {
                self.scanner.rescan_template_continuation();
            }
            let literal = if matches!(
                self.token(),
                SyntaxKind::TemplateMiddle | SyntaxKind::TemplateTail
            ) {
                self.parse_literal_node()
            } else {
                self.add_flags(node, NodeFlags::UNTERMINATED);
                NodeIndex::NONE
            };
            let done = literal.is_none() || self.arena.kind(literal) == SyntaxKind::TemplateTail;
            children.push(self.finish_node(span, &[inner, literal]));
            if done {
                break;
            }
        }
        self.finish_node(node, &children)
    }

    /// `Name`, `A.B.C` followed by optional type arguments.
    pub(crate) fn parse_type_reference(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TypeReference, self.token_pos());
        let name = self.parse_entity_name();
        let mut children = vec![name];
        if self.is(SyntaxKind::LessThan) && !self.has_preceding_line_break() {
            children.extend(self.parse_type_argument_elements());
        }
        self.finish_node(node, &children)
    }

    /// Qualified name in type position.
    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut entity = self.parse_identifier();
        while self.is(SyntaxKind::Dot) {
            self.next_token();
            let right = self.parse_identifier_name();
            let node = self.start_node(SyntaxKind::QualifiedName, start);
            entity = self.finish_node(node, &[entity, right]);
        }
        entity
    }

    /// Entity name after `typeof`, kept as property accesses.
    fn parse_entity_name_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut expr = if self.is_word("this") {
            let node = self.start_node(SyntaxKind::ThisKeyword, start);
            self.next_token();
            self.finish_node(node, &[])
        } else {
            self.parse_identifier()
        };
        while self.is(SyntaxKind::Dot) {
            self.next_token();
            let name = if self.is(SyntaxKind::PrivateIdentifier) {
                self.parse_private_identifier()
            } else {
                self.parse_identifier_name()
            };
            let node = self.start_node(SyntaxKind::PropertyAccessExpression, start);
            expr = self.finish_node(node, &[expr, name]);
        }
        expr
    }

    pub(crate) fn parse_type_parameters(&mut self) -> NodeIndex {
        if !self.is(SyntaxKind::LessThan) {
            return NodeIndex::NONE;
        }
        let node = self.start_node(SyntaxKind::TypeParameterList, self.token_pos());
        self.next_token();
        let mut parameters = Vec::new();
        while !matches!(self.token(), SyntaxKind::GreaterThan | SyntaxKind::EndOfFile) {
            let consumed = self.tokens.len();
            while (self.is_word("const") || self.is_word("in") || self.is_word("out"))
                && self.look_ahead_next_is(|p| p.is_identifier())
            {
                self.next_token();
            }
            let parameter = self.start_node(SyntaxKind::TypeParameter, self.token_pos());
            let name = self.parse_identifier();
            let constraint = if self.parse_optional_word("extends") {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if self.parse_optional(SyntaxKind::Equals) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            if self.tokens.len() == consumed {
                break;
            }
            parameters.push(self.finish_node(parameter, &[name, constraint, default]));
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThan);
        self.finish_node(node, &parameters)
    }

    /// `<T, U>` as a flat list of type nodes.
    pub(crate) fn parse_type_argument_elements(&mut self) -> Vec<NodeIndex> {
        self.next_token();
        let mut arguments = Vec::new();
        while !matches!(self.token(), SyntaxKind::GreaterThan | SyntaxKind::EndOfFile) {
            let consumed = self.tokens.len();
            let argument = self.parse_type();
            if self.tokens.len() == consumed {
                break;
            }
            arguments.push(argument);
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThan);
        arguments
    }
}
