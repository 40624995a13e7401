//! Expressions.

use super::ParserState;
use crate::kind::{SyntaxKind, is_reserved_word};
use crate::node::{NodeFlags, NodeIndex};

/// Precedence shared by relational operators, `in`, `instanceof` and `as`.
const RELATIONAL_PRECEDENCE: u8 = 8;

impl ParserState<'_> {
    /// Comma expression.
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut expr = self.parse_assignment_expression();
        while self.is(SyntaxKind::Comma) {
            self.next_token();
            let right = self.parse_assignment_expression();
            let node = self.start_node(SyntaxKind::BinaryExpression, start);
            self.set_op(node, SyntaxKind::Comma);
            expr = self.finish_node(node, &[expr, right]);
        }
        expr
    }

    /// Parse `f` with `in` accepted as an operator again.
    fn with_in_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.disallow_in, false);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_identifier();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if let Some(arrow) = self.try_parse_arrow_function() {
            return arrow;
        }
        let start = self.token_pos();
        let left = self.parse_conditional_expression();
        if self.token().is_assignment_operator() {
            let op = self.token();
            self.next_token();
            let right = self.parse_assignment_expression();
            let node = self.start_node(SyntaxKind::BinaryExpression, start);
            self.set_op(node, op);
            return self.finish_node(node, &[left, right]);
        }
        left
    }

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if !self.is(SyntaxKind::Question) {
            return condition;
        }
        self.next_token();
        let when_true = self.with_in_allowed(|p| p.parse_assignment_expression());
        self.parse_expected(SyntaxKind::Colon);
        let when_false = self.parse_assignment_expression();
        let node = self.start_node(SyntaxKind::ConditionalExpression, start);
        self.finish_node(node, &[condition, when_true, when_false])
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> NodeIndex {
        let start = self.token_pos();
        let mut left = self.parse_unary_expression();
        loop {
            if self.is(SyntaxKind::GreaterThan) {
                self.scanner.rescan_greater_token();
            }
            let keyword_operator = if self.is_word("as") || self.is_word("satisfies") {
                if self.has_preceding_line_break() {
                    break;
                }
                Some("as")
            } else if self.is_word("instanceof") {
                Some("instanceof")
            } else if self.is_word("in") && !self.disallow_in {
                Some("in")
            } else {
                None
            };
            let precedence = match keyword_operator {
                Some(_) => RELATIONAL_PRECEDENCE,
                None => match self.token().binary_precedence() {
                    Some(p) => p,
                    None => break,
                },
            };
            let right_associative = self.is(SyntaxKind::AsteriskAsterisk);
            if precedence < min_precedence || (precedence == min_precedence && !right_associative)
            {
                break;
            }
            let op = self.token();
            self.next_token();
            if keyword_operator == Some("as") {
                let target = self.parse_type();
                let node = self.start_node(SyntaxKind::AsExpression, start);
                left = self.finish_node(node, &[left, target]);
                continue;
            }
            let right = self.parse_binary_expression(if right_associative {
                precedence - 1
            } else {
                precedence
            });
            let node = self.start_node(SyntaxKind::BinaryExpression, start);
            match keyword_operator {
                Some(word) => {
                    self.arena.set_text(node, word);
                    self.add_flags(node, NodeFlags::KEYWORD_OPERATOR);
                }
                None => self.set_op(node, op),
            }
            left = self.finish_node(node, &[left, right]);
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Tilde
            | SyntaxKind::Exclamation
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                let op = self.token();
                let node = self.start_node(SyntaxKind::PrefixUnaryExpression, start);
                self.next_token();
                let operand = self.parse_unary_expression();
                self.set_op(node, op);
                return self.finish_node(node, &[operand]);
            }
            SyntaxKind::LessThan => {
                // `<T>expr` assertion
                self.next_token();
                let target = self.parse_type();
                self.parse_expected(SyntaxKind::GreaterThan);
                let operand = self.parse_unary_expression();
                let node = self.start_node(SyntaxKind::AsExpression, start);
                return self.finish_node(node, &[operand, target]);
            }
            SyntaxKind::Identifier => {}
            _ => return self.parse_postfix_expression(),
        }
        let kind = match self.token_value() {
            "typeof" => SyntaxKind::TypeOfExpression,
            "void" => SyntaxKind::VoidExpression,
            "delete" => SyntaxKind::DeleteExpression,
            "await" => SyntaxKind::AwaitExpression,
            _ => return self.parse_postfix_expression(),
        };
        if kind == SyntaxKind::AwaitExpression
            && !self.look_ahead_next_is(|p| {
                !p.has_preceding_line_break() && p.is_start_of_expression()
            })
        {
            return self.parse_postfix_expression();
        }
        let node = self.start_node(kind, start);
        self.next_token();
        let operand = self.parse_unary_expression();
        self.finish_node(node, &[operand])
    }

    fn is_start_of_expression(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => !matches!(
                self.token_value(),
                "in" | "of" | "as" | "instanceof" | "satisfies"
            ),
            SyntaxKind::PrivateIdentifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::OpenParen
            | SyntaxKind::OpenBracket
            | SyntaxKind::OpenBrace
            | SyntaxKind::Slash
            | SyntaxKind::SlashEquals
            | SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Tilde
            | SyntaxKind::Exclamation
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus
            | SyntaxKind::LessThan => true,
            _ => false,
        }
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let operand = self.parse_left_hand_side_expression();
        if matches!(self.token(), SyntaxKind::PlusPlus | SyntaxKind::MinusMinus)
            && !self.has_preceding_line_break()
        {
            let op = self.token();
            let node = self.start_node(SyntaxKind::PostfixUnaryExpression, start);
            self.next_token();
            self.set_op(node, op);
            return self.finish_node(node, &[operand]);
        }
        operand
    }

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expr = if self.is_word("new") {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_tail(start, expr, true)
    }

    /// Property accesses, element accesses and (when `allow_calls`) calls
    /// following `expr`.
    fn parse_member_tail(&mut self, start: u32, expr: NodeIndex, allow_calls: bool) -> NodeIndex {
        let mut expr = expr;
        loop {
            match self.token() {
                SyntaxKind::Dot => {
                    self.next_token();
                    expr = self.finish_property_access(start, expr, NodeFlags::empty());
                }
                SyntaxKind::QuestionDot => {
                    self.next_token();
                    expr = match self.token() {
                        SyntaxKind::OpenBracket => {
                            self.finish_element_access(start, expr, NodeFlags::OPTIONAL_CHAIN)
                        }
                        SyntaxKind::OpenParen if allow_calls => {
                            let call = self.finish_call(start, expr, NodeIndex::NONE);
                            self.add_flags(call, NodeFlags::OPTIONAL_CHAIN);
                            call
                        }
                        _ => self.finish_property_access(start, expr, NodeFlags::OPTIONAL_CHAIN),
                    };
                }
                SyntaxKind::OpenBracket => {
                    expr = self.finish_element_access(start, expr, NodeFlags::empty());
                }
                SyntaxKind::Exclamation if !self.has_preceding_line_break() => {
                    self.next_token();
                    let node = self.start_node(SyntaxKind::NonNullExpression, start);
                    expr = self.finish_node(node, &[expr]);
                }
                SyntaxKind::OpenParen if allow_calls => {
                    expr = self.finish_call(start, expr, NodeIndex::NONE);
                }
                SyntaxKind::LessThan if allow_calls => {
                    match self.try_parse(|p| {
                        let list = p.start_node(SyntaxKind::TypeArgumentList, p.token_pos());
                        let arguments = p.parse_type_argument_elements();
                        if !p.is(SyntaxKind::OpenParen) {
                            return None;
                        }
                        Some(p.finish_node(list, &arguments))
                    }) {
                        Some(type_arguments) => {
                            expr = self.finish_call(start, expr, type_arguments);
                        }
                        None => break,
                    }
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
                    if allow_calls =>
                {
                    // Tagged template: the template is the only argument.
                    let list = self.start_node(SyntaxKind::ArgumentList, self.token_pos());
                    let template = self.parse_primary_expression();
                    let list = self.finish_node(list, &[template]);
                    let node = self.start_node(SyntaxKind::CallExpression, start);
                    expr = self.finish_node(node, &[expr, NodeIndex::NONE, list]);
                }
                _ => break,
            }
        }
        expr
    }

    fn finish_property_access(&mut self, start: u32, expr: NodeIndex, flags: NodeFlags) -> NodeIndex {
        let name = if self.is(SyntaxKind::PrivateIdentifier) {
            self.parse_private_identifier()
        } else {
            self.parse_identifier_name()
        };
        let node = self.start_node(SyntaxKind::PropertyAccessExpression, start);
        self.add_flags(node, flags);
        self.finish_node(node, &[expr, name])
    }

    fn finish_element_access(&mut self, start: u32, expr: NodeIndex, flags: NodeFlags) -> NodeIndex {
        self.next_token();
        let argument = if self.is(SyntaxKind::CloseBracket) {
            self.create_missing_identifier()
        } else {
            self.with_in_allowed(|p| p.parse_expression())
        };
        let node = self.start_node(SyntaxKind::ElementAccessExpression, start);
        if !self.parse_expected(SyntaxKind::CloseBracket) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.add_flags(node, flags);
        self.finish_node(node, &[expr, argument])
    }

    fn finish_call(&mut self, start: u32, callee: NodeIndex, type_arguments: NodeIndex) -> NodeIndex {
        let arguments = self.parse_argument_list();
        let node = self.start_node(SyntaxKind::CallExpression, start);
        if self.arena.flags(arguments).contains(NodeFlags::UNTERMINATED) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &[callee, type_arguments, arguments])
    }

    fn parse_argument_list(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ArgumentList, self.token_pos());
        self.next_token();
        let arguments = self.with_in_allowed(|p| {
            let mut arguments = Vec::new();
            while !matches!(p.token(), SyntaxKind::CloseParen | SyntaxKind::EndOfFile) {
                let consumed = p.tokens.len();
                let argument = if p.is(SyntaxKind::DotDotDot) {
                    let spread = p.start_node(SyntaxKind::SpreadElement, p.token_pos());
                    p.next_token();
                    let operand = p.parse_assignment_expression();
                    p.finish_node(spread, &[operand])
                } else {
                    p.parse_assignment_expression()
                };
                if p.tokens.len() == consumed {
                    if p.parse_optional(SyntaxKind::Comma) {
                        continue;
                    }
                    break;
                }
                arguments.push(argument);
                if !p.parse_optional(SyntaxKind::Comma) {
                    break;
                }
            }
            arguments
        });
        if !self.parse_expected(SyntaxKind::CloseParen) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &arguments)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let node = self.start_node(SyntaxKind::NewExpression, start);
        self.next_token();
        let callee_start = self.token_pos();
        let callee = if self.is_word("new") {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        let callee = self.parse_member_tail(callee_start, callee, false);
        let type_arguments = if self.is(SyntaxKind::LessThan) {
            self.try_parse(|p| {
                let list = p.start_node(SyntaxKind::TypeArgumentList, p.token_pos());
                let arguments = p.parse_type_argument_elements();
                Some(p.finish_node(list, &arguments))
            })
            .unwrap_or(NodeIndex::NONE)
        } else {
            NodeIndex::NONE
        };
        let arguments = if self.is(SyntaxKind::OpenParen) {
            self.parse_argument_list()
        } else {
            NodeIndex::NONE
        };
        if self.arena.flags(arguments).contains(NodeFlags::UNTERMINATED) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &[callee, type_arguments, arguments])
    }

    fn parse_keyword_expression(&mut self, kind: SyntaxKind) -> NodeIndex {
        let node = self.start_node(kind, self.token_pos());
        let text = self.token_value().to_owned();
        self.arena.set_text(node, &text);
        self.next_token();
        self.finish_node(node, &[])
    }

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                let word = self.token_value().to_owned();
                match word.as_str() {
                    "this" => self.parse_keyword_expression(SyntaxKind::ThisKeyword),
                    "super" => self.parse_keyword_expression(SyntaxKind::SuperKeyword),
                    "null" => self.parse_keyword_expression(SyntaxKind::NullKeyword),
                    "true" => self.parse_keyword_expression(SyntaxKind::TrueKeyword),
                    "false" => self.parse_keyword_expression(SyntaxKind::FalseKeyword),
                    "function" => self.parse_function_expression(start, NodeFlags::empty()),
                    "class" => {
                        self.parse_class_like(start, SyntaxKind::ClassExpression, NodeFlags::empty())
                    }
                    "async"
                        if self.look_ahead_next_is(|p| {
                            p.is_word("function") && !p.has_preceding_line_break()
                        }) =>
                    {
                        self.next_token();
                        self.parse_function_expression(start, NodeFlags::ASYNC)
                    }
                    "new" => self.parse_new_expression(),
                    "import" => self.take_identifier(),
                    w if is_reserved_word(w) => self.create_missing_identifier(),
                    _ => self.take_identifier(),
                }
            }
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => self.parse_literal_node(),
            SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::Slash | SyntaxKind::SlashEquals => {
                self.scanner.rescan_slash_token();
                self.parse_literal_node()
            }
            SyntaxKind::OpenParen => {
                let node = self.start_node(SyntaxKind::ParenthesizedExpression, start);
                self.next_token();
                let inner = self.with_in_allowed(|p| p.parse_expression());
                if !self.parse_expected(SyntaxKind::CloseParen) {
                    self.add_flags(node, NodeFlags::UNTERMINATED);
                }
                self.finish_node(node, &[inner])
            }
            SyntaxKind::OpenBracket => self.parse_array_literal(),
            SyntaxKind::OpenBrace => self.parse_object_literal(),
            _ => self.create_missing_identifier(),
        }
    }

    fn parse_function_expression(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        let node = self.start_node(SyntaxKind::FunctionExpression, start);
        self.next_token();
        let mut flags = flags;
        if self.parse_optional(SyntaxKind::Asterisk) {
            flags |= NodeFlags::GENERATOR;
        }
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let (type_parameters, parameters, return_type) = self.parse_signature(SyntaxKind::Colon);
        let body = self.with_in_allowed(|p| p.parse_block());
        let mut children = vec![name, type_parameters, return_type, body];
        children.extend(parameters);
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }

    fn parse_template_expression(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TemplateExpression, self.token_pos());
        let head = self.parse_literal_node();
        let mut children = vec![head];
        loop {
            let span = self.start_node(SyntaxKind::TemplateSpan, self.token_pos());
            let expr = self.with_in_allowed(|p| p.parse_expression());
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
            children.push(self.finish_node(span, &[expr, literal]));
            if done {
                break;
            }
        }
        self.finish_node(node, &children)
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ArrayLiteralExpression, self.token_pos());
        self.next_token();
        let elements = self.with_in_allowed(|p| {
            let mut elements = Vec::new();
            while !matches!(p.token(), SyntaxKind::CloseBracket | SyntaxKind::EndOfFile) {
                if p.is(SyntaxKind::Comma) {
                    let hole = p.start_node(SyntaxKind::OmittedExpression, p.token_pos());
                    elements.push(p.finish_node(hole, &[]));
                    p.next_token();
                    continue;
                }
                let consumed = p.tokens.len();
                let element = if p.is(SyntaxKind::DotDotDot) {
                    let spread = p.start_node(SyntaxKind::SpreadElement, p.token_pos());
                    p.next_token();
                    let operand = p.parse_assignment_expression();
                    p.finish_node(spread, &[operand])
                } else {
                    p.parse_assignment_expression()
                };
                if p.tokens.len() == consumed {
                    break;
                }
                elements.push(element);
                if !p.parse_optional(SyntaxKind::Comma) {
                    break;
                }
            }
            elements
        });
        if !self.parse_expected(SyntaxKind::CloseBracket) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &elements)
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ObjectLiteralExpression, self.token_pos());
        self.next_token();
        let members = self.with_in_allowed(|p| {
            let mut members = Vec::new();
            while !matches!(p.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
                let consumed = p.tokens.len();
                let member = p.parse_object_literal_member();
                if p.tokens.len() == consumed {
                    if p.parse_optional(SyntaxKind::Comma) {
                        continue;
                    }
                    break;
                }
                members.push(member);
                if !p.parse_optional(SyntaxKind::Comma)
                    && (!p.is_property_name_start() || !p.has_preceding_line_break())
                {
                    break;
                }
            }
            members
        });
        if !self.parse_expected(SyntaxKind::CloseBrace) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &members)
    }

    fn parse_object_literal_member(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is(SyntaxKind::DotDotDot) {
            let node = self.start_node(SyntaxKind::SpreadAssignment, start);
            self.next_token();
            let expr = self.parse_assignment_expression();
            return self.finish_node(node, &[expr]);
        }

        let mut flags = NodeFlags::empty();
        if self.is_word("async")
            && self.look_ahead_next_is(|p| {
                !p.has_preceding_line_break()
                    && (p.is_property_name_start() || p.is(SyntaxKind::Asterisk))
            })
        {
            flags |= NodeFlags::ASYNC;
            self.next_token();
        }
        if (self.is_word("get") || self.is_word("set"))
            && self.look_ahead_next_is(|p| p.is_property_name_start())
        {
            let kind = if self.is_word("get") {
                SyntaxKind::GetAccessor
            } else {
                SyntaxKind::SetAccessor
            };
            let node = self.start_node(kind, start);
            self.next_token();
            let name = self.parse_property_name();
            return self.finish_object_method(node, name, flags);
        }
        if self.parse_optional(SyntaxKind::Asterisk) {
            flags |= NodeFlags::GENERATOR;
        }

        let name = self.parse_property_name();
        self.parse_optional(SyntaxKind::Question);
        if matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let node = self.start_node(SyntaxKind::MethodDeclaration, start);
            return self.finish_object_method(node, name, flags);
        }
        if self.parse_optional(SyntaxKind::Colon) {
            let node = self.start_node(SyntaxKind::PropertyAssignment, start);
            let initializer = self.parse_assignment_expression();
            return self.finish_node(node, &[name, NodeIndex::NONE, initializer]);
        }
        let node = self.start_node(SyntaxKind::ShorthandPropertyAssignment, start);
        if self.parse_optional(SyntaxKind::Equals) {
            let default = self.parse_assignment_expression();
            return self.finish_node(node, &[name, default]);
        }
        self.finish_node(node, &[name])
    }

    fn finish_object_method(&mut self, node: NodeIndex, name: NodeIndex, flags: NodeFlags) -> NodeIndex {
        let (type_parameters, parameters, return_type) = self.parse_signature(SyntaxKind::Colon);
        let body = self.parse_block();
        let mut children = vec![name, type_parameters, return_type, body];
        children.extend(parameters);
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }

    // ---- arrow functions ---------------------------------------------------

    fn try_parse_arrow_function(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();
        let is_async = self.is_word("async")
            && self.look_ahead_next_is(|p| {
                !p.has_preceding_line_break()
                    && (p.is_identifier() || matches!(p.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan))
            });
        if !is_async
            && self.is_identifier()
            && self.look_ahead_next_is(|p| p.is(SyntaxKind::EqualsGreaterThan))
        {
            return Some(self.parse_simple_arrow_function(start, NodeFlags::empty()));
        }
        if !is_async && !matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            return None;
        }
        self.try_parse(|p| {
            let mut flags = NodeFlags::empty();
            if is_async {
                p.next_token();
                flags |= NodeFlags::ASYNC;
                if p.is_identifier() {
                    if !p.look_ahead_next_is(|q| q.is(SyntaxKind::EqualsGreaterThan)) {
                        return None;
                    }
                    return Some(p.parse_simple_arrow_function(start, flags));
                }
            }
            let node = p.start_node(SyntaxKind::ArrowFunction, start);
            let (type_parameters, parameters, return_type) = p.parse_signature(SyntaxKind::Colon);
            if !p.is(SyntaxKind::EqualsGreaterThan) {
                return None;
            }
            p.next_token();
            let body = p.parse_arrow_function_body();
            let mut children = vec![NodeIndex::NONE, type_parameters, return_type, body];
            children.extend(parameters);
            p.add_flags(node, flags);
            Some(p.finish_node(node, &children))
        })
    }

    /// `x => body`
    fn parse_simple_arrow_function(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ArrowFunction, start);
        let parameter = self.start_node(SyntaxKind::Parameter, self.token_pos());
        let name = self.parse_identifier();
        let parameter = self.finish_node(parameter, &[name, NodeIndex::NONE, NodeIndex::NONE]);
        self.parse_expected(SyntaxKind::EqualsGreaterThan);
        let body = self.parse_arrow_function_body();
        self.add_flags(node, flags);
        self.finish_node(
            node,
            &[NodeIndex::NONE, NodeIndex::NONE, NodeIndex::NONE, body, parameter],
        )
    }

    fn parse_arrow_function_body(&mut self) -> NodeIndex {
        if self.is(SyntaxKind::OpenBrace) {
            self.with_in_allowed(|p| p.parse_block())
        } else {
            self.parse_assignment_expression()
        }
    }
}
