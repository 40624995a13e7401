//! Classes, interfaces and their members.

use super::ParserState;
use crate::kind::SyntaxKind;
use crate::node::{NodeFlags, NodeIndex};

impl ParserState<'_> {
    /// Class declaration or expression, starting at the `class` keyword.
    pub(crate) fn parse_class_like(
        &mut self,
        start: u32,
        kind: SyntaxKind,
        flags: NodeFlags,
    ) -> NodeIndex {
        let node = self.start_node(kind, start);
        self.next_token();
        let name = if self.is_identifier() && !self.is_word("extends") && !self.is_word("implements")
        {
            self.parse_identifier()
        } else if kind == SyntaxKind::ClassExpression || flags.contains(NodeFlags::DEFAULT) {
            NodeIndex::NONE
        } else {
            self.create_missing_identifier()
        };
        let type_parameters = self.parse_type_parameters();
        let extends = self.parse_heritage_clause("extends");
        let implements = self.parse_heritage_clause("implements");
        let mut children = vec![name, type_parameters, extends, implements];
        if self.parse_expected(SyntaxKind::OpenBrace) {
            while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
                let consumed = self.tokens.len();
                let member = self.parse_class_member();
                if member.is_some() {
                    children.push(member);
                }
                if self.tokens.len() == consumed {
                    self.skip_token();
                }
            }
            if !self.parse_expected(SyntaxKind::CloseBrace) {
                self.add_flags(node, NodeFlags::UNTERMINATED);
            }
        }
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }

    pub(crate) fn parse_interface_declaration(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::InterfaceDeclaration, start);
        self.next_token();
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let extends = self.parse_heritage_clause("extends");
        let mut children = vec![name, type_parameters, extends, NodeIndex::NONE];
        if self.is(SyntaxKind::OpenBrace) {
            let (members, terminated) = self.parse_type_members();
            children.extend(members);
            if !terminated {
                self.add_flags(node, NodeFlags::UNTERMINATED);
            }
        }
        self.finish_node(node, &children)
    }

    fn parse_heritage_clause(&mut self, keyword: &str) -> NodeIndex {
        if !self.is_word(keyword) {
            return NodeIndex::NONE;
        }
        let node = self.start_node(SyntaxKind::HeritageClause, self.token_pos());
        self.next_token();
        let mut types = Vec::new();
        loop {
            types.push(self.parse_type_reference());
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node(node, &types)
    }

    /// Modifier keywords before a class member. A keyword followed by
    /// `(`, `:`, `=` and the like is the member name instead.
    fn parse_member_modifiers(&mut self) -> NodeFlags {
        let mut flags = NodeFlags::empty();
        loop {
            let modifier = match self.token_value() {
                "public" => NodeFlags::PUBLIC,
                "private" => NodeFlags::PRIVATE,
                "protected" => NodeFlags::PROTECTED,
                "static" => NodeFlags::STATIC,
                "readonly" => NodeFlags::READONLY,
                "abstract" => NodeFlags::ABSTRACT,
                "override" => NodeFlags::OVERRIDE,
                "async" => NodeFlags::ASYNC,
                "declare" => NodeFlags::AMBIENT,
                "accessor" => NodeFlags::empty(),
                _ => return flags,
            };
            if !self.is(SyntaxKind::Identifier) {
                return flags;
            }
            let is_modifier = self.look_ahead_next_is(|p| {
                !p.has_preceding_line_break()
                    && (p.is_property_name_start()
                        || matches!(p.token(), SyntaxKind::Asterisk | SyntaxKind::OpenBrace))
            });
            if !is_modifier {
                return flags;
            }
            flags |= modifier;
            self.next_token();
        }
    }

    fn parse_class_member(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::Semicolon) {
            return NodeIndex::NONE;
        }
        self.parse_decorators();
        let start = self.token_pos();
        let mut flags = self.parse_member_modifiers();

        if flags.contains(NodeFlags::STATIC) && self.is(SyntaxKind::OpenBrace) {
            // Static initialization block.
            return self.parse_block();
        }

        if self.is_word("constructor")
            && self.look_ahead_next_is(|p| {
                matches!(p.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan)
            })
        {
            let node = self.start_node(SyntaxKind::Constructor, start);
            let name = self.take_identifier();
            return self.finish_function_like_member(node, name, flags);
        }

        if (self.is_word("get") || self.is_word("set"))
            && self.look_ahead_next_is(|p| !p.has_preceding_line_break() && p.is_property_name_start())
        {
            let kind = if self.is_word("get") {
                SyntaxKind::GetAccessor
            } else {
                SyntaxKind::SetAccessor
            };
            let node = self.start_node(kind, start);
            self.next_token();
            let name = self.parse_property_name();
            return self.finish_function_like_member(node, name, flags);
        }

        if self.is(SyntaxKind::OpenBracket) && self.look_ahead_is_index_signature() {
            let node = self.parse_index_signature(start);
            self.add_flags(node, flags);
            return node;
        }

        if self.parse_optional(SyntaxKind::Asterisk) {
            flags |= NodeFlags::GENERATOR;
        }
        let name = self.parse_property_name();
        if self.parse_optional(SyntaxKind::Question) {
            flags |= NodeFlags::OPTIONAL;
        }
        self.parse_optional(SyntaxKind::Exclamation);

        if matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let node = self.start_node(SyntaxKind::MethodDeclaration, start);
            return self.finish_function_like_member(node, name, flags);
        }

        let node = self.start_node(SyntaxKind::PropertyDeclaration, start);
        let type_node = if self.parse_optional(SyntaxKind::Colon) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::Equals) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.add_flags(node, flags);
        self.finish_node(node, &[name, type_node, initializer])
    }

    fn finish_function_like_member(
        &mut self,
        node: NodeIndex,
        name: NodeIndex,
        flags: NodeFlags,
    ) -> NodeIndex {
        let (type_parameters, parameters, return_type) = self.parse_signature(SyntaxKind::Colon);
        let body = self.parse_function_body_or_semicolon();
        let mut children = vec![name, type_parameters, return_type, body];
        children.extend(parameters);
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }

    /// `[key: T]` or the `[K in T]` of a mapped type.
    fn look_ahead_is_index_signature(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_word("readonly") {
                p.next_token();
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.is(SyntaxKind::Colon) || p.is_word("in")
        })
    }

    /// Index signatures share the function-like layout: the key parameter
    /// sits in the parameter tail and the value type in the return slot.
    pub(crate) fn parse_index_signature(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::IndexSignature, start);
        self.next_token();
        self.parse_optional_word("readonly");
        let parameter = self.start_node(SyntaxKind::Parameter, self.token_pos());
        let name = self.parse_identifier_name();
        let key_type = if self.parse_optional(SyntaxKind::Colon) || self.parse_optional_word("in")
        {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let parameter = self.finish_node(parameter, &[name, key_type, NodeIndex::NONE]);
        self.parse_expected(SyntaxKind::CloseBracket);
        if matches!(self.token(), SyntaxKind::Plus | SyntaxKind::Minus) {
            self.next_token();
        }
        if self.parse_optional(SyntaxKind::Question) {
            self.add_flags(node, NodeFlags::OPTIONAL);
        }
        let value_type = if self.parse_optional(SyntaxKind::Colon) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_type_member_separator();
        self.finish_node(
            node,
            &[NodeIndex::NONE, NodeIndex::NONE, value_type, NodeIndex::NONE, parameter],
        )
    }

    fn parse_type_member_separator(&mut self) {
        if !self.parse_optional(SyntaxKind::Semicolon) {
            self.parse_optional(SyntaxKind::Comma);
        }
    }

    /// `{ members }` of an interface or type literal. Returns the members
    /// and whether the closing brace was present.
    pub(crate) fn parse_type_members(&mut self) -> (Vec<NodeIndex>, bool) {
        let mut members = Vec::new();
        self.next_token();
        while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
            let consumed = self.tokens.len();
            let member = self.parse_type_member();
            if member.is_some() {
                members.push(member);
            }
            if self.tokens.len() == consumed {
                self.skip_token();
            }
        }
        let terminated = self.parse_expected(SyntaxKind::CloseBrace);
        (members, terminated)
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let node = self.start_node(SyntaxKind::CallSignature, start);
            return self.finish_signature_member(node, NodeIndex::NONE, NodeFlags::empty());
        }
        if self.is_word("new")
            && self.look_ahead_next_is(|p| {
                matches!(p.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan)
            })
        {
            let node = self.start_node(SyntaxKind::ConstructSignature, start);
            self.next_token();
            return self.finish_signature_member(node, NodeIndex::NONE, NodeFlags::empty());
        }

        let mut flags = NodeFlags::empty();
        if self.is_word("readonly")
            && self.look_ahead_next_is(|p| p.is_property_name_start())
        {
            flags |= NodeFlags::READONLY;
            self.next_token();
        }
        if self.is(SyntaxKind::OpenBracket) && self.look_ahead_is_index_signature() {
            let node = self.parse_index_signature(start);
            self.add_flags(node, flags);
            return node;
        }
        if (self.is_word("get") || self.is_word("set"))
            && self.look_ahead_next_is(|p| !p.has_preceding_line_break() && p.is_property_name_start())
        {
            let kind = if self.is_word("get") {
                SyntaxKind::GetAccessor
            } else {
                SyntaxKind::SetAccessor
            };
            let node = self.start_node(kind, start);
            self.next_token();
            let name = self.parse_property_name();
            return self.finish_signature_member(node, name, flags);
        }

        let name = self.parse_property_name();
        if self.parse_optional(SyntaxKind::Question) {
            flags |= NodeFlags::OPTIONAL;
        }
        if matches!(self.token(), SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            let node = self.start_node(SyntaxKind::MethodSignature, start);
            return self.finish_signature_member(node, name, flags);
        }
        let node = self.start_node(SyntaxKind::PropertySignature, start);
        let type_node = if self.parse_optional(SyntaxKind::Colon) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_type_member_separator();
        self.add_flags(node, flags);
        self.finish_node(node, &[name, type_node, NodeIndex::NONE])
    }

    fn finish_signature_member(
        &mut self,
        node: NodeIndex,
        name: NodeIndex,
        flags: NodeFlags,
    ) -> NodeIndex {
        let (type_parameters, parameters, return_type) = self.parse_signature(SyntaxKind::Colon);
        self.parse_type_member_separator();
        let mut children = vec![name, type_parameters, return_type, NodeIndex::NONE];
        children.extend(parameters);
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }
}
