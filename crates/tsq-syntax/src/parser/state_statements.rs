//! Statements and declarations.

use super::ParserState;
use crate::kind::SyntaxKind;
use crate::node::{NodeFlags, NodeIndex};

impl ParserState<'_> {
    pub(crate) fn parse_source_file(&mut self) -> NodeIndex {
        let root = self.start_node(SyntaxKind::SourceFile, 0);
        let statements = self.parse_statements(false);
        // The end-of-file token closes the token stream.
        self.tokens.push(self.scanner.current_token());
        self.arena.set_children(root, &statements);
        self.arena.get_mut(root).end = self.scanner.text().len() as u32;
        root
    }

    /// Statements up to EOF, or up to the closing `}` when `in_block`.
    pub(crate) fn parse_statements(&mut self, in_block: bool) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::CloseBrace if in_block => break,
                _ => {}
            }
            let consumed = self.tokens.len();
            let statement = self.parse_statement();
            if self.tokens.len() == consumed {
                self.skip_token();
                continue;
            }
            if statement.is_some() {
                statements.push(statement);
            }
        }
        statements
    }

    pub fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return NodeIndex::NONE;
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::OpenBrace => return self.parse_block(),
            SyntaxKind::Semicolon => {
                let node = self.start_node(SyntaxKind::EmptyStatement, start);
                self.next_token();
                return self.finish_node(node, &[]);
            }
            SyntaxKind::At => {
                self.parse_decorators();
                return self.parse_statement();
            }
            SyntaxKind::Identifier => {}
            _ => return self.parse_expression_statement(),
        }

        let declaration = self.parse_declaration(start, NodeFlags::empty());
        if declaration.is_some() {
            return declaration;
        }

        let word = self.token_value().to_owned();
        match word.as_str() {
            "declare" if self.look_ahead_is_declaration_after_modifier() => {
                self.next_token();
                let was_ambient = std::mem::replace(&mut self.ambient, true);
                let declaration =
                    self.parse_declaration(start, NodeFlags::DECLARE | NodeFlags::AMBIENT);
                self.ambient = was_ambient;
                declaration
            }
            "import" if !self.look_ahead_next_is(|p| {
                matches!(p.token(), SyntaxKind::OpenParen | SyntaxKind::Dot)
            }) =>
            {
                self.parse_import_declaration(start, NodeFlags::empty())
            }
            "export" => self.parse_export_declaration(),
            "if" => self.parse_if_statement(),
            "for" => self.parse_for_statement(),
            "while" => self.parse_while_statement(),
            "do" => self.parse_do_statement(),
            "switch" => self.parse_switch_statement(),
            "try" => self.parse_try_statement(),
            "return" | "throw" => self.parse_return_or_throw_statement(),
            "break" | "continue" => self.parse_break_or_continue_statement(),
            "debugger" => {
                let node = self.start_node(SyntaxKind::EmptyStatement, start);
                self.next_token();
                self.parse_semicolon();
                self.finish_node(node, &[])
            }
            _ if self.is_identifier()
                && self.look_ahead_next_is(|p| p.is(SyntaxKind::Colon)) =>
            {
                // Labeled statement; the label itself is not kept.
                self.next_token();
                self.next_token();
                self.parse_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `declare`/`export` followed by something declarable on the same line.
    fn look_ahead_is_declaration_after_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break()
                && p.is_identifier_or_keyword()
                && matches!(
                    p.token_value(),
                    "var"
                        | "let"
                        | "const"
                        | "function"
                        | "async"
                        | "class"
                        | "abstract"
                        | "interface"
                        | "type"
                        | "enum"
                        | "namespace"
                        | "module"
                        | "global"
                )
        })
    }

    /// Declaration keyword at the current token, after any modifiers
    /// already folded into `flags`. Returns `NONE` when the current token
    /// does not start a declaration.
    fn parse_declaration(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        if !self.is_identifier_or_keyword() {
            return NodeIndex::NONE;
        }
        let word = self.token_value().to_owned();
        let declaration = match word.as_str() {
            "var" => self.parse_variable_statement(start),
            "let" if self.look_ahead_next_is(|p| {
                p.is_identifier()
                    || matches!(p.token(), SyntaxKind::OpenBrace | SyntaxKind::OpenBracket)
            }) =>
            {
                self.parse_variable_statement(start)
            }
            "const" => {
                if self.look_ahead_next_is(|p| p.is_word("enum")) {
                    self.next_token();
                    let decl = self.parse_enum_declaration(start);
                    self.add_flags(decl, NodeFlags::CONST);
                    decl
                } else {
                    self.parse_variable_statement(start)
                }
            }
            "function" => self.parse_function_declaration(start, flags),
            "async"
                if self.look_ahead_next_is(|p| {
                    p.is_word("function") && !p.has_preceding_line_break()
                }) =>
            {
                self.next_token();
                self.parse_function_declaration(start, flags | NodeFlags::ASYNC)
            }
            "class" => self.parse_class_like(start, SyntaxKind::ClassDeclaration, flags),
            "abstract" if self.look_ahead_next_is(|p| p.is_word("class")) => {
                self.next_token();
                self.parse_class_like(
                    start,
                    SyntaxKind::ClassDeclaration,
                    flags | NodeFlags::ABSTRACT,
                )
            }
            "interface" if self.look_ahead_next_is(|p| p.is_identifier_or_keyword()) => {
                self.parse_interface_declaration(start)
            }
            "type"
                if self.look_ahead_next_is(|p| {
                    p.is_identifier() && !p.has_preceding_line_break()
                }) =>
            {
                self.parse_type_alias_declaration(start)
            }
            "enum" => self.parse_enum_declaration(start),
            "namespace" | "module"
                if self.look_ahead_next_is(|p| {
                    !p.has_preceding_line_break()
                        && (p.is_identifier() || p.is(SyntaxKind::StringLiteral))
                }) =>
            {
                self.parse_module_declaration(start)
            }
            "global" if self.look_ahead_next_is(|p| p.is(SyntaxKind::OpenBrace)) => {
                self.parse_module_declaration(start)
            }
            _ => return NodeIndex::NONE,
        };
        let mut flags = flags;
        if self.ambient {
            flags |= NodeFlags::AMBIENT;
        }
        self.add_flags(declaration, flags);
        if self.arena.kind(declaration) == SyntaxKind::VariableStatement {
            let declarations = self.arena.declarations(declaration).to_vec();
            for decl in declarations {
                self.add_flags(decl, flags & (NodeFlags::EXPORT | NodeFlags::AMBIENT));
            }
        }
        declaration
    }

    pub(crate) fn parse_decorators(&mut self) {
        while self.parse_optional(SyntaxKind::At) {
            self.parse_left_hand_side_expression();
        }
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::Block, self.token_pos());
        self.parse_expected(SyntaxKind::OpenBrace);
        let statements = self.parse_statements(true);
        if !self.parse_expected(SyntaxKind::CloseBrace) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &statements)
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ExpressionStatement, self.token_pos());
        let expr = self.parse_expression();
        self.parse_semicolon();
        self.finish_node(node, &[expr])
    }

    // ---- variables ---------------------------------------------------------

    fn parse_variable_statement(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::VariableStatement, start);
        let declarations = self.parse_variable_declaration_list();
        self.parse_semicolon();
        let flags = declarations
            .first()
            .map_or(NodeFlags::empty(), |&d| self.arena.flags(d));
        self.add_flags(node, flags & (NodeFlags::CONST | NodeFlags::LET));
        self.finish_node(node, &declarations)
    }

    /// `var|let|const a = 1, b` without the trailing semicolon.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> Vec<NodeIndex> {
        let flags = match self.token_value() {
            "const" => NodeFlags::CONST,
            "let" => NodeFlags::LET,
            _ => NodeFlags::empty(),
        };
        self.next_token();
        let mut declarations = Vec::new();
        loop {
            let decl = self.parse_variable_declaration();
            self.add_flags(decl, flags);
            declarations.push(decl);
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        declarations
    }

    fn parse_variable_declaration(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::VariableDeclaration, self.token_pos());
        let name = self.parse_binding_name();
        self.parse_optional(SyntaxKind::Exclamation);
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
        self.finish_node(node, &[name, type_node, initializer])
    }

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBrace => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracket => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ObjectBindingPattern, self.token_pos());
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
            let consumed = self.tokens.len();
            let element = self.start_node(SyntaxKind::BindingElement, self.token_pos());
            let (name, property_name) = if self.parse_optional(SyntaxKind::DotDotDot) {
                self.add_flags(element, NodeFlags::REST);
                (self.parse_identifier(), NodeIndex::NONE)
            } else {
                let property = self.parse_property_name();
                if self.parse_optional(SyntaxKind::Colon) {
                    (self.parse_binding_name(), property)
                } else {
                    (property, NodeIndex::NONE)
                }
            };
            let initializer = if self.parse_optional(SyntaxKind::Equals) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            if self.tokens.len() == consumed {
                break;
            }
            elements.push(self.finish_node(element, &[name, property_name, initializer]));
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseBrace) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &elements)
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ArrayBindingPattern, self.token_pos());
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBracket | SyntaxKind::EndOfFile) {
            if self.is(SyntaxKind::Comma) {
                let hole = self.start_node(SyntaxKind::OmittedExpression, self.token_pos());
                elements.push(self.finish_node(hole, &[]));
                self.next_token();
                continue;
            }
            let consumed = self.tokens.len();
            let element = self.start_node(SyntaxKind::BindingElement, self.token_pos());
            if self.parse_optional(SyntaxKind::DotDotDot) {
                self.add_flags(element, NodeFlags::REST);
            }
            let name = self.parse_binding_name();
            let initializer = if self.parse_optional(SyntaxKind::Equals) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            if self.tokens.len() == consumed {
                break;
            }
            elements.push(self.finish_node(element, &[name, NodeIndex::NONE, initializer]));
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseBracket) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &elements)
    }

    // ---- functions ---------------------------------------------------------

    fn parse_function_declaration(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        self.next_token();
        let mut flags = flags;
        if self.parse_optional(SyntaxKind::Asterisk) {
            flags |= NodeFlags::GENERATOR;
        }
        let node = self.start_node(SyntaxKind::FunctionDeclaration, start);
        let name = if self.is_identifier() {
            self.parse_identifier()
        } else if flags.contains(NodeFlags::DEFAULT) {
            NodeIndex::NONE
        } else {
            self.create_missing_identifier()
        };
        let (type_parameters, parameters, return_type) = self.parse_signature(SyntaxKind::Colon);
        let body = self.parse_function_body_or_semicolon();
        let mut children = vec![name, type_parameters, return_type, body];
        children.extend(parameters);
        self.add_flags(node, flags);
        self.finish_node(node, &children)
    }

    pub(crate) fn parse_function_body_or_semicolon(&mut self) -> NodeIndex {
        if self.is(SyntaxKind::OpenBrace) {
            self.parse_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        }
    }

    /// Type parameters, parameter list and return type. The return type
    /// follows `return_token` (`:` for declarations, `=>` for function types).
    pub(crate) fn parse_signature(
        &mut self,
        return_token: SyntaxKind,
    ) -> (NodeIndex, Vec<NodeIndex>, NodeIndex) {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = if self.parse_optional(return_token) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        };
        (type_parameters, parameters, return_type)
    }

    pub(crate) fn parse_parameter_list(&mut self) -> Vec<NodeIndex> {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParen) {
            return parameters;
        }
        while !matches!(
            self.token(),
            SyntaxKind::CloseParen | SyntaxKind::EndOfFile | SyntaxKind::OpenBrace
        ) {
            let consumed = self.tokens.len();
            let parameter = self.parse_parameter();
            if self.tokens.len() == consumed {
                break;
            }
            parameters.push(parameter);
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParen);
        parameters
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        self.parse_decorators();
        let node = self.start_node(SyntaxKind::Parameter, self.token_pos());
        let mut flags = NodeFlags::empty();
        loop {
            let modifier = match self.token_value() {
                "public" => NodeFlags::PUBLIC,
                "private" => NodeFlags::PRIVATE,
                "protected" => NodeFlags::PROTECTED,
                "readonly" => NodeFlags::READONLY,
                "override" => NodeFlags::OVERRIDE,
                _ => break,
            };
            let is_modifier = self.is(SyntaxKind::Identifier)
                && self.look_ahead_next_is(|p| {
                    p.is_identifier_or_keyword()
                        || matches!(
                            p.token(),
                            SyntaxKind::OpenBrace | SyntaxKind::OpenBracket | SyntaxKind::DotDotDot
                        )
                });
            if !is_modifier {
                break;
            }
            flags |= modifier;
            self.next_token();
        }
        if self.parse_optional(SyntaxKind::DotDotDot) {
            flags |= NodeFlags::REST;
        }
        let name = if self.is_word("this") {
            self.take_identifier()
        } else {
            self.parse_binding_name()
        };
        if self.parse_optional(SyntaxKind::Question) {
            flags |= NodeFlags::OPTIONAL;
        }
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
        self.add_flags(node, flags);
        self.finish_node(node, &[name, type_node, initializer])
    }

    // ---- types and modules -------------------------------------------------

    fn parse_type_alias_declaration(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TypeAliasDeclaration, start);
        self.next_token();
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::Equals);
        let aliased = self.parse_type();
        self.parse_semicolon();
        self.finish_node(node, &[name, type_parameters, aliased])
    }

    fn parse_enum_declaration(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::EnumDeclaration, start);
        self.next_token();
        let name = self.parse_identifier();
        let mut children = vec![name];
        if self.parse_expected(SyntaxKind::OpenBrace) {
            while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
                let consumed = self.tokens.len();
                let member = self.start_node(SyntaxKind::EnumMember, self.token_pos());
                let member_name = self.parse_property_name();
                let initializer = if self.parse_optional(SyntaxKind::Equals) {
                    self.parse_assignment_expression()
                } else {
                    NodeIndex::NONE
                };
                if self.tokens.len() == consumed {
                    break;
                }
                children.push(self.finish_node(member, &[member_name, NodeIndex::NONE, initializer]));
                if !self.parse_optional(SyntaxKind::Comma) {
                    break;
                }
            }
            if !self.parse_expected(SyntaxKind::CloseBrace) {
                self.add_flags(node, NodeFlags::UNTERMINATED);
            }
        }
        self.finish_node(node, &children)
    }

    /// `namespace A.B {}`, `module "m" {}`, `declare module "m";` or `global {}`.
    fn parse_module_declaration(&mut self, start: u32) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ModuleDeclaration, start);
        if self.is_word("global") {
            let name = self.take_identifier();
            self.add_flags(node, NodeFlags::STRING_NAMED);
            let body = self.parse_module_block();
            return self.finish_node(node, &[name, body]);
        }
        self.next_token();
        if self.is(SyntaxKind::StringLiteral) {
            let name = self.parse_literal_node();
            self.add_flags(node, NodeFlags::STRING_NAMED);
            let body = if self.is(SyntaxKind::OpenBrace) {
                self.parse_module_block()
            } else {
                self.parse_semicolon();
                NodeIndex::NONE
            };
            return self.finish_node(node, &[name, body]);
        }
        self.parse_namespace_body(node)
    }

    fn parse_namespace_body(&mut self, node: NodeIndex) -> NodeIndex {
        let name = self.parse_identifier();
        let body = if self.is(SyntaxKind::Dot) {
            self.next_token();
            let inner = self.start_node(SyntaxKind::ModuleDeclaration, self.token_pos());
            self.add_flags(inner, NodeFlags::EXPORT);
            self.parse_namespace_body(inner)
        } else {
            self.parse_module_block()
        };
        self.finish_node(node, &[name, body])
    }

    fn parse_module_block(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ModuleBlock, self.token_pos());
        if !self.parse_expected(SyntaxKind::OpenBrace) {
            return self.finish_node(node, &[]);
        }
        let statements = self.parse_statements(true);
        if !self.parse_expected(SyntaxKind::CloseBrace) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &statements)
    }

    // ---- imports and exports -----------------------------------------------

    fn parse_import_declaration(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        self.next_token();
        if self.is(SyntaxKind::StringLiteral) {
            let node = self.start_node(SyntaxKind::ImportDeclaration, start);
            let specifier = self.parse_literal_node();
            self.parse_semicolon();
            return self.finish_node(node, &[NodeIndex::NONE, specifier]);
        }

        let mut clause_flags = NodeFlags::empty();
        if self.is_word("type") && self.look_ahead_is_type_only_import() {
            clause_flags |= NodeFlags::TYPE_ONLY;
            self.next_token();
        }

        if self.is_identifier_or_keyword()
            && self.look_ahead_next_is(|p| p.is(SyntaxKind::Equals))
        {
            return self.parse_import_equals_declaration(start, flags | clause_flags);
        }

        let node = self.start_node(SyntaxKind::ImportDeclaration, start);
        let clause = self.start_node(SyntaxKind::ImportClause, self.token_pos());
        let default_name = if self.is_identifier() && !self.is_from_before_specifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        if default_name.is_some() {
            self.parse_optional(SyntaxKind::Comma);
        }
        let named_bindings = match self.token() {
            SyntaxKind::Asterisk => {
                let ns = self.start_node(SyntaxKind::NamespaceImport, self.token_pos());
                self.next_token();
                self.parse_optional_word("as");
                let name = self.parse_identifier();
                self.finish_node(ns, &[name])
            }
            SyntaxKind::OpenBrace => self.parse_named_imports_or_exports(
                SyntaxKind::NamedImports,
                SyntaxKind::ImportSpecifier,
            ),
            _ => NodeIndex::NONE,
        };
        self.add_flags(clause, clause_flags);
        let clause = self.finish_node(clause, &[default_name, named_bindings]);
        let specifier = self.parse_from_clause();
        self.parse_semicolon();
        self.add_flags(node, flags);
        self.finish_node(node, &[clause, specifier])
    }

    /// `type` in `import type X`/`import type {..}` rather than a default
    /// import named `type`.
    fn look_ahead_is_type_only_import(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            match p.token() {
                SyntaxKind::OpenBrace | SyntaxKind::Asterisk => true,
                SyntaxKind::Identifier => !p.is_from_before_specifier(),
                _ => false,
            }
        })
    }

    /// Current token is the `from` keyword followed by the module specifier.
    fn is_from_before_specifier(&mut self) -> bool {
        self.is_word("from") && self.look_ahead_next_is(|p| p.is(SyntaxKind::StringLiteral))
    }

    fn parse_from_clause(&mut self) -> NodeIndex {
        if self.parse_optional_word("from") && self.is(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            NodeIndex::NONE
        }
    }

    fn parse_import_equals_declaration(&mut self, start: u32, flags: NodeFlags) -> NodeIndex {
        let node = self.start_node(SyntaxKind::ImportEqualsDeclaration, start);
        let name = self.parse_identifier_name();
        self.parse_expected(SyntaxKind::Equals);
        let reference = if self.is_word("require")
            && self.look_ahead_next_is(|p| p.is(SyntaxKind::OpenParen))
        {
            let reference = self.start_node(SyntaxKind::ExternalModuleReference, self.token_pos());
            self.next_token();
            self.next_token();
            let specifier = if self.is(SyntaxKind::StringLiteral) {
                self.parse_literal_node()
            } else {
                NodeIndex::NONE
            };
            self.parse_expected(SyntaxKind::CloseParen);
            self.finish_node(reference, &[specifier])
        } else {
            self.parse_entity_name()
        };
        self.parse_semicolon();
        self.add_flags(node, flags);
        self.finish_node(node, &[name, reference])
    }

    pub(crate) fn parse_named_imports_or_exports(
        &mut self,
        list_kind: SyntaxKind,
        specifier_kind: SyntaxKind,
    ) -> NodeIndex {
        let node = self.start_node(list_kind, self.token_pos());
        self.next_token();
        let mut elements = Vec::new();
        while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
            if self.parse_optional(SyntaxKind::Comma) {
                continue;
            }
            if !self.is_identifier_or_keyword() && !self.is(SyntaxKind::StringLiteral) {
                break;
            }
            elements.push(self.parse_import_or_export_specifier(specifier_kind));
            if !self.parse_optional(SyntaxKind::Comma) {
                break;
            }
        }
        if !self.parse_expected(SyntaxKind::CloseBrace) {
            self.add_flags(node, NodeFlags::UNTERMINATED);
        }
        self.finish_node(node, &elements)
    }

    /// `name`, `type name`, `source as name`, `"string name" as name`.
    fn parse_import_or_export_specifier(&mut self, kind: SyntaxKind) -> NodeIndex {
        let node = self.start_node(kind, self.token_pos());
        if self.is_word("type") && self.look_ahead_is_type_specifier_modifier() {
            self.add_flags(node, NodeFlags::TYPE_ONLY);
            self.next_token();
        }
        let first = if self.is_word("as")
            && self.look_ahead_next_is(|p| {
                p.is_identifier_or_keyword() || p.is(SyntaxKind::StringLiteral)
            }) {
            // `{ as alias }`: the source name has not been typed yet.
            self.create_missing_identifier()
        } else {
            self.parse_specifier_name()
        };
        if self.parse_optional_word("as") {
            let name = self.parse_specifier_name();
            self.finish_node(node, &[name, first])
        } else {
            self.finish_node(node, &[first, NodeIndex::NONE])
        }
    }

    fn parse_specifier_name(&mut self) -> NodeIndex {
        if self.is(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name()
        }
    }

    fn look_ahead_is_type_specifier_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is(SyntaxKind::StringLiteral) {
                return true;
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            if !p.is_word("as") {
                return true;
            }
            // `type as as x` imports `as` as a type; `type as x` renames `type`.
            p.next_token();
            p.is_word("as")
        })
    }

    fn parse_export_declaration(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();

        if self.is(SyntaxKind::Equals) {
            let node = self.start_node(SyntaxKind::ExportAssignment, start);
            self.next_token();
            let expr = self.parse_assignment_expression();
            self.parse_semicolon();
            self.add_flags(node, NodeFlags::EXPORT_EQUALS);
            return self.finish_node(node, &[expr]);
        }

        if self.is_word("default") {
            self.next_token();
            let flags = NodeFlags::EXPORT | NodeFlags::DEFAULT;
            if self.is_word("interface")
                || self.is_word("class")
                || self.is_word("function")
                || self.is_word("abstract")
                || self.is_word("async")
            {
                let declaration = self.parse_declaration(start, flags);
                if declaration.is_some() {
                    return declaration;
                }
            }
            let node = self.start_node(SyntaxKind::ExportAssignment, start);
            let expr = self.parse_assignment_expression();
            self.parse_semicolon();
            return self.finish_node(node, &[expr]);
        }

        if self.is_word("as") && self.look_ahead_next_is(|p| p.is_word("namespace")) {
            // UMD global name; carries nothing for queries.
            let node = self.start_node(SyntaxKind::EmptyStatement, start);
            self.next_token();
            self.next_token();
            self.parse_identifier();
            self.parse_semicolon();
            return self.finish_node(node, &[]);
        }

        let mut type_only = NodeFlags::empty();
        if self.is_word("type")
            && self.look_ahead_next_is(|p| matches!(p.token(), SyntaxKind::OpenBrace | SyntaxKind::Asterisk))
        {
            type_only = NodeFlags::TYPE_ONLY;
            self.next_token();
        }

        match self.token() {
            SyntaxKind::Asterisk => {
                let node = self.start_node(SyntaxKind::ExportDeclaration, start);
                self.next_token();
                let clause = if self.is_word("as") {
                    let ns = self.start_node(SyntaxKind::NamespaceExport, self.token_pos());
                    self.next_token();
                    let name = self.parse_specifier_name();
                    self.finish_node(ns, &[name])
                } else {
                    NodeIndex::NONE
                };
                let specifier = self.parse_from_clause();
                self.parse_semicolon();
                self.add_flags(node, type_only);
                return self.finish_node(node, &[clause, specifier]);
            }
            SyntaxKind::OpenBrace => {
                let node = self.start_node(SyntaxKind::ExportDeclaration, start);
                let clause = self.parse_named_imports_or_exports(
                    SyntaxKind::NamedExports,
                    SyntaxKind::ExportSpecifier,
                );
                let specifier = self.parse_from_clause();
                self.parse_semicolon();
                self.add_flags(node, type_only);
                return self.finish_node(node, &[clause, specifier]);
            }
            _ => {}
        }

        if self.is_word("import") {
            return self.parse_import_declaration(start, NodeFlags::EXPORT);
        }
        if self.is_word("declare") && self.look_ahead_is_declaration_after_modifier() {
            self.next_token();
            let was_ambient = std::mem::replace(&mut self.ambient, true);
            let declaration = self.parse_declaration(
                start,
                NodeFlags::EXPORT | NodeFlags::DECLARE | NodeFlags::AMBIENT,
            );
            self.ambient = was_ambient;
            return declaration;
        }
        let declaration = self.parse_declaration(start, NodeFlags::EXPORT);
        if declaration.is_some() {
            return declaration;
        }
        self.parse_expression_statement()
    }

    // ---- control flow ------------------------------------------------------

    fn parse_parenthesized_condition(&mut self) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenParen);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParen);
        condition
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::IfStatement, self.token_pos());
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional_word("else") {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(node, &[condition, then_statement, else_statement])
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::WhileStatement, self.token_pos());
        self.next_token();
        let condition = self.parse_parenthesized_condition();
        let body = self.parse_statement();
        self.finish_node(node, &[condition, body])
    }

    /// `do body while (cond)` is stored as a `WhileStatement`.
    fn parse_do_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::WhileStatement, self.token_pos());
        self.next_token();
        let body = self.parse_statement();
        self.parse_optional_word("while");
        let condition = self.parse_parenthesized_condition();
        self.parse_semicolon();
        self.finish_node(node, &[condition, body])
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.next_token();
        self.parse_optional_word("await");
        self.parse_expected(SyntaxKind::OpenParen);

        let was_disallow_in = std::mem::replace(&mut self.disallow_in, true);
        let initializer = if self.is(SyntaxKind::Semicolon) {
            NodeIndex::NONE
        } else if self.is_word("var") || self.is_word("let") || self.is_word("const") {
            let list = self.start_node(SyntaxKind::VariableStatement, self.token_pos());
            let declarations = self.parse_variable_declaration_list();
            let flags = declarations
                .first()
                .map_or(NodeFlags::empty(), |&d| self.arena.flags(d));
            self.add_flags(list, flags & (NodeFlags::CONST | NodeFlags::LET));
            self.finish_node(list, &declarations)
        } else {
            self.parse_expression()
        };
        self.disallow_in = was_disallow_in;

        let kind = if self.parse_optional_word("of") {
            SyntaxKind::ForOfStatement
        } else if self.parse_optional_word("in") {
            SyntaxKind::ForInStatement
        } else {
            SyntaxKind::ForStatement
        };
        let node = self.start_node(kind, start);
        if kind == SyntaxKind::ForStatement {
            self.parse_expected(SyntaxKind::Semicolon);
            let condition = if self.is(SyntaxKind::Semicolon) {
                NodeIndex::NONE
            } else {
                self.parse_expression()
            };
            self.parse_expected(SyntaxKind::Semicolon);
            let incrementor = if self.is(SyntaxKind::CloseParen) {
                NodeIndex::NONE
            } else {
                self.parse_expression()
            };
            self.parse_expected(SyntaxKind::CloseParen);
            let body = self.parse_statement();
            return self.finish_node(node, &[initializer, condition, incrementor, body]);
        }
        let expr = self.parse_assignment_expression();
        self.parse_expected(SyntaxKind::CloseParen);
        let body = self.parse_statement();
        self.finish_node(node, &[initializer, expr, body])
    }

    /// `switch` is kept as a block of its discriminant, case labels and
    /// clause statements, which is all that scoping and lookups need.
    fn parse_switch_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::Block, self.token_pos());
        self.next_token();
        let discriminant_start = self.token_pos();
        let discriminant = self.parse_parenthesized_condition();
        let discriminant_statement =
            self.start_node(SyntaxKind::ExpressionStatement, discriminant_start);
        let mut children = vec![self.finish_node(discriminant_statement, &[discriminant])];
        if self.parse_expected(SyntaxKind::OpenBrace) {
            while !matches!(self.token(), SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) {
                let consumed = self.tokens.len();
                if self.is_word("case") {
                    let label = self.start_node(SyntaxKind::ExpressionStatement, self.token_pos());
                    self.next_token();
                    let expr = self.parse_expression();
                    self.parse_expected(SyntaxKind::Colon);
                    children.push(self.finish_node(label, &[expr]));
                } else if self.is_word("default") {
                    self.next_token();
                    self.parse_expected(SyntaxKind::Colon);
                } else {
                    let statement = self.parse_statement();
                    if statement.is_some() {
                        children.push(statement);
                    }
                }
                if self.tokens.len() == consumed {
                    self.skip_token();
                }
            }
            self.parse_expected(SyntaxKind::CloseBrace);
        }
        self.finish_node(node, &children)
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let node = self.start_node(SyntaxKind::TryStatement, self.token_pos());
        self.next_token();
        let block = self.parse_block();
        let catch_clause = if self.is_word("catch") {
            let clause = self.start_node(SyntaxKind::CatchClause, self.token_pos());
            self.next_token();
            let variable = if self.parse_optional(SyntaxKind::OpenParen) {
                let decl = self.parse_variable_declaration();
                self.parse_expected(SyntaxKind::CloseParen);
                decl
            } else {
                NodeIndex::NONE
            };
            let body = self.parse_block();
            self.finish_node(clause, &[variable, body])
        } else {
            NodeIndex::NONE
        };
        let finally_block = if self.parse_optional_word("finally") {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        self.finish_node(node, &[block, catch_clause, finally_block])
    }

    fn parse_return_or_throw_statement(&mut self) -> NodeIndex {
        let kind = if self.is_word("return") {
            SyntaxKind::ReturnStatement
        } else {
            SyntaxKind::ThrowStatement
        };
        let node = self.start_node(kind, self.token_pos());
        self.next_token();
        let expr = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_semicolon();
        self.finish_node(node, &[expr])
    }

    fn parse_break_or_continue_statement(&mut self) -> NodeIndex {
        let kind = if self.is_word("break") {
            SyntaxKind::BreakStatement
        } else {
            SyntaxKind::ContinueStatement
        };
        let node = self.start_node(kind, self.token_pos());
        self.next_token();
        let label = if self.is_identifier() && !self.has_preceding_line_break() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.finish_node(node, &[label])
    }
}
