//! Declaration binding.
//!
//! Walks one [`SourceFile`] and records its declarations in the shared
//! [`SymbolArena`]: scope tables (`locals`) keyed by container node, class
//! and interface members, namespace and module exports, and the symbol
//! declared by each declaration node. A final pass adds synthetic members
//! for `this.x = ...` and `obj.x = ...` assignments.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use tsq_syntax::{NodeArena, NodeFlags, NodeIndex, SourceFile, SyntaxKind};

use crate::symbols::{
    DeclRef, FileId, SymbolArena, SymbolFlags, SymbolId, SymbolOrigin, SymbolTable,
};

/// Per-file binding results.
#[derive(Debug, Default, Clone)]
pub struct FileBinding {
    pub module_symbol: Option<SymbolId>,
    /// Scope tables keyed by their container node.
    pub locals: FxHashMap<NodeIndex, SymbolTable>,
    /// Symbol introduced by each declaration node, including anonymous
    /// literals and function expressions.
    pub declaration_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Class property symbols introduced by constructor parameter properties.
    pub parameter_properties: FxHashMap<NodeIndex, SymbolId>,
    /// Containers whose declarations live in the global table.
    pub global_containers: FxHashSet<NodeIndex>,
}

impl FileBinding {
    pub fn locals_of(&self, container: NodeIndex) -> Option<&SymbolTable> {
        self.locals.get(&container)
    }

    pub fn symbol_of_declaration(&self, node: NodeIndex) -> Option<SymbolId> {
        self.declaration_symbols.get(&node).copied()
    }
}

/// Tables shared by every file of a program.
pub(crate) struct SharedTables<'a> {
    pub symbols: &'a mut SymbolArena,
    pub globals: &'a mut SymbolTable,
    pub ambient_modules: &'a mut SymbolTable,
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Locals(NodeIndex),
    Globals,
    AmbientModules,
    Members(SymbolId),
    Exports(SymbolId),
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    /// Receives `var` declarations and parameters.
    function_container: NodeIndex,
    /// Receives `let`, `const`, classes and other block-scoped declarations.
    block_container: NodeIndex,
    /// Symbol whose exports receive `export`ed declarations.
    export_target: Option<SymbolId>,
    /// Every declaration is exported (ambient module bodies).
    export_all: bool,
}

impl Scope {
    fn function(container: NodeIndex) -> Self {
        Scope {
            function_container: container,
            block_container: container,
            export_target: None,
            export_all: false,
        }
    }

    fn block(self, container: NodeIndex) -> Self {
        Scope {
            block_container: container,
            ..self
        }
    }
}

pub(crate) fn bind_source_file(
    file_id: FileId,
    source: &SourceFile,
    tables: SharedTables<'_>,
) -> FileBinding {
    let _span = tracing::debug_span!("bind_source_file", file = %source.file_name).entered();
    let mut binder = Binder {
        file_id,
        source,
        arena: &source.arena,
        symbols: tables.symbols,
        globals: tables.globals,
        ambient_modules: tables.ambient_modules,
        binding: FileBinding::default(),
    };
    binder.bind_file();
    debug!(
        file = %source.file_name,
        declarations = binder.binding.declaration_symbols.len(),
        "bound file"
    );
    binder.binding
}

struct Binder<'a> {
    file_id: FileId,
    source: &'a SourceFile,
    arena: &'a NodeArena,
    symbols: &'a mut SymbolArena,
    globals: &'a mut SymbolTable,
    ambient_modules: &'a mut SymbolTable,
    binding: FileBinding,
}

impl Binder<'_> {
    fn bind_file(&mut self) {
        let root = self.source.root;
        let module_symbol = if self.source.is_external_module() {
            let name = format!("\"{}\"", module_name_of_path(&self.source.file_name));
            let id = self.symbols.alloc(
                name,
                SymbolFlags::VALUE_MODULE | SymbolFlags::SOURCE_MODULE,
                SymbolOrigin::Declared,
            );
            self.symbols[id]
                .declarations
                .push(DeclRef::new(self.file_id, root));
            self.binding.declaration_symbols.insert(root, id);
            Some(id)
        } else {
            self.binding.global_containers.insert(root);
            None
        };
        self.binding.module_symbol = module_symbol;
        let scope = Scope {
            export_target: module_symbol,
            ..Scope::function(root)
        };
        self.bind_statements(root, scope);
        self.bind_synthetic_members();
    }

    fn bind_statements(&mut self, container: NodeIndex, scope: Scope) {
        for &statement in self.arena.statements(container) {
            self.bind_node(statement, scope);
        }
    }

    fn bind_children(&mut self, node: NodeIndex, scope: Scope) {
        let children: Vec<NodeIndex> = self.arena.children(node).collect();
        for child in children {
            self.bind_node(child, scope);
        }
    }

    fn bind_node(&mut self, node: NodeIndex, scope: Scope) {
        if node.is_none() {
            return;
        }
        match self.arena.kind(node) {
            SyntaxKind::VariableStatement => {
                for &decl in self.arena.declarations(node) {
                    self.bind_variable_declaration(decl, scope);
                }
            }
            SyntaxKind::VariableDeclaration => self.bind_variable_declaration(node, scope),
            SyntaxKind::FunctionDeclaration => self.bind_function_declaration(node, scope),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => {
                self.bind_function_expression(node, scope)
            }
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => {
                self.bind_class(node, scope);
            }
            SyntaxKind::InterfaceDeclaration => self.bind_interface(node, scope),
            SyntaxKind::TypeAliasDeclaration => self.bind_type_alias(node, scope),
            SyntaxKind::EnumDeclaration => self.bind_enum(node, scope),
            SyntaxKind::ModuleDeclaration => self.bind_module(node, scope),
            SyntaxKind::ImportDeclaration => self.bind_import(node, scope),
            SyntaxKind::ImportEqualsDeclaration => self.bind_import_equals(node, scope),
            SyntaxKind::ExportDeclaration => self.bind_export_declaration(node, scope),
            SyntaxKind::ExportAssignment => self.bind_export_assignment(node, scope),
            SyntaxKind::ObjectLiteralExpression => self.bind_object_literal(node, scope),
            SyntaxKind::TypeLiteral => self.bind_type_literal(node, scope),
            SyntaxKind::FunctionType | SyntaxKind::ConstructorType => {
                self.bind_function_type(node, scope)
            }
            SyntaxKind::Block
            | SyntaxKind::ForStatement
            | SyntaxKind::ForOfStatement
            | SyntaxKind::ForInStatement => self.bind_children(node, scope.block(node)),
            SyntaxKind::CatchClause => {
                let inner = scope.block(node);
                let variable = self.arena.child(node, 0);
                if variable.is_some() {
                    let name = self.arena.name(variable);
                    self.bind_binding_name(
                        name,
                        variable,
                        node,
                        SymbolFlags::BLOCK_SCOPED_VARIABLE,
                        false,
                        inner,
                    );
                    self.bind_node(self.arena.type_node(variable), inner);
                }
                self.bind_node(self.arena.child(node, 1), inner);
            }
            _ => self.bind_children(node, scope),
        }
    }

    // ---- symbol tables -----------------------------------------------------

    fn table_mut(&mut self, table: Table) -> &mut SymbolTable {
        match table {
            Table::Locals(container) => self.binding.locals.entry(container).or_default(),
            Table::Globals => self.globals,
            Table::AmbientModules => self.ambient_modules,
            Table::Members(owner) => &mut self.symbols[owner].members,
            Table::Exports(owner) => &mut self.symbols[owner].exports,
        }
    }

    fn container_table(&self, container: NodeIndex) -> Table {
        if self.binding.global_containers.contains(&container) {
            Table::Globals
        } else {
            Table::Locals(container)
        }
    }

    /// Declare `name` in `table`, merging with an existing same-name symbol.
    fn declare(
        &mut self,
        table: Table,
        name: &str,
        flags: SymbolFlags,
        declaration: NodeIndex,
    ) -> SymbolId {
        let existing = self.table_mut(table).get(name).copied();
        let id = match existing {
            Some(id) => {
                trace!(name, "merging declaration");
                id
            }
            None => {
                let id = self.symbols.alloc(name, flags, SymbolOrigin::Declared);
                self.table_mut(table).insert(name.to_string(), id);
                if let Table::Members(owner) | Table::Exports(owner) = table {
                    self.symbols[id].parent = Some(owner);
                }
                id
            }
        };
        let symbol = &mut self.symbols[id];
        symbol.flags |= flags;
        symbol
            .declarations
            .push(DeclRef::new(self.file_id, declaration));
        self.binding.declaration_symbols.insert(declaration, id);
        id
    }

    fn declare_anonymous(&mut self, name: &str, flags: SymbolFlags, declaration: NodeIndex) -> SymbolId {
        let id = self.symbols.alloc(name, flags, SymbolOrigin::Declared);
        self.symbols[id]
            .declarations
            .push(DeclRef::new(self.file_id, declaration));
        self.binding.declaration_symbols.insert(declaration, id);
        id
    }

    /// Declare in a scope container, also exporting when requested.
    fn declare_local(
        &mut self,
        container: NodeIndex,
        name: &str,
        flags: SymbolFlags,
        declaration: NodeIndex,
        exported: bool,
        scope: Scope,
    ) -> SymbolId {
        let table = self.container_table(container);
        let flags = if exported {
            flags | SymbolFlags::EXPORTED
        } else {
            flags
        };
        let id = self.declare(table, name, flags, declaration);
        if exported && let Some(target) = scope.export_target {
            self.symbols[target].exports.insert(name.to_string(), id);
            if self.symbols[id].parent.is_none() {
                self.symbols[id].parent = Some(target);
            }
        }
        id
    }

    fn is_exported(&self, node: NodeIndex, scope: Scope) -> bool {
        scope.export_target.is_some()
            && (scope.export_all || self.arena.flags(node).contains(NodeFlags::EXPORT))
    }

    fn modifier_flags(&self, node: NodeIndex) -> SymbolFlags {
        let flags = self.arena.flags(node);
        let mut result = SymbolFlags::empty();
        for (node_flag, symbol_flag) in [
            (NodeFlags::STATIC, SymbolFlags::STATIC),
            (NodeFlags::PRIVATE, SymbolFlags::PRIVATE),
            (NodeFlags::PROTECTED, SymbolFlags::PROTECTED),
            (NodeFlags::ABSTRACT, SymbolFlags::ABSTRACT),
            (NodeFlags::READONLY, SymbolFlags::READONLY),
            (NodeFlags::OPTIONAL, SymbolFlags::OPTIONAL),
            (NodeFlags::AMBIENT, SymbolFlags::AMBIENT),
        ] {
            if flags.contains(node_flag) {
                result |= symbol_flag;
            }
        }
        result
    }

    /// Text of a declaration or member name; `None` for missing and
    /// non-literal computed names.
    fn declaration_name(&self, name: NodeIndex) -> Option<String> {
        if name.is_none() || self.arena.flags(name).contains(NodeFlags::MISSING) {
            return None;
        }
        match self.arena.kind(name) {
            SyntaxKind::Identifier
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::NumericLiteral => Some(self.arena.text(name).to_string()),
            SyntaxKind::ComputedPropertyName => {
                let expr = self.arena.expression(name);
                match self.arena.kind(expr) {
                    SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => {
                        Some(self.arena.text(expr).to_string())
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // ---- variables and functions -------------------------------------------

    fn bind_variable_declaration(&mut self, decl: NodeIndex, scope: Scope) {
        let flags = self.arena.flags(decl);
        let (container, symbol_flags) = if flags.intersects(NodeFlags::CONST | NodeFlags::LET) {
            (scope.block_container, SymbolFlags::BLOCK_SCOPED_VARIABLE)
        } else {
            (scope.function_container, SymbolFlags::FUNCTION_SCOPED_VARIABLE)
        };
        let exported = self.is_exported(decl, scope);
        let symbol_flags = symbol_flags | self.modifier_flags(decl);
        self.bind_binding_name(self.arena.name(decl), decl, container, symbol_flags, exported, scope);
        self.bind_node(self.arena.type_node(decl), scope);
        self.bind_node(self.arena.initializer(decl), scope);
    }

    /// Declare every identifier of a (possibly destructuring) binding name.
    fn bind_binding_name(
        &mut self,
        name: NodeIndex,
        declaration: NodeIndex,
        container: NodeIndex,
        flags: SymbolFlags,
        exported: bool,
        scope: Scope,
    ) {
        match self.arena.kind(name) {
            SyntaxKind::Identifier => {
                if let Some(text) = self.declaration_name(name) {
                    self.declare_local(container, &text, flags, declaration, exported, scope);
                }
            }
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
                let elements = self.arena.elements(name).to_vec();
                for element in elements {
                    if self.arena.kind(element) != SyntaxKind::BindingElement {
                        continue;
                    }
                    let element_name = self.arena.name(element);
                    self.bind_binding_name(element_name, element, container, flags, exported, scope);
                    let property = self.arena.property_name(element);
                    if self.arena.kind(property) == SyntaxKind::ComputedPropertyName {
                        self.bind_node(property, scope);
                    }
                    self.bind_node(self.arena.initializer(element), scope);
                }
            }
            _ => {}
        }
    }

    fn bind_function_declaration(&mut self, node: NodeIndex, scope: Scope) {
        let flags = SymbolFlags::FUNCTION | self.modifier_flags(node);
        let node_flags = self.arena.flags(node);
        let name = self.declaration_name(self.arena.name(node));
        let exported = self.is_exported(node, scope) && !node_flags.contains(NodeFlags::DEFAULT);
        let id = match &name {
            Some(name) => Some(self.declare_local(
                scope.block_container,
                name,
                flags,
                node,
                exported,
                scope,
            )),
            None => None,
        };
        if node_flags.contains(NodeFlags::DEFAULT) {
            self.export_default(node, id, flags, scope);
        }
        self.bind_function_like_body(node);
    }

    fn export_default(
        &mut self,
        node: NodeIndex,
        local: Option<SymbolId>,
        flags: SymbolFlags,
        scope: Scope,
    ) {
        let Some(target) = scope.export_target else {
            return;
        };
        let id = match local {
            Some(id) => {
                self.symbols[target].exports.insert("default".to_string(), id);
                id
            }
            None => self.declare(Table::Exports(target), "default", flags, node),
        };
        self.symbols[id].flags |= SymbolFlags::EXPORTED | SymbolFlags::DEFAULT_EXPORT;
    }

    fn bind_function_expression(&mut self, node: NodeIndex, _scope: Scope) {
        let id = self.declare_anonymous("__function", SymbolFlags::FUNCTION, node);
        if self.arena.kind(node) == SyntaxKind::FunctionExpression
            && let Some(name) = self.declaration_name(self.arena.name(node))
        {
            self.binding
                .locals
                .entry(node)
                .or_default()
                .insert(name, id);
        }
        self.bind_function_like_body(node);
    }

    /// Type parameters, parameters, return type and body of a function-like
    /// node, all scoped to the node itself.
    fn bind_function_like_body(&mut self, node: NodeIndex) {
        let inner = Scope::function(node);
        self.bind_type_parameters(node, inner);
        let parameters = self.arena.parameters(node).to_vec();
        for parameter in parameters {
            self.bind_parameter(parameter, node, inner);
        }
        self.bind_node(self.arena.type_node(node), inner);
        let body = self.arena.body(node);
        if self.arena.kind(body) == SyntaxKind::Block {
            self.bind_statements(body, inner);
        } else {
            self.bind_node(body, inner);
        }
    }

    fn bind_parameter(&mut self, parameter: NodeIndex, function: NodeIndex, scope: Scope) {
        let name = self.arena.name(parameter);
        let is_this = self.arena.kind(name) == SyntaxKind::Identifier && self.arena.text(name) == "this";
        if !is_this {
            let flags = SymbolFlags::FUNCTION_SCOPED_VARIABLE
                | SymbolFlags::PARAMETER
                | (self.modifier_flags(parameter) & SymbolFlags::OPTIONAL);
            self.bind_binding_name(name, parameter, function, flags, false, scope);
        }
        self.bind_node(self.arena.type_node(parameter), scope);
        self.bind_node(self.arena.initializer(parameter), scope);
    }

    fn bind_type_parameters(&mut self, node: NodeIndex, scope: Scope) {
        let type_parameters = self.arena.type_parameters(node).to_vec();
        for type_parameter in type_parameters {
            if let Some(name) = self.declaration_name(self.arena.name(type_parameter)) {
                self.declare(
                    Table::Locals(node),
                    &name,
                    SymbolFlags::TYPE_PARAMETER,
                    type_parameter,
                );
            }
            self.bind_node(self.arena.constraint(type_parameter), scope);
            self.bind_node(self.arena.child(type_parameter, 2), scope);
        }
    }

    // ---- classes and interfaces --------------------------------------------

    fn bind_class(&mut self, node: NodeIndex, scope: Scope) -> SymbolId {
        let flags = SymbolFlags::CLASS | self.modifier_flags(node);
        let node_flags = self.arena.flags(node);
        let name = self.declaration_name(self.arena.name(node));
        let is_declaration = self.arena.kind(node) == SyntaxKind::ClassDeclaration;
        let id = match &name {
            Some(name) if is_declaration => {
                let exported =
                    self.is_exported(node, scope) && !node_flags.contains(NodeFlags::DEFAULT);
                self.declare_local(scope.block_container, name, flags, node, exported, scope)
            }
            Some(name) => {
                let id = self.declare_anonymous(name, flags, node);
                self.binding
                    .locals
                    .entry(node)
                    .or_default()
                    .insert(name.clone(), id);
                id
            }
            None => self.declare_anonymous("__class", flags, node),
        };
        if is_declaration && node_flags.contains(NodeFlags::DEFAULT) {
            self.export_default(node, name.as_ref().map(|_| id), flags, scope);
        }

        let class_scope = Scope::function(node);
        self.bind_type_parameters(node, class_scope);
        self.bind_node(self.arena.extends_clause(node), scope);
        self.bind_node(self.arena.implements_clause(node), scope);
        let members = self.arena.members(node).to_vec();
        for member in members {
            self.bind_class_member(member, id);
        }
        id
    }

    fn bind_class_member(&mut self, member: NodeIndex, class: SymbolId) {
        let kind = self.arena.kind(member);
        let modifiers = self.modifier_flags(member);
        let table = if modifiers.contains(SymbolFlags::STATIC) {
            Table::Exports(class)
        } else {
            Table::Members(class)
        };
        let name = self.declaration_name(self.arena.name(member));
        match kind {
            SyntaxKind::PropertyDeclaration => {
                if let Some(name) = &name {
                    self.declare(table, name, SymbolFlags::PROPERTY | modifiers, member);
                }
                let inner = Scope::function(member);
                self.bind_node(self.arena.type_node(member), inner);
                self.bind_node(self.arena.initializer(member), inner);
            }
            SyntaxKind::MethodDeclaration => {
                if let Some(name) = &name {
                    self.declare(table, name, SymbolFlags::METHOD | modifiers, member);
                }
                self.bind_function_like_body(member);
            }
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                let flags = if kind == SyntaxKind::GetAccessor {
                    SymbolFlags::GET_ACCESSOR
                } else {
                    SymbolFlags::SET_ACCESSOR
                };
                if let Some(name) = &name {
                    self.declare(table, name, flags | modifiers, member);
                }
                self.bind_function_like_body(member);
            }
            SyntaxKind::Constructor => {
                self.declare(
                    Table::Members(class),
                    "__constructor",
                    SymbolFlags::CONSTRUCTOR,
                    member,
                );
                self.bind_function_like_body(member);
                let parameters = self.arena.parameters(member).to_vec();
                for parameter in parameters {
                    self.bind_parameter_property(parameter, class);
                }
            }
            SyntaxKind::IndexSignature => {
                self.declare(table, "__index", SymbolFlags::SIGNATURE, member);
                self.bind_function_like_body(member);
            }
            SyntaxKind::Block => self.bind_children(member, Scope::function(member)),
            _ => {}
        }
    }

    /// `constructor(public x: number)` also declares property `x`.
    fn bind_parameter_property(&mut self, parameter: NodeIndex, class: SymbolId) {
        let flags = self.arena.flags(parameter);
        if !flags.intersects(
            NodeFlags::PUBLIC | NodeFlags::PRIVATE | NodeFlags::PROTECTED | NodeFlags::READONLY,
        ) {
            return;
        }
        let Some(name) = self.declaration_name(self.arena.name(parameter)) else {
            return;
        };
        let local = self.binding.declaration_symbols.get(&parameter).copied();
        let property_flags =
            SymbolFlags::PROPERTY | (self.modifier_flags(parameter) & !SymbolFlags::OPTIONAL);
        let id = self.declare(Table::Members(class), &name, property_flags, parameter);
        self.binding.parameter_properties.insert(parameter, id);
        // The parameter node keeps resolving to the local parameter.
        if let Some(local) = local {
            self.binding.declaration_symbols.insert(parameter, local);
        }
    }

    fn bind_interface(&mut self, node: NodeIndex, scope: Scope) {
        let Some(name) = self.declaration_name(self.arena.name(node)) else {
            return;
        };
        let exported = self.is_exported(node, scope);
        let flags = SymbolFlags::INTERFACE | self.modifier_flags(node);
        let id = self.declare_local(scope.block_container, &name, flags, node, exported, scope);
        let inner = Scope::function(node);
        self.bind_type_parameters(node, inner);
        self.bind_node(self.arena.extends_clause(node), scope);
        let members = self.arena.members(node).to_vec();
        for member in members {
            self.bind_type_member(member, id);
        }
    }

    fn bind_type_literal(&mut self, node: NodeIndex, _scope: Scope) {
        let id = self.declare_anonymous("__type", SymbolFlags::TYPE_LITERAL, node);
        let members = self.arena.members(node).to_vec();
        for member in members {
            self.bind_type_member(member, id);
        }
    }

    fn bind_function_type(&mut self, node: NodeIndex, _scope: Scope) {
        self.declare_anonymous("__type", SymbolFlags::TYPE_LITERAL, node);
        self.bind_function_like_body(node);
    }

    fn bind_type_member(&mut self, member: NodeIndex, owner: SymbolId) {
        let modifiers = self.modifier_flags(member);
        let name = self.declaration_name(self.arena.name(member));
        let table = Table::Members(owner);
        match self.arena.kind(member) {
            SyntaxKind::PropertySignature => {
                if let Some(name) = &name {
                    self.declare(table, name, SymbolFlags::PROPERTY | modifiers, member);
                }
                self.bind_node(self.arena.type_node(member), Scope::function(member));
            }
            SyntaxKind::MethodSignature => {
                if let Some(name) = &name {
                    self.declare(table, name, SymbolFlags::METHOD | modifiers, member);
                }
                self.bind_function_like_body(member);
            }
            SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                let flags = if self.arena.kind(member) == SyntaxKind::GetAccessor {
                    SymbolFlags::GET_ACCESSOR
                } else {
                    SymbolFlags::SET_ACCESSOR
                };
                if let Some(name) = &name {
                    self.declare(table, name, flags | modifiers, member);
                }
                self.bind_function_like_body(member);
            }
            SyntaxKind::CallSignature => {
                self.declare(table, "__call", SymbolFlags::SIGNATURE, member);
                self.bind_function_like_body(member);
            }
            SyntaxKind::ConstructSignature => {
                self.declare(table, "__new", SymbolFlags::SIGNATURE, member);
                self.bind_function_like_body(member);
            }
            SyntaxKind::IndexSignature => {
                self.declare(table, "__index", SymbolFlags::SIGNATURE, member);
                self.bind_function_like_body(member);
            }
            _ => {}
        }
    }

    fn bind_type_alias(&mut self, node: NodeIndex, scope: Scope) {
        let Some(name) = self.declaration_name(self.arena.name(node)) else {
            return;
        };
        let exported = self.is_exported(node, scope);
        let flags = SymbolFlags::TYPE_ALIAS | self.modifier_flags(node);
        self.declare_local(scope.block_container, &name, flags, node, exported, scope);
        let inner = Scope::function(node);
        self.bind_type_parameters(node, inner);
        self.bind_node(self.arena.type_node(node), inner);
    }

    fn bind_enum(&mut self, node: NodeIndex, scope: Scope) {
        let Some(name) = self.declaration_name(self.arena.name(node)) else {
            return;
        };
        let exported = self.is_exported(node, scope);
        let enum_flag = if self.arena.flags(node).contains(NodeFlags::CONST) {
            SymbolFlags::CONST_ENUM
        } else {
            SymbolFlags::REGULAR_ENUM
        };
        let flags = enum_flag | self.modifier_flags(node);
        let id = self.declare_local(scope.block_container, &name, flags, node, exported, scope);
        let members = self.arena.members(node).to_vec();
        for member in members {
            if let Some(member_name) = self.declaration_name(self.arena.name(member)) {
                self.declare(Table::Exports(id), &member_name, SymbolFlags::ENUM_MEMBER, member);
            }
            self.bind_node(self.arena.initializer(member), scope);
        }
    }

    // ---- namespaces and modules --------------------------------------------

    fn bind_module(&mut self, node: NodeIndex, scope: Scope) {
        let name_node = self.arena.name(node);
        let body = self.arena.body(node);
        let ambient = self.arena.flags(node).contains(NodeFlags::AMBIENT);

        if self.arena.flags(node).contains(NodeFlags::STRING_NAMED) {
            if self.arena.kind(name_node) == SyntaxKind::Identifier {
                // `declare global { ... }`
                self.binding.global_containers.insert(body);
                self.bind_statements(body, Scope::function(body));
                return;
            }
            let name = self.arena.text(name_node).to_string();
            let id = self.declare(
                Table::AmbientModules,
                &name,
                SymbolFlags::VALUE_MODULE | SymbolFlags::AMBIENT,
                node,
            );
            let inner = Scope {
                export_target: Some(id),
                export_all: true,
                ..Scope::function(body)
            };
            self.bind_statements(body, inner);
            return;
        }

        let Some(name) = self.declaration_name(name_node) else {
            return;
        };
        let mut flags = SymbolFlags::NAMESPACE_MODULE | self.modifier_flags(node);
        if self.is_instantiated(node) {
            flags |= SymbolFlags::VALUE_MODULE;
        }
        let exported = self.is_exported(node, scope);
        let id = self.declare_local(scope.block_container, &name, flags, node, exported, scope);
        let inner = Scope {
            export_target: Some(id),
            export_all: scope.export_all && ambient,
            ..Scope::function(if self.arena.kind(body) == SyntaxKind::ModuleDeclaration {
                node
            } else {
                body
            })
        };
        if self.arena.kind(body) == SyntaxKind::ModuleDeclaration {
            self.bind_module(body, inner);
        } else {
            self.bind_statements(body, inner);
        }
    }

    /// Whether a namespace contains value declarations.
    fn is_instantiated(&self, node: NodeIndex) -> bool {
        let body = self.arena.body(node);
        if self.arena.kind(body) == SyntaxKind::ModuleDeclaration {
            return self.is_instantiated(body);
        }
        self.arena.statements(body).iter().any(|&statement| {
            match self.arena.kind(statement) {
                SyntaxKind::InterfaceDeclaration | SyntaxKind::TypeAliasDeclaration => false,
                SyntaxKind::ModuleDeclaration => self.is_instantiated(statement),
                SyntaxKind::ImportDeclaration => false,
                _ => true,
            }
        })
    }

    fn bind_import(&mut self, node: NodeIndex, scope: Scope) {
        let clause = self.arena.import_clause(node);
        if clause.is_none() {
            return;
        }
        let container = scope.block_container;
        if let Some(name) = self.declaration_name(self.arena.name(clause)) {
            self.declare_local(container, &name, SymbolFlags::ALIAS, clause, false, scope);
        }
        let bindings = self.arena.named_bindings(clause);
        match self.arena.kind(bindings) {
            SyntaxKind::NamespaceImport => {
                if let Some(name) = self.declaration_name(self.arena.name(bindings)) {
                    self.declare_local(container, &name, SymbolFlags::ALIAS, bindings, false, scope);
                }
            }
            SyntaxKind::NamedImports => {
                let specifiers = self.arena.elements(bindings).to_vec();
                for specifier in specifiers {
                    let name = self.arena.name(specifier);
                    if self.arena.kind(name) != SyntaxKind::Identifier {
                        continue;
                    }
                    if let Some(name) = self.declaration_name(name) {
                        self.declare_local(
                            container,
                            &name,
                            SymbolFlags::ALIAS,
                            specifier,
                            false,
                            scope,
                        );
                    }
                }
            }
            _ => {}
        }
    }

    fn bind_import_equals(&mut self, node: NodeIndex, scope: Scope) {
        let Some(name) = self.declaration_name(self.arena.name(node)) else {
            return;
        };
        let exported = self.is_exported(node, scope);
        self.declare_local(
            scope.block_container,
            &name,
            SymbolFlags::ALIAS,
            node,
            exported,
            scope,
        );
    }

    fn bind_export_declaration(&mut self, node: NodeIndex, scope: Scope) {
        let Some(target) = scope.export_target else {
            return;
        };
        let clause = self.arena.export_clause(node);
        match self.arena.kind(clause) {
            SyntaxKind::NamedExports => {
                let specifiers = self.arena.elements(clause).to_vec();
                for specifier in specifiers {
                    if let Some(name) = self.declaration_name(self.arena.name(specifier)) {
                        self.declare(
                            Table::Exports(target),
                            &name,
                            SymbolFlags::ALIAS | SymbolFlags::EXPORTED,
                            specifier,
                        );
                    }
                }
            }
            SyntaxKind::NamespaceExport => {
                if let Some(name) = self.declaration_name(self.arena.name(clause)) {
                    self.declare(
                        Table::Exports(target),
                        &name,
                        SymbolFlags::ALIAS | SymbolFlags::EXPORTED,
                        clause,
                    );
                }
            }
            _ => self.symbols[target]
                .export_stars
                .push(DeclRef::new(self.file_id, node)),
        }
    }

    fn bind_export_assignment(&mut self, node: NodeIndex, scope: Scope) {
        if let Some(target) = scope.export_target {
            let name = if self.arena.flags(node).contains(NodeFlags::EXPORT_EQUALS) {
                "export="
            } else {
                "default"
            };
            self.declare(
                Table::Exports(target),
                name,
                SymbolFlags::ALIAS | SymbolFlags::EXPORTED | SymbolFlags::DEFAULT_EXPORT,
                node,
            );
        }
        self.bind_children(node, scope);
    }

    // ---- literals ----------------------------------------------------------

    fn bind_object_literal(&mut self, node: NodeIndex, scope: Scope) {
        let id = self.declare_anonymous("__object", SymbolFlags::OBJECT_LITERAL, node);
        let members = self.arena.members(node).to_vec();
        for member in members {
            let name = self.declaration_name(self.arena.name(member));
            let table = Table::Members(id);
            match self.arena.kind(member) {
                SyntaxKind::PropertyAssignment => {
                    if let Some(name) = &name {
                        self.declare(table, name, SymbolFlags::PROPERTY, member);
                    }
                    let property = self.arena.name(member);
                    if self.arena.kind(property) == SyntaxKind::ComputedPropertyName {
                        self.bind_node(property, scope);
                    }
                    self.bind_node(self.arena.initializer(member), scope);
                }
                SyntaxKind::ShorthandPropertyAssignment => {
                    if let Some(name) = &name {
                        self.declare(table, name, SymbolFlags::PROPERTY, member);
                    }
                    self.bind_node(self.arena.child(member, 1), scope);
                }
                SyntaxKind::MethodDeclaration => {
                    if let Some(name) = &name {
                        self.declare(table, name, SymbolFlags::METHOD, member);
                    }
                    self.bind_function_like_body(member);
                }
                SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                    let flags = if self.arena.kind(member) == SyntaxKind::GetAccessor {
                        SymbolFlags::GET_ACCESSOR
                    } else {
                        SymbolFlags::SET_ACCESSOR
                    };
                    if let Some(name) = &name {
                        self.declare(table, name, flags, member);
                    }
                    self.bind_function_like_body(member);
                }
                _ => self.bind_children(member, scope),
            }
        }
    }

    // ---- synthetic members -------------------------------------------------

    /// `this.x = v` in classes and functions, and `obj.x = v` on variables
    /// initialized with an object literal.
    fn bind_synthetic_members(&mut self) {
        for index in 0..self.arena.len() {
            let node = NodeIndex(index as u32);
            if self.arena.kind(node) != SyntaxKind::BinaryExpression
                || self.arena.get(node).map(|n| n.op) != Some(SyntaxKind::Equals)
            {
                continue;
            }
            let target = self.arena.left(node);
            if self.arena.kind(target) != SyntaxKind::PropertyAccessExpression {
                continue;
            }
            let Some(name) = self.declaration_name(self.arena.name(target)) else {
                continue;
            };
            let object = self.arena.expression(target);
            let owner = match self.arena.kind(object) {
                SyntaxKind::ThisKeyword => self.this_container_symbol(node),
                SyntaxKind::Identifier => self.object_literal_variable(object),
                _ => None,
            };
            let Some(owner) = owner else {
                continue;
            };
            if self.symbols[owner].members.contains_key(&name) {
                continue;
            }
            let existing = self.symbols[owner].synthetic_members.get(&name).copied();
            let id = match existing {
                Some(id) => id,
                None => {
                    let id = self
                        .symbols
                        .alloc(name.clone(), SymbolFlags::PROPERTY, SymbolOrigin::Synthetic);
                    self.symbols[id].parent = Some(owner);
                    self.symbols[owner].synthetic_members.insert(name.clone(), id);
                    trace!(name = %name, "synthetic member");
                    id
                }
            };
            self.symbols[id]
                .declarations
                .push(DeclRef::new(self.file_id, target));
            self.binding.declaration_symbols.insert(target, id);
        }
    }

    /// Class or function whose instance `this` denotes at `node`.
    fn this_container_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        for ancestor in self.arena.ancestors(node).skip(1) {
            let kind = self.arena.kind(ancestor);
            if kind == SyntaxKind::ArrowFunction {
                continue;
            }
            if kind.is_function_like() || kind == SyntaxKind::PropertyDeclaration {
                if self.arena.flags(ancestor).contains(NodeFlags::STATIC) {
                    return None;
                }
                let parent = self.arena.parent(ancestor);
                if self.arena.kind(parent).is_class_like() {
                    return self.binding.symbol_of_declaration(parent);
                }
                if matches!(
                    kind,
                    SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression
                ) {
                    return self.binding.symbol_of_declaration(ancestor);
                }
                return None;
            }
        }
        None
    }

    /// Object literal symbol of the variable `name` refers to, when that
    /// variable is initialized with an object literal.
    fn object_literal_variable(&self, name: NodeIndex) -> Option<SymbolId> {
        let text = self.arena.text(name);
        let variable = self
            .arena
            .ancestors(name)
            .find_map(|a| self.binding.locals.get(&a).and_then(|t| t.get(text)).copied())
            .or_else(|| self.globals.get(text).copied())?;
        let declaration = self.symbols[variable]
            .declarations
            .iter()
            .find(|d| d.file == self.file_id)?
            .node;
        if self.arena.kind(declaration) != SyntaxKind::VariableDeclaration {
            return None;
        }
        let initializer = self.arena.initializer(declaration);
        if self.arena.kind(initializer) != SyntaxKind::ObjectLiteralExpression {
            return None;
        }
        self.binding.symbol_of_declaration(initializer)
    }
}

/// Path without its source extension, as used in module symbol names.
pub fn module_name_of_path(path: &str) -> &str {
    for ext in [
        ".d.ts", ".d.mts", ".d.cts", ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs",
    ] {
        if let Some(stem) = path.strip_suffix(ext) {
            return stem;
        }
    }
    path
}

#[cfg(test)]
#[path = "tests/binder_tests.rs"]
mod binder_tests;
