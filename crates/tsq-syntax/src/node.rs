//! Syntax tree storage.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeIndex`].
//! Children are stored in fixed slots per kind (absent slots hold
//! [`NodeIndex::NONE`]) followed by a variadic tail; the accessors below
//! are the only code that knows the slot layout.

use bitflags::bitflags;
use smallvec::SmallVec;
use tsq_common::TextSpan;

use crate::kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const CONST = 1 << 3;
        const LET = 1 << 4;
        const STATIC = 1 << 5;
        const PRIVATE = 1 << 6;
        const PROTECTED = 1 << 7;
        const PUBLIC = 1 << 8;
        const READONLY = 1 << 9;
        const ABSTRACT = 1 << 10;
        const ASYNC = 1 << 11;
        /// `?` on a member, parameter or tuple element.
        const OPTIONAL = 1 << 12;
        /// `...` on a parameter, binding element or spread.
        const REST = 1 << 13;
        /// Access through `?.`.
        const OPTIONAL_CHAIN = 1 << 14;
        /// `import type` / `export type` / `type` specifier modifier.
        const TYPE_ONLY = 1 << 15;
        /// `export =` rather than `export default`.
        const EXPORT_EQUALS = 1 << 16;
        /// Synthesized by error recovery; zero width.
        const MISSING = 1 << 17;
        /// Literal or list without its closing delimiter.
        const UNTERMINATED = 1 << 18;
        const SINGLE_QUOTE = 1 << 19;
        /// Inside a `declare` context or a `.d.ts` file.
        const AMBIENT = 1 << 20;
        const OVERRIDE = 1 << 21;
        const GENERATOR = 1 << 22;
        /// `global` augmentation or string-named module.
        const STRING_NAMED = 1 << 23;
        /// `keyof`/`typeof`/`unique` operator carried in `Node::op_text`.
        const KEYWORD_OPERATOR = 1 << 24;

        const MODIFIER_MASK = Self::EXPORT.bits() | Self::DEFAULT.bits() | Self::DECLARE.bits()
            | Self::STATIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits()
            | Self::PUBLIC.bits() | Self::READONLY.bits() | Self::ABSTRACT.bits()
            | Self::ASYNC.bits() | Self::OVERRIDE.bits();
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: SyntaxKind,
    pub flags: NodeFlags,
    /// Start of the first token (leading trivia excluded).
    pub pos: u32,
    /// End of the last token.
    pub end: u32,
    pub parent: NodeIndex,
    /// Operator token for unary, binary and type-operator nodes.
    pub op: SyntaxKind,
    children: SmallVec<[NodeIndex; 4]>,
    /// Identifier text, cooked literal value, or keyword text.
    text: Option<Box<str>>,
}

impl Node {
    pub fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// Flat node storage for one source file.
#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, kind: SyntaxKind, pos: u32, end: u32) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            flags: NodeFlags::empty(),
            pos,
            end,
            parent: NodeIndex::NONE,
            op: SyntaxKind::Unknown,
            children: SmallVec::new(),
            text: None,
        });
        idx
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub(crate) fn get_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.0 as usize]
    }

    pub(crate) fn set_text(&mut self, idx: NodeIndex, text: &str) {
        self.get_mut(idx).text = Some(text.into());
    }

    pub(crate) fn set_children(&mut self, parent: NodeIndex, children: &[NodeIndex]) {
        self.get_mut(parent).children = SmallVec::from_slice(children);
    }

    /// Fill in parent links for every node reachable from `root`.
    pub(crate) fn link_parents(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let children = self.nodes[idx.0 as usize].children.clone();
            for child in children {
                if child.is_some() {
                    self.nodes[child.0 as usize].parent = idx;
                    stack.push(child);
                }
            }
        }
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            None
        } else {
            self.nodes.get(idx.0 as usize)
        }
    }

    pub fn kind(&self, idx: NodeIndex) -> SyntaxKind {
        self.get(idx).map_or(SyntaxKind::Unknown, |n| n.kind)
    }

    pub fn flags(&self, idx: NodeIndex) -> NodeFlags {
        self.get(idx).map_or(NodeFlags::empty(), |n| n.flags)
    }

    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.get(idx).map_or(NodeIndex::NONE, |n| n.parent)
    }

    pub fn text(&self, idx: NodeIndex) -> &str {
        self.get(idx).map_or("", |n| n.text())
    }

    pub fn span(&self, idx: NodeIndex) -> TextSpan {
        self.get(idx).map_or_else(TextSpan::default, |n| n.span())
    }

    /// Raw slot list, including `NONE` placeholders.
    pub fn slots(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.get(idx).map_or(&[], |n| n.children.as_slice())
    }

    /// Present children in slot order.
    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.slots(idx).iter().copied().filter(|c| c.is_some())
    }

    pub fn child(&self, idx: NodeIndex, slot: usize) -> NodeIndex {
        self.slots(idx).get(slot).copied().unwrap_or(NodeIndex::NONE)
    }

    fn tail(&self, idx: NodeIndex, from: usize) -> &[NodeIndex] {
        self.slots(idx).get(from..).unwrap_or(&[])
    }

    /// Iterate `idx` and its ancestors, innermost first.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: idx,
            remaining: tsq_common::limits::MAX_ANCESTOR_WALK,
        }
    }

    pub fn find_ancestor(
        &self,
        idx: NodeIndex,
        mut pred: impl FnMut(SyntaxKind) -> bool,
    ) -> NodeIndex {
        self.ancestors(idx)
            .find(|&a| pred(self.kind(a)))
            .unwrap_or(NodeIndex::NONE)
    }

    pub fn is_ancestor_of(&self, ancestor: NodeIndex, idx: NodeIndex) -> bool {
        self.ancestors(idx).any(|a| a == ancestor)
    }

    // ---- slot layout -------------------------------------------------------

    /// Declared name of a declaration-like node.
    pub fn name(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            k if k.is_function_like() || k.is_class_or_interface() || k.is_variable_like() => {
                self.child(idx, 0)
            }
            SyntaxKind::BindingElement
            | SyntaxKind::ShorthandPropertyAssignment
            | SyntaxKind::TypeAliasDeclaration
            | SyntaxKind::EnumDeclaration
            | SyntaxKind::ModuleDeclaration
            | SyntaxKind::TypeParameter
            | SyntaxKind::ImportClause
            | SyntaxKind::NamespaceImport
            | SyntaxKind::NamespaceExport
            | SyntaxKind::ImportSpecifier
            | SyntaxKind::ExportSpecifier
            | SyntaxKind::ImportEqualsDeclaration => self.child(idx, 0),
            SyntaxKind::PropertyAccessExpression => self.child(idx, 1),
            _ => NodeIndex::NONE,
        }
    }

    /// `as`-renamed source name of an import/export specifier, or the
    /// property name of a binding element.
    pub fn property_name(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::ImportSpecifier
            | SyntaxKind::ExportSpecifier
            | SyntaxKind::BindingElement => self.child(idx, 1),
            _ => NodeIndex::NONE,
        }
    }

    pub fn type_parameters(&self, idx: NodeIndex) -> &[NodeIndex] {
        let kind = self.kind(idx);
        let list = if kind.is_function_like()
            || kind.is_class_or_interface()
            || kind == SyntaxKind::TypeAliasDeclaration
        {
            self.child(idx, 1)
        } else {
            NodeIndex::NONE
        };
        self.slots(list)
    }

    /// Type annotation of a variable-like node, the return type of a
    /// function-like node, or the aliased type of a type alias.
    pub fn type_node(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            k if k.is_function_like() => self.child(idx, 2),
            k if k.is_variable_like() => self.child(idx, 1),
            SyntaxKind::TypeAliasDeclaration => self.child(idx, 2),
            SyntaxKind::AsExpression => self.child(idx, 1),
            _ => NodeIndex::NONE,
        }
    }

    pub fn initializer(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            k if k.is_variable_like() => self.child(idx, 2),
            SyntaxKind::BindingElement => self.child(idx, 2),
            _ => NodeIndex::NONE,
        }
    }

    pub fn body(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            k if k.is_function_like() => self.child(idx, 3),
            SyntaxKind::ModuleDeclaration => self.child(idx, 1),
            SyntaxKind::WhileStatement => self.child(idx, 1),
            SyntaxKind::ForStatement => self.child(idx, 3),
            SyntaxKind::ForOfStatement | SyntaxKind::ForInStatement => self.child(idx, 2),
            _ => NodeIndex::NONE,
        }
    }

    pub fn parameters(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.kind(idx).is_function_like() {
            self.tail(idx, 4)
        } else {
            &[]
        }
    }

    /// `extends` clause of a class or interface.
    pub fn extends_clause(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx).is_class_or_interface() {
            self.child(idx, 2)
        } else {
            NodeIndex::NONE
        }
    }

    pub fn implements_clause(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx).is_class_like() {
            self.child(idx, 3)
        } else {
            NodeIndex::NONE
        }
    }

    /// Members of classes, interfaces, type literals, object literals and enums.
    pub fn members(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.kind(idx) {
            k if k.is_class_or_interface() => self.tail(idx, 4),
            SyntaxKind::EnumDeclaration => self.tail(idx, 1),
            SyntaxKind::TypeLiteral | SyntaxKind::ObjectLiteralExpression => self.slots(idx),
            _ => &[],
        }
    }

    /// Statements of a source file, block or module block.
    pub fn statements(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.kind(idx) {
            SyntaxKind::SourceFile | SyntaxKind::Block | SyntaxKind::ModuleBlock => {
                self.slots(idx)
            }
            _ => &[],
        }
    }

    /// Elements of list-shaped nodes.
    pub fn elements(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.kind(idx) {
            SyntaxKind::ObjectBindingPattern
            | SyntaxKind::ArrayBindingPattern
            | SyntaxKind::ArrayLiteralExpression
            | SyntaxKind::ArgumentList
            | SyntaxKind::TypeArgumentList
            | SyntaxKind::TypeParameterList
            | SyntaxKind::NamedImports
            | SyntaxKind::NamedExports
            | SyntaxKind::UnionType
            | SyntaxKind::IntersectionType
            | SyntaxKind::TupleType
            | SyntaxKind::HeritageClause
            | SyntaxKind::VariableStatement => self.slots(idx),
            _ => &[],
        }
    }

    /// Single operand of wrapper nodes and the object of access expressions.
    pub fn expression(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::ExpressionStatement
            | SyntaxKind::ReturnStatement
            | SyntaxKind::ThrowStatement
            | SyntaxKind::ParenthesizedExpression
            | SyntaxKind::SpreadElement
            | SyntaxKind::SpreadAssignment
            | SyntaxKind::TypeOfExpression
            | SyntaxKind::VoidExpression
            | SyntaxKind::DeleteExpression
            | SyntaxKind::AwaitExpression
            | SyntaxKind::NonNullExpression
            | SyntaxKind::PrefixUnaryExpression
            | SyntaxKind::PostfixUnaryExpression
            | SyntaxKind::ExternalModuleReference
            | SyntaxKind::ComputedPropertyName
            | SyntaxKind::ExportAssignment
            | SyntaxKind::PropertyAccessExpression
            | SyntaxKind::ElementAccessExpression
            | SyntaxKind::CallExpression
            | SyntaxKind::NewExpression
            | SyntaxKind::AsExpression
            | SyntaxKind::TemplateSpan
            | SyntaxKind::TypeQuery => self.child(idx, 0),
            SyntaxKind::ForOfStatement | SyntaxKind::ForInStatement => self.child(idx, 1),
            _ => NodeIndex::NONE,
        }
    }

    /// Index expression of an element access.
    pub fn argument_expression(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::ElementAccessExpression {
            self.child(idx, 1)
        } else {
            NodeIndex::NONE
        }
    }

    pub fn type_arguments(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.kind(idx) {
            SyntaxKind::CallExpression | SyntaxKind::NewExpression => {
                self.slots(self.child(idx, 1))
            }
            SyntaxKind::TypeReference => self.tail(idx, 1),
            _ => &[],
        }
    }

    /// The `ArgumentList` node of a call or `new` expression.
    pub fn argument_list(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::CallExpression | SyntaxKind::NewExpression => self.child(idx, 2),
            _ => NodeIndex::NONE,
        }
    }

    pub fn arguments(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.slots(self.argument_list(idx))
    }

    pub fn left(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::BinaryExpression | SyntaxKind::QualifiedName => self.child(idx, 0),
            _ => NodeIndex::NONE,
        }
    }

    pub fn right(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::BinaryExpression | SyntaxKind::QualifiedName => self.child(idx, 1),
            _ => NodeIndex::NONE,
        }
    }

    pub fn module_specifier(&self, idx: NodeIndex) -> NodeIndex {
        match self.kind(idx) {
            SyntaxKind::ImportDeclaration | SyntaxKind::ExportDeclaration => self.child(idx, 1),
            SyntaxKind::ImportEqualsDeclaration => {
                let reference = self.child(idx, 1);
                if self.kind(reference) == SyntaxKind::ExternalModuleReference {
                    self.child(reference, 0)
                } else {
                    NodeIndex::NONE
                }
            }
            _ => NodeIndex::NONE,
        }
    }

    pub fn import_clause(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::ImportDeclaration {
            self.child(idx, 0)
        } else {
            NodeIndex::NONE
        }
    }

    pub fn named_bindings(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::ImportClause {
            self.child(idx, 1)
        } else {
            NodeIndex::NONE
        }
    }

    pub fn export_clause(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::ExportDeclaration {
            self.child(idx, 0)
        } else {
            NodeIndex::NONE
        }
    }

    /// Module reference of `import x = <ref>`.
    pub fn module_reference(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::ImportEqualsDeclaration {
            self.child(idx, 1)
        } else {
            NodeIndex::NONE
        }
    }

    pub fn constraint(&self, idx: NodeIndex) -> NodeIndex {
        if self.kind(idx) == SyntaxKind::TypeParameter {
            self.child(idx, 1)
        } else {
            NodeIndex::NONE
        }
    }

    /// Declared variables of a variable statement or `for` initializer.
    pub fn declarations(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.kind(idx) == SyntaxKind::VariableStatement {
            self.slots(idx)
        } else {
            &[]
        }
    }

    /// The innermost node whose span covers `[start, end)`.
    pub fn covering_node(&self, root: NodeIndex, start: u32, end: u32) -> NodeIndex {
        let mut current = root;
        'descend: loop {
            for child in self.children(current) {
                let span = self.span(child);
                if span.start <= start && end <= span.end() && !(span.is_empty() && start != end) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }
}

/// Ancestor iterator bounded by [`tsq_common::limits::MAX_ANCESTOR_WALK`].
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    next: NodeIndex,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.next.is_none() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = self.arena.parent(current);
        Some(current)
    }
}
