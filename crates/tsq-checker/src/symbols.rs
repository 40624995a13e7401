//! Program-wide symbol storage.
//!
//! Every declaration in the program binds into one [`SymbolArena`]. A
//! [`SymbolId`] is therefore the merged identity of a declared entity: two
//! declarations that merge (overloads, interface augmentation, namespace
//! reopening) share one id no matter which file they live in.

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tsq_syntax::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declaration node in a specific file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclRef {
    pub file: FileId,
    pub node: NodeIndex,
}

impl DeclRef {
    pub const fn new(file: FileId, node: NodeIndex) -> Self {
        DeclRef { file, node }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u32 {
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE = 1 << 1;
        const PROPERTY = 1 << 2;
        const ENUM_MEMBER = 1 << 3;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const CONST_ENUM = 1 << 7;
        const REGULAR_ENUM = 1 << 8;
        const VALUE_MODULE = 1 << 9;
        const NAMESPACE_MODULE = 1 << 10;
        const TYPE_LITERAL = 1 << 11;
        const OBJECT_LITERAL = 1 << 12;
        const METHOD = 1 << 13;
        const CONSTRUCTOR = 1 << 14;
        const GET_ACCESSOR = 1 << 15;
        const SET_ACCESSOR = 1 << 16;
        /// Call, construct and index signatures.
        const SIGNATURE = 1 << 17;
        const TYPE_PARAMETER = 1 << 18;
        const TYPE_ALIAS = 1 << 19;
        const ALIAS = 1 << 20;
        const PARAMETER = 1 << 21;
        const OPTIONAL = 1 << 22;
        const STATIC = 1 << 23;
        const PRIVATE = 1 << 24;
        const PROTECTED = 1 << 25;
        const ABSTRACT = 1 << 26;
        const READONLY = 1 << 27;
        /// Symbol of a whole source file that is an external module.
        const SOURCE_MODULE = 1 << 28;
        const AMBIENT = 1 << 29;
        const EXPORTED = 1 << 30;
        const DEFAULT_EXPORT = 1 << 31;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const ENUM = Self::CONST_ENUM.bits() | Self::REGULAR_ENUM.bits();
        const MODULE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits();
        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const VALUE = Self::VARIABLE.bits() | Self::PROPERTY.bits() | Self::ENUM_MEMBER.bits()
            | Self::FUNCTION.bits() | Self::CLASS.bits() | Self::ENUM.bits()
            | Self::VALUE_MODULE.bits() | Self::METHOD.bits() | Self::ACCESSOR.bits()
            | Self::OBJECT_LITERAL.bits();
        const TYPE = Self::CLASS.bits() | Self::INTERFACE.bits() | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits() | Self::TYPE_LITERAL.bits()
            | Self::TYPE_PARAMETER.bits() | Self::TYPE_ALIAS.bits();
        const NAMESPACE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits()
            | Self::ENUM.bits();
        const CLASS_MEMBER = Self::METHOD.bits() | Self::ACCESSOR.bits() | Self::PROPERTY.bits();
        const MODIFIERS = Self::STATIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits()
            | Self::ABSTRACT.bits() | Self::READONLY.bits() | Self::OPTIONAL.bits()
            | Self::AMBIENT.bits() | Self::EXPORTED.bits() | Self::DEFAULT_EXPORT.bits();
    }
}

bitflags! {
    /// Which declaration spaces a name lookup accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Meaning: u8 {
        const VALUE = 1 << 0;
        const TYPE = 1 << 1;
        const NAMESPACE = 1 << 2;
        const ALL = Self::VALUE.bits() | Self::TYPE.bits() | Self::NAMESPACE.bits();
    }
}

impl SymbolFlags {
    pub fn meaning(self) -> Meaning {
        let mut meaning = Meaning::empty();
        if self.intersects(SymbolFlags::VALUE) {
            meaning |= Meaning::VALUE;
        }
        if self.intersects(SymbolFlags::TYPE) {
            meaning |= Meaning::TYPE;
        }
        if self.intersects(SymbolFlags::NAMESPACE) {
            meaning |= Meaning::NAMESPACE;
        }
        meaning
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOrigin {
    Declared,
    /// Created by an assignment such as `this.x = 1` rather than a declaration.
    Synthetic,
}

pub type SymbolTable = IndexMap<String, SymbolId, FxBuildHasher>;

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub origin: SymbolOrigin,
    pub declarations: SmallVec<[DeclRef; 2]>,
    pub parent: Option<SymbolId>,
    /// Instance members of classes, members of interfaces and literals.
    pub members: SymbolTable,
    /// Module and namespace exports, class statics and enum members.
    pub exports: SymbolTable,
    /// Members created by assignments; looked up after `members`.
    pub synthetic_members: SymbolTable,
    /// `export * from "..."` declarations of a module.
    pub export_stars: Vec<DeclRef>,
}

impl Symbol {
    fn new(name: String, flags: SymbolFlags, origin: SymbolOrigin) -> Self {
        Symbol {
            name,
            flags,
            origin,
            declarations: SmallVec::new(),
            parent: None,
            members: SymbolTable::default(),
            exports: SymbolTable::default(),
            synthetic_members: SymbolTable::default(),
            export_stars: Vec::new(),
        }
    }

    pub fn has(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }

    pub fn first_declaration(&self) -> Option<DeclRef> {
        self.declarations.first().copied()
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == SymbolOrigin::Synthetic
    }

    /// Compiler-generated names such as `__object` or `__call`.
    pub fn is_internal_name(&self) -> bool {
        self.name.starts_with("__")
    }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub(crate) fn alloc(
        &mut self,
        name: impl Into<String>,
        flags: SymbolFlags,
        origin: SymbolOrigin,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(name.into(), flags, origin));
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}

/// Ids are only minted by the arena that owns them.
impl std::ops::Index<SymbolId> for SymbolArena {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}

impl std::ops::IndexMut<SymbolId> for SymbolArena {
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }
}
