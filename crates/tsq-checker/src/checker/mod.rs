//! Checker boundary queries.
//!
//! [`TypeChecker`] is a cheap per-query view over a bound [`Program`]. It
//! answers what editor features ask: which symbol a node denotes, what type
//! a symbol or expression has, which members and signatures a type exposes.
//! Symbol types are cached on the program so concurrent queries share them.
//!
//! The implementation is split by concern:
//!
//! | module | queries |
//! |---|---|
//! | `names` | name resolution, `symbol_at_location`, aliases, module exports |
//! | `declarations` | `type_of_symbol` for every declaration kind |
//! | `type_nodes` | types written in source, alias expansion, instantiation |
//! | `expressions` | `type_of_expression`, `contextual_type`, `this` |
//! | `members` | apparent types, properties, index signatures |
//! | `signatures` | call/construct signatures, overloads, generic inference |
//! | `relations` | assignability used to pick overloads |

mod declarations;
mod expressions;
mod members;
mod names;
mod relations;
mod signatures;
mod type_nodes;

pub use declarations::ConstantValue;
pub use members::Property;
pub use names::{is_declaration_kind, is_module_specifier, meaning_of_identifier};
pub use signatures::ResolvedCall;

use std::cell::{Cell, RefCell};

use tracing::trace;
use tsq_common::limits::MAX_TYPE_RESOLUTION_DEPTH;
use tsq_syntax::{NodeArena, NodeIndex, SourceFile};

use crate::binder::FileBinding;
use crate::printer::TypePrinter;
use crate::program::Program;
use crate::symbols::{DeclRef, FileId, Symbol, SymbolId};
use crate::types::{TypeId, TypeInterner};

/// Computation currently in progress, used to cut cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    SymbolType(SymbolId),
    AliasTarget(SymbolId),
    AliasedType(SymbolId),
    ReturnType(DeclRef),
    Expression(DeclRef),
}

pub struct TypeChecker<'p> {
    program: &'p Program,
    resolving: RefCell<Vec<Resolution>>,
    depth: Cell<u32>,
    /// Set when a guarded computation fell back; such results are not cached.
    truncated: Cell<bool>,
}

impl<'p> TypeChecker<'p> {
    pub fn new(program: &'p Program) -> Self {
        TypeChecker {
            program,
            resolving: RefCell::new(Vec::new()),
            depth: Cell::new(0),
            truncated: Cell::new(false),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn types(&self) -> &'p TypeInterner {
        &self.program.types
    }

    pub fn symbol(&self, id: SymbolId) -> &'p Symbol {
        &self.program.symbols()[id]
    }

    pub fn source(&self, file: FileId) -> Option<&'p SourceFile> {
        self.program.file(file).map(|f| &**f)
    }

    pub(crate) fn arena(&self, file: FileId) -> Option<&'p NodeArena> {
        self.source(file).map(|f| &f.arena)
    }

    pub fn binding(&self, file: FileId) -> Option<&'p FileBinding> {
        self.program.binding(file)
    }

    /// Symbol declared by a declaration node.
    pub fn declaration_symbol(&self, file: FileId, node: NodeIndex) -> Option<SymbolId> {
        self.binding(file)?.symbol_of_declaration(node)
    }

    /// Run `compute` unless `key` is already being computed or the
    /// recursion budget is spent, in which case `fallback` is returned.
    fn guarded<T>(&self, key: Resolution, fallback: T, compute: impl FnOnce() -> T) -> T {
        if self.depth.get() >= MAX_TYPE_RESOLUTION_DEPTH {
            trace!(?key, "type resolution depth exceeded");
            self.truncated.set(true);
            return fallback;
        }
        if self.resolving.borrow().contains(&key) {
            trace!(?key, "circular type resolution");
            self.truncated.set(true);
            return fallback;
        }
        self.resolving.borrow_mut().push(key);
        self.depth.set(self.depth.get() + 1);
        let result = compute();
        self.depth.set(self.depth.get() - 1);
        self.resolving.borrow_mut().pop();
        result
    }

    /// Value-side type of a symbol.
    pub fn type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        if let Some(cached) = self.program.symbol_types.get(&symbol) {
            return *cached;
        }
        let outer = self.truncated.replace(false);
        let ty = self.guarded(Resolution::SymbolType(symbol), TypeId::ANY, || {
            self.compute_type_of_symbol(symbol)
        });
        if !self.truncated.get() {
            self.program.symbol_types.insert(symbol, ty);
        }
        self.truncated.set(outer || self.truncated.get());
        ty
    }

    /// Type-side type of a symbol: the instance type of a class, the
    /// interface, alias or enum itself, or a type parameter.
    pub fn declared_type_of_symbol(&self, symbol: SymbolId) -> TypeId {
        self.compute_declared_type_of_symbol(symbol)
    }

    pub fn type_to_string(&self, ty: TypeId) -> String {
        TypePrinter::new(self).type_to_string(ty)
    }

    pub fn printer(&self) -> TypePrinter<'_, 'p> {
        TypePrinter::new(self)
    }
}
