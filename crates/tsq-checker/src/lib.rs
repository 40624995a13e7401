//! Semantic collaborators of the tsq language service.
//!
//! This crate turns parsed source files into the facts editor queries
//! consume:
//! - [`vfs`] and [`module_resolution`]: in-memory files and specifier lookup
//! - [`binder`]: scopes, merged symbols and synthetic members
//! - [`types`]: the structural type and signature interner
//! - [`checker`]: symbol, type, member and signature queries
//! - [`printer`]: kind-tagged display of types and signatures
//! - [`program`]: the bound multi-file program tying these together

pub mod symbols;
pub use symbols::{DeclRef, FileId, Meaning, Symbol, SymbolFlags, SymbolId, SymbolOrigin, SymbolTable};

pub mod vfs;
pub use vfs::Vfs;

pub mod module_resolution;
pub use module_resolution::ModuleResolver;

pub mod binder;
pub use binder::FileBinding;

pub mod types;
pub use types::{Parameter, Signature, SignatureKind, TypeId, TypeKind};

pub mod lib_decls;

pub mod checker;
pub use checker::{ConstantValue, Property, TypeChecker};

pub mod printer;
pub use printer::{DisplayPart, DisplayPartKind, DisplayParts, SignatureStyle, TypePrinter};

pub mod program;
pub use program::Program;
