//! A bound multi-file program.
//!
//! Construction parses every source file of the [`Vfs`] (in parallel,
//! reusing unchanged files from a previous program), then binds the
//! embedded library followed by the project files in path order. The result
//! is immutable; type caches fill lazily and are safe to share between
//! threads.

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::{debug, info_span};
use tsq_syntax::SourceFile;

use crate::binder::{FileBinding, SharedTables, bind_source_file};
use crate::checker::TypeChecker;
use crate::lib_decls::{ALL_LIBS, LIB_FILE_NAME};
use crate::module_resolution::ModuleResolver;
use crate::symbols::{FileId, SymbolArena, SymbolId, SymbolTable};
use crate::types::{TypeId, TypeInterner};
use crate::vfs::Vfs;

pub struct Program {
    vfs: Arc<Vfs>,
    files: Vec<Arc<SourceFile>>,
    file_ids: FxHashMap<String, FileId>,
    bindings: Vec<FileBinding>,
    symbols: SymbolArena,
    globals: SymbolTable,
    ambient_modules: SymbolTable,
    pub(crate) types: TypeInterner,
    pub(crate) symbol_types: DashMap<SymbolId, TypeId, FxBuildHasher>,
    pub(crate) declared_types: DashMap<SymbolId, TypeId, FxBuildHasher>,
    module_cache: DashMap<(FileId, String), Option<SymbolId>, FxBuildHasher>,
}

/// Whether a path is a file the program parses.
pub fn is_program_file(path: &str) -> bool {
    crate::module_resolution::has_source_extension(path)
}

impl Program {
    pub fn new(vfs: Arc<Vfs>) -> Self {
        Self::with_previous(vfs, None)
    }

    /// Build a program, reusing the parse of every file whose text is
    /// unchanged in `previous`.
    pub fn with_previous(vfs: Arc<Vfs>, previous: Option<&Program>) -> Self {
        let _span = info_span!("program", files = vfs.len()).entered();
        let paths: Vec<&str> = vfs.paths().filter(|p| is_program_file(p)).collect();

        let mut files: Vec<Arc<SourceFile>> = ALL_LIBS
            .iter()
            .map(|lib| {
                previous
                    .and_then(|p| p.file_by_name(lib.file_name))
                    .cloned()
                    .unwrap_or_else(|| Arc::new(SourceFile::parse(lib.file_name, lib.content)))
            })
            .collect();

        let parsed: Vec<Arc<SourceFile>> = paths
            .par_iter()
            .filter_map(|&path| {
                let text = vfs.read(path)?;
                if let Some(old) = previous.and_then(|p| p.file_by_name(path))
                    && Arc::ptr_eq(&old.text, text)
                {
                    return Some(old.clone());
                }
                Some(Arc::new(SourceFile::parse(path, text.clone())))
            })
            .collect();
        let reused = parsed
            .iter()
            .filter(|f| {
                previous
                    .and_then(|p| p.file_by_name(&f.file_name))
                    .is_some_and(|old| Arc::ptr_eq(old, f))
            })
            .count();
        files.extend(parsed);

        let mut symbols = SymbolArena::new();
        let mut globals = SymbolTable::default();
        let mut ambient_modules = SymbolTable::default();
        let mut file_ids = FxHashMap::default();
        let mut bindings = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            let id = FileId(index as u32);
            file_ids.insert(file.file_name.clone(), id);
            bindings.push(bind_source_file(
                id,
                file,
                SharedTables {
                    symbols: &mut symbols,
                    globals: &mut globals,
                    ambient_modules: &mut ambient_modules,
                },
            ));
        }
        debug!(
            files = files.len(),
            reused,
            symbols = symbols.len(),
            "program built"
        );

        Program {
            vfs,
            files,
            file_ids,
            bindings,
            symbols,
            globals,
            ambient_modules,
            types: TypeInterner::new(),
            symbol_types: DashMap::with_hasher(FxBuildHasher),
            declared_types: DashMap::with_hasher(FxBuildHasher),
            module_cache: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(self)
    }

    pub fn vfs(&self) -> &Arc<Vfs> {
        &self.vfs
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &Arc<SourceFile>)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    /// Project files, excluding embedded libraries.
    pub fn project_files(&self) -> impl Iterator<Item = (FileId, &Arc<SourceFile>)> {
        self.files().filter(|(id, _)| !self.is_lib_file(*id))
    }

    pub fn file(&self, id: FileId) -> Option<&Arc<SourceFile>> {
        self.files.get(id.index())
    }

    pub fn file_id(&self, name: &str) -> Option<FileId> {
        self.file_ids.get(name).copied()
    }

    pub fn file_by_name(&self, name: &str) -> Option<&Arc<SourceFile>> {
        self.file_id(name).and_then(|id| self.file(id))
    }

    pub fn is_lib_file(&self, id: FileId) -> bool {
        id.index() < ALL_LIBS.len()
    }

    pub fn lib_file_name(&self) -> &'static str {
        LIB_FILE_NAME
    }

    pub fn binding(&self, id: FileId) -> Option<&FileBinding> {
        self.bindings.get(id.index())
    }

    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    pub fn ambient_modules(&self) -> &SymbolTable {
        &self.ambient_modules
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    /// Module symbol of a source file, when the file is a module.
    pub fn module_symbol(&self, file: FileId) -> Option<SymbolId> {
        self.binding(file).and_then(|b| b.module_symbol)
    }

    /// Resolve a module specifier as written in `file`. String-named
    /// ambient modules win over files.
    pub fn resolve_module_specifier(&self, file: FileId, specifier: &str) -> Option<SymbolId> {
        if let Some(&id) = self.ambient_modules.get(specifier) {
            return Some(id);
        }
        let key = (file, specifier.to_string());
        if let Some(cached) = self.module_cache.get(&key) {
            return *cached;
        }
        let resolved = self
            .resolve_module_file(file, specifier)
            .and_then(|target| self.module_symbol(target));
        self.module_cache.insert(key, resolved);
        resolved
    }

    /// The file a module specifier written in `file` resolves to.
    pub fn resolve_module_file(&self, file: FileId, specifier: &str) -> Option<FileId> {
        let containing = &self.file(file)?.file_name;
        let path = ModuleResolver::new(&self.vfs).resolve(containing, specifier)?;
        self.file_id(&path)
    }

    /// File that declares a module symbol (the module file itself, or the
    /// file holding an ambient `declare module`).
    pub fn module_file(&self, module: SymbolId) -> Option<FileId> {
        self.symbols.get(module)?.first_declaration().map(|d| d.file)
    }
}

#[cfg(test)]
#[path = "tests/program_tests.rs"]
mod program_tests;
