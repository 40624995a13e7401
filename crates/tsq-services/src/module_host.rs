//! Directory listings behind module specifier completions.
//!
//! The completion engine only knows the text typed so far inside an import
//! string. A [`ModuleSpecifierHost`] turns that prefix into the names that
//! may follow its last `/`, with package `exports`/`imports` maps already
//! applied.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;
use tsq_checker::module_resolution::{
    export_target_path, has_source_extension, read_package_json, split_package_specifier,
};
use tsq_checker::vfs::{DirEntry, Vfs, dirname, join_path};
use tsq_common::limits::MAX_PATH_COMPLETION_ENTRIES;
use tsq_common::{CancellationToken, Cancelled, Checkpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathEntryKind {
    File,
    Folder,
    /// A package under `node_modules` or an ambient module name.
    Package,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    /// Text that follows the last `/` of the prefix.
    pub name: String,
    pub kind: PathEntryKind,
    /// Source extension of the listed file, e.g. `.ts` or `.d.ts`.
    pub extension: Option<String>,
}

impl PathEntry {
    fn file(name: String, extension: Option<String>) -> Self {
        PathEntry {
            name,
            kind: PathEntryKind::File,
            extension,
        }
    }

    fn folder(name: String) -> Self {
        PathEntry {
            name,
            kind: PathEntryKind::Folder,
            extension: None,
        }
    }
}

pub trait ModuleSpecifierHost: Send + Sync {
    /// Entries that may complete `specifier_prefix` as written in
    /// `importing_file`.
    fn list_sibling_entries(
        &self,
        importing_file: &str,
        specifier_prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathEntry>, Cancelled>;
}

/// [`ModuleSpecifierHost`] over the project's in-memory file system.
#[derive(Debug, Clone)]
pub struct VfsModuleHost {
    vfs: Arc<Vfs>,
}

impl VfsModuleHost {
    pub fn new(vfs: Arc<Vfs>) -> Self {
        VfsModuleHost { vfs }
    }
}

impl ModuleSpecifierHost for VfsModuleHost {
    fn list_sibling_entries(
        &self,
        importing_file: &str,
        specifier_prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathEntry>, Cancelled> {
        let mut out = EntrySink::new(cancel);
        let importing_dir = dirname(importing_file);
        if is_path_like(specifier_prefix) {
            self.relative_entries(importing_file, specifier_prefix, &mut out)?;
        } else if specifier_prefix.starts_with('#') {
            self.import_map_entries(importing_dir, specifier_prefix, &mut out)?;
        } else {
            self.package_entries(importing_dir, specifier_prefix, &mut out)?;
        }
        trace!(
            importing_file,
            specifier_prefix,
            count = out.entries.len(),
            "listed module specifier entries"
        );
        Ok(out.entries)
    }
}

impl VfsModuleHost {
    // =========================================================================
    // Relative paths
    // =========================================================================

    fn relative_entries(
        &self,
        importing_file: &str,
        prefix: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        let directory = join_path(dirname(importing_file), directory_part(prefix));
        let esm = is_esm_file(importing_file);
        for DirEntry { name, is_dir } in self.vfs.read_dir(&directory) {
            if name.starts_with('.') {
                continue;
            }
            if is_dir {
                out.push(PathEntry::folder(name))?;
                continue;
            }
            if join_path(&directory, &name) == importing_file {
                continue;
            }
            if let Some((import_name, extension)) = import_form(&name, esm) {
                out.push(PathEntry::file(import_name, Some(extension)))?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Packages
    // =========================================================================

    fn package_entries(
        &self,
        importing_dir: &str,
        prefix: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        let slashes = prefix.matches('/').count();
        let naming_package = slashes == 0 || (prefix.starts_with('@') && slashes == 1);
        if naming_package {
            return self.package_names(importing_dir, prefix, out);
        }
        let (package_name, subpath) = split_package_specifier(prefix);
        let Some(package_dir) = self.find_package_dir(importing_dir, package_name) else {
            return Ok(());
        };
        if let Some(package) = read_package_json(&self.vfs, &package_dir) {
            let map = package.export_map();
            if map.iter().any(|(key, _)| key != ".") {
                let request = format!("./{subpath}");
                return self.subpath_map_entries(&map, &request, &package_dir, out);
            }
        }
        let directory = join_path(&package_dir, directory_part(subpath));
        for DirEntry { name, is_dir } in self.vfs.read_dir(&directory) {
            if name.starts_with('.') || name == "node_modules" {
                continue;
            }
            if is_dir {
                out.push(PathEntry::folder(name))?;
            } else if let Some((import_name, extension)) = import_form(&name, false) {
                out.push(PathEntry::file(import_name, Some(extension)))?;
            }
        }
        Ok(())
    }

    /// Package names visible from `importing_dir`, including scoped ones.
    fn package_names(
        &self,
        importing_dir: &str,
        prefix: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        let scope = prefix
            .starts_with('@')
            .then(|| prefix.split('/').next())
            .flatten()
            .filter(|_| prefix.contains('/'));
        for dir in ancestor_dirs(importing_dir) {
            let modules = join_path(&dir, "node_modules");
            if let Some(scope) = scope {
                for entry in self.vfs.read_dir(&join_path(&modules, scope)) {
                    if entry.is_dir {
                        out.push(package_entry(entry.name))?;
                    }
                }
                continue;
            }
            for entry in self.vfs.read_dir(&modules) {
                if !entry.is_dir || entry.name.starts_with('.') {
                    continue;
                }
                if entry.name.starts_with('@') {
                    let scope_dir = join_path(&modules, &entry.name);
                    for inner in self.vfs.read_dir(&scope_dir) {
                        if inner.is_dir {
                            out.push(package_entry(format!("{}/{}", entry.name, inner.name)))?;
                        }
                    }
                } else {
                    out.push(package_entry(entry.name))?;
                }
            }
        }
        Ok(())
    }

    fn find_package_dir(&self, importing_dir: &str, package_name: &str) -> Option<String> {
        ancestor_dirs(importing_dir)
            .map(|dir| join_path(&dir, &format!("node_modules/{package_name}")))
            .find(|candidate| self.vfs.directory_exists(candidate))
    }

    fn import_map_entries(
        &self,
        importing_dir: &str,
        prefix: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        for dir in ancestor_dirs(importing_dir) {
            if let Some(package) = read_package_json(&self.vfs, &dir) {
                let map = package.import_map();
                if !map.is_empty() {
                    return self.subpath_map_entries(&map, prefix, &dir, out);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Subpath maps
    // =========================================================================

    /// Completions for `request` against an `exports` or `imports` map
    /// rooted at `base_dir`.
    ///
    /// Only the longest wildcard key that the request has reached is
    /// expanded; trailing-slash keys are consulted when no wildcard applies.
    /// Keys the request has not reached yet contribute their next segment.
    fn subpath_map_entries(
        &self,
        map: &[(String, Value)],
        request: &str,
        base_dir: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        let typed_dir = directory_part(request);
        let reached_wildcard = map
            .iter()
            .filter_map(|(key, value)| {
                let star = key.find('*')?;
                request
                    .starts_with(&key[..star])
                    .then_some((star, key.as_str(), value))
            })
            .max_by_key(|(star, ..)| *star);

        if let Some((star, key, value)) = reached_wildcard {
            if let Some(target) = export_target_path(value) {
                self.expand_wildcard(key, star, &target, request, base_dir, out)?;
            }
        } else if let Some((key, value)) = map
            .iter()
            .filter(|(key, _)| key.ends_with('/') && request.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
        {
            if let Some(target) = export_target_path(value) {
                let rest = &request[key.len()..];
                let directory = join_path(base_dir, &format!("{target}{}", directory_part(rest)));
                for DirEntry { name, is_dir } in self.vfs.read_dir(&directory) {
                    out.push(if is_dir {
                        PathEntry::folder(name)
                    } else {
                        let extension = source_extension(&name).map(str::to_string);
                        PathEntry::file(name, extension)
                    })?;
                }
            }
        }

        for (key, _) in map {
            if key == "." || !key.starts_with(typed_dir) || request.starts_with(key.as_str()) {
                continue;
            }
            let segment = &key[typed_dir.len()..];
            let segment = match segment.find('*') {
                Some(star) if !segment[..star].contains('/') => continue,
                _ => segment,
            };
            match segment.find('/') {
                Some(slash) => out.push(PathEntry::folder(segment[..slash].to_string()))?,
                None => out.push(PathEntry::file(segment.to_string(), None))?,
            }
        }
        Ok(())
    }

    /// List the directory a wildcard target points at for `request`.
    fn expand_wildcard(
        &self,
        key: &str,
        star: usize,
        target: &str,
        request: &str,
        base_dir: &str,
        out: &mut EntrySink<'_>,
    ) -> Result<(), Cancelled> {
        let Some(target_star) = target.find('*') else {
            return Ok(());
        };
        let key_prefix = &key[..star];
        let key_suffix = &key[star + 1..];
        let remaining = &request[key_prefix.len()..];
        let remaining_dir = directory_part(remaining);
        let display = format!("{key_prefix}{remaining_dir}");
        let display = &display[directory_part(request).len().min(display.len())..];

        let target_prefix = &target[..target_star];
        let target_suffix = &target[target_star + 1..];
        // Only the file-name part of the suffix filters entries.
        let file_suffix = target_suffix.rsplit('/').next().unwrap_or(target_suffix);
        let directory = join_path(base_dir, &format!("{target_prefix}{remaining_dir}"));
        for DirEntry { name, is_dir } in self.vfs.read_dir(&directory) {
            if name.starts_with('.') {
                continue;
            }
            if is_dir {
                out.push(PathEntry::folder(format!("{display}{name}")))?;
                continue;
            }
            let extension = source_extension(&name).map(str::to_string);
            let completed = if file_suffix.is_empty() {
                match import_form(&name, true) {
                    Some((import_name, _)) => import_name,
                    None => continue,
                }
            } else {
                let Some(stem) = name.strip_suffix(file_suffix) else {
                    continue;
                };
                let reappended = if key_suffix.is_empty() { file_suffix } else { key_suffix };
                format!("{stem}{reappended}")
            };
            out.push(PathEntry::file(format!("{display}{completed}"), extension))?;
        }
        Ok(())
    }
}

/// Deduplicating, capped, cancellable collector.
struct EntrySink<'c> {
    entries: Vec<PathEntry>,
    seen: FxHashSet<(String, PathEntryKind)>,
    checkpoint: Checkpoint<'c>,
}

impl<'c> EntrySink<'c> {
    fn new(cancel: &'c CancellationToken) -> Self {
        EntrySink {
            entries: Vec::new(),
            seen: FxHashSet::default(),
            checkpoint: cancel.checkpoint(),
        }
    }

    fn push(&mut self, entry: PathEntry) -> Result<(), Cancelled> {
        self.checkpoint.tick()?;
        if self.entries.len() >= MAX_PATH_COMPLETION_ENTRIES || entry.name.is_empty() {
            return Ok(());
        }
        if self.seen.insert((entry.name.clone(), entry.kind)) {
            self.entries.push(entry);
        }
        Ok(())
    }
}

fn package_entry(name: String) -> PathEntry {
    PathEntry {
        name,
        kind: PathEntryKind::Package,
        extension: None,
    }
}

fn is_path_like(prefix: &str) -> bool {
    prefix == "." || prefix == ".." || prefix.starts_with("./") || prefix.starts_with("../")
        || prefix.starts_with('/')
}

/// Everything up to and including the last `/`.
fn directory_part(path: &str) -> &str {
    match path.rfind('/') {
        Some(slash) => &path[..=slash],
        None => "",
    }
}

fn ancestor_dirs(start: &str) -> impl Iterator<Item = String> {
    let mut next = Some(start.to_string());
    std::iter::from_fn(move || {
        let current = next.take()?;
        if current != "/" {
            next = Some(dirname(&current).to_string());
        }
        Some(current)
    })
}

fn is_esm_file(path: &str) -> bool {
    [".mts", ".mjs"].iter().any(|ext| path.ends_with(ext))
}

/// Longest source extension of a file name, declaration forms included.
fn source_extension(name: &str) -> Option<&'static str> {
    [
        ".d.ts", ".d.mts", ".d.cts", ".tsx", ".ts", ".mts", ".cts", ".jsx", ".js", ".mjs", ".cjs",
        ".json",
    ]
    .into_iter()
    .find(|ext| name.ends_with(ext) && name.len() > ext.len())
}

/// How `file_name` is written in an import, and its source extension.
/// `esm` importers must spell the emitted extension.
fn import_form(file_name: &str, esm: bool) -> Option<(String, String)> {
    if !has_source_extension(file_name) {
        return None;
    }
    let extension = source_extension(file_name)?;
    let stem = &file_name[..file_name.len() - extension.len()];
    let emitted = match extension {
        ".mts" | ".d.mts" | ".mjs" => ".mjs",
        ".cts" | ".d.cts" | ".cjs" => ".cjs",
        ".jsx" | ".tsx" if !esm => "",
        ".jsx" | ".tsx" => ".js",
        _ if esm => ".js",
        _ => "",
    };
    Some((format!("{stem}{emitted}"), extension.to_string()))
}

#[cfg(test)]
#[path = "tests/module_host_tests.rs"]
mod module_host_tests;
