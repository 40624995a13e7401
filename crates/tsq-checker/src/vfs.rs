//! In-memory file system keyed by normalized absolute paths.

use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Vfs {
    files: BTreeMap<String, Arc<str>>,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file; returns the normalized path.
    pub fn insert(&mut self, path: &str, text: impl Into<Arc<str>>) -> String {
        let path = normalize_path(path);
        self.files.insert(path.clone(), text.into());
        path
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.files.remove(&normalize_path(path)).is_some()
    }

    pub fn read(&self, path: &str) -> Option<&Arc<str>> {
        self.files.get(path)
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn directory_exists(&self, dir: &str) -> bool {
        let prefix = directory_prefix(dir);
        self.files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(path, _)| path.starts_with(&prefix))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Immediate children of `dir`: files first seen in path order, folders
    /// derived from deeper paths. Each name appears once.
    pub fn read_dir(&self, dir: &str) -> Vec<DirEntry> {
        let prefix = directory_prefix(dir);
        let mut entries: Vec<DirEntry> = Vec::new();
        for (path, _) in self.files.range(prefix.clone()..) {
            let Some(rest) = path.strip_prefix(&prefix) else {
                break;
            };
            let (name, is_dir) = match rest.find('/') {
                Some(slash) => (&rest[..slash], true),
                None => (rest, false),
            };
            if entries.iter().any(|e| e.name == name && e.is_dir == is_dir) {
                continue;
            }
            entries.push(DirEntry {
                name: name.to_string(),
                is_dir,
            });
        }
        entries
    }
}

fn directory_prefix(dir: &str) -> String {
    let dir = normalize_path(dir);
    if dir.ends_with('/') {
        dir
    } else {
        format!("{dir}/")
    }
}

/// Forward slashes, a leading `/`, and no `.`/`..`/empty segments.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Parent directory of a normalized path; `/` for top-level entries.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn join_path(dir: &str, relative: &str) -> String {
    if relative.starts_with('/') {
        return normalize_path(relative);
    }
    normalize_path(&format!("{dir}/{relative}"))
}

#[cfg(test)]
#[path = "tests/vfs_tests.rs"]
mod vfs_tests;
