//! Node-style module resolution over the [`Vfs`].
//!
//! Relative specifiers try the TypeScript source extensions (including the
//! `.js` to `.ts` substitution) and then `index.*` inside a folder. Bare
//! specifiers walk up `node_modules` directories and consult `package.json`
//! (`exports`, `types`, `typings`, `main`). `#` specifiers use the nearest
//! `package.json` `imports` map. Ambient `declare module "x"` names are
//! handled by the program before any of this runs.

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::vfs::{Vfs, dirname, join_path};

/// Extensions tried, in order, when a specifier has none.
pub const RESOLUTION_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts", ".js", ".jsx"];

/// Conditions consulted in conditional export targets, in order.
const EXPORT_CONDITIONS: &[&str] = &["types", "import", "node", "require", "default"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub typings: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub exports: Option<Value>,
    #[serde(default)]
    pub imports: Option<Value>,
}

impl PackageJson {
    /// `exports` as a subpath map. A bare string or a conditions object
    /// describes the `"."` entry only.
    pub fn export_map(&self) -> Vec<(String, Value)> {
        subpath_map(self.exports.as_ref())
    }

    pub fn import_map(&self) -> Vec<(String, Value)> {
        subpath_map(self.imports.as_ref())
    }
}

fn subpath_map(value: Option<&Value>) -> Vec<(String, Value)> {
    match value {
        None => Vec::new(),
        Some(Value::Object(map)) if map.keys().any(|k| k.starts_with('.') || k.starts_with('#')) => {
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        }
        Some(other) => vec![(".".to_string(), other.clone())],
    }
}

pub fn read_package_json(vfs: &Vfs, dir: &str) -> Option<PackageJson> {
    let path = join_path(dir, "package.json");
    let text = vfs.read(&path)?;
    match serde_json::from_str(text) {
        Ok(package) => Some(package),
        Err(err) => {
            trace!(path = %path, error = %err, "unreadable package.json");
            None
        }
    }
}

/// First concrete path of an export target (string, conditions object or
/// fallback array).
pub fn export_target_path(target: &Value) -> Option<String> {
    match target {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(export_target_path),
        Value::Object(map) => EXPORT_CONDITIONS
            .iter()
            .find_map(|cond| map.get(*cond).and_then(export_target_path))
            .or_else(|| map.values().find_map(export_target_path)),
        _ => None,
    }
}

/// How a subpath key matched a requested subpath.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubpathMatch {
    Exact,
    /// The text the `*` stands for.
    Wildcard(String),
    /// A `"./dir/"` key matched; the remainder of the request.
    Directory(String),
}

/// Best key for `request` in a subpath map. Exact keys outrank wildcard
/// keys, which outrank trailing-slash keys; among wildcards the longest
/// prefix wins.
pub fn match_subpath<'m>(
    map: &'m [(String, Value)],
    request: &str,
) -> Option<(&'m str, &'m Value, SubpathMatch)> {
    if let Some((key, value)) = map.iter().find(|(k, _)| k == request) {
        return Some((key, value, SubpathMatch::Exact));
    }
    let wildcard = map
        .iter()
        .filter_map(|(key, value)| {
            let star = key.find('*')?;
            let (prefix, suffix) = (&key[..star], &key[star + 1..]);
            if request.len() >= prefix.len() + suffix.len()
                && request.starts_with(prefix)
                && request.ends_with(suffix)
            {
                let matched = request[prefix.len()..request.len() - suffix.len()].to_string();
                Some((prefix.len(), key.as_str(), value, matched))
            } else {
                None
            }
        })
        .max_by_key(|(len, ..)| *len);
    if let Some((_, key, value, matched)) = wildcard {
        return Some((key, value, SubpathMatch::Wildcard(matched)));
    }
    map.iter()
        .filter(|(key, _)| key.ends_with('/') && request.starts_with(key.as_str()))
        .max_by_key(|(key, _)| key.len())
        .map(|(key, value)| {
            (
                key.as_str(),
                value,
                SubpathMatch::Directory(request[key.len()..].to_string()),
            )
        })
}

/// Split `@scope/name/sub` or `name/sub` into package name and subpath.
pub fn split_package_specifier(specifier: &str) -> (&str, &str) {
    let mut slashes = specifier.match_indices('/');
    let split = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };
    match split {
        Some((i, _)) => (&specifier[..i], &specifier[i + 1..]),
        None => (specifier, ""),
    }
}

pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

pub struct ModuleResolver<'a> {
    vfs: &'a Vfs,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(vfs: &'a Vfs) -> Self {
        ModuleResolver { vfs }
    }

    /// Resolve `specifier` imported from `containing_file` to a file path.
    pub fn resolve(&self, containing_file: &str, specifier: &str) -> Option<String> {
        if specifier.is_empty() {
            return None;
        }
        let resolved = if is_relative_specifier(specifier) {
            let base = join_path(dirname(containing_file), specifier);
            self.try_file(&base).or_else(|| self.try_directory(&base))
        } else if specifier.starts_with('#') {
            self.resolve_package_import(containing_file, specifier)
        } else {
            self.resolve_bare(containing_file, specifier)
        };
        trace!(containing_file, specifier, resolved = ?resolved, "resolve module");
        resolved
    }

    fn try_file(&self, base: &str) -> Option<String> {
        for (js, ts_candidates) in [
            (".js", &[".ts", ".tsx", ".d.ts"][..]),
            (".jsx", &[".tsx", ".d.ts"][..]),
            (".mjs", &[".mts", ".d.mts"][..]),
            (".cjs", &[".cts", ".d.cts"][..]),
        ] {
            if let Some(stem) = base.strip_suffix(js) {
                for ext in ts_candidates {
                    let candidate = format!("{stem}{ext}");
                    if self.vfs.file_exists(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
        if has_source_extension(base) && self.vfs.file_exists(base) {
            return Some(base.to_string());
        }
        RESOLUTION_EXTENSIONS
            .iter()
            .map(|ext| format!("{base}{ext}"))
            .find(|candidate| self.vfs.file_exists(candidate))
    }

    fn try_directory(&self, dir: &str) -> Option<String> {
        if !self.vfs.directory_exists(dir) {
            return None;
        }
        if let Some(package) = read_package_json(self.vfs, dir) {
            for entry in [&package.types, &package.typings, &package.main]
                .into_iter()
                .flatten()
            {
                let target = join_path(dir, entry);
                if let Some(found) = self.try_file(&target) {
                    return Some(found);
                }
            }
        }
        self.try_file(&join_path(dir, "index"))
    }

    fn resolve_bare(&self, containing_file: &str, specifier: &str) -> Option<String> {
        let (package_name, subpath) = split_package_specifier(specifier);
        let mut dir = dirname(containing_file).to_string();
        loop {
            for candidate in [package_name.to_string(), types_package_name(package_name)] {
                let package_dir = join_path(&dir, &format!("node_modules/{candidate}"));
                if let Some(found) = self.resolve_in_package(&package_dir, subpath) {
                    return Some(found);
                }
            }
            if dir == "/" {
                return None;
            }
            dir = dirname(&dir).to_string();
        }
    }

    fn resolve_in_package(&self, package_dir: &str, subpath: &str) -> Option<String> {
        if !self.vfs.directory_exists(package_dir) {
            return None;
        }
        let package = read_package_json(self.vfs, package_dir);
        if let Some(package) = &package {
            let map = package.export_map();
            if !map.is_empty() {
                let request = if subpath.is_empty() {
                    ".".to_string()
                } else {
                    format!("./{subpath}")
                };
                let (_, target, matched) = match_subpath(&map, &request)?;
                let target = substitute_target(&export_target_path(target)?, &matched);
                let path = join_path(package_dir, &target);
                return self.try_file(&path).or_else(|| self.try_directory(&path));
            }
        }
        if subpath.is_empty() {
            return self.try_directory(package_dir);
        }
        let path = join_path(package_dir, subpath);
        self.try_file(&path).or_else(|| self.try_directory(&path))
    }

    fn resolve_package_import(&self, containing_file: &str, specifier: &str) -> Option<String> {
        let mut dir = dirname(containing_file).to_string();
        loop {
            if let Some(package) = read_package_json(self.vfs, &dir) {
                let map = package.import_map();
                if !map.is_empty() {
                    let (_, target, matched) = match_subpath(&map, specifier)?;
                    let target = substitute_target(&export_target_path(target)?, &matched);
                    let path = join_path(&dir, &target);
                    return self.try_file(&path).or_else(|| self.try_directory(&path));
                }
            }
            if dir == "/" {
                return None;
            }
            dir = dirname(&dir).to_string();
        }
    }
}

fn substitute_target(target: &str, matched: &SubpathMatch) -> String {
    match matched {
        SubpathMatch::Exact => target.to_string(),
        SubpathMatch::Wildcard(text) => target.replace('*', text),
        SubpathMatch::Directory(rest) => format!("{target}{rest}"),
    }
}

/// `@types` package name for a package: `@scope/x` maps to `@types/scope__x`.
fn types_package_name(package_name: &str) -> String {
    match package_name.strip_prefix('@') {
        Some(scoped) => format!("@types/{}", scoped.replacen('/', "__", 1)),
        None => format!("@types/{package_name}"),
    }
}

pub fn has_source_extension(path: &str) -> bool {
    [
        ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs",
    ]
    .iter()
    .any(|ext| path.ends_with(ext))
}

#[cfg(test)]
#[path = "tests/module_resolution_tests.rs"]
mod module_resolution_tests;
