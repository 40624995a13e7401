//! Project loading: `tsq.json`, directory walking and exclude globs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use tracing::{debug, info, warn};
use tsq_checker::Vfs;
use tsq_checker::vfs::normalize_path;
use tsq_services::ServiceOptions;
use walkdir::WalkDir;

pub const CONFIG_FILE: &str = "tsq.json";

/// Always excluded, in addition to the configured globs.
const DEFAULT_EXCLUDES: &[&str] = &["**/node_modules/.cache/**", "**/.git/**"];

const SOURCE_SUFFIXES: &[&str] = &[".d.ts", ".ts", ".tsx", ".mts", ".cts", ".js", ".mjs"];

/// Contents of `tsq.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Files to load, relative to the root. The whole tree when absent.
    pub files: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub options: ServiceOptions,
}

#[derive(Debug)]
pub struct LoadedProject {
    pub root: PathBuf,
    pub vfs: Vfs,
    pub options: ServiceOptions,
}

/// Read `tsq.json` under `root`, or the defaults when there is none.
pub fn read_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        debug!(root = %root.display(), "no {CONFIG_FILE}; using defaults");
        return Ok(ProjectConfig::default());
    }
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load every project file under `root` into a fresh [`Vfs`], keyed by its
/// root-relative path with a leading `/`.
pub fn load_project(root: &Path) -> Result<LoadedProject> {
    let config = read_config(root)?;
    let files = collect_files(root, &config)?;
    let mut vfs = Vfs::new();
    for file in &files {
        let text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %file.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let relative = file.strip_prefix(root).unwrap_or(file);
        vfs.insert(&virtual_path(&relative.to_string_lossy()), text);
    }
    info!(root = %root.display(), files = vfs.len(), "loaded project");
    Ok(LoadedProject {
        root: root.to_path_buf(),
        vfs,
        options: config.options,
    })
}

/// Files named by the config, or every project file under `root` that no
/// exclude glob matches, in path order.
pub fn collect_files(root: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    if let Some(listed) = &config.files {
        return listed
            .iter()
            .map(|name| {
                let path = root.join(name);
                if path.is_file() {
                    Ok(path)
                } else {
                    anyhow::bail!("{CONFIG_FILE} lists {name:?}, which does not exist")
                }
            })
            .collect();
    }

    let excludes = build_exclude_set(&config.exclude)?;
    let mut files = Vec::new();
    let walker = WalkDir::new(root).follow_links(true).into_iter().filter_entry(|entry| {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        relative.as_os_str().is_empty() || !excludes.is_match(relative)
    });
    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_project_file(&name) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    debug!(count = files.len(), "collected project files");
    Ok(files)
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_EXCLUDES.iter().copied().chain(patterns.iter().map(String::as_str)) {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid exclude glob {pattern:?}"))?);
        // `dir/**` should also prune `dir` itself during the walk.
        if let Some(dir) = pattern.strip_suffix("/**") {
            builder.add(Glob::new(dir).with_context(|| format!("invalid exclude glob {pattern:?}"))?);
        }
    }
    Ok(builder.build()?)
}

pub fn is_project_file(name: &str) -> bool {
    name == "package.json" || SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Project path for a root-relative (or already absolute) file name.
pub fn virtual_path(name: &str) -> String {
    normalize_path(name)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
