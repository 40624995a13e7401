//! Annotated sources for unit tests.
//!
//! `// @filename: /path` starts a new file; `/*name*/` (or `/**/`) marks an
//! offset and is removed from the text.

use rustc_hash::FxHashMap;
use tsq_checker::Vfs;
use tsq_common::CancellationToken;

use crate::options::ServiceOptions;
use crate::project::Project;

pub(crate) const DEFAULT_FILE: &str = "/test.ts";

pub(crate) struct Fixture {
    pub project: Project,
    pub cancel: CancellationToken,
    markers: FxHashMap<String, (String, u32)>,
}

impl Fixture {
    pub fn new(annotated: &str) -> Self {
        Self::with_options(annotated, ServiceOptions::default())
    }

    pub fn with_options(annotated: &str, options: ServiceOptions) -> Self {
        let mut vfs = Vfs::new();
        let mut markers = FxHashMap::default();
        for (file, text) in split_files(annotated) {
            let (text, file_markers) = strip_markers(&text);
            for (name, offset) in file_markers {
                markers.insert(name, (file.clone(), offset));
            }
            vfs.insert(&file, text);
        }
        Fixture {
            project: Project::new(vfs, options),
            cancel: CancellationToken::new(),
            markers,
        }
    }

    /// File and offset of a marker.
    pub fn marker(&self, name: &str) -> (String, u32) {
        self.markers
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no marker named {name:?}"))
    }
}

fn split_files(annotated: &str) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = Vec::new();
    for line in annotated.split_inclusive('\n') {
        if let Some(name) = line.trim_start().strip_prefix("// @filename:") {
            files.push((name.trim().to_string(), String::new()));
            continue;
        }
        if files.is_empty() {
            files.push((DEFAULT_FILE.to_string(), String::new()));
        }
        if let Some((_, text)) = files.last_mut() {
            text.push_str(line);
        }
    }
    files
}

pub(crate) fn strip_markers(text: &str) -> (String, Vec<(String, u32)>) {
    let mut out = String::with_capacity(text.len());
    let mut markers = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let marker = after.find("*/").map(|end| &after[..end]).filter(|name| {
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        });
        match marker {
            Some(name) => {
                markers.push((name.to_string(), out.len() as u32));
                rest = &after[name.len() + 2..];
            }
            None => {
                out.push_str("/*");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    (out, markers)
}
