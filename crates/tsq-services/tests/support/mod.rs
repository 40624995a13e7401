//! Scenario harness for the integration tests.
//!
//! A scenario is one annotated text holding one or more files:
//!
//! ```text
//! // @filename: /a.ts
//! export const [|value|] = 1;
//! // @filename: /b.ts
//! import { value } from "./a";
//! /*use*/value;
//! ```
//!
//! `// @filename:` starts a file (the default is `/test.ts`), `/*name*/`
//! marks a named offset and `[|...|]` marks a span. Both are removed from
//! the text before the project is built.

#![allow(dead_code)]

use rustc_hash::FxHashMap;
use tsq_checker::Vfs;
use tsq_common::{CancellationToken, TextSpan};
use tsq_services::{
    CompletionItem, CompletionResponse, DefinitionInfo, FileLocation, Project, QuickInfo, ReferenceEntry,
    Request, Response, ServiceOptions, SignatureHelpItems,
};

pub const DEFAULT_FILE: &str = "/test.ts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub file: String,
    pub offset: u32,
}

pub struct Scenario {
    pub project: Project,
    pub cancel: CancellationToken,
    markers: FxHashMap<String, Marker>,
    ranges: Vec<(String, TextSpan)>,
}

impl Scenario {
    pub fn new(annotated: &str) -> Self {
        Self::with_options(annotated, ServiceOptions::default())
    }

    pub fn with_options(annotated: &str, options: ServiceOptions) -> Self {
        let mut vfs = Vfs::new();
        let mut markers = FxHashMap::default();
        let mut ranges = Vec::new();
        for (file, text) in split_files(annotated) {
            let parsed = parse_annotations(&text);
            for (name, offset) in parsed.markers {
                markers.insert(
                    name,
                    Marker {
                        file: file.clone(),
                        offset,
                    },
                );
            }
            ranges.extend(parsed.ranges.into_iter().map(|span| (file.clone(), span)));
            vfs.insert(&file, parsed.text);
        }
        Scenario {
            project: Project::new(vfs, options),
            cancel: CancellationToken::new(),
            markers,
            ranges,
        }
    }

    pub fn marker(&self, name: &str) -> &Marker {
        self.markers
            .get(name)
            .unwrap_or_else(|| panic!("scenario has no marker {name:?}"))
    }

    /// Every `[|...|]` span, in file then text order.
    pub fn ranges(&self) -> &[(String, TextSpan)] {
        &self.ranges
    }

    fn run(&self, request: Request) -> Response {
        self.project
            .execute(&request, &self.cancel)
            .unwrap_or_else(|error| panic!("{} request failed: {error}", request.command()))
    }

    fn location(&self, marker: &str) -> FileLocation {
        let m = self.marker(marker);
        FileLocation::at_offset(m.file.clone(), m.offset)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    pub fn completions(&self, marker: &str) -> Option<CompletionResponse> {
        self.completions_triggered(marker, None)
    }

    pub fn completions_triggered(&self, marker: &str, trigger: Option<&str>) -> Option<CompletionResponse> {
        let request = Request::Completions {
            location: self.location(marker),
            trigger_character: trigger.map(str::to_string),
        };
        match self.run(request) {
            Response::Completions(response) => response,
            other => panic!("unexpected response {other:?}"),
        }
    }

    pub fn hover(&self, marker: &str) -> Option<QuickInfo> {
        match self.run(Request::Hover {
            location: self.location(marker),
        }) {
            Response::Hover(info) => info,
            other => panic!("unexpected response {other:?}"),
        }
    }

    pub fn definition(&self, marker: &str) -> Vec<DefinitionInfo> {
        match self.run(Request::Definition {
            location: self.location(marker),
        }) {
            Response::Definition(found) => found,
            other => panic!("unexpected response {other:?}"),
        }
    }

    pub fn references(&self, marker: &str) -> Vec<ReferenceEntry> {
        match self.run(Request::References {
            location: self.location(marker),
        }) {
            Response::References(found) => found,
            other => panic!("unexpected response {other:?}"),
        }
    }

    pub fn signature_help(&self, marker: &str, trigger: Option<&str>) -> Option<SignatureHelpItems> {
        match self.run(Request::SignatureHelp {
            location: self.location(marker),
            trigger_character: trigger.map(str::to_string),
        }) {
            Response::SignatureHelp(items) => items,
            other => panic!("unexpected response {other:?}"),
        }
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Completions at `marker` include every label in `expected`.
    pub fn verify_completions_include(&self, marker: &str, expected: &[&str]) -> CompletionResponse {
        let response = self
            .completions(marker)
            .unwrap_or_else(|| panic!("no completions at {marker:?}"));
        for label in expected {
            assert!(
                response.item(label).is_some(),
                "{label:?} missing at {marker:?}; got {:?}",
                response.labels()
            );
        }
        response
    }

    /// Completions at `marker` include none of `excluded`.
    pub fn verify_completions_exclude(&self, marker: &str, excluded: &[&str]) {
        let Some(response) = self.completions(marker) else {
            return;
        };
        for label in excluded {
            assert!(
                response.item(label).is_none(),
                "{label:?} unexpectedly offered at {marker:?}"
            );
        }
    }

    pub fn verify_no_completions(&self, marker: &str) {
        let response = self.completions(marker);
        assert!(response.is_none(), "expected no completions at {marker:?}, got {response:?}");
    }

    pub fn verify_quick_info(&self, marker: &str, display: &str) {
        let info = self
            .hover(marker)
            .unwrap_or_else(|| panic!("no quick info at {marker:?}"));
        assert_eq!(info.display_string(), display, "quick info at {marker:?}");
    }

    /// References from every marker in `markers` equal the scenario's
    /// `[|...|]` ranges.
    pub fn verify_references_are_ranges(&self, markers: &[&str]) {
        let mut expected: Vec<(String, TextSpan)> = self.ranges.clone();
        expected.sort();
        for marker in markers {
            let mut found: Vec<(String, TextSpan)> = self
                .references(marker)
                .into_iter()
                .map(|e| (e.file_name, e.text_span))
                .collect();
            found.sort();
            assert_eq!(found, expected, "references from {marker:?}");
        }
    }
}

/// Index of `label` in a completion list.
pub fn position_of(response: &CompletionResponse, label: &str) -> usize {
    response
        .items
        .iter()
        .position(|item: &CompletionItem| item.label == label)
        .unwrap_or_else(|| panic!("{label:?} not listed"))
}

// =============================================================================
// Annotation parsing
// =============================================================================

struct Annotated {
    text: String,
    markers: Vec<(String, u32)>,
    ranges: Vec<TextSpan>,
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

fn parse_annotations(text: &str) -> Annotated {
    let mut out = String::with_capacity(text.len());
    let mut markers = Vec::new();
    let mut ranges = Vec::new();
    let mut open: Vec<u32> = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("[|") {
            open.push(out.len() as u32);
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix("|]") {
            let start = open.pop().expect("unbalanced `|]`");
            ranges.push(TextSpan::from_bounds(start, out.len() as u32));
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix("/*")
            && let Some(end) = after.find("*/")
            && after[..end]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            markers.push((after[..end].to_string(), out.len() as u32));
            rest = &after[end + 2..];
            continue;
        }
        let ch = rest.chars().next().expect("rest is not empty");
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    assert!(open.is_empty(), "unclosed `[|`");
    ranges.sort_by_key(|span| span.start);
    Annotated {
        text: out,
        markers,
        ranges,
    }
}
