//! Line/column positions for editor-facing results.
//!
//! Syntax nodes carry byte offsets; clients speak in 0-indexed lines and
//! UTF-16 columns. `LineMap` converts between the two for one snapshot.

use crate::span::TextSpan;

/// A position in a source file (0-indexed line and UTF-16 column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }
}

/// A file path plus a line/column range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file_name: String,
    pub range: Range,
}

impl Location {
    pub fn new(file_name: String, range: Range) -> Self {
        Location { file_name, range }
    }
}

/// Starting byte offset of every line in one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    // line_starts[0] is always 0
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text. `\n`, `\r\n` and lone `\r` all end a line.
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => line_starts.push((i + 1) as u32),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push((i + 1) as u32),
                _ => {}
            }
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a position. Columns count UTF-16 code units.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0) as usize;
        let clamped_end = (offset as usize).min(source.len());
        let slice = source.get(line_start.min(clamped_end)..clamped_end).unwrap_or("");
        let character = slice.chars().map(|ch| ch.len_utf16() as u32).sum();
        Position {
            line: line as u32,
            character,
        }
    }

    /// Convert a position back to a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line clamp to the line terminator.
    pub fn position_to_offset(&self, position: Position, source: &str) -> Option<u32> {
        let line_idx = position.line as usize;
        let line_start = *self.line_starts.get(line_idx)?;
        let line_limit = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(source.len() as u32);
        let slice = source
            .get(line_start as usize..line_limit as usize)
            .unwrap_or("");

        let mut utf16_count = 0u32;
        let mut byte_count = 0u32;
        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            let width = ch.len_utf16() as u32;
            if utf16_count + width > position.character {
                break;
            }
            utf16_count += width;
            byte_count += ch.len_utf8() as u32;
        }
        Some(line_start + byte_count)
    }

    pub fn span_to_range(&self, span: TextSpan, source: &str) -> Range {
        Range::new(
            self.offset_to_position(span.start, source),
            self.offset_to_position(span.end(), source),
        )
    }

    /// Text of the line containing `offset`, without its terminator.
    pub fn line_text<'s>(&self, offset: u32, source: &'s str) -> &'s str {
        let line = self.offset_to_position(offset, source).line as usize;
        let start = self.line_starts[line] as usize;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(source.len(), |&s| s as usize);
        source
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
