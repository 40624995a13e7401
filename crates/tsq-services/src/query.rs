//! Per-request view of one file inside a program snapshot.

use tsq_checker::{FileId, Program, TypeChecker};
use tsq_common::{CancellationToken, Location, TextSpan};
use tsq_syntax::{NodeArena, NodeIndex, SourceFile};

use crate::error::RequestError;
use crate::module_host::ModuleSpecifierHost;
use crate::options::ServiceOptions;

/// Everything an engine needs to answer a positional query in one file.
///
/// Built fresh for every request and dropped when it returns; the checker
/// it carries only caches into the program's per-snapshot tables.
pub struct FileQuery<'a> {
    pub program: &'a Program,
    pub checker: TypeChecker<'a>,
    pub file: FileId,
    pub source: &'a SourceFile,
    pub options: &'a ServiceOptions,
    pub cancel: &'a CancellationToken,
    pub host: &'a dyn ModuleSpecifierHost,
}

impl<'a> FileQuery<'a> {
    pub fn new(
        program: &'a Program,
        file_name: &str,
        options: &'a ServiceOptions,
        cancel: &'a CancellationToken,
        host: &'a dyn ModuleSpecifierHost,
    ) -> Result<Self, RequestError> {
        let file = program
            .file_id(file_name)
            .ok_or_else(|| RequestError::UnknownFile(file_name.to_string()))?;
        let source = program
            .file(file)
            .map(|f| &**f)
            .ok_or_else(|| RequestError::UnknownFile(file_name.to_string()))?;
        Ok(FileQuery {
            program,
            checker: program.checker(),
            file,
            source,
            options,
            cancel,
            host,
        })
    }

    pub fn arena(&self) -> &'a NodeArena {
        &self.source.arena
    }

    pub fn text(&self) -> &'a str {
        self.source.text()
    }

    pub fn root(&self) -> NodeIndex {
        self.source.root
    }

    pub fn span(&self, node: NodeIndex) -> TextSpan {
        self.source.arena.span(node)
    }

    pub fn node_text(&self, node: NodeIndex) -> &'a str {
        self.source.node_text(node)
    }

    /// Clamp a request offset to the file.
    pub fn clamp_offset(&self, offset: u32) -> u32 {
        offset.min(self.source.text.len() as u32)
    }

    pub fn location(&self, span: TextSpan) -> Location {
        location_in(self.source, span)
    }
}

pub fn location_in(source: &SourceFile, span: TextSpan) -> Location {
    Location::new(
        source.file_name.clone(),
        source.line_map.span_to_range(span, source.text()),
    )
}
