//! Transport-agnostic request and response shapes.
//!
//! Requests are tagged by `command`. Every positional request names a file
//! and either a byte `offset` or a line/character `position`.

use serde::{Deserialize, Serialize};
use tsq_common::Position;

use crate::completions::{CompletionEntryDetails, CompletionResponse};
use crate::definition::DefinitionInfo;
use crate::quick_info::QuickInfo;
use crate::references::ReferenceEntry;
use crate::signature_help::SignatureHelpItems;

/// A file plus a cursor, as either a byte offset or a line/character pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLocation {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl FileLocation {
    pub fn at_offset(file: impl Into<String>, offset: u32) -> Self {
        FileLocation {
            file: file.into(),
            offset: Some(offset),
            position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    Completions {
        #[serde(flatten)]
        location: FileLocation,
        #[serde(default, rename = "triggerCharacter", skip_serializing_if = "Option::is_none")]
        trigger_character: Option<String>,
    },
    /// Details of one entry of the list [`Request::Completions`] returns
    /// at the same location.
    CompletionDetails {
        #[serde(flatten)]
        location: FileLocation,
        #[serde(rename = "entryName")]
        entry_name: String,
    },
    Hover {
        #[serde(flatten)]
        location: FileLocation,
    },
    Definition {
        #[serde(flatten)]
        location: FileLocation,
    },
    References {
        #[serde(flatten)]
        location: FileLocation,
    },
    SignatureHelp {
        #[serde(flatten)]
        location: FileLocation,
        #[serde(default, rename = "triggerCharacter", skip_serializing_if = "Option::is_none")]
        trigger_character: Option<String>,
    },
}

impl Request {
    /// The command name, as it appears on the wire.
    pub fn command(&self) -> &'static str {
        match self {
            Request::Completions { .. } => "completions",
            Request::CompletionDetails { .. } => "completionDetails",
            Request::Hover { .. } => "hover",
            Request::Definition { .. } => "definition",
            Request::References { .. } => "references",
            Request::SignatureHelp { .. } => "signatureHelp",
        }
    }

    pub fn location(&self) -> &FileLocation {
        match self {
            Request::Completions { location, .. }
            | Request::CompletionDetails { location, .. }
            | Request::Hover { location }
            | Request::Definition { location }
            | Request::References { location }
            | Request::SignatureHelp { location, .. } => location,
        }
    }
}

/// Results, tagged by the command that produced them. A `None` body means
/// the position has no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "body", rename_all = "camelCase")]
pub enum Response {
    Completions(Option<CompletionResponse>),
    CompletionDetails(Option<CompletionEntryDetails>),
    Hover(Option<QuickInfo>),
    Definition(Vec<DefinitionInfo>),
    References(Vec<ReferenceEntry>),
    SignatureHelp(Option<SignatureHelpItems>),
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod protocol_tests;
