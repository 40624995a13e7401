//! Editor queries for the tsq language service.
//!
//! Every query runs against one immutable [`Snapshot`] of a project:
//! - Completions
//! - Quick info (hover)
//! - Go to definition and find all references
//! - Signature help
//!
//! [`Snapshot::execute`] is the request boundary. It resolves the cursor,
//! dispatches to an engine and turns panics into request errors.

// Shared plumbing
pub mod error;
pub use error::RequestError;

pub mod options;
pub use options::{QuotePreference, ServiceOptions};

pub mod query;
pub use query::FileQuery;

pub mod module_host;
pub use module_host::{ModuleSpecifierHost, PathEntry, PathEntryKind, VfsModuleHost};

// Cursor, context and symbol resolution
pub mod position;
pub mod context;
pub mod symbol_resolver;
pub mod display;
pub use display::ScriptElementKind;
pub mod jsdoc;

// Engines
pub mod completions;
pub use completions::{CompletionEntryDetails, CompletionItem, CompletionResponse, SortTier};

pub mod quick_info;
pub use quick_info::QuickInfo;

pub mod definition;
pub use definition::DefinitionInfo;

pub mod references;
pub use references::ReferenceEntry;

pub mod signature_help;
pub use signature_help::{SignatureHelpItem, SignatureHelpItems, SignatureHelpParameter};

// Dispatch
pub mod protocol;
pub use protocol::{FileLocation, Request, Response};

pub mod project;
pub use project::{Project, Snapshot};

#[cfg(test)]
#[path = "tests/fixture.rs"]
pub(crate) mod fixture;
