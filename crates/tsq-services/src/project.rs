//! Projects, snapshots and the request boundary.
//!
//! A [`Project`] owns the current [`Snapshot`] behind a lock that is only
//! held long enough to clone or swap an `Arc`. Edits build a whole new
//! snapshot from the previous one, so a request keeps answering from the
//! snapshot it started on while newer ones are published.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info_span, instrument, warn};
use tsq_checker::{Program, Vfs};
use tsq_common::CancellationToken;

use crate::completions::{self, CompletionEntryDetails, CompletionResponse};
use crate::definition::{self, DefinitionInfo};
use crate::error::RequestError;
use crate::module_host::VfsModuleHost;
use crate::options::ServiceOptions;
use crate::protocol::{FileLocation, Request, Response};
use crate::query::FileQuery;
use crate::quick_info::{self, QuickInfo};
use crate::references::{self, ReferenceEntry};
use crate::signature_help::{self, SignatureHelpItems};

/// One immutable version of a project.
pub struct Snapshot {
    version: u64,
    vfs: Arc<Vfs>,
    program: Program,
    host: VfsModuleHost,
    options: ServiceOptions,
}

impl Snapshot {
    fn build(version: u64, vfs: Arc<Vfs>, options: ServiceOptions, previous: Option<&Snapshot>) -> Self {
        let _span = info_span!("snapshot", version, files = vfs.len()).entered();
        let program = Program::with_previous(Arc::clone(&vfs), previous.map(|p| &p.program));
        Snapshot {
            version,
            host: VfsModuleHost::new(Arc::clone(&vfs)),
            vfs,
            program,
            options,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn vfs(&self) -> &Arc<Vfs> {
        &self.vfs
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// A query view of `file`.
    pub fn query<'s>(
        &'s self,
        file: &str,
        cancel: &'s CancellationToken,
    ) -> Result<FileQuery<'s>, RequestError> {
        FileQuery::new(&self.program, file, &self.options, cancel, &self.host)
    }

    /// Serve one request. A panic inside the engines is caught here and
    /// reported as [`RequestError::InternalFailure`].
    #[instrument(skip_all, fields(version = self.version, command = request.command()))]
    pub fn execute(&self, request: &Request, cancel: &CancellationToken) -> Result<Response, RequestError> {
        let command = request.command();
        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request, cancel))) {
            Ok(result) => {
                if let Err(error) = &result {
                    debug!(%error, "request failed");
                }
                result
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(command, %message, "request panicked");
                Err(RequestError::InternalFailure {
                    request: command,
                    message,
                })
            }
        }
    }

    fn dispatch(&self, request: &Request, cancel: &CancellationToken) -> Result<Response, RequestError> {
        let location = request.location();
        let offset = self.resolve_offset(location)?;
        let file = location.file.as_str();
        Ok(match request {
            Request::Completions {
                trigger_character, ..
            } => {
                let trigger = trigger_character.as_deref().and_then(|t| t.chars().next());
                Response::Completions(self.completions(file, offset, trigger, cancel)?)
            }
            Request::CompletionDetails { entry_name, .. } => Response::CompletionDetails(
                self.completion_details(file, offset, entry_name, cancel)?,
            ),
            Request::Hover { .. } => Response::Hover(self.quick_info(file, offset, cancel)?),
            Request::Definition { .. } => Response::Definition(self.definition(file, offset, cancel)?),
            Request::References { .. } => Response::References(self.references(file, offset, cancel)?),
            Request::SignatureHelp {
                trigger_character, ..
            } => Response::SignatureHelp(self.signature_help(
                file,
                offset,
                trigger_character.as_deref(),
                cancel,
            )?),
        })
    }

    /// Byte offset of a request cursor. A line/character position is used
    /// when no offset is given; neither means the start of the file.
    pub fn resolve_offset(&self, location: &FileLocation) -> Result<u32, RequestError> {
        if let Some(offset) = location.offset {
            return Ok(offset);
        }
        let Some(position) = location.position else {
            return Ok(0);
        };
        let source = self
            .program
            .file_by_name(&location.file)
            .ok_or_else(|| RequestError::UnknownFile(location.file.clone()))?;
        source
            .line_map
            .position_to_offset(position, source.text())
            .ok_or_else(|| RequestError::PositionOutOfRange {
                file: location.file.clone(),
                line: position.line,
                character: position.character,
            })
    }

    pub fn completions(
        &self,
        file: &str,
        offset: u32,
        trigger: Option<char>,
        cancel: &CancellationToken,
    ) -> Result<Option<CompletionResponse>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(completions::completions_at(&q, offset, trigger)?)
    }

    pub fn completion_details(
        &self,
        file: &str,
        offset: u32,
        entry_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<CompletionEntryDetails>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(completions::completion_details_at(&q, offset, entry_name)?)
    }

    pub fn quick_info(
        &self,
        file: &str,
        offset: u32,
        cancel: &CancellationToken,
    ) -> Result<Option<QuickInfo>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(quick_info::quick_info_at(&q, offset)?)
    }

    pub fn definition(
        &self,
        file: &str,
        offset: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<DefinitionInfo>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(definition::definition_at(&q, offset)?)
    }

    pub fn references(
        &self,
        file: &str,
        offset: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceEntry>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(references::references_at(&q, offset)?)
    }

    pub fn signature_help(
        &self,
        file: &str,
        offset: u32,
        trigger: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SignatureHelpItems>, RequestError> {
        let q = self.query(file, cancel)?;
        Ok(signature_help::signature_help_at(&q, offset, trigger)?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

// =============================================================================
// Project
// =============================================================================

pub struct Project {
    current: RwLock<Arc<Snapshot>>,
    /// Serializes edits so that none is lost between read and swap.
    edits: Mutex<()>,
}

impl Project {
    pub fn new(vfs: Vfs, options: ServiceOptions) -> Self {
        let snapshot = Snapshot::build(0, Arc::new(vfs), options, None);
        Project {
            current: RwLock::new(Arc::new(snapshot)),
            edits: Mutex::new(()),
        }
    }

    /// The snapshot new requests should run against.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Insert or replace a file and publish the resulting snapshot.
    pub fn update_file(&self, path: &str, text: &str) -> Arc<Snapshot> {
        self.edit(|vfs| {
            vfs.insert(path, text);
            true
        })
    }

    /// Remove a file; the snapshot is only rebuilt when it existed.
    pub fn remove_file(&self, path: &str) -> Arc<Snapshot> {
        self.edit(|vfs| vfs.remove(path))
    }

    pub fn set_options(&self, options: ServiceOptions) -> Arc<Snapshot> {
        let _guard = self.edits.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self.snapshot();
        let next = Snapshot::build(previous.version + 1, Arc::clone(&previous.vfs), options, Some(&previous));
        self.publish(next)
    }

    /// Run `request` on the current snapshot.
    pub fn execute(&self, request: &Request, cancel: &CancellationToken) -> Result<Response, RequestError> {
        self.snapshot().execute(request, cancel)
    }

    fn edit(&self, change: impl FnOnce(&mut Vfs) -> bool) -> Arc<Snapshot> {
        let _guard = self.edits.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = self.snapshot();
        let mut vfs = Vfs::clone(&previous.vfs);
        if !change(&mut vfs) {
            return previous;
        }
        let next = Snapshot::build(
            previous.version + 1,
            Arc::new(vfs),
            previous.options.clone(),
            Some(&previous),
        );
        self.publish(next)
    }

    fn publish(&self, next: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        debug!(version = next.version, "published snapshot");
        next
    }
}

#[cfg(test)]
#[path = "tests/project_tests.rs"]
mod project_tests;
