//! Line-delimited JSON request loop.
//!
//! Each input line is one message. Queries use the service's request shape
//! (`{"command": "hover", "file": "/a.ts", "offset": 12}`); two more
//! commands edit the project:
//!
//! ```text
//! {"command": "updateFile", "file": "/a.ts", "text": "..."}
//! {"command": "removeFile", "file": "/a.ts"}
//! ```
//!
//! Every message gets exactly one reply line, in input order.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, warn};
use tsq_common::CancellationToken;
use tsq_services::{Project, Request};

use crate::config::virtual_path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Edit {
    UpdateFile { file: String, text: String },
    RemoveFile { file: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub seq: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Reply {
    fn ok(seq: u64, version: u64, response: Option<Value>) -> Self {
        Reply {
            seq,
            success: true,
            version: Some(version),
            response,
            message: None,
        }
    }

    fn failed(seq: u64, message: String) -> Self {
        Reply {
            seq,
            success: false,
            version: None,
            response: None,
            message: Some(message),
        }
    }
}

/// Answer messages from `input` until it ends.
pub fn serve(project: &Project, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut seq = 0u64;
    for line in input.lines() {
        let line = line.context("reading request stream")?;
        if line.trim().is_empty() {
            continue;
        }
        seq += 1;
        let _span = info_span!("message", seq).entered();
        let reply = handle_line(project, seq, &line);
        serde_json::to_writer(&mut *out, &reply)?;
        writeln!(out)?;
        out.flush()?;
    }
    debug!(messages = seq, "request stream closed");
    Ok(())
}

pub fn handle_line(project: &Project, seq: u64, line: &str) -> Reply {
    let message: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => return Reply::failed(seq, format!("malformed JSON: {err}")),
    };
    let command = message
        .get("command")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default();
    match command.as_str() {
        "updateFile" | "removeFile" => match serde_json::from_value::<Edit>(message) {
            Ok(edit) => {
                let snapshot = match edit {
                    Edit::UpdateFile { file, text } => project.update_file(&virtual_path(&file), &text),
                    Edit::RemoveFile { file } => project.remove_file(&virtual_path(&file)),
                };
                Reply::ok(seq, snapshot.version(), None)
            }
            Err(err) => Reply::failed(seq, format!("invalid {command} message: {err}")),
        },
        _ => {
            let mut request = match serde_json::from_value::<Request>(message) {
                Ok(request) => request,
                Err(err) => return Reply::failed(seq, format!("invalid request: {err}")),
            };
            normalize_file(&mut request);
            let snapshot = project.snapshot();
            match snapshot.execute(&request, &CancellationToken::new()) {
                Ok(response) => match serde_json::to_value(&response) {
                    Ok(value) => Reply::ok(seq, snapshot.version(), Some(value)),
                    Err(err) => Reply::failed(seq, format!("serializing response: {err}")),
                },
                Err(err) => {
                    warn!(command = request.command(), %err, "request failed");
                    Reply::failed(seq, err.to_string())
                }
            }
        }
    }
}

fn normalize_file(request: &mut Request) {
    let location = match request {
        Request::Completions { location, .. }
        | Request::CompletionDetails { location, .. }
        | Request::Hover { location }
        | Request::Definition { location }
        | Request::References { location }
        | Request::SignatureHelp { location, .. } => location,
    };
    location.file = virtual_path(&location.file);
}

#[cfg(test)]
#[path = "tests/serve_tests.rs"]
mod serve_tests;
