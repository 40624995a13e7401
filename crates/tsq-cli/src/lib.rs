//! Command-line front end: loads a directory into a [`tsq_services::Project`]
//! and answers queries once from arguments or continuously from a
//! line-delimited JSON stream.

pub mod args;
pub mod config;
pub mod render;
pub mod serve;
pub mod tracing_config;

use anyhow::{Context, Result, bail};
use tsq_common::{CancellationToken, Position};
use tsq_services::{FileLocation, Project, Request};

use crate::args::{CliArgs, Command, QueryArgs, QueryKind};

/// Run one parsed command line, writing results to `out`.
pub fn run(args: CliArgs, out: &mut impl std::io::Write) -> Result<()> {
    match args.command {
        Command::Query(query) => run_query(query, out),
        Command::Serve { root } => {
            let loaded = config::load_project(&root)?;
            let project = Project::new(loaded.vfs, loaded.options);
            let stdin = std::io::stdin();
            serve::serve(&project, stdin.lock(), out)
        }
        Command::Files { root } => {
            let loaded = config::load_project(&root)?;
            for path in loaded.vfs.paths() {
                writeln!(out, "{path}")?;
            }
            Ok(())
        }
    }
}

fn run_query(query: QueryArgs, out: &mut impl std::io::Write) -> Result<()> {
    let loaded = config::load_project(&query.root)?;
    let project = Project::new(loaded.vfs, loaded.options);
    let location = parse_location(&query.location)?;
    let trigger = query.trigger.clone();
    let request = match query.kind {
        QueryKind::Completions => Request::Completions {
            location,
            trigger_character: trigger,
        },
        QueryKind::CompletionDetails => {
            let Some(entry_name) = query.entry.clone() else {
                bail!("completion-details needs the entry label (--entry <label>)");
            };
            Request::CompletionDetails { location, entry_name }
        }
        QueryKind::Hover => Request::Hover { location },
        QueryKind::Definition => Request::Definition { location },
        QueryKind::References => Request::References { location },
        QueryKind::SignatureHelp => Request::SignatureHelp {
            location,
            trigger_character: trigger,
        },
    };
    let response = project
        .execute(&request, &CancellationToken::new())
        .with_context(|| format!("{} request failed", request.command()))?;
    if query.json {
        serde_json::to_writer_pretty(&mut *out, &response)?;
        writeln!(out)?;
    } else {
        render::render(&response, out)?;
    }
    Ok(())
}

/// `file:offset` or `file:line:character` (both zero-based).
pub fn parse_location(text: &str) -> Result<FileLocation> {
    let Some((head, last)) = text.rsplit_once(':') else {
        bail!("expected <file>:<offset> or <file>:<line>:<character>, got {text:?}");
    };
    let last: u32 = last
        .parse()
        .with_context(|| format!("{last:?} in {text:?} is not a number"))?;
    if let Some((file, line)) = head.rsplit_once(':')
        && let Ok(line) = line.parse::<u32>()
    {
        return Ok(FileLocation {
            file: config::virtual_path(file),
            offset: None,
            position: Some(Position::new(line, last)),
        });
    }
    if head.is_empty() {
        bail!("missing file name in {text:?}");
    }
    Ok(FileLocation::at_offset(config::virtual_path(head), last))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
