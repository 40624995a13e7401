use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsq binary.
#[derive(Parser, Debug)]
#[command(name = "tsq", version, about = "Editor queries over a TypeScript project")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer one query and exit.
    Query(QueryArgs),
    /// Answer JSON requests read line by line from stdin.
    Serve {
        /// Project root (a directory, optionally holding tsq.json).
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Print the files the project would load.
    Files {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    #[arg(value_enum)]
    pub kind: QueryKind,

    /// `<file>:<offset>` or `<file>:<line>:<character>`, zero-based, with
    /// the file relative to the project root.
    pub location: String,

    /// Project root.
    #[arg(short = 'p', long = "project", default_value = ".")]
    pub root: PathBuf,

    /// Character that triggered the request.
    #[arg(short = 't', long = "trigger")]
    pub trigger: Option<String>,

    /// Completion entry label, for `completion-details`.
    #[arg(short = 'e', long = "entry")]
    pub entry: Option<String>,

    /// Print the raw response as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    Completions,
    #[value(name = "completion-details", alias = "completionDetails")]
    CompletionDetails,
    Hover,
    Definition,
    References,
    #[value(name = "signature-help", alias = "signatureHelp")]
    SignatureHelp,
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
