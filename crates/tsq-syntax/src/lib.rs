//! Syntax layer of the tsq language service.
//!
//! - [`scanner`]: tokens, trivia and context-sensitive rescans
//! - [`parser`]: error-tolerant recursive descent into a [`NodeArena`]
//! - [`SourceFile`]: the tree plus token and comment tables

pub mod kind;
pub use kind::SyntaxKind;

pub mod node;
pub use node::{Node, NodeArena, NodeFlags, NodeIndex};

pub mod scanner;
pub use scanner::{CommentKind, CommentRange, Token, TokenFlags};

mod parser;

pub mod source_file;
pub use source_file::{SourceFile, is_declaration_file_name};
