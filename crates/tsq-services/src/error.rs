//! Request-level failures.
//!
//! "No answer at this position" is not an error; engines return `None` or an
//! empty list for that. These variants describe requests that could not be
//! served at all.

use std::fmt;

use tsq_common::Cancelled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    UnknownFile(String),
    PositionOutOfRange { file: String, line: u32, character: u32 },
    Cancelled,
    /// A defect caught at the request boundary.
    InternalFailure { request: &'static str, message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownFile(file) => write!(f, "unknown file: {file}"),
            RequestError::PositionOutOfRange {
                file,
                line,
                character,
            } => write!(f, "position {line}:{character} is outside {file}"),
            RequestError::Cancelled => f.write_str("request cancelled"),
            RequestError::InternalFailure { request, message } => {
                write!(f, "internal failure in {request}: {message}")
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<Cancelled> for RequestError {
    fn from(_: Cancelled) -> Self {
        RequestError::Cancelled
    }
}
