//! Common types and utilities for the tsq language service.
//!
//! This crate provides foundational types used across all tsq crates:
//! - Position/Range types for line/column source locations
//! - Byte-offset text spans
//! - Centralized limits and thresholds
//! - Cooperative cancellation for long-running traversals

// Centralized limits and thresholds
pub mod limits;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Location, Position, Range};

// Byte-offset spans
pub mod span;
pub use span::TextSpan;

// Cooperative cancellation
pub mod cancellation;
pub use cancellation::{Cancelled, CancellationToken, Checkpoint};
