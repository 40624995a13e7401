//! Centralized limits and thresholds for the query layer.
//!
//! Every traversal that can follow user-controlled structure (ancestor
//! chains, alias chains, recursive types) is bounded by one of these.

/// Maximum number of parent hops when walking from a token to the root.
///
/// Long member-access chains or binary-expression trees produce deep
/// ancestor chains; classification gives up past this depth and treats the
/// position as non-completable.
pub const MAX_ANCESTOR_WALK: usize = 4096;

/// Maximum nesting depth while printing a type.
///
/// Deeper structure is elided as `...`.
pub const MAX_TYPE_PRINT_DEPTH: u32 = 32;

/// Maximum number of alias hops followed by `resolve_alias`.
///
/// ```typescript
/// // a.ts
/// export { x as y } from "./b";
/// // b.ts
/// export { y as x } from "./a";
/// ```
pub const MAX_ALIAS_CHAIN: usize = 64;

/// Maximum recursion depth when computing the type of an expression or
/// declaration.
pub const MAX_TYPE_RESOLUTION_DEPTH: u32 = 200;

/// Number of visited nodes between two polls of the cancellation flag.
pub const CANCELLATION_POLL_INTERVAL: u32 = 256;

/// Upper bound on entries returned by one path completion listing.
pub const MAX_PATH_COMPLETION_ENTRIES: usize = 1000;
