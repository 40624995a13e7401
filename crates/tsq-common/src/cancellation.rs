//! Cooperative cancellation.
//!
//! A client cancels a request by flipping the shared flag. Traversals carry
//! a [`Checkpoint`] and call [`Checkpoint::tick`] once per visited node; the
//! flag itself is only read every [`CANCELLATION_POLL_INTERVAL`] ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::limits::CANCELLATION_POLL_INTERVAL;

/// Returned by a traversal that observed a cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("request cancelled")
    }
}

impl std::error::Error for Cancelled {}

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that can never be cancelled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        tracing::debug!("cancellation requested");
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn checkpoint(&self) -> Checkpoint<'_> {
        Checkpoint {
            token: self,
            countdown: CANCELLATION_POLL_INTERVAL,
        }
    }
}

/// Amortized poll of a [`CancellationToken`].
#[derive(Debug)]
pub struct Checkpoint<'a> {
    token: &'a CancellationToken,
    countdown: u32,
}

impl Checkpoint<'_> {
    pub fn tick(&mut self) -> Result<(), Cancelled> {
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = CANCELLATION_POLL_INTERVAL;
            return self.token.check();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/cancellation_tests.rs"]
mod cancellation_tests;
