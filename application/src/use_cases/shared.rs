//! Shared utilities for use cases.
//!
//! Contains the per-round attempt counter and cancellation helpers used by
//! both the completion client and the round orchestrator.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Attempt counter for one round.
///
/// Owned by the round orchestrator and lent to the completion client, so
/// every kind of failure (gateway, extraction, validation, duplicates)
/// draws from the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max: usize,
    used: usize,
}

impl RetryBudget {
    pub fn new(max: usize) -> Self {
        Self { max, used: 0 }
    }

    /// Take one attempt; returns its 1-based number, or `None` when spent.
    pub fn try_consume(&mut self) -> Option<usize> {
        if self.used >= self.max {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.max - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }
}

pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}

/// Sleep for `duration` unless cancelled first.
///
/// Returns `false` if the token fired.
pub(crate) async fn sleep_cancellable(duration: Duration, token: &Option<CancellationToken>) -> bool {
    if duration.is_zero() {
        return !is_cancelled(token);
    }
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        },
        None => {
            tokio::time::sleep(duration).await;
            true
        }
    }
}
