//! "Last one out" completion tracking for fanned-out uploads.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::warn;

/// What a caller of [`CompletionTracker::record`] must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Nothing; someone else reports (or already reported) the outcome.
    Pending,
    /// This caller returned last and nothing failed: report success.
    Completed,
    /// This caller holds the first failure: report it.
    Failed,
}

/// Counts returned uploads and hands out exactly one terminal signal.
///
/// Invariants:
/// - the returned count never exceeds `total`
/// - across all callers, at most one `Completed` or `Failed` is produced
/// - `Completed` is produced only when every upload returned and none failed
///
/// A tracker with `total == 0` never completes.
#[derive(Debug)]
pub struct CompletionTracker {
    total: usize,
    returned: AtomicUsize,
    failed: AtomicBool,
    terminated: AtomicBool,
}

impl CompletionTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            returned: AtomicUsize::new(0),
            failed: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
        }
    }

    /// Record one returned upload, successful or not.
    pub fn record(&self, succeeded: bool) -> Signal {
        // A failure must be visible before its increment, so whoever
        // observes the final count also observes the failure
        if !succeeded {
            self.failed.store(true, Ordering::SeqCst);
        }

        let returned = match self.returned.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
            (n < self.total).then_some(n + 1)
        }) {
            Ok(previous) => previous + 1,
            Err(_) => {
                warn!(total = self.total, "upload recorded after every upload returned");
                return Signal::Pending;
            }
        };

        if !succeeded {
            return if self.claim() {
                Signal::Failed
            } else {
                Signal::Pending
            };
        }

        if returned == self.total && !self.failed.load(Ordering::SeqCst) && self.claim() {
            Signal::Completed
        } else {
            Signal::Pending
        }
    }

    fn claim(&self) -> bool {
        self.terminated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}
